//! Central tunables for the routing core. A plain, owned struct passed by
//! reference to each constraint builder — no module statics, matching the
//! no-global-state rule the domain model itself follows.

use std::time::Duration;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Integer scale applied to floating-point weight/volume at the boundary.
    pub capacity_scale_factor: i64,

    /// Minutes, standard shift length before overtime applies.
    pub standard_work_time: i64,
    /// Minutes, hard shift cap.
    pub max_work_time: i64,
    /// Minutes of continuous travel after which a break is owed.
    pub break_interval: i64,
    /// Minutes, length of an owed break.
    pub break_duration: i64,
    /// Multiplier applied to the regular labor rate beyond `standard_work_time`.
    pub overtime_multiplier: f64,

    /// Minutes spent at a vehicle's start depot before the first leg departs.
    pub depot_service_time: i64,
    /// Minimum minutes charged between two stops at the same physical location.
    pub min_intra_transit: i64,

    pub cost_per_kg_km: i64,
    pub cost_per_wait_min: i64,

    pub unserved_penalty: i64,
    pub late_penalty: i64,
    pub zone_penalty: i64,

    /// Volume load fraction at which LIFO rehandling is considered "crowded".
    pub crowded_volume_fraction: f64,
    pub rehandling_crowded_multiplier: i64,
    pub rehandling_basic_multiplier: i64,

    /// Extra minutes granted to a repaired delivery window beyond the
    /// computed minimum, applied by the time-paradox pre-check.
    pub time_paradox_slack_minutes: i64,

    pub max_solver_time_secs: f64,
    pub num_solver_workers: u32,
}

impl Config {
    pub fn max_solver_time(&self) -> Duration {
        Duration::from_secs_f64(self.max_solver_time_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capacity_scale_factor: 100,
            standard_work_time: 480,
            max_work_time: 720,
            break_interval: 240,
            break_duration: 30,
            overtime_multiplier: 1.5,
            depot_service_time: 30,
            min_intra_transit: 5,
            cost_per_kg_km: 1,
            cost_per_wait_min: 5,
            unserved_penalty: 500_000,
            late_penalty: 50_000,
            zone_penalty: 2_000,
            crowded_volume_fraction: 0.70,
            rehandling_crowded_multiplier: 50,
            rehandling_basic_multiplier: 10,
            time_paradox_slack_minutes: 100,
            max_solver_time_secs: 30.0,
            num_solver_workers: 8,
        }
    }
}
