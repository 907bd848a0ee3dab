use fxhash::FxHashSet;

use crate::define_index_newtype;

use super::{capacity::Capacity, location::LocationIdx};

define_index_newtype!(VehicleIdx, Vehicle);

/// Per-use and per-distance cost parameters.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct CostProfile {
    pub fixed: i64,
    pub per_km: i64,
    pub per_min: i64,
    pub per_kg_km: i64,
    pub per_wait_min: i64,
}

/// Mandatory break requirement: a break of `duration` minutes is owed after
/// `interval` minutes of continuous travel.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct BreakRule {
    pub interval: i64,
    pub duration: i64,
}

/// Shift window and duration caps.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct WorkShift {
    pub start_time: i64,
    pub max_duration: i64,
    pub standard_duration: i64,
}

/// Labor cost rates applied to the hours a vehicle's route occupies.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct LaborCost {
    pub regular_rate: i64,
    pub overtime_multiplier: f64,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct LaborPolicy {
    pub shift: WorkShift,
    pub break_rule: BreakRule,
    pub cost: LaborCost,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Vehicle {
    external_id: String,
    start_depot: LocationIdx,
    end_depot: LocationIdx,
    capacity: Capacity,
    cost: CostProfile,
    labor: LaborPolicy,
    tags: FxHashSet<String>,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn start_depot(&self) -> LocationIdx {
        self.start_depot
    }

    pub fn end_depot(&self) -> LocationIdx {
        self.end_depot
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn cost(&self) -> CostProfile {
        self.cost
    }

    pub fn labor(&self) -> &LaborPolicy {
        &self.labor
    }

    pub fn tags(&self) -> &FxHashSet<String> {
        &self.tags
    }

    pub fn is_compatible_with(&self, required_tags: &FxHashSet<String>) -> bool {
        required_tags.is_subset(&self.tags)
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    external_id: Option<String>,
    start_depot: Option<LocationIdx>,
    end_depot: Option<LocationIdx>,
    capacity: Option<Capacity>,
    cost: Option<CostProfile>,
    labor: Option<LaborPolicy>,
    tags: Option<Vec<String>>,
}

impl VehicleBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_start_depot(&mut self, depot: LocationIdx) -> &mut Self {
        self.start_depot = Some(depot);
        self
    }

    pub fn set_end_depot(&mut self, depot: LocationIdx) -> &mut Self {
        self.end_depot = Some(depot);
        self
    }

    pub fn set_capacity(&mut self, capacity: Capacity) -> &mut Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_cost(&mut self, cost: CostProfile) -> &mut Self {
        self.cost = Some(cost);
        self
    }

    pub fn set_labor(&mut self, labor: LaborPolicy) -> &mut Self {
        self.labor = Some(labor);
        self
    }

    pub fn set_tags(&mut self, tags: Vec<String>) -> &mut Self {
        self.tags = Some(tags);
        self
    }

    pub fn build(self) -> Vehicle {
        let start_depot = self.start_depot.expect("start depot is required");
        Vehicle {
            external_id: self.external_id.expect("external id is required"),
            start_depot,
            end_depot: self.end_depot.unwrap_or(start_depot),
            capacity: self.capacity.unwrap_or(Capacity::EMPTY),
            cost: self.cost.unwrap_or_default(),
            labor: self.labor.unwrap_or(LaborPolicy {
                shift: WorkShift {
                    start_time: 0,
                    max_duration: 720,
                    standard_duration: 480,
                },
                break_rule: BreakRule {
                    interval: 240,
                    duration: 30,
                },
                cost: LaborCost {
                    regular_rate: 10,
                    overtime_multiplier: 1.5,
                },
            }),
            tags: self.tags.unwrap_or_default().into_iter().collect(),
        }
    }
}
