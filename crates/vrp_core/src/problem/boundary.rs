//! JSON façade over [`Problem::from_boundary`], in the shape of the
//! teacher's `json::vehicle_routing_problem_input` module: one `Input`
//! struct per entity, `Option` fields for everything with a sane default,
//! and a single `into_problem` that drives the real builders.

use serde::Deserialize;

use super::{
    capacity::Capacity,
    location::{Location, LocationIdx},
    shipment::ShipmentBuilder,
    time_window::TimeWindow,
    vehicle::{BreakRule, CostProfile, LaborCost, LaborPolicy, VehicleBuilder, WorkShift},
    Problem,
};
use crate::{config::Config, error::ProblemError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemInput {
    pub locations: Vec<LocationInput>,
    pub vehicles: Vec<VehicleInput>,
    pub shipments: Vec<ShipmentInput>,
    /// Row-major minutes, `N_locations x N_locations`.
    pub travel_time: Vec<i64>,
    /// Row-major kilometers, `N_locations x N_locations`.
    pub travel_distance: Vec<i64>,
    /// Row-major minutes; defaults to all-zero when omitted.
    pub setup_time: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationInput {
    pub external_id: String,
    pub lat: f64,
    pub lon: f64,
    pub service_duration: Option<i64>,
    pub zone: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeWindowInput {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostProfileInput {
    pub fixed: Option<i64>,
    pub per_km: Option<i64>,
    pub per_min: Option<i64>,
    pub per_kg_km: Option<i64>,
    pub per_wait_min: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkShiftInput {
    pub start_time: Option<i64>,
    pub max_duration: Option<i64>,
    pub standard_duration: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleInput {
    pub external_id: String,
    pub start_depot: usize,
    pub end_depot: Option<usize>,
    pub capacity_weight: Option<f64>,
    pub capacity_volume: Option<f64>,
    pub cost: Option<CostProfileInput>,
    pub shift: Option<WorkShiftInput>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShipmentInput {
    pub external_id: String,
    pub pickup_location: usize,
    pub delivery_location: usize,
    pub cargo_weight: Option<f64>,
    pub cargo_volume: Option<f64>,
    pub pickup_window: TimeWindowInput,
    pub delivery_window: TimeWindowInput,
    pub required_tags: Option<Vec<String>>,
    pub priority: Option<i64>,
    pub unserved_penalty: Option<i64>,
}

impl ProblemInput {
    /// Converts boundary data into a validated `Problem`, scaling
    /// floating-point weight/volume via `config.capacity_scale_factor`.
    /// The output de-scales back to floating point on the way out.
    pub fn into_problem(self, config: &Config) -> Result<Problem, ProblemError> {
        let locations: Vec<Location> = self
            .locations
            .into_iter()
            .map(|l| {
                Location::new(
                    l.external_id,
                    l.lat,
                    l.lon,
                    l.service_duration.unwrap_or(0),
                    l.zone.unwrap_or(1),
                )
            })
            .collect();

        let vehicles = self
            .vehicles
            .into_iter()
            .map(|v| {
                let mut builder = VehicleBuilder::default();
                builder.set_external_id(v.external_id);
                builder.set_start_depot(LocationIdx::new(v.start_depot));
                builder.set_end_depot(LocationIdx::new(v.end_depot.unwrap_or(v.start_depot)));
                builder.set_capacity(Capacity::from_boundary(
                    v.capacity_weight.unwrap_or(0.0),
                    v.capacity_volume.unwrap_or(0.0),
                    config.capacity_scale_factor,
                ));

                let cost = v.cost.unwrap_or_default();
                builder.set_cost(CostProfile {
                    fixed: cost.fixed.unwrap_or(0),
                    per_km: cost.per_km.unwrap_or(0),
                    per_min: cost.per_min.unwrap_or(0),
                    per_kg_km: cost.per_kg_km.unwrap_or(config.cost_per_kg_km),
                    per_wait_min: cost.per_wait_min.unwrap_or(config.cost_per_wait_min),
                });

                let shift = v.shift.unwrap_or(WorkShiftInput {
                    start_time: None,
                    max_duration: None,
                    standard_duration: None,
                });
                builder.set_labor(LaborPolicy {
                    shift: WorkShift {
                        start_time: shift.start_time.unwrap_or(0),
                        max_duration: shift.max_duration.unwrap_or(config.max_work_time),
                        standard_duration: shift.standard_duration.unwrap_or(config.standard_work_time),
                    },
                    break_rule: BreakRule {
                        interval: config.break_interval,
                        duration: config.break_duration,
                    },
                    cost: LaborCost {
                        regular_rate: cost.per_min.unwrap_or(0),
                        overtime_multiplier: config.overtime_multiplier,
                    },
                });

                if let Some(tags) = v.tags {
                    builder.set_tags(tags);
                }

                builder.build()
            })
            .collect();

        let shipments = self
            .shipments
            .into_iter()
            .map(|s| {
                let mut builder = ShipmentBuilder::default();
                builder.set_external_id(s.external_id);
                builder.set_pickup_location(LocationIdx::new(s.pickup_location));
                builder.set_delivery_location(LocationIdx::new(s.delivery_location));
                builder.set_cargo(Capacity::from_boundary(
                    s.cargo_weight.unwrap_or(0.0),
                    s.cargo_volume.unwrap_or(0.0),
                    config.capacity_scale_factor,
                ));
                builder.set_pickup_window(TimeWindow::new(s.pickup_window.start, s.pickup_window.end));
                builder.set_delivery_window(TimeWindow::new(s.delivery_window.start, s.delivery_window.end));

                if let Some(tags) = s.required_tags {
                    builder.set_required_tags(tags);
                }
                if let Some(priority) = s.priority {
                    builder.set_priority(priority);
                }
                if let Some(penalty) = s.unserved_penalty {
                    builder.set_unserved_penalty(penalty);
                }

                builder.build()
            })
            .collect();

        Problem::from_boundary(
            locations,
            vehicles,
            shipments,
            self.travel_time,
            self.travel_distance,
            self.setup_time,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> ProblemInput {
        serde_json::from_value(serde_json::json!({
            "locations": [
                {"external_id": "depot", "lat": 0.0, "lon": 0.0},
                {"external_id": "pickup", "lat": 0.0, "lon": 1.0, "service_duration": 5, "zone": 2},
                {"external_id": "delivery", "lat": 0.0, "lon": 2.0, "service_duration": 5, "zone": 3}
            ],
            "vehicles": [
                {"external_id": "v1", "start_depot": 0, "capacity_weight": 100.0, "capacity_volume": 50.0}
            ],
            "shipments": [
                {
                    "external_id": "s1",
                    "pickup_location": 1,
                    "delivery_location": 2,
                    "cargo_weight": 10.0,
                    "cargo_volume": 5.0,
                    "pickup_window": {"start": 0, "end": 100},
                    "delivery_window": {"start": 0, "end": 200}
                }
            ],
            "travel_time": [0, 10, 10, 10, 0, 20, 10, 20, 0],
            "travel_distance": [0, 10, 10, 10, 0, 20, 10, 20, 0]
        }))
        .expect("fixture matches ProblemInput shape")
    }

    #[test]
    fn converts_into_a_valid_problem() {
        let config = Config::default();
        let problem = sample_input().into_problem(&config).expect("valid input");

        assert_eq!(problem.locations().len(), 3);
        assert_eq!(problem.vehicles().len(), 1);
        assert_eq!(problem.shipments().len(), 1);
        assert_eq!(problem.vehicles()[0].capacity().weight, 100 * config.capacity_scale_factor);
    }

    #[test]
    fn rejects_out_of_range_depot_references() {
        let mut value = serde_json::to_value(sample_input_json()).unwrap();
        value["vehicles"][0]["start_depot"] = serde_json::json!(99);
        let input: ProblemInput = serde_json::from_value(value).unwrap();

        let err = input.into_problem(&Config::default()).unwrap_err();
        assert!(matches!(err, ProblemError::UnknownDepot { .. }));
    }

    fn sample_input_json() -> serde_json::Value {
        serde_json::json!({
            "locations": [
                {"external_id": "depot", "lat": 0.0, "lon": 0.0},
                {"external_id": "pickup", "lat": 0.0, "lon": 1.0, "service_duration": 5, "zone": 2},
                {"external_id": "delivery", "lat": 0.0, "lon": 2.0, "service_duration": 5, "zone": 3}
            ],
            "vehicles": [
                {"external_id": "v1", "start_depot": 0, "capacity_weight": 100.0, "capacity_volume": 50.0}
            ],
            "shipments": [
                {
                    "external_id": "s1",
                    "pickup_location": 1,
                    "delivery_location": 2,
                    "cargo_weight": 10.0,
                    "cargo_volume": 5.0,
                    "pickup_window": {"start": 0, "end": 100},
                    "delivery_window": {"start": 0, "end": 200}
                }
            ],
            "travel_time": [0, 10, 10, 10, 0, 20, 10, 20, 0],
            "travel_distance": [0, 10, 10, 10, 0, 20, 10, 20, 0]
        })
    }
}
