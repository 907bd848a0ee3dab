//! Test fixtures for the routing core: plain helper functions over the
//! public builders, plus one small owned-`self` fluent builder for
//! whole-`Problem` fixtures.

use crate::problem::{
    capacity::Capacity,
    location::{Location, LocationIdx},
    shipment::{Shipment, ShipmentBuilder},
    time_window::TimeWindow,
    vehicle::{Vehicle, VehicleBuilder},
    Problem,
};

/// `n` locations laid out on a line one distance unit apart, location `0`
/// conventionally reserved as the depot. Zone `0` for the depot, `1` for
/// every other location — callers needing distinct zones build their own
/// `Location`s directly.
pub fn line_locations(n: usize, service_duration: i64) -> Vec<Location> {
    (0..n)
        .map(|i| {
            let zone = if i == 0 { 0 } else { 1 };
            Location::new(format!("loc_{i}"), 0.0, i as f64, service_duration, zone)
        })
        .collect()
}

/// A symmetric travel matrix where the cost between two locations is
/// `per_unit * |i - j|`, matching [`line_locations`]' layout.
pub fn line_travel_matrix(n: usize, per_unit: i64) -> Vec<i64> {
    let mut table = vec![0; n * n];
    for i in 0..n {
        for j in 0..n {
            table[i * n + j] = (i as i64 - j as i64).abs() * per_unit;
        }
    }
    table
}

/// One vehicle depot-to-depot at `depot`, default capacity and labor
/// policy, external id `v{index}`.
pub fn basic_vehicle(index: usize, depot: LocationIdx) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder.set_external_id(format!("v{index}"));
    builder.set_start_depot(depot);
    builder.set_end_depot(depot);
    builder.build()
}

/// One shipment between two locations, wide-open windows, external id
/// `s{index}`.
pub fn basic_shipment(index: usize, pickup: LocationIdx, delivery: LocationIdx, cargo: Capacity) -> Shipment {
    let mut builder = ShipmentBuilder::default();
    builder.set_external_id(format!("s{index}"));
    builder.set_pickup_location(pickup);
    builder.set_delivery_location(delivery);
    builder.set_cargo(cargo);
    builder.set_pickup_window(TimeWindow::new(0, 1_000));
    builder.set_delivery_window(TimeWindow::new(0, 1_000));
    builder.build()
}

/// Fluent assembly of a whole `Problem` for a test, in the owned-`self`
/// chaining idiom `TimeWindowBuilder` already uses in this crate.
#[derive(Default)]
pub struct TestProblemBuilder {
    locations: Vec<Location>,
    vehicles: Vec<Vehicle>,
    shipments: Vec<Shipment>,
    travel_time: Option<Vec<i64>>,
    travel_distance: Option<Vec<i64>>,
    setup_time: Option<Vec<i64>>,
}

impl TestProblemBuilder {
    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_vehicles(mut self, vehicles: Vec<Vehicle>) -> Self {
        self.vehicles = vehicles;
        self
    }

    pub fn with_shipments(mut self, shipments: Vec<Shipment>) -> Self {
        self.shipments = shipments;
        self
    }

    pub fn with_travel_time(mut self, travel_time: Vec<i64>) -> Self {
        self.travel_time = Some(travel_time);
        self
    }

    pub fn with_travel_distance(mut self, travel_distance: Vec<i64>) -> Self {
        self.travel_distance = Some(travel_distance);
        self
    }

    pub fn with_setup_time(mut self, setup_time: Vec<i64>) -> Self {
        self.setup_time = Some(setup_time);
        self
    }

    /// Builds the `Problem`, defaulting `travel_distance` to `travel_time`
    /// (distance-agnostic fixtures, the common case in unit tests) when not
    /// set explicitly.
    pub fn build(self) -> Problem {
        let n = self.locations.len();
        let travel_time = self.travel_time.unwrap_or_else(|| vec![0; n * n]);
        let travel_distance = self.travel_distance.unwrap_or_else(|| travel_time.clone());

        Problem::from_boundary(
            self.locations,
            self.vehicles,
            self.shipments,
            travel_time,
            travel_distance,
            self.setup_time,
        )
        .expect("test fixture must be a valid problem")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_travel_matrix_is_symmetric_and_zero_on_diagonal() {
        let table = line_travel_matrix(4, 10);
        assert_eq!(table[0 * 4 + 0], 0);
        assert_eq!(table[1 * 4 + 3], 20);
        assert_eq!(table[3 * 4 + 1], 20);
    }

    #[test]
    fn builder_assembles_a_valid_depot_and_pair_fixture() {
        let locations = line_locations(3, 5);
        let vehicle = basic_vehicle(0, LocationIdx::new(0));
        let shipment = basic_shipment(0, LocationIdx::new(1), LocationIdx::new(2), Capacity::new(10, 10));

        let problem = TestProblemBuilder::default()
            .with_locations(locations)
            .with_vehicles(vec![vehicle])
            .with_shipments(vec![shipment])
            .with_travel_time(line_travel_matrix(3, 10))
            .build();

        assert_eq!(problem.vehicles().len(), 1);
        assert_eq!(problem.shipments().len(), 1);
        assert_eq!(problem.stop_layout().num_stops(), 4);
    }
}
