//! One vehicle, two shipments sharing it, windows tight enough to force a
//! single visiting order — once with the crowded LIFO order (`A_p, B_p,
//! A_d, B_d`), once with the order that avoids it (`A_p, B_p, B_d, A_d`).
//!
//! `#[ignore]`d: requires the real `cp_sat` backend (`cargo test --
//! --ignored`), for the same reason as every other scenario in this
//! directory.
//!
//! Five locations, uniform 10-minute legs, zero service time anywhere:
//! with the vehicle's 30-minute depot-departure bonus, a vehicle visiting
//! four stops in sequence arrives at them at `40, 50, 60, 70` regardless of
//! which stop occupies which slot. Each shipment's pickup/delivery window
//! is narrowed to a single one of those slots, forcing the visiting order.

use vrp_core::problem::{
    capacity::Capacity, location::Location, shipment::ShipmentBuilder, time_window::TimeWindow,
    vehicle::VehicleBuilder, Problem,
};
use vrp_core::problem::location::LocationIdx;
use vrp_core::Config;

fn uniform_matrix(n: usize, leg: i64) -> Vec<i64> {
    let mut table = vec![leg; n * n];
    for i in 0..n {
        table[i * n + i] = 0;
    }
    table
}

fn lifo_problem(
    a_pickup_window: TimeWindow,
    a_delivery_window: TimeWindow,
    b_pickup_window: TimeWindow,
    b_delivery_window: TimeWindow,
) -> Problem {
    let locations = vec![
        Location::new("depot", 0.0, 0.0, 0, 0),
        Location::new("pickup_a", 0.0, 1.0, 0, 1),
        Location::new("pickup_b", 0.0, 2.0, 0, 1),
        Location::new("delivery_a", 0.0, 3.0, 0, 1),
        Location::new("delivery_b", 0.0, 4.0, 0, 1),
    ];

    let mut vehicle_builder = VehicleBuilder::default();
    vehicle_builder.set_external_id("v1");
    vehicle_builder.set_start_depot(LocationIdx::new(0));
    vehicle_builder.set_end_depot(LocationIdx::new(0));
    vehicle_builder.set_capacity(Capacity::new(1_000, 20));
    let vehicle = vehicle_builder.build();

    let mut ship_a = ShipmentBuilder::default();
    ship_a.set_external_id("A");
    ship_a.set_pickup_location(LocationIdx::new(1));
    ship_a.set_delivery_location(LocationIdx::new(3));
    ship_a.set_cargo(Capacity::new(0, 10));
    ship_a.set_pickup_window(a_pickup_window);
    ship_a.set_delivery_window(a_delivery_window);

    let mut ship_b = ShipmentBuilder::default();
    ship_b.set_external_id("B");
    ship_b.set_pickup_location(LocationIdx::new(2));
    ship_b.set_delivery_location(LocationIdx::new(4));
    ship_b.set_cargo(Capacity::new(0, 8));
    ship_b.set_pickup_window(b_pickup_window);
    ship_b.set_delivery_window(b_delivery_window);

    let travel_time = uniform_matrix(5, 10);
    let travel_distance = travel_time.clone();

    Problem::from_boundary(
        locations,
        vec![vehicle],
        vec![ship_a.build(), ship_b.build()],
        travel_time,
        travel_distance,
        None,
    )
    .expect("valid fixture")
}

#[test]
#[ignore = "requires the cp_sat native backend; too wide for FakeCpModel"]
fn interleaved_order_triggers_the_crowded_rehandling_penalty() {
    // Forced order: pickup_a (~40), pickup_b (~50), delivery_a (~60), delivery_b (~70).
    // At delivery_a the vehicle still carries both shipments: volume 10+8=18,
    // at or above the 70%-of-20 threshold of 14, so the penalty is the
    // crowded rate: 8 (shipment B's volume) * 50 = 400.
    let problem = lifo_problem(
        TimeWindow::new(38, 42),
        TimeWindow::new(58, 62),
        TimeWindow::new(48, 52),
        TimeWindow::new(68, 72),
    );
    let config = Config::default();
    let solution = vrp_core::solve(problem, &config);

    assert!(solution.unserved_shipments.is_empty());
    assert_eq!(solution.costs.rehandling, 400);
}

#[test]
#[ignore = "requires the cp_sat native backend; too wide for FakeCpModel"]
fn unloading_b_before_a_avoids_the_penalty() {
    // Forced order: pickup_a (~40), pickup_b (~50), delivery_b (~60), delivery_a (~70).
    // Shipment B is never trapped beneath A, and A is dropped last, so
    // neither ordered pair satisfies the "blocked drop" condition.
    let problem = lifo_problem(
        TimeWindow::new(38, 42),
        TimeWindow::new(68, 72),
        TimeWindow::new(48, 52),
        TimeWindow::new(58, 62),
    );
    let config = Config::default();
    let solution = vrp_core::solve(problem, &config);

    assert!(solution.unserved_shipments.is_empty());
    assert_eq!(solution.costs.rehandling, 0);
}
