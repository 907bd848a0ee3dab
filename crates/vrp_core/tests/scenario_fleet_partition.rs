//! Two vehicles at different depots, one shipment reachable only from one
//! of them within its time window: the unreachable vehicle must stay idle.
//!
//! `#[ignore]`d: requires the real `cp_sat` backend (`cargo test --
//! --ignored`), for the same reason as every other scenario in this
//! directory — the full variable layer is too wide for `FakeCpModel`.

use vrp_core::problem::{
    capacity::Capacity, location::Location, shipment::ShipmentBuilder, time_window::TimeWindow,
    vehicle::{CostProfile, VehicleBuilder}, Problem,
};
use vrp_core::problem::location::LocationIdx;
use vrp_core::solution::Status;
use vrp_core::Config;

/// `depot_a(0)`, `depot_b(1)`, `pickup(2)`, `delivery(3)`. Vehicle A is five
/// minutes from the shipment's two stops; vehicle B is ten thousand, far
/// past the shipment's window, so only A can ever serve it.
fn fleet_partition_problem() -> Problem {
    let locations = vec![
        Location::new("depot_a", 0.0, 0.0, 0, 0),
        Location::new("depot_b", 10.0, 10.0, 0, 0),
        Location::new("pickup", 0.0, 1.0, 0, 1),
        Location::new("delivery", 0.0, 2.0, 0, 1),
    ];

    let mut vehicle_a = VehicleBuilder::default();
    vehicle_a.set_external_id("van_a");
    vehicle_a.set_start_depot(LocationIdx::new(0));
    vehicle_a.set_end_depot(LocationIdx::new(0));
    vehicle_a.set_cost(CostProfile { fixed: 100, ..Default::default() });

    let mut vehicle_b = VehicleBuilder::default();
    vehicle_b.set_external_id("van_b");
    vehicle_b.set_start_depot(LocationIdx::new(1));
    vehicle_b.set_end_depot(LocationIdx::new(1));
    vehicle_b.set_cost(CostProfile { fixed: 100, ..Default::default() });

    let mut shipment_builder = ShipmentBuilder::default();
    shipment_builder.set_external_id("s1");
    shipment_builder.set_pickup_location(LocationIdx::new(2));
    shipment_builder.set_delivery_location(LocationIdx::new(3));
    shipment_builder.set_cargo(Capacity::new(10, 10));
    shipment_builder.set_pickup_window(TimeWindow::new(0, 50));
    shipment_builder.set_delivery_window(TimeWindow::new(0, 100));
    let shipment = shipment_builder.build();

    let n = 4;
    let mut travel_time = vec![0i64; n * n];
    let idx = |i: usize, j: usize| i * n + j;
    // Vehicle A's depot is 5 minutes from both shipment stops.
    travel_time[idx(0, 2)] = 5;
    travel_time[idx(2, 0)] = 5;
    travel_time[idx(0, 3)] = 5;
    travel_time[idx(3, 0)] = 5;
    travel_time[idx(2, 3)] = 5;
    travel_time[idx(3, 2)] = 5;
    // Vehicle B's depot is 10,000 minutes away: unreachable within the window.
    travel_time[idx(1, 2)] = 10_000;
    travel_time[idx(2, 1)] = 10_000;
    travel_time[idx(1, 3)] = 10_000;
    travel_time[idx(3, 1)] = 10_000;
    let travel_distance = travel_time.clone();

    Problem::from_boundary(locations, vec![vehicle_a.build(), vehicle_b.build()], vec![shipment], travel_time, travel_distance, None)
        .expect("valid fixture")
}

#[test]
#[ignore = "requires the cp_sat native backend; too wide for FakeCpModel"]
fn unreachable_vehicle_is_left_unused() {
    let config = Config::default();
    let solution = vrp_core::solve(fleet_partition_problem(), &config);

    assert_eq!(solution.status, Status::Optimal);
    assert!(solution.unserved_shipments.is_empty());
    assert_eq!(solution.routes.len(), 2);

    let van_a = solution.routes.iter().find(|r| r.vehicle_id == "van_a").unwrap();
    let van_b = solution.routes.iter().find(|r| r.vehicle_id == "van_b").unwrap();

    assert_eq!(van_a.stops.len(), 4);
    assert!(van_a.stops.iter().any(|s| s.shipment_id.as_deref() == Some("s1")));

    // Van B never leaves its depot: its route is just the two depot stops.
    assert_eq!(van_b.stops.len(), 2);
    assert_eq!(van_b.total_distance, 0);
    assert!(van_b.stops.iter().all(|s| s.shipment_id.is_none()));

    // Only the vehicle that actually runs pays its fixed cost.
    assert_eq!(solution.costs.fixed, 100);
}
