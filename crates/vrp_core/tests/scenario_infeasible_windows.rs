//! A shipment whose delivery window closes before the earliest possible
//! delivery time. Serving is optional in this model (an unserved shipment
//! just pays `unserved_penalty`), so an impossible window does not make the
//! whole problem infeasible — it makes that one shipment unservable, and
//! the solver leaves it out of every route. Widening the window via
//! [`vrp_core::precheck`] turns it back into something worth serving.
//!
//! `#[ignore]`d: requires the real `cp_sat` backend (`cargo test --
//! --ignored`), for the same reason as every other scenario in this
//! directory.

use vrp_core::problem::{
    capacity::Capacity, location::Location, shipment::ShipmentBuilder, time_window::TimeWindow,
    vehicle::VehicleBuilder, Problem,
};
use vrp_core::problem::location::LocationIdx;
use vrp_core::Config;

/// `delivery.end = 10`, but the earliest a vehicle can reach the delivery
/// stop is `pickup.start(0) + pickup_service(5) + travel(20) = 25`.
fn paradox_problem() -> Problem {
    let locations = vec![
        Location::new("depot", 0.0, 0.0, 0, 0),
        Location::new("pickup", 0.0, 1.0, 5, 1),
        Location::new("delivery", 0.0, 2.0, 5, 1),
    ];

    let mut vehicle_builder = VehicleBuilder::default();
    vehicle_builder.set_external_id("v1");
    vehicle_builder.set_start_depot(LocationIdx::new(0));
    vehicle_builder.set_end_depot(LocationIdx::new(0));
    let vehicle = vehicle_builder.build();

    let mut shipment_builder = ShipmentBuilder::default();
    shipment_builder.set_external_id("s1");
    shipment_builder.set_pickup_location(LocationIdx::new(1));
    shipment_builder.set_delivery_location(LocationIdx::new(2));
    shipment_builder.set_cargo(Capacity::new(10, 10));
    shipment_builder.set_pickup_window(TimeWindow::new(0, 100));
    shipment_builder.set_delivery_window(TimeWindow::new(0, 10));
    let shipment = shipment_builder.build();

    #[rustfmt::skip]
    let travel_time = vec![
        0, 10, 10, //
        10, 0, 20, //
        10, 20, 0, //
    ];
    let travel_distance = travel_time.clone();

    Problem::from_boundary(locations, vec![vehicle], vec![shipment], travel_time, travel_distance, None)
        .expect("valid fixture")
}

#[test]
#[ignore = "requires the cp_sat native backend; too wide for FakeCpModel"]
fn unreachable_window_leaves_the_shipment_unserved_without_precheck() {
    let config = Config::default();
    // Bypass `precheck` entirely: solve the raw, unrepaired problem.
    let solution = vrp_core::solve_with(
        vrp_cp::backend::cp_sat::CpSatModel::new(),
        &paradox_problem(),
        &config,
    );

    assert_eq!(solution.unserved_shipments, vec!["s1".to_string()]);
    assert_eq!(solution.costs.unserved, config.unserved_penalty);
}

#[test]
#[ignore = "requires the cp_sat native backend; too wide for FakeCpModel"]
fn precheck_widens_the_window_so_the_shipment_gets_served() {
    let config = Config::default();
    let solution = vrp_core::solve(paradox_problem(), &config);

    assert!(solution.unserved_shipments.is_empty());
    assert_eq!(solution.costs.unserved, 0);
}
