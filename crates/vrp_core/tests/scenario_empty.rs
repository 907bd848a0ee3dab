//! One vehicle, zero shipments: the degenerate end-to-end case.
//!
//! Marked `#[ignore]`: a full `solve()` call allocates `arrival` variables
//! with domains sized off the shift envelope (hundreds of values) rather
//! than the shipment count, so even this instance is too wide for
//! `vrp_cp::backend::fake::FakeCpModel`'s brute-force search budget. Run
//! explicitly with the `cp_sat` native backend: `cargo test -- --ignored`.

use vrp_core::problem::{location::LocationIdx, vehicle::VehicleBuilder};
use vrp_core::solution::Status;
use vrp_core::test_support::{line_locations, line_travel_matrix};
use vrp_core::{Config, Problem};

fn empty_problem() -> Problem {
    let locations = line_locations(1, 0);

    let mut vehicle_builder = VehicleBuilder::default();
    vehicle_builder.set_external_id("v1");
    vehicle_builder.set_start_depot(LocationIdx::new(0));
    vehicle_builder.set_end_depot(LocationIdx::new(0));
    let vehicle = vehicle_builder.build();

    Problem::from_boundary(locations, vec![vehicle], vec![], line_travel_matrix(1, 1), line_travel_matrix(1, 1), None)
        .expect("valid fixture")
}

#[test]
#[ignore = "requires the cp_sat native backend; too wide for FakeCpModel"]
fn one_vehicle_no_shipments_is_optimal_with_a_depot_only_route() {
    let config = Config::default();
    let solution = vrp_core::solve(empty_problem(), &config);

    assert_eq!(solution.status, Status::Optimal);
    assert_eq!(solution.routes.len(), 1);
    assert!(solution.unserved_shipments.is_empty());

    let route = &solution.routes[0];
    assert!(route.stops.iter().all(|stop| stop.shipment_id.is_none()));
    assert_eq!(route.total_distance, 0);
    assert_eq!(solution.costs.total, 0);
}
