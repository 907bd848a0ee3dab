//! Time-Paradox Pre-check (`spec.md` §4.9): a boundary adapter, not a
//! solver concern. Widens a shipment's delivery window before model
//! construction when it is trivially unreachable from the pickup window,
//! the way upstream UI input occasionally produces.

use crate::{config::Config, problem::time_window::TimeWindow, problem::Problem};

/// Applies the repair to every shipment and returns the (possibly) widened
/// problem. Idempotent: a second call against the output changes nothing,
/// since `TimeWindow::widened_to` only ever grows `end` up to the already-
/// satisfied minimum (`spec.md` §8, "Idempotence of precheck").
pub fn precheck(mut problem: Problem, config: &Config) -> Problem {
    let repairs: Vec<(usize, TimeWindow)> = problem
        .shipments()
        .iter()
        .enumerate()
        .filter_map(|(idx, shipment)| {
            let pickup_location = shipment.pickup_location();
            let delivery_location = shipment.delivery_location();
            let pickup_service = problem.locations()[pickup_location].default_service_duration();
            let travel = problem.travel_time(pickup_location, delivery_location);

            let minimum_end = shipment.pickup_window().start() + pickup_service + travel;
            let widened = shipment
                .delivery_window()
                .widened_to(minimum_end, config.time_paradox_slack_minutes);

            if widened.end() != shipment.delivery_window().end() {
                Some((idx, widened))
            } else {
                None
            }
        })
        .collect();

    for (idx, window) in repairs {
        tracing::debug!(shipment = idx, new_end = window.end(), "widened infeasible delivery window");
        problem.shipments_mut()[idx].set_delivery_window(window);
    }

    problem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{
        capacity::Capacity, shipment::ShipmentBuilder, time_window::TimeWindow,
        vehicle::VehicleBuilder, Problem,
    };
    use crate::problem::location::{Location, LocationIdx};

    fn paradox_problem() -> Problem {
        let locations = vec![
            Location::new("depot", 0.0, 0.0, 0, 0),
            Location::new("pickup", 0.0, 1.0, 5, 1),
            Location::new("delivery", 0.0, 2.0, 5, 2),
        ];

        let mut vehicle_builder = VehicleBuilder::default();
        vehicle_builder.set_external_id("v1");
        vehicle_builder.set_start_depot(LocationIdx::new(0));
        vehicle_builder.set_end_depot(LocationIdx::new(0));
        let vehicle = vehicle_builder.build();

        // pickup window starts at 0, pickup service 5, travel pickup->delivery 20:
        // earliest feasible delivery.end is 25, but the shipment's window ends at 10.
        let mut shipment_builder = ShipmentBuilder::default();
        shipment_builder.set_external_id("s1");
        shipment_builder.set_pickup_location(LocationIdx::new(1));
        shipment_builder.set_delivery_location(LocationIdx::new(2));
        shipment_builder.set_cargo(Capacity::new(10, 10));
        shipment_builder.set_pickup_window(TimeWindow::new(0, 100));
        shipment_builder.set_delivery_window(TimeWindow::new(0, 10));
        let shipment = shipment_builder.build();

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
    fn widens_a_trivially_infeasible_delivery_window() {
        let problem = paradox_problem();
        let config = Config::default();
        let repaired = precheck(problem, &config);

        let window = repaired.shipments()[0].delivery_window();
        // minimum_end = 0 (pickup start) + 5 (pickup service) + 20 (travel) = 25
        assert_eq!(window.end(), 25 + config.time_paradox_slack_minutes);
        assert_eq!(window.start(), 0);
    }

    #[test]
    fn leaves_already_feasible_windows_untouched() {
        let locations = vec![
            Location::new("depot", 0.0, 0.0, 0, 0),
            Location::new("pickup", 0.0, 1.0, 5, 1),
            Location::new("delivery", 0.0, 2.0, 5, 2),
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
        shipment_builder.set_delivery_window(TimeWindow::new(0, 500));
        let shipment = shipment_builder.build();

        let travel_time = vec![0, 10, 10, 10, 0, 20, 10, 20, 0];
        let travel_distance = travel_time.clone();

        let problem = Problem::from_boundary(locations, vec![vehicle], vec![shipment], travel_time, travel_distance, None)
            .expect("valid fixture");

        let config = Config::default();
        let repaired = precheck(problem, &config);
        assert_eq!(repaired.shipments()[0].delivery_window().end(), 500);
    }

    #[test]
    fn is_idempotent() {
        let config = Config::default();
        let once = precheck(paradox_problem(), &config);
        let window_once = once.shipments()[0].delivery_window();
        let twice = precheck(once, &config);
        let window_twice = twice.shipments()[0].delivery_window();
        assert_eq!(window_once.start(), window_twice.start());
        assert_eq!(window_once.end(), window_twice.end());
    }
}
