//! Temporal propagation (`spec.md` §4.3): travel/service/setup/break/
//! anti-teleport propagation of arrival time, hard time-window enforcement,
//! and the shift-duration cap.

use vrp_cp::{CpModel, Expr, Lit};

use crate::{
    config::Config,
    model::{
        reify::{reify_and, reify_eq, reify_gt},
        tables::Tables,
        variables::VariableLayer,
    },
    problem::{shipment::ShipmentIdx, vehicle::VehicleIdx, Problem},
};

pub fn apply<M: CpModel>(
    model: &mut M,
    problem: &Problem,
    config: &Config,
    tables: &Tables,
    vars: &VariableLayer<M>,
) {
    let layout = problem.stop_layout();

    for v in 0..vars.num_vehicles {
        let vehicle = &problem.vehicles()[v];
        let start_stop = layout.start_stop(VehicleIdx::new(v)).get() as i64;
        let end_stop = layout.end_stop(VehicleIdx::new(v)).get() as i64;

        // Initial arrival: the shift's start time (spec.md §4.3, "Initial").
        model.add_eq(
            Expr::var(vars.arrival[v][0]),
            Expr::Const(vehicle.labor().shift.start_time),
        );

        for t in 0..vars.num_steps {
            // Shift cap: arrival[v,t] - shift.start <= shift.max_duration.
            model.add_le(
                Expr::var(vars.arrival[v][t]).minus(Expr::Const(vehicle.labor().shift.start_time)),
                Expr::Const(vehicle.labor().shift.max_duration),
            );

            if t + 1 >= vars.num_steps {
                continue;
            }

            let curr = vars.route[v][t];
            let next = vars.route[v][t + 1];

            // Service time at the current stop, via `element`.
            let max_service = tables.stop_service_duration.iter().copied().max().unwrap_or(0);
            let sigma = model.new_int_var(0, max_service.max(1), &format!("sigma_{v}_{t}"));
            model.add_element(curr, &tables.stop_service_duration, sigma);

            // Travel/setup time over the flattened [curr_loc, next_loc] index.
            let travel_idx = tables.flat_index_var(
                model,
                vars.route_loc[v][t],
                vars.route_loc[v][t + 1],
                &format!("travel_idx_{v}_{t}"),
            );
            let max_travel = tables.travel_time_flat.iter().copied().max().unwrap_or(0);
            let tau = model.new_int_var(0, max_travel.max(1), &format!("tau_{v}_{t}"));
            model.add_element(travel_idx, &tables.travel_time_flat, tau);

            let max_setup = tables.setup_time_flat.iter().copied().max().unwrap_or(0);
            let eta = model.new_int_var(0, max_setup.max(1), &format!("eta_{v}_{t}"));
            model.add_element(travel_idx, &tables.setup_time_flat, eta);

            // Anti-teleport buffer (spec.md §4.3, "Anti-teleport buffer").
            // Depots other than this vehicle's own are unreachable (routing
            // fleet-partitioning), and route[v,t'] != start_stop for t' >= 1,
            // so "next is non-depot" reduces to "next != this vehicle's end
            // depot" and "current is non-depot" to "current != start and
            // current != end".
            let curr_is_start = reify_eq(model, Expr::var(curr), Expr::Const(start_stop), &format!("at_start_{v}_{t}"));
            let curr_is_end = reify_eq(model, Expr::var(curr), Expr::Const(end_stop), &format!("tt_at_end_{v}_{t}"));
            let next_is_end = reify_eq(
                model,
                Expr::var(next),
                Expr::Const(end_stop),
                &format!("next_at_end_{v}_{t}"),
            );
            let same_loc = reify_eq(
                model,
                Expr::var(vars.route_loc[v][t]),
                Expr::var(vars.route_loc[v][t + 1]),
                &format!("same_loc_{v}_{t}"),
            );

            let departs_start_depot = reify_and(
                model,
                &[Lit::Pos(curr_is_start), Lit::Neg(next_is_end)],
                &format!("departs_start_{v}_{t}"),
            );
            let revisits_nondepot_location = reify_and(
                model,
                &[Lit::Neg(curr_is_start), Lit::Neg(curr_is_end), Lit::Pos(same_loc)],
                &format!("revisit_nondepot_{v}_{t}"),
            );

            let alpha_max = config.depot_service_time.max(config.min_intra_transit).max(1);
            let alpha = model.new_int_var(0, alpha_max, &format!("alpha_{v}_{t}"));
            model.add_eq_onlyif(
                Expr::var(alpha),
                Expr::Const(config.depot_service_time),
                Lit::Pos(departs_start_depot),
            );
            model.add_eq_onlyif(
                Expr::var(alpha),
                Expr::Const(config.min_intra_transit),
                Lit::Pos(revisits_nondepot_location),
            );
            model.add_eq_onlyif(
                Expr::var(alpha),
                Expr::Const(0),
                Lit::Neg(departs_start_depot),
            );
            // The two triggers are mutually exclusive (one requires curr to
            // be the start depot, the other that it isn't), so pinning
            // alpha under "not departs_start_depot" via `revisits_nondepot`
            // alone would leave the "neither" case unconstrained; tie it
            // down explicitly too.
            model.add_eq_onlyif(
                Expr::var(alpha),
                Expr::Const(0),
                Lit::Neg(revisits_nondepot_location),
            );

            // Break (spec.md §4.3, "Break"): owed whenever the leg's travel
            // time alone exceeds the interval.
            let break_rule = vehicle.labor().break_rule;
            let needs_break = reify_gt(model, Expr::var(tau), Expr::Const(break_rule.interval), &format!("needs_break_{v}_{t}"));
            let beta = model.new_int_var(0, break_rule.duration.max(1), &format!("beta_{v}_{t}"));
            model.add_eq_onlyif(Expr::var(beta), Expr::Const(break_rule.duration), Lit::Pos(needs_break));
            model.add_eq_onlyif(Expr::var(beta), Expr::Const(0), Lit::Neg(needs_break));

            let earliest = Expr::sum([
                Expr::var(vars.arrival[v][t]),
                Expr::var(sigma),
                Expr::var(tau),
                Expr::var(eta),
                Expr::var(alpha),
                Expr::var(beta),
            ]);

            // Propagation: frozen once done, otherwise "at least earliest"
            // (spec.md §4.3, "Propagation rule").
            model.add_eq_onlyif(
                Expr::var(vars.arrival[v][t + 1]),
                Expr::var(vars.arrival[v][t]),
                Lit::Pos(vars.done[v][t]),
            );
            model.add_ge_onlyif(Expr::var(vars.arrival[v][t + 1]), earliest, Lit::Neg(vars.done[v][t]));
        }
    }

    // Hard time windows (spec.md §4.3, "Time windows"): whenever a vehicle
    // occupies a shipment's pickup/delivery stop and hasn't terminated yet,
    // the arrival must fall inside that stop's window.
    for (idx, shipment) in problem.shipments().iter().enumerate() {
        let ship = ShipmentIdx::new(idx);
        let pickup_stop = layout.pickup_stop(ship).get() as i64;
        let delivery_stop = layout.delivery_stop(ship).get() as i64;

        for v in 0..vars.num_vehicles {
            for t in 0..vars.num_steps {
                post_window(
                    model,
                    vars,
                    v,
                    t,
                    pickup_stop,
                    shipment.pickup_window().start(),
                    shipment.pickup_window().end(),
                    &format!("pickup_window_{idx}_{v}_{t}"),
                );
                post_window(
                    model,
                    vars,
                    v,
                    t,
                    delivery_stop,
                    shipment.delivery_window().start(),
                    shipment.delivery_window().end(),
                    &format!("delivery_window_{idx}_{v}_{t}"),
                );
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn post_window<M: CpModel>(
    model: &mut M,
    vars: &VariableLayer<M>,
    v: usize,
    t: usize,
    stop: i64,
    window_start: i64,
    window_end: i64,
    name: &str,
) {
    let is_here = reify_eq(model, Expr::var(vars.route[v][t]), Expr::Const(stop), name);
    let valid = reify_and(model, &[Lit::Pos(is_here), Lit::Neg(vars.done[v][t])], &format!("{name}_valid"));
    model.add_ge_onlyif(Expr::var(vars.arrival[v][t]), Expr::Const(window_start), Lit::Pos(valid));
    model.add_le_onlyif(Expr::var(vars.arrival[v][t]), Expr::Const(window_end), Lit::Pos(valid));
}
