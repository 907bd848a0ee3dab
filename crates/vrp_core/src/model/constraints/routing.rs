//! Routing skeleton (`spec.md` §4.2): depot anchoring, monotone
//! termination, end-depot absorption, fleet partitioning, no-idle-loop,
//! and the stop-visit bookkeeping (`visit_step`/`visit_vehicle`/
//! `is_stop_active`/`is_served`) that every other constraint module reads.

use vrp_cp::{CpModel, Expr, Lit};

use crate::{
    model::reify::{bool_iff, fix_false, fix_true, reify_and, reify_eq, reify_or},
    model::variables::VariableLayer,
    problem::{shipment::ShipmentIdx, vehicle::VehicleIdx, Problem},
};

pub fn apply<M: CpModel>(model: &mut M, problem: &Problem, vars: &VariableLayer<M>) {
    let layout = problem.stop_layout();
    let num_vehicles = vars.num_vehicles;
    let t_last = vars.num_steps - 1;

    for v in 0..num_vehicles {
        let vehicle = VehicleIdx::new(v);
        let start_stop = layout.start_stop(vehicle).get() as i64;
        let end_stop = layout.end_stop(vehicle).get() as i64;

        // Anchors: every route starts at its own start depot, not yet done,
        // and is forced done by the last step (spec.md §4.2, "Termination").
        model.add_eq(Expr::var(vars.route[v][0]), Expr::Const(start_stop));
        fix_false(model, vars.done[v][0]);
        fix_true(model, vars.done[v][t_last]);

        // is_used[v] <=> vehicle actually leaves its start depot.
        bool_iff(model, Lit::Pos(vars.is_used[v]), Lit::Neg(vars.done[v][1]));

        for t in 0..vars.num_steps {
            // Fleet partitioning: a vehicle never occupies another
            // vehicle's depot stops.
            for other in 0..num_vehicles {
                if other == v {
                    continue;
                }
                let other_start = layout.start_stop(VehicleIdx::new(other)).get() as i64;
                let other_end = layout.end_stop(VehicleIdx::new(other)).get() as i64;
                model.add_ne(Expr::var(vars.route[v][t]), Expr::Const(other_start));
                model.add_ne(Expr::var(vars.route[v][t]), Expr::Const(other_end));
            }

            // For t >= 1, a vehicle may never re-enter its own start depot
            // (spec.md §4.2, item 1): only step 0 sits there.
            if t >= 1 {
                model.add_ne(Expr::var(vars.route[v][t]), Expr::Const(start_stop));
            }

            if t + 1 < vars.num_steps {
                // Monotone termination: once done, always done.
                model.add_implication(Lit::Pos(vars.done[v][t]), Lit::Pos(vars.done[v][t + 1]));

                // When done, the route is frozen at the end depot.
                model.add_eq_onlyif(
                    Expr::var(vars.route[v][t]),
                    Expr::Const(end_stop),
                    Lit::Pos(vars.done[v][t]),
                );

                // No idle loops while still active.
                model.add_ne_onlyif(
                    Expr::var(vars.route[v][t]),
                    Expr::var(vars.route[v][t + 1]),
                    Lit::Neg(vars.done[v][t + 1]),
                );
            }

            // End-depot absorption: reaching the end depot forces done.
            let at_end = reify_eq(
                model,
                Expr::var(vars.route[v][t]),
                Expr::Const(end_stop),
                &format!("at_end_{v}_{t}"),
            );
            model.add_implication(Lit::Pos(at_end), Lit::Pos(vars.done[v][t]));
        }
    }

    // Stop-visit recording, one non-depot stop at a time (spec.md §4.2,
    // item 6). `is_stop_active` is the OR of every (v, t) pair where the
    // stop is occupied and not yet frozen; the per-pair equalities on
    // `visit_step`/`visit_vehicle` make any two simultaneously-active
    // pairs contradictory, so uniqueness falls out without an explicit
    // `AllDifferent`.
    for (stop_idx, stop) in layout.stops().iter().enumerate() {
        if stop.is_depot() {
            continue;
        }
        let mut valid_lits = Vec::with_capacity(num_vehicles * vars.num_steps);

        for v in 0..num_vehicles {
            for t in 0..vars.num_steps {
                let is_here = reify_eq(
                    model,
                    Expr::var(vars.route[v][t]),
                    Expr::Const(stop_idx as i64),
                    &format!("route_is_{stop_idx}_{v}_{t}"),
                );
                let valid = reify_and(
                    model,
                    &[Lit::Pos(is_here), Lit::Neg(vars.done[v][t])],
                    &format!("valid_{stop_idx}_{v}_{t}"),
                );

                model.add_eq_onlyif(
                    Expr::var(vars.visit_step[stop_idx]),
                    Expr::Const(t as i64),
                    Lit::Pos(valid),
                );
                model.add_eq_onlyif(
                    Expr::var(vars.visit_vehicle[stop_idx]),
                    Expr::Const(v as i64 + 1),
                    Lit::Pos(valid),
                );

                valid_lits.push(Lit::Pos(valid));
            }
        }

        let active = reify_or(model, &valid_lits, &format!("stop_active_expr_{stop_idx}"));
        bool_iff(
            model,
            Lit::Pos(vars.is_stop_active[stop_idx]),
            Lit::Pos(active),
        );

        // Inactive stops pin visit_step/visit_vehicle to 0 (spec.md §4.2,
        // item 6, "...otherwise both are 0").
        model.add_eq_onlyif(
            Expr::var(vars.visit_step[stop_idx]),
            Expr::Const(0),
            Lit::Neg(vars.is_stop_active[stop_idx]),
        );
        model.add_eq_onlyif(
            Expr::var(vars.visit_vehicle[stop_idx]),
            Expr::Const(0),
            Lit::Neg(vars.is_stop_active[stop_idx]),
        );
    }

    // Shipment service equivalence: served iff both its stops are active,
    // and both stops agree on activity (spec.md §4.2, item 7).
    for idx in 0..problem.shipments().len() {
        let ship = ShipmentIdx::new(idx);
        let pickup = layout.pickup_stop(ship).get();
        let delivery = layout.delivery_stop(ship).get();

        bool_iff(
            model,
            Lit::Pos(vars.is_stop_active[pickup]),
            Lit::Pos(vars.is_stop_active[delivery]),
        );

        let served = reify_and(
            model,
            &[
                Lit::Pos(vars.is_stop_active[pickup]),
                Lit::Pos(vars.is_stop_active[delivery]),
            ],
            &format!("served_expr_{idx}"),
        );
        bool_iff(model, Lit::Pos(vars.is_served[idx]), Lit::Pos(served));
    }
}
