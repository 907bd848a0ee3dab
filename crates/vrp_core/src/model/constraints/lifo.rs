//! LIFO rehandling penalty (`spec.md` §4.6): for each ordered pair of
//! distinct shipments sharing a vehicle, a blocked drop incurs a penalty
//! scaled by whether the vehicle is "crowded" at the moment of the drop.

use vrp_cp::{CpModel, Expr, Lit};

use crate::{
    config::Config,
    model::{
        reify::{reify_and, reify_eq, reify_ge, reify_gt, reify_lt},
        variables::VariableLayer,
    },
    problem::{shipment::ShipmentIdx, vehicle::VehicleIdx, Problem},
};

/// Posts the blocker/crowded reifications for every `(c, o, v)` triple and
/// returns the per-triple cost term, for the objective builder to sum
/// (`spec.md` §4.6, "The rehandling cost is the sum of all such terms").
pub fn apply<M: CpModel>(model: &mut M, problem: &Problem, config: &Config, vars: &VariableLayer<M>) -> Vec<M::IntVar> {
    let layout = problem.stop_layout();
    let shipments = problem.shipments();
    let mut terms = Vec::new();

    for c in 0..shipments.len() {
        for o in 0..shipments.len() {
            if c == o {
                continue;
            }
            let ship_c = ShipmentIdx::new(c);
            let ship_o = ShipmentIdx::new(o);
            let pickup_c = layout.pickup_stop(ship_c).get();
            let delivery_c = layout.delivery_stop(ship_c).get();
            let pickup_o = layout.pickup_stop(ship_o).get();
            let delivery_o = layout.delivery_stop(ship_o).get();
            let volume_o = shipments[o].cargo().volume;

            for v in 0..vars.num_vehicles {
                let served_by_v_c = reify_eq(
                    model,
                    Expr::var(vars.visit_vehicle[pickup_c]),
                    Expr::Const(v as i64 + 1),
                    &format!("lifo_served_c_{c}_{o}_{v}"),
                );
                let served_by_v_o = reify_eq(
                    model,
                    Expr::var(vars.visit_vehicle[pickup_o]),
                    Expr::Const(v as i64 + 1),
                    &format!("lifo_served_o_{c}_{o}_{v}"),
                );
                let loaded_after = reify_gt(
                    model,
                    Expr::var(vars.visit_step[pickup_o]),
                    Expr::var(vars.visit_step[pickup_c]),
                    &format!("lifo_loaded_after_{c}_{o}_{v}"),
                );
                let unloaded_after = reify_gt(
                    model,
                    Expr::var(vars.visit_step[delivery_o]),
                    Expr::var(vars.visit_step[delivery_c]),
                    &format!("lifo_unloaded_after_{c}_{o}_{v}"),
                );
                let present_at_drop = reify_lt(
                    model,
                    Expr::var(vars.visit_step[pickup_o]),
                    Expr::var(vars.visit_step[delivery_c]),
                    &format!("lifo_present_{c}_{o}_{v}"),
                );

                let blocking = reify_and(
                    model,
                    &[
                        Lit::Pos(served_by_v_c),
                        Lit::Pos(served_by_v_o),
                        Lit::Pos(loaded_after),
                        Lit::Pos(unloaded_after),
                        Lit::Pos(present_at_drop),
                    ],
                    &format!("lifo_blocking_{c}_{o}_{v}"),
                );

                // `load_at_drop` binds to load_v[v, visit_step[delivery_c]]
                // on the unique matching step, only meaningful while this
                // vehicle actually carries shipment c (spec.md §4.6, the
                // note on indexed-step access).
                let load_at_drop = model.new_int_var(0, vars.cap_volume_max, &format!("lifo_load_at_drop_{c}_{o}_{v}"));
                for t in 0..vars.num_steps {
                    let matches_step = reify_eq(
                        model,
                        Expr::var(vars.visit_step[delivery_c]),
                        Expr::Const(t as i64),
                        &format!("lifo_step_match_{c}_{o}_{v}_{t}"),
                    );
                    let binds = reify_and(
                        model,
                        &[Lit::Pos(served_by_v_c), Lit::Pos(matches_step)],
                        &format!("lifo_binds_{c}_{o}_{v}_{t}"),
                    );
                    model.add_eq_onlyif(Expr::var(load_at_drop), Expr::var(vars.load_v[v][t]), Lit::Pos(binds));
                }

                let capacity_volume = vehicle_volume(problem, VehicleIdx::new(v));
                let threshold = (config.crowded_volume_fraction * capacity_volume as f64).round() as i64;
                let crowded = reify_ge(model, Expr::var(load_at_drop), Expr::Const(threshold), &format!("lifo_crowded_{c}_{o}_{v}"));

                let blocking_and_crowded = reify_and(
                    model,
                    &[Lit::Pos(blocking), Lit::Pos(crowded)],
                    &format!("lifo_block_crowded_{c}_{o}_{v}"),
                );
                let blocking_and_not_crowded = reify_and(
                    model,
                    &[Lit::Pos(blocking), Lit::Neg(crowded)],
                    &format!("lifo_block_not_crowded_{c}_{o}_{v}"),
                );

                let crowded_term = volume_o * config.rehandling_crowded_multiplier;
                let basic_term = volume_o * config.rehandling_basic_multiplier;
                let term_max = crowded_term.max(basic_term).max(1);

                let term = model.new_int_var(0, term_max, &format!("lifo_term_{c}_{o}_{v}"));
                model.add_eq_onlyif(Expr::var(term), Expr::Const(crowded_term), Lit::Pos(blocking_and_crowded));
                model.add_eq_onlyif(Expr::var(term), Expr::Const(basic_term), Lit::Pos(blocking_and_not_crowded));
                model.add_eq_onlyif(Expr::var(term), Expr::Const(0), Lit::Neg(blocking));

                terms.push(term);
            }
        }
    }

    terms
}

fn vehicle_volume(problem: &Problem, vehicle: VehicleIdx) -> i64 {
    problem.vehicles()[vehicle.get()].capacity().volume
}
