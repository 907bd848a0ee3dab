//! Pickup-before-delivery, same-vehicle, and no-depot-while-carrying
//! (`spec.md` §4.5).

use vrp_cp::{CpModel, Expr, Lit};

use crate::{
    model::{
        reify::{reify_and, reify_eq, reify_gt, reify_lt},
        variables::VariableLayer,
    },
    problem::{shipment::ShipmentIdx, vehicle::VehicleIdx, Problem},
};

pub fn apply<M: CpModel>(model: &mut M, problem: &Problem, vars: &VariableLayer<M>) {
    let layout = problem.stop_layout();

    for (idx, _shipment) in problem.shipments().iter().enumerate() {
        let ship = ShipmentIdx::new(idx);
        let pickup = layout.pickup_stop(ship).get();
        let delivery = layout.delivery_stop(ship).get();
        let served = Lit::Pos(vars.is_served[idx]);

        // Precedence: pickup strictly before delivery.
        model.add_le_onlyif(
            Expr::var(vars.visit_step[pickup]).plus(Expr::Const(1)),
            Expr::var(vars.visit_step[delivery]),
            served,
        );

        // Same vehicle.
        model.add_eq_onlyif(
            Expr::var(vars.visit_vehicle[pickup]),
            Expr::var(vars.visit_vehicle[delivery]),
            served,
        );

        // No depot while carrying: for the vehicle actually carrying this
        // shipment, the end depot cannot appear strictly between pickup and
        // delivery steps (spec.md §4.5, "No depot while carrying").
        for v in 0..vars.num_vehicles {
            let end_stop = layout.end_stop(VehicleIdx::new(v)).get() as i64;
            let carrying = reify_eq(
                model,
                Expr::var(vars.visit_vehicle[pickup]),
                Expr::Const(v as i64 + 1),
                &format!("carrying_{idx}_{v}"),
            );

            for t in 0..vars.num_steps {
                let after_pickup = reify_gt(
                    model,
                    Expr::Const(t as i64),
                    Expr::var(vars.visit_step[pickup]),
                    &format!("after_pickup_{idx}_{v}_{t}"),
                );
                let before_delivery = reify_lt(
                    model,
                    Expr::Const(t as i64),
                    Expr::var(vars.visit_step[delivery]),
                    &format!("before_delivery_{idx}_{v}_{t}"),
                );
                let in_transit = reify_and(
                    model,
                    &[Lit::Pos(carrying), Lit::Pos(after_pickup), Lit::Pos(before_delivery)],
                    &format!("in_transit_{idx}_{v}_{t}"),
                );

                model.add_ne_onlyif(
                    Expr::var(vars.route[v][t]),
                    Expr::Const(end_stop),
                    Lit::Pos(in_transit),
                );
            }
        }
    }
}
