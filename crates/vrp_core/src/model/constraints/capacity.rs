//! Load tracking by stop delta, reset at the end depot, and per-vehicle
//! weight/volume caps (`spec.md` §4.4).

use vrp_cp::{CpModel, Expr, Lit};

use crate::{
    model::{reify::reify_eq, reify::reify_or, tables::Tables, variables::VariableLayer},
    problem::{vehicle::VehicleIdx, Problem},
};

pub fn apply<M: CpModel>(model: &mut M, problem: &Problem, tables: &Tables, vars: &VariableLayer<M>) {
    let layout = problem.stop_layout();

    for v in 0..vars.num_vehicles {
        let vehicle = &problem.vehicles()[v];
        let end_stop = layout.end_stop(VehicleIdx::new(v)).get() as i64;

        model.add_eq(Expr::var(vars.load_w[v][0]), Expr::Const(0));
        model.add_eq(Expr::var(vars.load_v[v][0]), Expr::Const(0));

        for t in 0..vars.num_steps {
            model.add_le(Expr::var(vars.load_w[v][t]), Expr::Const(vehicle.capacity().weight));
            model.add_le(Expr::var(vars.load_v[v][t]), Expr::Const(vehicle.capacity().volume));

            if t + 1 >= vars.num_steps {
                continue;
            }

            let delta_w = model.new_int_var(
                *tables.stop_weight_delta.iter().min().unwrap_or(&0),
                *tables.stop_weight_delta.iter().max().unwrap_or(&0),
                &format!("delta_w_{v}_{t}"),
            );
            model.add_element(vars.route[v][t], &tables.stop_weight_delta, delta_w);
            let delta_v = model.new_int_var(
                *tables.stop_volume_delta.iter().min().unwrap_or(&0),
                *tables.stop_volume_delta.iter().max().unwrap_or(&0),
                &format!("delta_v_{v}_{t}"),
            );
            model.add_element(vars.route[v][t], &tables.stop_volume_delta, delta_v);

            let at_end = reify_eq(model, Expr::var(vars.route[v][t]), Expr::Const(end_stop), &format!("cap_at_end_{v}_{t}"));
            let resets = reify_or(model, &[Lit::Pos(at_end), Lit::Pos(vars.done[v][t])], &format!("cap_resets_{v}_{t}"));

            model.add_eq_onlyif(Expr::var(vars.load_w[v][t + 1]), Expr::Const(0), Lit::Pos(resets));
            model.add_eq_onlyif(
                Expr::var(vars.load_w[v][t + 1]),
                Expr::var(vars.load_w[v][t]).plus(Expr::var(delta_w)),
                Lit::Neg(resets),
            );

            model.add_eq_onlyif(Expr::var(vars.load_v[v][t + 1]), Expr::Const(0), Lit::Pos(resets));
            model.add_eq_onlyif(
                Expr::var(vars.load_v[v][t + 1]),
                Expr::var(vars.load_v[v][t]).plus(Expr::var(delta_v)),
                Lit::Neg(resets),
            );
        }
    }
}
