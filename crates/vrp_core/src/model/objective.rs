//! Assembles the multi-term cost objective and declares minimization. Each
//! term is materialized into its own variable so the solver driver can
//! read back the cost breakdown after solving.
//!
//! Every variable allocated here carries a tight, computed upper bound
//! rather than a generic "large enough" constant: the test-only
//! [`vrp_cp::backend::fake::FakeCpModel`] enumerates a variable's whole
//! domain during search, so an untracked `i64::MAX`-ish bound turns a toy
//! fixture into a multi-day search.

use vrp_cp::{CpModel, Expr, Lit};

use crate::{
    config::Config,
    model::{
        constraints::lifo,
        reify::{gated_value, reify_and, reify_eq, reify_ne},
        tables::Tables,
        variables::{arrival_upper_bound, VariableLayer},
    },
    problem::Problem,
};

/// One variable per cost term, plus the minimized total.
pub struct ObjectiveVars<M: CpModel> {
    pub fixed: M::IntVar,
    pub distance: M::IntVar,
    pub labor: M::IntVar,
    pub unserved: M::IntVar,
    pub zone: M::IntVar,
    pub waiting: M::IntVar,
    pub late: M::IntVar,
    pub rehandling: M::IntVar,
    pub total: M::IntVar,
}

/// A CP variable paired with the upper bound it was allocated with, so
/// sums can be given a tight bound of their own instead of reaching for an
/// arbitrary large constant.
struct Bounded<V> {
    var: V,
    max: i64,
}

pub fn build<M: CpModel>(
    model: &mut M,
    problem: &Problem,
    config: &Config,
    tables: &Tables,
    vars: &VariableLayer<M>,
) -> ObjectiveVars<M> {
    let max_distance = tables.travel_distance_flat.iter().copied().max().unwrap_or(0).max(1);
    let max_travel = tables.travel_time_flat.iter().copied().max().unwrap_or(0).max(1);
    let max_service = tables.stop_service_duration.iter().copied().max().unwrap_or(0);
    let max_ready = tables.stop_ready_time.iter().copied().max().unwrap_or(0).max(1);
    let arrival_max = arrival_upper_bound(problem, config);

    // 1. Fixed: one term per vehicle, gated on is_used.
    let mut fixed_terms = Vec::with_capacity(vars.num_vehicles);
    for v in 0..vars.num_vehicles {
        let fixed_cost = problem.vehicles()[v].cost().fixed;
        let term = gated_value(
            model,
            0,
            fixed_cost.max(1),
            Lit::Pos(vars.is_used[v]),
            Expr::Const(fixed_cost),
            Expr::Const(0),
            &format!("cost_fixed_{v}"),
        );
        fixed_terms.push(Bounded { var: term, max: fixed_cost.max(1) });
    }
    let fixed = sum_into(model, &fixed_terms, "cost_fixed_total");

    // 2 & 6. Distance and waiting: walked together since both are per-edge
    // and gated on the same "active edge" flag (spec.md GLOSSARY).
    let mut distance_terms = Vec::new();
    let mut waiting_terms = Vec::new();

    for v in 0..vars.num_vehicles {
        let vehicle = &problem.vehicles()[v];
        for t in 0..vars.num_steps.saturating_sub(1) {
            let active = Lit::Neg(vars.done[v][t]);

            let travel_idx = tables.flat_index_var(
                model,
                vars.route_loc[v][t],
                vars.route_loc[v][t + 1],
                &format!("obj_travel_idx_{v}_{t}"),
            );
            let dist = model.new_int_var(0, max_distance, &format!("dist_{v}_{t}"));
            model.add_element(travel_idx, &tables.travel_distance_flat, dist);

            let load_times_dist_max = max_distance * vars.cap_weight_max.max(1);
            let load_times_dist = model.new_int_var(0, load_times_dist_max, &format!("dist_load_mult_{v}_{t}"));
            model.add_multiplication_eq(load_times_dist, dist, vars.load_w[v][t]);

            let per_km = vehicle.cost().per_km;
            let per_kg_km = vehicle.cost().per_kg_km;
            let distance_raw = Expr::var(dist)
                .scale(per_km)
                .plus(Expr::var(load_times_dist).scale(per_kg_km));
            let distance_max = per_km * max_distance + per_kg_km * load_times_dist_max;
            let distance_term = gated_value(
                model,
                0,
                distance_max.max(1),
                active,
                distance_raw,
                Expr::Const(0),
                &format!("cost_distance_{v}_{t}"),
            );
            distance_terms.push(Bounded { var: distance_term, max: distance_max.max(1) });

            let sigma = model.new_int_var(0, max_service.max(1), &format!("obj_sigma_{v}_{t}"));
            model.add_element(vars.route[v][t], &tables.stop_service_duration, sigma);
            let tau = model.new_int_var(0, max_travel, &format!("obj_tau_{v}_{t}"));
            model.add_element(travel_idx, &tables.travel_time_flat, tau);
            let ready_next = model.new_int_var(0, max_ready, &format!("ready_next_{v}_{t}"));
            model.add_element(vars.route[v][t + 1], &tables.stop_ready_time, ready_next);

            // ready_next - arrival - sigma - tau, clamped to [0, max_ready].
            let wait_lo = -(arrival_max + max_service + max_travel);
            let wait_raw = model.new_int_var(wait_lo, max_ready, &format!("wait_raw_{v}_{t}"));
            model.add_eq(
                Expr::var(wait_raw),
                Expr::var(ready_next)
                    .minus(Expr::var(vars.arrival[v][t]))
                    .minus(Expr::var(sigma))
                    .minus(Expr::var(tau)),
            );
            let zero = model.new_constant(0);
            let wait_pos = model.new_int_var(0, max_ready, &format!("wait_pos_{v}_{t}"));
            model.add_max_eq(wait_pos, &[wait_raw, zero]);

            let waiting_raw = Expr::var(wait_pos).scale(vehicle.cost().per_wait_min);
            let waiting_max = max_ready * vehicle.cost().per_wait_min.max(1);
            let waiting_term = gated_value(
                model,
                0,
                waiting_max.max(1),
                active,
                waiting_raw,
                Expr::Const(0),
                &format!("cost_waiting_{v}_{t}"),
            );
            waiting_terms.push(Bounded { var: waiting_term, max: waiting_max.max(1) });
        }
    }
    let distance = sum_into(model, &distance_terms, "cost_distance_total");
    let waiting = sum_into(model, &waiting_terms, "cost_waiting_total");

    // 3. Labor: regular + overtime off the vehicle's peak elapsed time.
    let mut labor_terms = Vec::with_capacity(vars.num_vehicles);
    for v in 0..vars.num_vehicles {
        let vehicle = &problem.vehicles()[v];
        let shift = vehicle.labor().shift;

        let peak = model.new_int_var(0, arrival_max, &format!("labor_peak_{v}"));
        model.add_max_eq(peak, &vars.arrival[v]);

        let elapsed_max = (arrival_max - shift.start_time).max(0);
        let elapsed = model.new_int_var(0, elapsed_max, &format!("labor_elapsed_{v}"));
        model.add_eq(Expr::var(elapsed), Expr::var(peak).minus(Expr::Const(shift.start_time)));

        let standard_const = model.new_constant(shift.standard_duration);
        let regular = model.new_int_var(0, shift.standard_duration.max(1), &format!("labor_regular_{v}"));
        model.add_min_eq(regular, &[elapsed, standard_const]);

        let overtime_raw_max = elapsed_max;
        let overtime_raw = model.new_int_var(-overtime_raw_max.max(1), overtime_raw_max.max(1), &format!("labor_overtime_raw_{v}"));
        model.add_eq(
            Expr::var(overtime_raw),
            Expr::var(elapsed).minus(Expr::Const(shift.standard_duration)),
        );
        let zero = model.new_constant(0);
        let overtime = model.new_int_var(0, overtime_raw_max.max(1), &format!("labor_overtime_{v}"));
        model.add_max_eq(overtime, &[overtime_raw, zero]);

        let overtime_rate = (vehicle.labor().cost.regular_rate as f64 * vehicle.labor().cost.overtime_multiplier).floor() as i64;
        let labor_max = shift.standard_duration * vehicle.labor().cost.regular_rate + overtime_raw_max * overtime_rate;
        let term = model.new_int_var(0, labor_max.max(1), &format!("cost_labor_{v}"));
        model.add_eq(
            Expr::var(term),
            Expr::var(regular)
                .scale(vehicle.labor().cost.regular_rate)
                .plus(Expr::var(overtime).scale(overtime_rate)),
        );
        labor_terms.push(Bounded { var: term, max: labor_max.max(1) });
    }
    let labor = sum_into(model, &labor_terms, "cost_labor_total");

    // 4. Unserved: per-shipment penalty when not served.
    let mut unserved_terms = Vec::with_capacity(problem.shipments().len());
    for (idx, shipment) in problem.shipments().iter().enumerate() {
        let penalty = shipment.unserved_penalty(config.unserved_penalty);
        let term = gated_value(
            model,
            0,
            penalty.max(1),
            Lit::Neg(vars.is_served[idx]),
            Expr::Const(penalty),
            Expr::Const(0),
            &format!("cost_unserved_{idx}"),
        );
        unserved_terms.push(Bounded { var: term, max: penalty.max(1) });
    }
    let unserved = sum_into(model, &unserved_terms, "cost_unserved_total");

    // 5. Zone crossing: per active edge between two distinct non-depot zones.
    let mut zone_terms = Vec::new();
    let max_zone = tables.stop_zone.iter().copied().max().unwrap_or(0);
    for v in 0..vars.num_vehicles {
        for t in 0..vars.num_steps.saturating_sub(1) {
            let active = Lit::Neg(vars.done[v][t]);

            let zone_curr = model.new_int_var(0, max_zone, &format!("zone_curr_{v}_{t}"));
            model.add_element(vars.route[v][t], &tables.stop_zone, zone_curr);
            let zone_next = model.new_int_var(0, max_zone, &format!("zone_next_{v}_{t}"));
            model.add_element(vars.route[v][t + 1], &tables.stop_zone, zone_next);

            let curr_is_depot = model.new_int_var(0, 1, &format!("zone_curr_is_depot_{v}_{t}"));
            model.add_element(vars.route[v][t], &tables.stop_is_depot, curr_is_depot);
            let next_is_depot = model.new_int_var(0, 1, &format!("zone_next_is_depot_{v}_{t}"));
            model.add_element(vars.route[v][t + 1], &tables.stop_is_depot, next_is_depot);

            let curr_nondepot = reify_eq(model, Expr::var(curr_is_depot), Expr::Const(0), &format!("zone_curr_nondepot_{v}_{t}"));
            let next_nondepot = reify_eq(model, Expr::var(next_is_depot), Expr::Const(0), &format!("zone_next_nondepot_{v}_{t}"));
            let zones_differ = reify_ne(model, Expr::var(zone_curr), Expr::var(zone_next), &format!("zones_differ_{v}_{t}"));

            let crosses = reify_and(
                model,
                &[Lit::Pos(curr_nondepot), Lit::Pos(next_nondepot), Lit::Pos(zones_differ)],
                &format!("zone_crosses_{v}_{t}"),
            );
            let gate = reify_and(model, &[active, Lit::Pos(crosses)], &format!("zone_active_crosses_{v}_{t}"));

            let term = gated_value(
                model,
                0,
                config.zone_penalty.max(1),
                Lit::Pos(gate),
                Expr::Const(config.zone_penalty),
                Expr::Const(0),
                &format!("cost_zone_{v}_{t}"),
            );
            zone_terms.push(Bounded { var: term, max: config.zone_penalty.max(1) });
        }
    }
    let zone = sum_into(model, &zone_terms, "cost_zone_total");

    // 7. Late: reserved. Hard windows mean every late flag is 0
    // (spec.md §9, open question resolved in favor of hard windows).
    let late = model.new_constant(0);

    // 8. Rehandling.
    let rehandling_terms_raw = lifo::apply(model, problem, config, vars);
    let rehandling_bound = problem
        .shipments()
        .iter()
        .map(|s| s.cargo().volume * config.rehandling_crowded_multiplier)
        .max()
        .unwrap_or(0)
        .max(1);
    let rehandling_terms: Vec<Bounded<M::IntVar>> = rehandling_terms_raw
        .into_iter()
        .map(|var| Bounded { var, max: rehandling_bound })
        .collect();
    let rehandling = sum_into(model, &rehandling_terms, "cost_rehandling_total");

    let total_max = fixed_terms.iter().map(|b| b.max).sum::<i64>()
        + distance_terms.iter().map(|b| b.max).sum::<i64>()
        + labor_terms.iter().map(|b| b.max).sum::<i64>()
        + unserved_terms.iter().map(|b| b.max).sum::<i64>()
        + zone_terms.iter().map(|b| b.max).sum::<i64>()
        + waiting_terms.iter().map(|b| b.max).sum::<i64>()
        + rehandling_terms.iter().map(|b| b.max).sum::<i64>();

    let total = model.new_int_var(0, total_max.max(1), "cost_total");
    model.add_eq(
        Expr::var(total),
        Expr::sum([
            Expr::var(fixed),
            Expr::var(distance),
            Expr::var(labor),
            Expr::var(unserved),
            Expr::var(zone),
            Expr::var(waiting),
            Expr::var(late),
            Expr::var(rehandling),
        ]),
    );
    model.minimize(Expr::var(total));

    ObjectiveVars {
        fixed,
        distance,
        labor,
        unserved,
        zone,
        waiting,
        late,
        rehandling,
        total,
    }
}

fn sum_into<M: CpModel>(model: &mut M, terms: &[Bounded<M::IntVar>], name: &str) -> M::IntVar {
    let bound = terms.iter().map(|b| b.max).sum::<i64>().max(1);
    let total = model.new_int_var(0, bound, name);
    if terms.is_empty() {
        model.add_eq(Expr::var(total), Expr::Const(0));
    } else {
        model.add_eq(Expr::var(total), Expr::sum(terms.iter().map(|b| Expr::var(b.var))));
    }
    total
}
