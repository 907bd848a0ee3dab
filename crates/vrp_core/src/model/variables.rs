//! The CP variable layer: every bounded integer and
//! Boolean variable the constraint modules and objective builder read or
//! constrain. Allocated once per solve, before any constraint is posted.

use crate::{config::Config, model::tables::Tables, problem::Problem};
use vrp_cp::CpModel;

pub struct VariableLayer<M: CpModel> {
    pub num_vehicles: usize,
    pub num_steps: usize,
    pub cap_weight_max: i64,
    pub cap_volume_max: i64,

    /// `route[v][t]`: the stop index vehicle `v` occupies at step `t`.
    pub route: Vec<Vec<M::IntVar>>,
    /// `route_loc[v][t]`: `stop_to_loc[route[v][t]]`, materialized via `element`.
    pub route_loc: Vec<Vec<M::IntVar>>,
    pub arrival: Vec<Vec<M::IntVar>>,
    pub load_w: Vec<Vec<M::IntVar>>,
    pub load_v: Vec<Vec<M::IntVar>>,
    /// `done[v][t]`: vehicle `v` has reached (and stays at) its end depot by step `t`.
    pub done: Vec<Vec<M::BoolVar>>,

    pub is_used: Vec<M::BoolVar>,
    /// Indexed by `StopIdx`. `0` when the stop is inactive.
    pub visit_step: Vec<M::IntVar>,
    /// Indexed by `StopIdx`, 1-based vehicle id; `0` when the stop is inactive.
    pub visit_vehicle: Vec<M::IntVar>,
    pub is_stop_active: Vec<M::BoolVar>,
    pub is_served: Vec<M::BoolVar>,
}

/// `T = 2*N_s + 2*N_v + 5`: enough steps for every
/// vehicle to visit its own depots plus every pickup/delivery stop, with a
/// small margin rather than the source's heuristic `max_steps = 20`.
pub fn step_horizon(problem: &Problem) -> usize {
    let layout = problem.stop_layout();
    2 * layout.num_shipments() + 2 * layout.num_vehicles() + 5
}

/// Upper bound for every `arrival` variable: the widest shift envelope
/// across vehicles, plus a fixed margin for anti-teleport/break/waiting
/// slack. The shift cap (spec.md §4.3, "Shift cap") already bounds every
/// `arrival[v,t]` at `shift.start + shift.max_duration`, so that alone is
/// the tight bound; a travel-matrix-derived bound is not used here because
/// a non-routable cell may carry a sentinel large integer (spec.md §6),
/// and `sentinel * step_horizon` would balloon (or overflow) the domain.
pub fn arrival_upper_bound(problem: &Problem, config: &Config) -> i64 {
    let shift_bound = problem
        .vehicles()
        .iter()
        .map(|v| v.labor().shift.start_time + v.labor().shift.max_duration)
        .max()
        .unwrap_or(0);
    shift_bound + config.depot_service_time + config.time_paradox_slack_minutes
}

/// Upper bound for `load_w`/`load_v`: the largest vehicle capacity in the
/// fleet (at least `1`, so a fleet with only empty-capacity vehicles still
/// gets a valid, non-degenerate domain).
pub fn capacity_upper_bound(problem: &Problem) -> (i64, i64) {
    let weight = problem
        .vehicles()
        .iter()
        .map(|v| v.capacity().weight)
        .max()
        .unwrap_or(0)
        .max(1);
    let volume = problem
        .vehicles()
        .iter()
        .map(|v| v.capacity().volume)
        .max()
        .unwrap_or(0)
        .max(1);
    (weight, volume)
}

pub fn build<M: CpModel>(
    model: &mut M,
    problem: &Problem,
    config: &Config,
    tables: &Tables,
) -> VariableLayer<M> {
    let num_vehicles = problem.vehicles().len();
    let num_stops = tables.num_stops;
    let num_locations = tables.num_locations;
    let t_horizon = step_horizon(problem);
    let arrival_max = arrival_upper_bound(problem, config);
    let (cap_weight_max, cap_volume_max) = capacity_upper_bound(problem);

    let mut route = Vec::with_capacity(num_vehicles);
    let mut route_loc = Vec::with_capacity(num_vehicles);
    let mut arrival = Vec::with_capacity(num_vehicles);
    let mut load_w = Vec::with_capacity(num_vehicles);
    let mut load_v = Vec::with_capacity(num_vehicles);
    let mut done = Vec::with_capacity(num_vehicles);

    for v in 0..num_vehicles {
        let mut route_v = Vec::with_capacity(t_horizon);
        let mut route_loc_v = Vec::with_capacity(t_horizon);
        let mut arrival_v = Vec::with_capacity(t_horizon);
        let mut load_w_v = Vec::with_capacity(t_horizon);
        let mut load_v_v = Vec::with_capacity(t_horizon);
        let mut done_v = Vec::with_capacity(t_horizon);

        for t in 0..t_horizon {
            let r = model.new_int_var(0, num_stops as i64 - 1, &format!("route_{v}_{t}"));
            let rl = model.new_int_var(0, num_locations as i64 - 1, &format!("route_loc_{v}_{t}"));
            model.add_element(r, &tables.stop_to_loc, rl);

            route_v.push(r);
            route_loc_v.push(rl);
            arrival_v.push(model.new_int_var(0, arrival_max, &format!("arrival_{v}_{t}")));
            load_w_v.push(model.new_int_var(0, cap_weight_max, &format!("load_w_{v}_{t}")));
            load_v_v.push(model.new_int_var(0, cap_volume_max, &format!("load_v_{v}_{t}")));
            done_v.push(model.new_bool_var(&format!("done_{v}_{t}")));
        }

        route.push(route_v);
        route_loc.push(route_loc_v);
        arrival.push(arrival_v);
        load_w.push(load_w_v);
        load_v.push(load_v_v);
        done.push(done_v);
    }

    let is_used = (0..num_vehicles)
        .map(|v| model.new_bool_var(&format!("is_used_{v}")))
        .collect();

    let visit_step = (0..num_stops)
        .map(|s| model.new_int_var(0, t_horizon as i64, &format!("visit_step_{s}")))
        .collect();
    let visit_vehicle = (0..num_stops)
        .map(|s| model.new_int_var(0, num_vehicles as i64, &format!("visit_vehicle_{s}")))
        .collect();
    let is_stop_active = (0..num_stops)
        .map(|s| model.new_bool_var(&format!("is_stop_active_{s}")))
        .collect();
    let is_served = (0..problem.shipments().len())
        .map(|s| model.new_bool_var(&format!("is_served_{s}")))
        .collect();

    VariableLayer {
        num_vehicles,
        num_steps: t_horizon,
        cap_weight_max,
        cap_volume_max,
        route,
        route_loc,
        arrival,
        load_w,
        load_v,
        done,
        is_used,
        visit_step,
        visit_vehicle,
        is_stop_active,
        is_served,
    }
}
