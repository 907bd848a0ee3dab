//! The single entry point that turns a `Problem` into a `Solution`: post
//! every constraint module against one `CpModel`, minimize the objective,
//! then read the chosen assignment back into domain types.

use vrp_cp::backend::cp_sat::CpSatModel;
use vrp_cp::{CpModel, SolveOutcome, SolveStatus};

use crate::{
    config::Config,
    model::{
        constraints,
        objective::{self, ObjectiveVars},
        tables::Tables,
        variables::{self, VariableLayer},
    },
    precheck::precheck,
    problem::Problem,
    solution::{Costs, Route, RouteStop, Solution, Status},
};

/// Prechecks the problem, then solves it with the real CP-SAT backend.
/// The caller-facing entry point.
pub fn solve(problem: Problem, config: &Config) -> Solution {
    let problem = precheck(problem, config);
    solve_with(CpSatModel::new(), &problem, config)
}

/// Solves an already-prechecked problem against a caller-supplied
/// [`CpModel`] backend. Exposed so the test suite can swap in
/// [`vrp_cp::backend::fake::FakeCpModel`] over toy instances without
/// pulling in the native CP-SAT dependency.
pub fn solve_with<M: CpModel>(mut model: M, problem: &Problem, config: &Config) -> Solution {
    let tables = Tables::build(problem);
    let vars = variables::build(&mut model, problem, config, &tables);

    constraints::routing::apply(&mut model, problem, &vars);
    constraints::time::apply(&mut model, problem, config, &tables, &vars);
    constraints::capacity::apply(&mut model, problem, &tables, &vars);
    constraints::flow::apply(&mut model, problem, &vars);
    let objective_vars = objective::build(&mut model, problem, config, &tables, &vars);

    let outcome = model.solve(config.max_solver_time(), config.num_solver_workers);

    match outcome.status {
        SolveStatus::Optimal | SolveStatus::Feasible => {
            let status = if outcome.status == SolveStatus::Optimal {
                Status::Optimal
            } else {
                Status::Feasible
            };
            extract_solution(problem, config, &vars, &objective_vars, &outcome, status)
        }
        SolveStatus::Infeasible | SolveStatus::Unknown => {
            let ids = problem
                .shipments()
                .iter()
                .map(|s| s.external_id().to_string())
                .collect();
            Solution::infeasible_fallback(ids)
        }
    }
}

fn extract_solution<M: CpModel>(
    problem: &Problem,
    config: &Config,
    vars: &VariableLayer<M>,
    objective_vars: &ObjectiveVars<M>,
    outcome: &SolveOutcome<M::IntVar, M::BoolVar>,
    status: Status,
) -> Solution {
    let layout = problem.stop_layout();
    let scale = config.capacity_scale_factor.max(1) as f64;

    let mut routes = Vec::with_capacity(vars.num_vehicles);
    for v in 0..vars.num_vehicles {
        let vehicle = &problem.vehicles()[v];

        // Walk the step chain, one stop per step, stopping at the first
        // step where `done` holds: route[v][t] is already the end depot at
        // that step, so nothing past it is a distinct stop.
        let mut raw_stops = Vec::with_capacity(vars.num_steps);
        for t in 0..vars.num_steps {
            let stop_idx = (outcome.int_values)(vars.route[v][t]) as usize;
            raw_stops.push(stop_idx);
            if (outcome.bool_values)(vars.done[v][t]) {
                break;
            }
        }

        let mut total_distance = 0i64;
        for pair in raw_stops.windows(2) {
            let from_loc = layout.stops()[pair[0]].location();
            let to_loc = layout.stops()[pair[1]].location();
            total_distance += problem.travel_distance(from_loc, to_loc);
        }

        let stops: Vec<RouteStop> = raw_stops
            .iter()
            .enumerate()
            .map(|(t, &stop_idx)| {
                let stop = &layout.stops()[stop_idx];
                let arrival_time = (outcome.int_values)(vars.arrival[v][t]);
                let load_weight = (outcome.int_values)(vars.load_w[v][t]) as f64 / scale;
                let load_volume = (outcome.int_values)(vars.load_v[v][t]) as f64 / scale;

                RouteStop {
                    site_id: problem.locations()[stop.location()].external_id().to_string(),
                    arrival_time,
                    load_weight,
                    load_volume,
                    // Hard windows mean every stop on a feasible solution is
                    // on time.
                    is_late: false,
                    stop_type: stop.kind(),
                    shipment_id: stop.shipment().map(|s| problem.shipments()[s].external_id().to_string()),
                }
            })
            .collect();

        let total_time = match (stops.first(), stops.last()) {
            (Some(first), Some(last)) => last.arrival_time - first.arrival_time,
            _ => 0,
        };

        routes.push(Route {
            vehicle_id: vehicle.external_id().to_string(),
            stops,
            total_distance,
            total_time,
        });
    }

    let unserved_shipments = problem
        .shipments()
        .iter()
        .enumerate()
        .filter(|(idx, _)| !(outcome.bool_values)(vars.is_served[*idx]))
        .map(|(_, shipment)| shipment.external_id().to_string())
        .collect();

    let costs = Costs {
        fixed: (outcome.int_values)(objective_vars.fixed),
        distance: (outcome.int_values)(objective_vars.distance),
        labor: (outcome.int_values)(objective_vars.labor),
        zone: (outcome.int_values)(objective_vars.zone),
        rehandling: (outcome.int_values)(objective_vars.rehandling),
        waiting: (outcome.int_values)(objective_vars.waiting),
        late: (outcome.int_values)(objective_vars.late),
        unserved: (outcome.int_values)(objective_vars.unserved),
        total: (outcome.int_values)(objective_vars.total),
    };

    Solution {
        status,
        routes,
        costs,
        unserved_shipments,
    }
}
