//! Flat lookup tables handed to `CpModel::add_element` calls. Built once
//! per solve from the immutable `Problem`, shared by every constraint
//! module and the objective builder.

use vrp_cp::{CpModel, Expr};

use crate::problem::{stop_builder, Problem};

pub struct Tables {
    pub stop_to_loc: Vec<i64>,
    pub stop_weight_delta: Vec<i64>,
    pub stop_volume_delta: Vec<i64>,
    pub stop_service_duration: Vec<i64>,
    pub stop_zone: Vec<i64>,
    pub stop_ready_time: Vec<i64>,
    /// `1` for depot stops (start/end), `0` for pickup/delivery stops.
    pub stop_is_depot: Vec<i64>,
    pub loc_zone: Vec<i64>,
    pub travel_time_flat: Vec<i64>,
    pub travel_distance_flat: Vec<i64>,
    pub setup_time_flat: Vec<i64>,
    pub num_locations: usize,
    pub num_stops: usize,
}

impl Tables {
    pub fn build(problem: &Problem) -> Tables {
        let layout = problem.stop_layout();

        Tables {
            stop_to_loc: stop_builder::stop_to_loc_table(layout),
            stop_weight_delta: stop_builder::stop_weight_delta_table(layout),
            stop_volume_delta: stop_builder::stop_volume_delta_table(layout),
            stop_service_duration: stop_builder::stop_service_duration_table(layout),
            stop_zone: stop_builder::stop_zone_table(layout),
            stop_ready_time: stop_builder::stop_ready_time_table(layout, problem.shipments()),
            stop_is_depot: layout.stops().iter().map(|s| s.is_depot() as i64).collect(),
            loc_zone: problem.locations().iter().map(|l| l.zone()).collect(),
            travel_time_flat: problem.travel_time_table().to_vec(),
            travel_distance_flat: problem.travel_distance_table().to_vec(),
            setup_time_flat: problem.setup_time_table().to_vec(),
            num_locations: problem.num_locations(),
            num_stops: layout.num_stops(),
        }
    }

    /// Flattened `[from, to]` index into any `N_locations x N_locations`
    /// row-major table.
    pub fn loc_pair_index(&self, from: i64, to: i64) -> i64 {
        from * self.num_locations as i64 + to
    }

    /// Same as [`Tables::loc_pair_index`], but `from`/`to` are themselves CP
    /// variables: allocates and binds the `idx` variable an `element` call
    /// over a flattened matrix needs, where `idx = curr_loc*N_loc + next_loc`.
    pub fn flat_index_var<M: CpModel>(
        &self,
        model: &mut M,
        from: M::IntVar,
        to: M::IntVar,
        name: &str,
    ) -> M::IntVar {
        let idx = model.new_int_var(0, (self.num_locations * self.num_locations) as i64 - 1, name);
        model.add_eq(
            Expr::var(idx),
            Expr::var(from).scale(self.num_locations as i64).plus(Expr::var(to)),
        );
        idx
    }
}
