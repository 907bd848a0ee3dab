//! The output of `solve()`: solve status, per-vehicle stop sequences, the
//! cost breakdown, and the unserved-shipment list. Built once by the
//! solver driver and immutable from then on.

use crate::problem::stop::StopKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Status {
    Optimal,
    Feasible,
    Infeasible,
}

/// One stop on a vehicle's route, with the CP-assigned arrival time and
/// load already de-scaled back to the caller's floating-point units.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RouteStop {
    pub site_id: String,
    pub arrival_time: i64,
    pub load_weight: f64,
    pub load_volume: f64,
    pub is_late: bool,
    pub stop_type: StopKind,
    pub shipment_id: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Route {
    pub vehicle_id: String,
    pub stops: Vec<RouteStop>,
    pub total_distance: i64,
    pub total_time: i64,
}

/// The multi-term cost breakdown; `total` is the sum of every other field.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct Costs {
    pub fixed: i64,
    pub distance: i64,
    pub labor: i64,
    pub zone: i64,
    pub rehandling: i64,
    pub waiting: i64,
    pub late: i64,
    pub unserved: i64,
    pub total: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Solution {
    pub status: Status,
    pub routes: Vec<Route>,
    pub costs: Costs,
    pub unserved_shipments: Vec<String>,
}

impl Solution {
    /// The shape returned on `INFEASIBLE`/`UNKNOWN`: empty routes, every
    /// shipment unserved, no CP variable values to read back.
    pub fn infeasible_fallback(shipment_ids: Vec<String>) -> Solution {
        Solution {
            status: Status::Infeasible,
            routes: Vec::new(),
            costs: Costs::default(),
            unserved_shipments: shipment_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasible_fallback_leaves_every_shipment_unserved() {
        let fallback = Solution::infeasible_fallback(vec!["s1".to_string(), "s2".to_string()]);
        assert_eq!(fallback.status, Status::Infeasible);
        assert!(fallback.routes.is_empty());
        assert_eq!(fallback.costs.total, 0);
        assert_eq!(fallback.unserved_shipments, vec!["s1", "s2"]);
    }
}
