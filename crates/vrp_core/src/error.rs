//! Error taxonomy for the routing core: one `thiserror` enum per adapter
//! boundary, distinct from a solve producing no feasible solution, which
//! is a normal outcome, not an error.

#[derive(Debug, thiserror::Error)]
pub enum ProblemError {
    #[error("shipment {shipment} references unknown location {location}")]
    UnknownLocation { shipment: usize, location: usize },

    #[error("vehicle {vehicle} references unknown depot location {location}")]
    UnknownDepot { vehicle: usize, location: usize },

    #[error("vehicle {vehicle} has negative capacity ({weight}, {volume})")]
    NegativeCapacity {
        vehicle: usize,
        weight: f64,
        volume: f64,
    },

    #[error("shipment {shipment} has negative cargo ({weight}, {volume})")]
    NegativeCargo {
        shipment: usize,
        weight: f64,
        volume: f64,
    },

    #[error("travel matrix shape mismatch: expected {expected}x{expected}, got {rows}x{cols}")]
    MatrixShapeMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("setup matrix shape mismatch: expected {expected}x{expected}, got {rows}x{cols}")]
    SetupMatrixShapeMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("invalid problem: {0}")]
    Input(#[from] ProblemError),

    #[error("solver engine error: {0}")]
    Engine(String),
}
