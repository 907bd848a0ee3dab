//! The CP model layer: variable allocation, constraint postings, and the
//! objective, assembled by the solver driver.

pub mod constraints;
pub mod objective;
pub mod reify;
pub mod tables;
pub mod variables;
