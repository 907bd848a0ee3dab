//! Wires variable allocation, constraint postings, and the objective into
//! one CP model and turns the solver's answer back into a `Solution`.

pub mod driver;
