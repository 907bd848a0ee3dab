pub mod fake;

#[cfg(feature = "cp-sat-backend")]
pub mod cp_sat;
