//! Case-centric process models
pub mod dfg;
