//! Process Models
//!
//! Representations of discovered process models
pub mod case_centric;
