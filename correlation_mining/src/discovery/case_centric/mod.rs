//! Discovery of case-centric process models
pub mod correlation_mining;
