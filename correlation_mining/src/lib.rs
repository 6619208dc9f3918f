#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![allow(clippy::needless_doctest_main)]
#![doc = include_str!("../README.md")]

pub mod core;

pub mod discovery;

/// Util module with smaller helper functions, structs or enums
pub mod utils;

#[doc(inline)]
pub use crate::core::event_data::case_centric::EventLog;

#[doc(inline)]
pub use crate::core::event_data::case_centric::event_table::EventTable;

#[doc(inline)]
pub use crate::core::process_models::case_centric::dfg::DirectlyFollowsGraph;

#[doc(inline)]
pub use discovery::case_centric::correlation_mining::{
    discover_correlation_dfg, discover_correlation_dfg_from_table,
    discover_correlation_dfg_with_solver, CorrelationMinerError, CorrelationMinerParameters,
    CorrelationMinerResult,
};
