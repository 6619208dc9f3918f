//! Case-centric Event Data
pub mod constants;
#[doc(hidden)]
pub(crate) mod event_log_struct;
pub mod event_table;
pub mod macros;
#[doc(inline)]
pub use event_log_struct::*;
