//! Directly-follows graphs
/// [`DirectlyFollowsGraph`] struct
pub mod dfg_struct;

#[doc(inline)]
pub use dfg_struct::DirectlyFollowsGraph;
