//! Program analysis over the assembly object model.
//!
//! The single analysis the pipeline needs is reachability: a worklist-driven
//! closure over method and type metadata that decides which parts of the
//! assembly are live. See [`reachability`].

pub mod reachability;

pub use reachability::{identify_live_code, LiveSets};
