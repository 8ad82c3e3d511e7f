//! Waypoint Branch
//!
//! The adaptive state machine behind scaffold-down remediation.
//!
//! # Overview
//!
//! - **ItemSelector**: picks an unseen item for a part's objectives
//! - **PartState**: answer state derived from a section snapshot
//! - **BranchGenerator**: decides whether a part branches and generates its
//!   waypoint children under depth, quota and outstanding-answer limits
//!
//! Nothing here is persisted; every decision is recomputed from the
//! identifier and the snapshot passed in.

#![warn(missing_docs)]

pub mod error;
pub mod generator;
pub mod selector;
pub mod state;

// Re-exports
pub use error::{BranchError, SelectError};
pub use generator::{BranchGenerator, BranchLimits, UNBOUNDED_WAYPOINT_ITEMS};
pub use selector::ItemSelector;
pub use state::{PartState, PartView};
