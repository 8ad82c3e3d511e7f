//! Waypoint Catalog
//!
//! The collaborators the branching engine reads from, specified at their
//! interface, plus the record types they exchange.
//!
//! # Overview
//!
//! - **PartStore**: canonical parts and items
//! - **ItemCatalog**: objective-linked item queries
//! - **SectionState**: live response record of one attempt
//! - **InMemoryStore**: a concurrent in-memory implementation

#![warn(missing_docs)]

pub mod collaborators;
pub mod error;
pub mod memory;
pub mod records;
pub mod section;

// Re-exports
pub use collaborators::{ItemCatalog, PartStore, SectionState};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use records::{
    Choice, ItemRecord, PartRecord, Question, ScaffoldSettings, ScaffoldSettingsBuilder,
    SettingsError,
};
pub use section::{Response, SectionQuestion, SectionSnapshot};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for collaborator access
    pub use crate::{
        ItemCatalog, ItemRecord, PartRecord, PartStore, ScaffoldSettings, SectionSnapshot,
        SectionState, StoreError,
    };
}
