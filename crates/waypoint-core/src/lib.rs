//! Waypoint Core - scaffold-down remediation lookup
//!
//! Resolves identifiers to parts and items:
//! - Canonical ids are fetched from storage unchanged
//! - Synthetic part ids are decoded, given an item lazily, and can branch
//!   into waypoint children after an incorrect answer
//! - Randomized item ids restore a captured choice order
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use waypoint_catalog::{InMemoryStore, ScaffoldSettings, SectionSnapshot};
//! use waypoint_core::{EngineConfig, LookupSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::new());
//! let settings = ScaffoldSettings::builder()
//!     .objective_ids(vec!["lo-fractions".into()])?
//!     .build();
//! let part_id = store.insert_part(settings);
//!
//! let session = LookupSession::new(Arc::clone(&store), store, EngineConfig::new());
//! let record = session.resolve(&part_id, &SectionSnapshot::new()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod item;
pub mod part;
pub mod session;

// Re-exports for convenience
pub use config::EngineConfig;
pub use error::{ConfigError, Result, WaypointError};
pub use item::RandomizedItem;
pub use part::ScaffoldPart;
pub use session::{LookupSession, ResolvedEntity};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Waypoint Core
    pub use crate::{
        EngineConfig, LookupSession, RandomizedItem, ResolvedEntity, ScaffoldPart, WaypointError,
    };
    pub use waypoint_catalog::prelude::*;
    pub use waypoint_ident::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
