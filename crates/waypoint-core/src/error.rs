//! Error types for lookup and configuration

use std::path::PathBuf;
use thiserror::Error;
use waypoint_branch::{BranchError, SelectError};
use waypoint_catalog::{SettingsError, StoreError};
use waypoint_ident::{CodecError, IdError, ResourceId};
use waypoint_shuffle::ShuffleError;

/// Top-level lookup error
#[derive(Debug, Error)]
pub enum WaypointError {
    /// Identifier could not be encoded or decoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Identifier string did not parse
    #[error(transparent)]
    Id(#[from] IdError),

    /// Item selection failed
    #[error(transparent)]
    Select(#[from] SelectError),

    /// Child generation stopped
    #[error(transparent)]
    Branch(#[from] BranchError),

    /// Choice payload did not match the canonical item
    #[error(transparent)]
    Shuffle(#[from] ShuffleError),

    /// Canonical storage failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Scaffold settings rejected
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Namespace is neither the part nor the item namespace
    #[error("unsupported namespace '{namespace}' for {id}")]
    UnsupportedNamespace {
        /// The offending namespace
        namespace: String,
        /// Full identifier
        id: ResourceId,
    },

    /// Part has no item to answer
    #[error("part {0} has no item")]
    NoItem(ResourceId),

    /// Operation needs a part but got an item
    #[error("{0} is not a part")]
    NotAPart(ResourceId),
}

impl WaypointError {
    /// Normal end-of-branch signal, not a failure
    #[inline]
    #[must_use]
    pub fn is_branch_end(&self) -> bool {
        match self {
            Self::Branch(e) => e.is_branch_end(),
            Self::Select(SelectError::Exhausted { .. }) => true,
            _ => false,
        }
    }

    /// Canonical record is missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }

    /// Corrupt identifier or payload, or a missing origin record
    #[must_use]
    pub fn is_hard_failure(&self) -> bool {
        match self {
            Self::Codec(e) => !e.is_unknown_authority(),
            Self::Shuffle(_) | Self::Id(_) => true,
            Self::Branch(BranchError::Codec(_)) => true,
            Self::Store(e) => e.is_not_found(),
            _ => false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML did not parse into [`crate::EngineConfig`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for lookup operations
pub type Result<T> = std::result::Result<T, WaypointError>;
