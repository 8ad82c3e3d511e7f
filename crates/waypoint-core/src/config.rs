//! Engine configuration
//!
//! Authorities, namespaces and the sentinel sibling count. Per-part
//! branching settings live on the part record, not here.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use waypoint_branch::UNBOUNDED_WAYPOINT_ITEMS;
use waypoint_ident::{
    Codec, CANONICAL_AUTHORITY, ITEM_AUTHORITY, ITEM_NAMESPACE, PART_AUTHORITY, PART_NAMESPACE,
};

/// Engine configuration
///
/// Missing keys in a TOML file fall back to [`EngineConfig::default`].
///
/// ```toml
/// part_authority = "magic-part-authority"
/// unbounded_waypoint_items = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Authority of synthetic scaffold parts
    pub part_authority: String,
    /// Authority of randomized items
    pub item_authority: String,
    /// Authority the canonical store answers to
    pub canonical_authority: String,
    /// Namespace of part records
    pub part_namespace: String,
    /// Namespace of item records
    pub item_namespace: String,
    /// Sibling count when a part sets no `max_waypoint_items`
    pub unbounded_waypoint_items: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            part_authority: PART_AUTHORITY.to_string(),
            item_authority: ITEM_AUTHORITY.to_string(),
            canonical_authority: CANONICAL_AUTHORITY.to_string(),
            part_namespace: PART_NAMESPACE.to_string(),
            item_namespace: ITEM_NAMESPACE.to_string(),
            unbounded_waypoint_items: UNBOUNDED_WAYPOINT_ITEMS,
        }
    }
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With sentinel sibling count
    #[inline]
    #[must_use]
    pub fn with_unbounded_waypoint_items(mut self, count: u32) -> Self {
        self.unbounded_waypoint_items = count;
        self
    }

    /// With canonical authority
    #[inline]
    #[must_use]
    pub fn with_canonical_authority(mut self, authority: impl Into<String>) -> Self {
        self.canonical_authority = authority.into();
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on invalid TOML or wrong value types
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not valid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Codec for synthetic parts
    #[inline]
    #[must_use]
    pub fn part_codec(&self) -> Codec {
        Codec::new(self.part_authority.as_str())
    }

    /// Codec for randomized items
    #[inline]
    #[must_use]
    pub fn item_codec(&self) -> Codec {
        Codec::new(self.item_authority.as_str())
    }
}
