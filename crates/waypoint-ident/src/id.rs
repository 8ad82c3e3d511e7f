//! Resource identifiers
//!
//! Provides [`ResourceId`], the `(authority, namespace, identifier)` triple
//! used to address both canonical records and synthetic ones.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Authority marking a synthetic scaffold part
pub const PART_AUTHORITY: &str = "magic-part-authority";

/// Authority marking a synthetic item with a fixed choice order
pub const ITEM_AUTHORITY: &str = "magic-randomize-choices-question-record";

/// Namespace of assessment part records
pub const PART_NAMESPACE: &str = "assessment_authoring.AssessmentPart";

/// Namespace of assessment item records
pub const ITEM_NAMESPACE: &str = "assessment.Item";

/// Authority used for canonical stored records
pub const CANONICAL_AUTHORITY: &str = "waypoint.local";

/// Resource identifier
///
/// String form: `namespace:identifier@authority`.
///
/// For canonical records the identifier is the stored key. For synthetic
/// records it is `<origin>?<escaped payload>` and the authority carries the
/// synthetic marker.
///
/// # Example
/// ```
/// use waypoint_ident::ResourceId;
///
/// let id: ResourceId = "assessment.Item:abc123@waypoint.local".parse().unwrap();
/// assert_eq!(id.namespace(), "assessment.Item");
/// assert_eq!(id.identifier(), "abc123");
/// assert_eq!(id.authority(), "waypoint.local");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId {
    namespace: String,
    identifier: String,
    authority: String,
}

impl ResourceId {
    /// Create new identifier
    #[inline]
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        identifier: impl Into<String>,
        authority: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            authority: authority.into(),
        }
    }

    /// Canonical part identifier
    #[inline]
    #[must_use]
    pub fn canonical_part(identifier: impl Into<String>) -> Self {
        Self::new(PART_NAMESPACE, identifier, CANONICAL_AUTHORITY)
    }

    /// Canonical item identifier
    #[inline]
    #[must_use]
    pub fn canonical_item(identifier: impl Into<String>) -> Self {
        Self::new(ITEM_NAMESPACE, identifier, CANONICAL_AUTHORITY)
    }

    /// Record kind
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Stored key, or `<origin>?<payload>` for synthetic ids
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Issuing authority
    #[inline]
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Check the authority tag
    #[inline]
    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authority == authority
    }

    /// Same identifier under another authority
    #[inline]
    #[must_use]
    pub fn with_authority(&self, authority: impl Into<String>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            identifier: self.identifier.clone(),
            authority: authority.into(),
        }
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.namespace, self.identifier, self.authority)
    }
}

impl FromStr for ResourceId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, authority) = s
            .rsplit_once('@')
            .ok_or_else(|| IdError::MissingAuthority(s.to_string()))?;
        let (namespace, identifier) = rest
            .split_once(':')
            .ok_or_else(|| IdError::MissingNamespace(s.to_string()))?;

        if authority.is_empty() {
            return Err(IdError::MissingAuthority(s.to_string()));
        }
        if namespace.is_empty() {
            return Err(IdError::MissingNamespace(s.to_string()));
        }
        if identifier.is_empty() {
            return Err(IdError::EmptyIdentifier);
        }

        Ok(Self::new(namespace, identifier, authority))
    }
}

// Serialized as the string form so ids stay readable inside JSON payloads
impl serde::Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors parsing a [`ResourceId`] string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// No `@authority` suffix
    #[error("missing authority in resource id: {0}")]
    MissingAuthority(String),

    /// No `namespace:` prefix
    #[error("missing namespace in resource id: {0}")]
    MissingNamespace(String),

    /// Identifier part is empty
    #[error("resource id has an empty identifier")]
    EmptyIdentifier,
}
