//! Storage errors

use waypoint_ident::ResourceId;

/// Errors from canonical storage and catalog collaborators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record with this id
    #[error("not found: {0}")]
    NotFound(ResourceId),

    /// Backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// True for the not-found case
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
