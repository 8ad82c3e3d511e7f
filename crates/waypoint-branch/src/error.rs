//! Branching errors
//!
//! Every variant except [`BranchError::Codec`] means "this branch ends here"
//! and is consumed by branch termination logic rather than surfaced.

use waypoint_ident::CodecError;

/// Item selection errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// No unseen candidate and repeats are not allowed, or the pool is empty
    #[error("item pool exhausted for objectives {objectives:?}")]
    Exhausted {
        /// Objectives the pool was filtered by
        objectives: Vec<String>,
    },
}

/// Child generation errors
#[derive(Debug, thiserror::Error)]
pub enum BranchError {
    /// The part is not in a state that branches
    #[error("no children available")]
    NoChildrenAvailable,

    /// The response carries no usable confused objective
    #[error("no remediation objective for {item}")]
    NoRemediationObjective {
        /// Item whose response was inspected
        item: String,
    },

    /// A child identifier could not be encoded
    #[error("child identifier encoding failed: {0}")]
    Codec(#[from] CodecError),
}

impl BranchError {
    /// True for the expected end-of-branch signals
    #[inline]
    #[must_use]
    pub fn is_branch_end(&self) -> bool {
        matches!(
            self,
            Self::NoChildrenAvailable | Self::NoRemediationObjective { .. }
        )
    }
}
