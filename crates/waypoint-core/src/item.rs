//! Items with a fixed randomized choice order

use waypoint_catalog::{Choice, ItemRecord, Question};
use waypoint_ident::{ItemToken, ResourceId};

/// A canonical item seen through a captured choice order
///
/// The identifier is the synthetic one, kept verbatim so repeat lookups
/// and section bookkeeping see the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomizedItem {
    id: ResourceId,
    record: ItemRecord,
    question: Question,
    token: ItemToken,
}

impl RandomizedItem {
    pub(crate) fn new(id: ResourceId, record: ItemRecord, choices: Vec<Choice>, token: ItemToken) -> Self {
        let question = record.question.with_choices(choices);
        Self {
            id,
            record,
            question,
            token,
        }
    }

    /// Synthetic identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Canonical item record
    #[inline]
    #[must_use]
    pub fn record(&self) -> &ItemRecord {
        &self.record
    }

    /// Question with choices in presentation order
    #[inline]
    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Choices in presentation order
    #[inline]
    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.question.choices
    }

    /// Captured choice order
    #[inline]
    #[must_use]
    pub fn token(&self) -> &ItemToken {
        &self.token
    }
}
