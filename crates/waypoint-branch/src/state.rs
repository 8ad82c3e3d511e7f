//! Derived part state
//!
//! A synthetic part's state is never stored. It is computed fresh from the
//! section snapshot every time it is asked for.

use waypoint_catalog::SectionState;
use waypoint_ident::{PartToken, ResourceId};

/// Borrowed view of a decoded synthetic part
#[derive(Debug, Clone, Copy)]
pub struct PartView<'a> {
    /// The part's own synthetic identifier
    pub id: &'a ResourceId,
    /// Canonical part it derives from
    pub origin: &'a str,
    /// Decoded token
    pub token: &'a PartToken,
    /// Item resolved for the part, if any
    pub item: Option<&'a ResourceId>,
}

/// Answer state of a synthetic part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartState {
    /// Neither objectives nor an item: nothing to ask
    NoObjective,
    /// Item not yet shown, not yet answered, or none resolvable
    AwaitingAnswer,
    /// Answered correctly
    AnsweredCorrect,
    /// Answered incorrectly without an inferred confusion
    AnsweredIncorrectNoConfusion,
    /// Answered incorrectly with at least one confused objective
    AnsweredIncorrectWithConfusion,
}

impl PartState {
    /// Derive the state of `part` from `section`
    ///
    /// Only an item the section has pinned to this part counts as answered;
    /// a freshly selected item has not been shown yet.
    #[must_use]
    pub fn classify(part: &PartView<'_>, section: &dyn SectionState) -> Self {
        let Some(item) = part.item else {
            return if part.token.has_objectives() {
                Self::AwaitingAnswer
            } else {
                Self::NoObjective
            };
        };

        if !section.is_known(part.id) || !section.is_answered(item) {
            return Self::AwaitingAnswer;
        }
        if section.is_correct(item) {
            return Self::AnsweredCorrect;
        }
        if section
            .confused_objectives_for(item)
            .iter()
            .all(String::is_empty)
        {
            return Self::AnsweredIncorrectNoConfusion;
        }
        Self::AnsweredIncorrectWithConfusion
    }

    /// Whether this state can branch
    #[inline]
    #[must_use]
    pub fn branches(self) -> bool {
        self == Self::AnsweredIncorrectWithConfusion
    }
}
