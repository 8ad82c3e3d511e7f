//! Waypoint Shuffle
//!
//! Randomized answer-choice order that survives a revisit.
//!
//! The first presentation shuffles once and captures the resulting order in
//! an [`ItemToken`]. Every later lookup restores that exact order from the
//! token; nothing is ever re-shuffled.
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use waypoint_catalog::Choice;
//! use waypoint_shuffle::ChoiceShuffler;
//!
//! let choices = vec![Choice::new("a", "1"), Choice::new("b", "2"), Choice::new("c", "3")];
//! let mut rng = StdRng::seed_from_u64(3);
//!
//! let shown = ChoiceShuffler::present(&choices, &mut rng);
//! let again = ChoiceShuffler::reconstruct(&choices, &shown.token).unwrap();
//! assert_eq!(again, shown.choices);
//! ```

#![warn(missing_docs)]

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use waypoint_catalog::Choice;
use waypoint_ident::ItemToken;

/// Result of a first presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Choices in shuffled order
    pub choices: Vec<Choice>,
    /// Token capturing that order
    pub token: ItemToken,
}

/// Choice shuffler
#[derive(Debug, Clone, Copy, Default)]
pub struct ChoiceShuffler;

impl ChoiceShuffler {
    /// Shuffle `canonical` once and capture the permutation
    ///
    /// Call exactly once per first presentation; inject a seeded RNG for
    /// reproducible tests.
    #[must_use]
    pub fn present<R: Rng + ?Sized>(canonical: &[Choice], rng: &mut R) -> Presentation {
        let mut choices = canonical.to_vec();
        choices.shuffle(rng);
        let token = ItemToken::new(choices.iter().map(|c| c.id.clone()).collect());
        tracing::debug!(order = ?token.choice_ids, "shuffled choices");
        Presentation { choices, token }
    }

    /// Restore the permutation captured in `token`
    ///
    /// # Errors
    /// Returns [`ShuffleError::MalformedChoicePayload`] unless the token is a
    /// permutation of exactly the canonical choice ids, or if two canonical
    /// choices share an id
    pub fn reconstruct(canonical: &[Choice], token: &ItemToken) -> Result<Vec<Choice>, ShuffleError> {
        let mut by_id: HashMap<&str, &Choice> = HashMap::with_capacity(canonical.len());
        for choice in canonical {
            if by_id.insert(choice.id.as_str(), choice).is_some() {
                return Err(ShuffleError::malformed(ChoiceDefect::Duplicate(choice.id.clone())));
            }
        }
        let mut used: HashSet<&str> = HashSet::with_capacity(token.choice_ids.len());
        let mut ordered = Vec::with_capacity(token.choice_ids.len());

        for id in &token.choice_ids {
            let choice = by_id
                .get(id.as_str())
                .ok_or_else(|| ShuffleError::malformed(ChoiceDefect::Unknown(id.clone())))?;
            if !used.insert(id.as_str()) {
                return Err(ShuffleError::malformed(ChoiceDefect::Duplicate(id.clone())));
            }
            ordered.push((*choice).clone());
        }

        if let Some(missing) = canonical.iter().find(|c| !used.contains(c.id.as_str())) {
            return Err(ShuffleError::malformed(ChoiceDefect::Missing(missing.id.clone())));
        }

        Ok(ordered)
    }
}

/// What is wrong with a choice payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceDefect {
    /// Id not among the canonical choices
    Unknown(String),
    /// Id listed more than once, in the payload or among the canonical choices
    Duplicate(String),
    /// Canonical id absent from the payload
    Missing(String),
}

impl std::fmt::Display for ChoiceDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(id) => write!(f, "unknown choice '{id}'"),
            Self::Duplicate(id) => write!(f, "duplicate choice '{id}'"),
            Self::Missing(id) => write!(f, "missing choice '{id}'"),
        }
    }
}

/// Shuffle errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShuffleError {
    /// Payload is not a permutation of the canonical choices
    #[error("malformed choice payload: {defect}")]
    MalformedChoicePayload {
        /// The first defect found
        defect: ChoiceDefect,
    },
}

impl ShuffleError {
    fn malformed(defect: ChoiceDefect) -> Self {
        Self::MalformedChoicePayload { defect }
    }
}
