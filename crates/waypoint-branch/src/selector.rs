//! Item selection
//!
//! Picks an unseen item linked to a part's objectives. The pool is shuffled
//! first so students do not all get the same first candidate. This shuffle
//! does not need to be reproducible: once an item is shown, the section
//! pins it to the part.

use crate::error::SelectError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use waypoint_ident::ResourceId;

/// Item selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSelector {
    allow_repeats: bool,
}

impl Default for ItemSelector {
    fn default() -> Self {
        Self {
            allow_repeats: true,
        }
    }
}

impl ItemSelector {
    /// Create selector
    #[inline]
    #[must_use]
    pub fn new(allow_repeats: bool) -> Self {
        Self { allow_repeats }
    }

    /// Whether a seen item may be returned when nothing unseen is left
    #[inline]
    #[must_use]
    pub fn allow_repeats(&self) -> bool {
        self.allow_repeats
    }

    /// Select one item from `candidate_pool`
    ///
    /// `candidate_pool` must already be filtered to items linked to all of
    /// `objective_refs`.
    ///
    /// # Errors
    /// Returns [`SelectError::Exhausted`] when the pool is empty, or when
    /// every candidate has been seen and repeats are not allowed
    pub fn select<R: Rng + ?Sized>(
        &self,
        objective_refs: &[String],
        seen: &HashSet<ResourceId>,
        mut candidate_pool: Vec<ResourceId>,
        rng: &mut R,
    ) -> Result<ResourceId, SelectError> {
        candidate_pool.shuffle(rng);

        if let Some(unseen) = candidate_pool.iter().find(|item| !seen.contains(*item)) {
            tracing::debug!(item = %unseen, pool = candidate_pool.len(), "selected unseen item");
            return Ok(unseen.clone());
        }

        match candidate_pool.into_iter().next() {
            Some(repeat) if self.allow_repeats => {
                tracing::debug!(item = %repeat, "all candidates seen, repeating");
                Ok(repeat)
            }
            _ => {
                tracing::info!(objectives = ?objective_refs, "item pool exhausted");
                Err(SelectError::Exhausted {
                    objectives: objective_refs.to_vec(),
                })
            }
        }
    }
}
