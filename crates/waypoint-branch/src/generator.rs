//! Waypoint child generation
//!
//! Given a synthetic part and a section snapshot, decides whether the part
//! branches and, if so, which child identifiers exist right now.
//!
//! # Throttle
//!
//! Children are produced in sibling order and generation stops:
//! - right after the first sibling the section has not materialized yet, so
//!   unseen siblings are never generated ahead of time;
//! - right after a known sibling once the correct answers among known
//!   siblings reach the quota, or once one known sibling is unanswered.
//!
//! At most one unanswered waypoint is outstanding per branch.

use crate::error::BranchError;
use crate::state::{PartState, PartView};
use std::collections::HashMap;
use waypoint_catalog::SectionState;
use waypoint_ident::{Codec, CodecError, ResourceId};

/// Sibling count used when a part sets no `max_waypoint_items`
pub const UNBOUNDED_WAYPOINT_ITEMS: u32 = 99;

/// Branching limits of one scaffold part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchLimits {
    /// Depth at which branching stops; `None` is unbounded
    pub max_levels: Option<u32>,
    /// Siblings per branch; `None` uses `unbounded_waypoint_items`
    pub max_waypoint_items: Option<u32>,
    /// Quota used when the token carries none
    pub waypoint_quota: Option<u32>,
    /// Sentinel sibling count
    pub unbounded_waypoint_items: u32,
}

impl Default for BranchLimits {
    fn default() -> Self {
        Self {
            max_levels: None,
            max_waypoint_items: Some(1),
            waypoint_quota: None,
            unbounded_waypoint_items: UNBOUNDED_WAYPOINT_ITEMS,
        }
    }
}

impl BranchLimits {
    /// Number of sibling indices to consider
    #[inline]
    #[must_use]
    pub fn sibling_limit(&self) -> u32 {
        self.max_waypoint_items
            .unwrap_or(self.unbounded_waypoint_items)
    }

    /// Whether `depth` is at or past the depth limit
    #[inline]
    #[must_use]
    pub fn depth_exhausted(&self, depth: u32) -> bool {
        self.max_levels.is_some_and(|max| depth >= max)
    }
}

/// Child generator for one scaffold part's settings
#[derive(Debug, Clone)]
pub struct BranchGenerator {
    codec: Codec,
    limits: BranchLimits,
}

impl BranchGenerator {
    /// Create generator
    #[inline]
    #[must_use]
    pub fn new(codec: Codec, limits: BranchLimits) -> Self {
        Self { codec, limits }
    }

    /// Limits in force
    #[inline]
    #[must_use]
    pub fn limits(&self) -> &BranchLimits {
        &self.limits
    }

    /// Whether the part currently has children
    ///
    /// False past the depth limit, and in every state except an incorrect
    /// answer with an inferred confusion.
    #[must_use]
    pub fn has_children(&self, part: &PartView<'_>, section: &dyn SectionState) -> bool {
        if self.limits.depth_exhausted(part.token.depth) {
            tracing::debug!(depth = part.token.depth, "depth limit reached");
            return false;
        }
        PartState::classify(part, section).branches()
    }

    /// Child identifiers in ascending sibling order
    ///
    /// # Errors
    /// - [`BranchError::NoChildrenAvailable`] if [`Self::has_children`] is false
    /// - [`BranchError::NoRemediationObjective`] if no confused objective is left
    /// - [`BranchError::Codec`] if a child identifier cannot be encoded, or
    ///   the part's depth has no successor
    pub fn generate_children(
        &self,
        part: &PartView<'_>,
        section: &dyn SectionState,
    ) -> Result<Vec<ResourceId>, BranchError> {
        if !self.has_children(part, section) {
            return Err(BranchError::NoChildrenAvailable);
        }
        let item = part.item.ok_or(BranchError::NoChildrenAvailable)?;

        // first confused objective only; multi-objective branching is not supported
        let objective = section
            .confused_objectives_for(item)
            .into_iter()
            .find(|o| !o.is_empty())
            .ok_or_else(|| BranchError::NoRemediationObjective {
                item: item.to_string(),
            })?;

        let quota = part.token.waypoint_quota.or(self.limits.waypoint_quota);
        let parent_ref = part.id.to_string();

        let mut known: HashMap<ResourceId, ResourceId> = HashMap::new();
        for (child, child_item) in section.known_child_parts() {
            known.entry(child).or_insert(child_item);
        }

        let mut children = Vec::new();
        let mut correct = 0u32;
        let mut unanswered = 0u32;

        for sibling_index in 0..self.limits.sibling_limit() {
            let mut token = part
                .token
                .child(parent_ref.as_str(), objective.as_str(), sibling_index)
                .ok_or_else(|| CodecError::malformed(parent_ref.as_str(), "depth out of range"))?;
            token.waypoint_quota = quota;
            let child = self.codec.encode(part.id.namespace(), part.origin, &token)?;
            let child_item = known.get(&child).cloned();
            children.push(child);

            let Some(child_item) = child_item else {
                tracing::debug!(sibling_index, "stopping after first unmaterialized sibling");
                break;
            };

            if !section.is_answered(&child_item) {
                unanswered += 1;
            } else if section.is_correct(&child_item) {
                correct += 1;
            }

            let quota_met = quota.is_some_and(|q| correct >= q);
            if quota_met || unanswered == 1 {
                tracing::debug!(sibling_index, correct, quota_met, "stopping at known sibling");
                break;
            }
        }

        tracing::debug!(
            depth = part.token.depth.saturating_add(1),
            objective = %objective,
            count = children.len(),
            "generated waypoint children"
        );
        Ok(children)
    }
}
