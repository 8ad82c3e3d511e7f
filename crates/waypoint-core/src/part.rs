//! Decoded scaffold parts
//!
//! A [`ScaffoldPart`] is rebuilt from its identifier on every lookup. It
//! carries the origin record's settings and the item resolved for it; all
//! answer state is read from the section passed into each call.

use crate::error::{Result, WaypointError};
use waypoint_branch::{BranchGenerator, BranchLimits, PartState, PartView};
use waypoint_catalog::{PartRecord, ScaffoldSettings, SectionState};
use waypoint_ident::{PartToken, ResourceId};

/// A synthetic part in a remediation tree
#[derive(Debug, Clone)]
pub struct ScaffoldPart {
    id: ResourceId,
    origin: String,
    token: PartToken,
    record: PartRecord,
    item: Option<ResourceId>,
    generator: BranchGenerator,
}

impl ScaffoldPart {
    pub(crate) fn new(
        id: ResourceId,
        origin: String,
        token: PartToken,
        record: PartRecord,
        item: Option<ResourceId>,
        generator: BranchGenerator,
    ) -> Self {
        Self {
            id,
            origin,
            token,
            record,
            item,
            generator,
        }
    }

    /// Synthetic identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Identifier part of the canonical origin
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Canonical origin record
    #[inline]
    #[must_use]
    pub fn record(&self) -> &PartRecord {
        &self.record
    }

    /// Settings of the origin record
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ScaffoldSettings {
        &self.record.settings
    }

    /// Decoded token
    #[inline]
    #[must_use]
    pub fn token(&self) -> &PartToken {
        &self.token
    }

    /// Depth in the tree; roots are 0
    #[inline]
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.token.depth
    }

    /// Objectives this part assesses
    #[inline]
    #[must_use]
    pub fn objective_refs(&self) -> &[String] {
        &self.token.objective_refs
    }

    /// Position among siblings
    #[inline]
    #[must_use]
    pub fn sibling_index(&self) -> u32 {
        self.token.sibling_index
    }

    /// Identifier of the parent part, absent on roots
    #[inline]
    #[must_use]
    pub fn parent_ref(&self) -> Option<&str> {
        self.token.parent_ref.as_deref()
    }

    /// Quota in force: the token's, else the origin's
    #[inline]
    #[must_use]
    pub fn waypoint_quota(&self) -> Option<u32> {
        self.token
            .waypoint_quota
            .or(self.generator.limits().waypoint_quota)
    }

    /// Branching limits in force
    #[inline]
    #[must_use]
    pub fn limits(&self) -> &BranchLimits {
        self.generator.limits()
    }

    /// Resolved item, if any
    #[inline]
    #[must_use]
    pub fn item(&self) -> Option<&ResourceId> {
        self.item.as_ref()
    }

    /// Whether an item was resolved
    #[inline]
    #[must_use]
    pub fn has_item(&self) -> bool {
        self.item.is_some()
    }

    /// The single item of this part
    ///
    /// # Errors
    /// Returns [`WaypointError::NoItem`] if none was resolved
    pub fn item_ids(&self) -> Result<Vec<ResourceId>> {
        self.item
            .clone()
            .map(|item| vec![item])
            .ok_or_else(|| WaypointError::NoItem(self.id.clone()))
    }

    /// Borrowed view for state derivation
    #[inline]
    #[must_use]
    pub fn view(&self) -> PartView<'_> {
        PartView {
            id: &self.id,
            origin: &self.origin,
            token: &self.token,
            item: self.item.as_ref(),
        }
    }

    /// Current answer state
    #[must_use]
    pub fn state(&self, section: &dyn SectionState) -> PartState {
        PartState::classify(&self.view(), section)
    }

    /// Whether the part currently branches
    #[must_use]
    pub fn has_children(&self, section: &dyn SectionState) -> bool {
        self.generator.has_children(&self.view(), section)
    }

    /// Child identifiers in sibling order
    ///
    /// # Errors
    /// Returns a branch-end [`WaypointError::Branch`] when the part does not
    /// branch, or [`WaypointError::Branch`] wrapping a codec failure
    pub fn child_ids(&self, section: &dyn SectionState) -> Result<Vec<ResourceId>> {
        Ok(self.generator.generate_children(&self.view(), section)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_catalog::{Response, SectionSnapshot};
    use waypoint_ident::{Codec, PART_NAMESPACE};

    fn part(quota_in_token: Option<u32>, item: Option<ResourceId>) -> ScaffoldPart {
        let origin = ResourceId::canonical_part("origin");
        let settings = ScaffoldSettings::builder()
            .max_levels(Some(2))
            .waypoint_quota(Some(3))
            .build();
        let token = PartToken::root(vec!["lo".into()], quota_in_token);
        let id = Codec::parts().encode(PART_NAMESPACE, "origin", &token).unwrap();
        let limits = BranchLimits {
            max_levels: settings.max_levels,
            max_waypoint_items: settings.max_waypoint_items,
            waypoint_quota: settings.waypoint_quota,
            ..BranchLimits::default()
        };
        ScaffoldPart::new(
            id,
            "origin".into(),
            token,
            PartRecord::new(origin, settings),
            item,
            BranchGenerator::new(Codec::parts(), limits),
        )
    }

    #[test]
    fn quota_prefers_token() {
        assert_eq!(part(Some(1), None).waypoint_quota(), Some(1));
        assert_eq!(part(None, None).waypoint_quota(), Some(3));
    }

    #[test]
    fn item_ids_requires_item() {
        let without = part(None, None);
        assert!(!without.has_item());
        assert!(matches!(without.item_ids(), Err(WaypointError::NoItem(_))));

        let item = ResourceId::canonical_item("i");
        let with = part(None, Some(item.clone()));
        assert_eq!(with.item_ids().unwrap(), vec![item]);
    }

    #[test]
    fn child_ids_branch_end_when_not_answered() {
        let p = part(None, Some(ResourceId::canonical_item("i")));
        let err = p.child_ids(&SectionSnapshot::new()).unwrap_err();
        assert!(err.is_branch_end());
    }

    #[test]
    fn child_ids_when_confused() {
        let item = ResourceId::canonical_item("i");
        let p = part(None, Some(item.clone()));
        let section = SectionSnapshot::new()
            .with_question(p.id().clone(), item.clone())
            .with_response(item, Response::incorrect(vec!["lo-2".into()]));

        assert_eq!(p.state(&section), PartState::AnsweredIncorrectWithConfusion);
        assert!(p.has_children(&section));
        let children = p.child_ids(&section).unwrap();
        assert_eq!(children.len(), 1);
    }
}
