//! Lookup adapter
//!
//! Single dispatch point for every identifier. The authority decides the
//! kind of record: synthetic ids are decoded and rebuilt around their
//! canonical origin, canonical ids go straight to storage.
//!
//! Nothing resolved here is persisted. Two lookups of the same identifier
//! against the same section produce the same entity, except for the item
//! chosen for a part the section has not materialized yet.

use crate::config::EngineConfig;
use crate::error::{Result, WaypointError};
use crate::item::RandomizedItem;
use crate::part::ScaffoldPart;
use rand::Rng;
use std::sync::Arc;
use waypoint_branch::{BranchGenerator, BranchLimits, ItemSelector, SelectError};
use waypoint_catalog::{ItemCatalog, ItemRecord, PartRecord, PartStore, SectionState};
use waypoint_ident::{Codec, ItemToken, PartToken, ResourceId};
use waypoint_shuffle::ChoiceShuffler;

/// What an identifier resolved to
#[derive(Debug, Clone)]
pub enum ResolvedEntity {
    /// A stored part
    CanonicalPart(PartRecord),
    /// A synthetic part in a remediation tree
    ScaffoldPart(ScaffoldPart),
    /// A stored item
    CanonicalItem(ItemRecord),
    /// A stored item seen through a captured choice order
    RandomizedItem(RandomizedItem),
}

impl ResolvedEntity {
    /// Identifier the entity was resolved from
    #[must_use]
    pub fn id(&self) -> &ResourceId {
        match self {
            Self::CanonicalPart(record) => &record.id,
            Self::ScaffoldPart(part) => part.id(),
            Self::CanonicalItem(record) => &record.id,
            Self::RandomizedItem(item) => item.id(),
        }
    }

    /// Whether the entity was synthesized
    #[inline]
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::ScaffoldPart(_) | Self::RandomizedItem(_))
    }

    /// Borrow as a scaffold part
    #[inline]
    #[must_use]
    pub fn as_scaffold_part(&self) -> Option<&ScaffoldPart> {
        match self {
            Self::ScaffoldPart(part) => Some(part),
            _ => None,
        }
    }

    /// Convert into a scaffold part
    #[inline]
    #[must_use]
    pub fn into_scaffold_part(self) -> Option<ScaffoldPart> {
        match self {
            Self::ScaffoldPart(part) => Some(part),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    SyntheticPart,
    SyntheticItem,
    CanonicalPart,
    CanonicalItem,
}

/// Lookup session over a canonical store and an item catalog
///
/// Holds no per-attempt state; the section is passed into each call.
pub struct LookupSession<S, C> {
    store: Arc<S>,
    catalog: Arc<C>,
    config: EngineConfig,
    parts: Codec,
    items: Codec,
}

impl<S, C> std::fmt::Debug for LookupSession<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: PartStore, C: ItemCatalog> LookupSession<S, C> {
    /// Create session
    #[must_use]
    pub fn new(store: Arc<S>, catalog: Arc<C>, config: EngineConfig) -> Self {
        let parts = config.part_codec();
        let items = config.item_codec();
        Self {
            store,
            catalog,
            config,
            parts,
            items,
        }
    }

    /// Configuration in force
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Codec issuing synthetic part ids
    #[inline]
    #[must_use]
    pub fn part_codec(&self) -> &Codec {
        &self.parts
    }

    /// Codec issuing randomized item ids
    #[inline]
    #[must_use]
    pub fn item_codec(&self) -> &Codec {
        &self.items
    }

    /// Synthetic id of the root scaffold part over a canonical record
    ///
    /// # Errors
    /// Returns [`WaypointError::Codec`] if the token cannot be encoded
    pub fn root_id(&self, record: &PartRecord) -> Result<ResourceId> {
        let token = PartToken::root(
            record.settings.objective_ids.clone(),
            record.settings.waypoint_quota,
        );
        Ok(self
            .parts
            .encode(record.id.namespace(), record.id.identifier(), &token)?)
    }

    /// Resolve any identifier
    ///
    /// # Errors
    /// - [`WaypointError::Codec`] for a malformed synthetic id
    /// - [`WaypointError::Store`] when the origin record is missing
    /// - [`WaypointError::Shuffle`] for a corrupt choice payload
    /// - [`WaypointError::UnsupportedNamespace`] for a canonical id of an
    ///   unknown record kind
    pub async fn resolve(&self, id: &ResourceId, section: &dyn SectionState) -> Result<ResolvedEntity> {
        let target = self.target(id)?;
        tracing::debug!(%id, ?target, "dispatching lookup");

        Ok(match target {
            Target::SyntheticPart => ResolvedEntity::ScaffoldPart(self.resolve_part(id, section).await?),
            Target::SyntheticItem => ResolvedEntity::RandomizedItem(self.resolve_item(id).await?),
            Target::CanonicalPart => ResolvedEntity::CanonicalPart(self.store.get_part(id).await?),
            Target::CanonicalItem => ResolvedEntity::CanonicalItem(self.store.get_item(id).await?),
        })
    }

    /// Resolve a synthetic part id
    ///
    /// Picks the part's item lazily: the item the section pinned to this
    /// part, else the record's first fixed item for a part without
    /// objectives, else a selection from the catalog.
    ///
    /// # Errors
    /// - [`WaypointError::Codec`] if `id` is not a well-formed synthetic part id
    /// - [`WaypointError::Store`] if the origin record is missing or the
    ///   catalog query fails
    pub async fn resolve_part(&self, id: &ResourceId, section: &dyn SectionState) -> Result<ScaffoldPart> {
        let decoded = self.parts.decode::<PartToken>(id)?;
        let origin_ref = self.origin_ref(id, &decoded.origin);
        let record = self.store.get_part(&origin_ref).await?;

        let item = self.item_for(id, &decoded.token, &record, section).await?;
        let generator = BranchGenerator::new(self.parts.clone(), self.limits(&record));

        tracing::debug!(
            origin = %decoded.origin,
            depth = decoded.token.depth,
            sibling_index = decoded.token.sibling_index,
            has_item = item.is_some(),
            "resolved scaffold part"
        );
        Ok(ScaffoldPart::new(
            id.clone(),
            decoded.origin,
            decoded.token,
            record,
            item,
            generator,
        ))
    }

    /// Resolve a randomized item id
    ///
    /// # Errors
    /// - [`WaypointError::Codec`] if `id` is not a well-formed randomized item id
    /// - [`WaypointError::Store`] if the origin item is missing
    /// - [`WaypointError::Shuffle`] if the captured order does not match the item
    pub async fn resolve_item(&self, id: &ResourceId) -> Result<RandomizedItem> {
        let decoded = self.items.decode::<ItemToken>(id)?;
        let origin_ref = self.origin_ref(id, &decoded.origin);
        let record = self.store.get_item(&origin_ref).await?;

        let choices = ChoiceShuffler::reconstruct(&record.question.choices, &decoded.token)?;
        Ok(RandomizedItem::new(id.clone(), record, choices, decoded.token))
    }

    /// Resolve a list, skipping ids whose record is missing
    ///
    /// # Errors
    /// Any failure of [`Self::resolve`] other than a missing record
    pub async fn resolve_many(
        &self,
        ids: &[ResourceId],
        section: &dyn SectionState,
    ) -> Result<Vec<ResolvedEntity>> {
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            match self.resolve(id, section).await {
                Ok(entity) => resolved.push(entity),
                Err(e) if e.is_not_found() => {
                    tracing::debug!(%id, "skipping missing record");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(resolved)
    }

    /// Current children of `part`, resolved
    ///
    /// A part that does not branch has no children; that is never an error.
    ///
    /// # Errors
    /// Hard failures only: a child id that cannot be encoded or resolved
    pub async fn children(&self, part: &ScaffoldPart, section: &dyn SectionState) -> Result<Vec<ScaffoldPart>> {
        let ids = match part.child_ids(section) {
            Ok(ids) => ids,
            Err(e) if e.is_branch_end() => {
                tracing::debug!(part = %part.id(), reason = %e, "branch ends");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut children = Vec::with_capacity(ids.len());
        for id in &ids {
            children.push(self.resolve_part(id, section).await?);
        }
        Ok(children)
    }

    /// Delete a part
    ///
    /// A synthetic part deletes the canonical record it derives from.
    ///
    /// # Errors
    /// - [`WaypointError::NotAPart`] for an item id
    /// - [`WaypointError::Store`] if the record is missing
    pub async fn delete_part(&self, id: &ResourceId) -> Result<()> {
        let canonical = match self.target(id)? {
            Target::SyntheticPart => {
                let decoded = self.parts.decode::<PartToken>(id)?;
                self.origin_ref(id, &decoded.origin)
            }
            Target::CanonicalPart => id.clone(),
            Target::SyntheticItem | Target::CanonicalItem => {
                return Err(WaypointError::NotAPart(id.clone()));
            }
        };

        tracing::info!(%id, origin = %canonical, "deleting part");
        Ok(self.store.delete_part(&canonical).await?)
    }

    /// First presentation of an item with shuffled choices
    ///
    /// Shuffles once and returns the randomized id carrying the order. An id
    /// that is already randomized is resolved as-is, never reshuffled.
    ///
    /// # Errors
    /// - [`WaypointError::Store`] if the item is missing
    /// - [`WaypointError::Codec`] if the order cannot be encoded
    pub async fn present_item<R: Rng + ?Sized>(&self, item_id: &ResourceId, rng: &mut R) -> Result<RandomizedItem> {
        if self.items.is_synthetic(item_id) {
            return self.resolve_item(item_id).await;
        }

        let record = self.store.get_item(item_id).await?;
        let presentation = ChoiceShuffler::present(&record.question.choices, rng);
        let id = self
            .items
            .encode(item_id.namespace(), item_id.identifier(), &presentation.token)?;

        tracing::debug!(item = %item_id, "presenting item with shuffled choices");
        Ok(RandomizedItem::new(id, record, presentation.choices, presentation.token))
    }

    fn target(&self, id: &ResourceId) -> Result<Target> {
        if self.parts.is_synthetic(id) {
            Ok(Target::SyntheticPart)
        } else if self.items.is_synthetic(id) {
            Ok(Target::SyntheticItem)
        } else if id.namespace() == self.config.part_namespace {
            Ok(Target::CanonicalPart)
        } else if id.namespace() == self.config.item_namespace {
            Ok(Target::CanonicalItem)
        } else {
            Err(WaypointError::UnsupportedNamespace {
                namespace: id.namespace().to_string(),
                id: id.clone(),
            })
        }
    }

    fn origin_ref(&self, id: &ResourceId, origin: &str) -> ResourceId {
        ResourceId::new(id.namespace(), origin, self.config.canonical_authority.as_str())
    }

    fn limits(&self, record: &PartRecord) -> BranchLimits {
        let settings = &record.settings;
        BranchLimits {
            max_levels: settings.max_levels,
            max_waypoint_items: settings.max_waypoint_items,
            waypoint_quota: settings.waypoint_quota,
            unbounded_waypoint_items: self.config.unbounded_waypoint_items,
        }
    }

    async fn item_for(
        &self,
        id: &ResourceId,
        token: &PartToken,
        record: &PartRecord,
        section: &dyn SectionState,
    ) -> Result<Option<ResourceId>> {
        if let Some(pinned) = section.item_for_part(id) {
            return Ok(Some(pinned));
        }
        if !token.has_objectives() {
            return Ok(record.settings.item_ids.first().cloned());
        }

        let settings = &record.settings;
        let pool = self
            .catalog
            .query_items(&token.objective_refs, settings.item_bank_id.as_deref())
            .await?;
        let seen = section.seen_items();

        let selected = ItemSelector::new(settings.allow_repeat_items).select(
            &token.objective_refs,
            &seen,
            pool,
            &mut rand::thread_rng(),
        );
        match selected {
            Ok(item) => Ok(Some(item)),
            Err(SelectError::Exhausted { objectives }) => {
                tracing::info!(part = %id, ?objectives, "no item available for part");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_catalog::{Choice, InMemoryStore, Question, ScaffoldSettings, SectionSnapshot};
    use waypoint_ident::ITEM_NAMESPACE;

    fn session(store: &Arc<InMemoryStore>) -> LookupSession<InMemoryStore, InMemoryStore> {
        LookupSession::new(Arc::clone(store), Arc::clone(store), EngineConfig::default())
    }

    fn item(key: &str, objective: &str) -> ItemRecord {
        ItemRecord::new(
            ResourceId::canonical_item(key),
            Question::new(
                format!("question {key}"),
                vec![Choice::new("a", "A"), Choice::new("b", "B"), Choice::new("c", "C")],
            ),
        )
        .with_objectives(vec![objective.into()])
        .with_answer("a")
    }

    #[tokio::test]
    async fn canonical_ids_pass_through() {
        let store = Arc::new(InMemoryStore::new());
        let part_id = store.insert_part(ScaffoldSettings::default());
        let item_id = store.insert_item(item("i1", "lo"));
        let lookup = session(&store);
        let section = SectionSnapshot::new();

        let part = lookup.resolve(&part_id, &section).await.unwrap();
        assert!(matches!(part, ResolvedEntity::CanonicalPart(_)));
        assert!(!part.is_synthetic());

        let item = lookup.resolve(&item_id, &section).await.unwrap();
        assert!(matches!(item, ResolvedEntity::CanonicalItem(_)));
    }

    #[tokio::test]
    async fn unknown_namespace_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let lookup = session(&store);
        let id = ResourceId::new("grading.Grade", "g1", "waypoint.local");

        let err = lookup.resolve(&id, &SectionSnapshot::new()).await.unwrap_err();
        assert!(matches!(err, WaypointError::UnsupportedNamespace { .. }));
    }

    #[tokio::test]
    async fn answer_direct_root_uses_first_item() {
        let store = Arc::new(InMemoryStore::new());
        let fixed = store.insert_item(item("fixed", "lo"));
        let settings = ScaffoldSettings::builder()
            .item_ids(vec![fixed.clone()])
            .unwrap()
            .build();
        let part_id = store.insert_part(settings);
        let lookup = session(&store);

        let record = store.get_part(&part_id).await.unwrap();
        let root = lookup.root_id(&record).unwrap();
        let part = lookup.resolve_part(&root, &SectionSnapshot::new()).await.unwrap();

        assert_eq!(part.depth(), 0);
        assert_eq!(part.item(), Some(&fixed));
    }

    #[tokio::test]
    async fn section_pin_wins_over_selection() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_item(item("i1", "lo"));
        store.insert_item(item("i2", "lo"));
        let settings = ScaffoldSettings::builder()
            .objective_ids(vec!["lo".into()])
            .unwrap()
            .build();
        let part_id = store.insert_part(settings);
        let lookup = session(&store);

        let record = store.get_part(&part_id).await.unwrap();
        let root = lookup.root_id(&record).unwrap();
        let pinned = ResourceId::canonical_item("i2");
        let section = SectionSnapshot::new().with_question(root.clone(), pinned.clone());

        for _ in 0..8 {
            let part = lookup.resolve_part(&root, &section).await.unwrap();
            assert_eq!(part.item(), Some(&pinned));
        }
    }

    #[tokio::test]
    async fn present_then_resolve_keeps_order() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let store = Arc::new(InMemoryStore::new());
        let item_id = store.insert_item(item("i1", "lo"));
        let lookup = session(&store);

        let shown = lookup
            .present_item(&item_id, &mut StdRng::seed_from_u64(17))
            .await
            .unwrap();
        assert_eq!(shown.id().namespace(), ITEM_NAMESPACE);
        assert!(lookup.item_codec().is_synthetic(shown.id()));

        let again = lookup.resolve(shown.id(), &SectionSnapshot::new()).await.unwrap();
        let ResolvedEntity::RandomizedItem(again) = again else {
            panic!("expected randomized item");
        };
        assert_eq!(again.id(), shown.id());
        assert_eq!(again.choices(), shown.choices());

        let repeat = lookup
            .present_item(shown.id(), &mut StdRng::seed_from_u64(99))
            .await
            .unwrap();
        assert_eq!(repeat.choices(), shown.choices());
    }

    #[tokio::test]
    async fn delete_synthetic_part_deletes_origin() {
        let store = Arc::new(InMemoryStore::new());
        let part_id = store.insert_part(ScaffoldSettings::default());
        let lookup = session(&store);

        let record = store.get_part(&part_id).await.unwrap();
        let root = lookup.root_id(&record).unwrap();
        lookup.delete_part(&root).await.unwrap();

        assert_eq!(store.part_count(), 0);
        let err = lookup.resolve(&root, &SectionSnapshot::new()).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.is_hard_failure());
    }

    #[tokio::test]
    async fn delete_item_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let item_id = store.insert_item(item("i1", "lo"));
        let lookup = session(&store);

        let err = lookup.delete_part(&item_id).await.unwrap_err();
        assert!(matches!(err, WaypointError::NotAPart(_)));
        assert_eq!(store.item_count(), 1);
    }
}
