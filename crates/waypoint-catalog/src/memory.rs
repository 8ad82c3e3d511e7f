//! In-memory store
//!
//! Concurrent [`PartStore`] + [`ItemCatalog`] backed by `DashMap`. Used by
//! tests and the inspect tool.

use crate::collaborators::{ItemCatalog, PartStore};
use crate::error::StoreError;
use crate::records::{ItemRecord, PartRecord, ScaffoldSettings};
use async_trait::async_trait;
use dashmap::DashMap;
use ulid::Ulid;
use waypoint_ident::ResourceId;

/// In-memory canonical store and item catalog
#[derive(Debug, Default)]
pub struct InMemoryStore {
    parts: DashMap<String, PartRecord>,
    items: DashMap<String, ItemRecord>,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh record key
    #[inline]
    #[must_use]
    pub fn mint_key() -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Store a new part and return its canonical id
    pub fn insert_part(&self, settings: ScaffoldSettings) -> ResourceId {
        let id = ResourceId::canonical_part(Self::mint_key());
        self.parts
            .insert(id.identifier().to_string(), PartRecord::new(id.clone(), settings));
        id
    }

    /// Store an item under its own id, replacing any previous one
    pub fn insert_item(&self, record: ItemRecord) -> ResourceId {
        let id = record.id.clone();
        self.items.insert(id.identifier().to_string(), record);
        id
    }

    /// Stored part, read synchronously
    #[must_use]
    pub fn part(&self, id: &ResourceId) -> Option<PartRecord> {
        self.parts.get(id.identifier()).map(|entry| entry.value().clone())
    }

    /// Number of stored parts
    #[inline]
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Number of stored items
    #[inline]
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl PartStore for InMemoryStore {
    async fn get_part(&self, id: &ResourceId) -> Result<PartRecord, StoreError> {
        self.part(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn delete_part(&self, id: &ResourceId) -> Result<(), StoreError> {
        if self.parts.remove(id.identifier()).is_none() {
            return Err(StoreError::NotFound(id.clone()));
        }
        tracing::debug!(part = %id, "deleted part");
        Ok(())
    }

    async fn get_item(&self, id: &ResourceId) -> Result<ItemRecord, StoreError> {
        self.items
            .get(id.identifier())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

#[async_trait]
impl ItemCatalog for InMemoryStore {
    async fn query_items(
        &self,
        objective_refs: &[String],
        bank_scope: Option<&str>,
    ) -> Result<Vec<ResourceId>, StoreError> {
        let mut pool: Vec<ResourceId> = self
            .items
            .iter()
            .filter(|entry| {
                let item = entry.value();
                let in_bank = bank_scope.map_or(true, |bank| item.bank_id.as_deref() == Some(bank));
                in_bank && item.matches_all(objective_refs)
            })
            .map(|entry| entry.value().id.clone())
            .collect();

        // map iteration order is arbitrary
        pool.sort();
        Ok(pool)
    }

    async fn is_response_correct(
        &self,
        item_ref: &ResourceId,
        choice_id: &str,
    ) -> Result<bool, StoreError> {
        let item = self.get_item(item_ref).await?;
        Ok(item.answer_id.as_deref() == Some(choice_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Choice, Question};

    fn item(key: &str, objectives: &[&str]) -> ItemRecord {
        ItemRecord::new(
            ResourceId::canonical_item(key),
            Question::new("q", vec![Choice::new("c1", "a"), Choice::new("c2", "b")]),
        )
        .with_objectives(objectives.iter().map(|s| (*s).to_string()).collect())
        .with_answer("c2")
    }

    #[tokio::test]
    async fn store_part_roundtrip_and_delete() {
        let store = InMemoryStore::new();
        let id = store.insert_part(ScaffoldSettings::default());

        let part = store.get_part(&id).await.unwrap();
        assert_eq!(part.id, id);

        store.delete_part(&id).await.unwrap();
        let err = store.get_part(&id).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(store.delete_part(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn store_missing_item_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .get_item(&ResourceId::canonical_item("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn catalog_filters_by_all_objectives() {
        let store = InMemoryStore::new();
        store.insert_item(item("i1", &["lo-a"]));
        store.insert_item(item("i2", &["lo-a", "lo-b"]));
        store.insert_item(item("i3", &["lo-b"]));

        let pool = store.query_items(&["lo-a".into()], None).await.unwrap();
        assert_eq!(
            pool,
            vec![ResourceId::canonical_item("i1"), ResourceId::canonical_item("i2")]
        );

        let pool = store
            .query_items(&["lo-a".into(), "lo-b".into()], None)
            .await
            .unwrap();
        assert_eq!(pool, vec![ResourceId::canonical_item("i2")]);
    }

    #[tokio::test]
    async fn catalog_bank_scope() {
        let store = InMemoryStore::new();
        store.insert_item(item("i1", &["lo"]).in_bank("bank-1"));
        store.insert_item(item("i2", &["lo"]).in_bank("bank-2"));

        let pool = store.query_items(&["lo".into()], Some("bank-2")).await.unwrap();
        assert_eq!(pool, vec![ResourceId::canonical_item("i2")]);

        let federated = store.query_items(&["lo".into()], None).await.unwrap();
        assert_eq!(federated.len(), 2);
    }

    #[tokio::test]
    async fn catalog_grades_responses() {
        let store = InMemoryStore::new();
        let id = store.insert_item(item("i1", &["lo"]));

        assert!(store.is_response_correct(&id, "c2").await.unwrap());
        assert!(!store.is_response_correct(&id, "c1").await.unwrap());
    }

    #[test]
    fn minted_keys_are_unique() {
        assert_ne!(InMemoryStore::mint_key(), InMemoryStore::mint_key());
    }
}
