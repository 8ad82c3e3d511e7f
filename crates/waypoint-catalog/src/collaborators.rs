//! Collaborator interfaces
//!
//! The branching engine never persists anything. It reads through these
//! three seams:
//! - [`PartStore`]: canonical parts and items
//! - [`ItemCatalog`]: objective-linked item queries and answer keys
//! - [`SectionState`]: live response record of one attempt

use crate::error::StoreError;
use crate::records::{ItemRecord, PartRecord};
use async_trait::async_trait;
use std::collections::HashSet;
use waypoint_ident::ResourceId;

/// Canonical storage of parts and items
#[async_trait]
pub trait PartStore: Send + Sync {
    /// Fetch a canonical part
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no part has this id
    async fn get_part(&self, id: &ResourceId) -> Result<PartRecord, StoreError>;

    /// Delete a canonical part
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no part has this id
    async fn delete_part(&self, id: &ResourceId) -> Result<(), StoreError>;

    /// Fetch a canonical item
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no item has this id
    async fn get_item(&self, id: &ResourceId) -> Result<ItemRecord, StoreError>;
}

/// Item catalog queries
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Items linked to all of `objective_refs`, optionally within one bank
    ///
    /// # Errors
    /// Backend failures only; an empty pool is `Ok(vec![])`
    async fn query_items(
        &self,
        objective_refs: &[String],
        bank_scope: Option<&str>,
    ) -> Result<Vec<ResourceId>, StoreError>;

    /// Grade a response to an item
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if the item is unknown
    async fn is_response_correct(
        &self,
        item_ref: &ResourceId,
        choice_id: &str,
    ) -> Result<bool, StoreError>;
}

/// Read snapshot of one attempt's section
///
/// Owned and serialized elsewhere. Implementations must not assume two
/// calls observe the same snapshot.
pub trait SectionState: Send + Sync {
    /// Objectives the learner appears to have confused on this item, in order
    fn confused_objectives_for(&self, item_ref: &ResourceId) -> Vec<String>;

    /// Whether the item has a response
    fn is_answered(&self, item_ref: &ResourceId) -> bool;

    /// Whether the item's response is correct
    fn is_correct(&self, item_ref: &ResourceId) -> bool;

    /// Materialized `(part, item)` pairs in presentation order
    fn known_child_parts(&self) -> Vec<(ResourceId, ResourceId)>;

    /// Item pinned to a part, if the part has been materialized
    fn item_for_part(&self, part_ref: &ResourceId) -> Option<ResourceId> {
        self.known_child_parts()
            .into_iter()
            .find(|(part, _)| part == part_ref)
            .map(|(_, item)| item)
    }

    /// Whether the part has been materialized
    fn is_known(&self, part_ref: &ResourceId) -> bool {
        self.item_for_part(part_ref).is_some()
    }

    /// Every item already presented in the section
    fn seen_items(&self) -> HashSet<ResourceId> {
        self.known_child_parts()
            .into_iter()
            .map(|(_, item)| item)
            .collect()
    }
}
