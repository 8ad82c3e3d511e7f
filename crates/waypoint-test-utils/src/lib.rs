//! Testing utilities for the waypoint workspace
//!
//! Shared fixtures: a seeded in-memory store, a lookup session over it, and
//! helpers that show and answer scaffold parts in a section.

#![allow(missing_docs)]

use std::sync::Arc;
use waypoint_catalog::{
    Choice, ItemCatalog, ItemRecord, Question, Response, ScaffoldSettings,
    SectionSnapshot,
};
use waypoint_core::{EngineConfig, LookupSession, ScaffoldPart};
use waypoint_ident::ResourceId;

pub type MemorySession = LookupSession<InMemoryStore, InMemoryStore>;

pub use waypoint_catalog::InMemoryStore;

/// Correct choice of every fixture item
pub const CORRECT_CHOICE: &str = "a";

/// Incorrect choice of every fixture item
pub const WRONG_CHOICE: &str = "b";

pub fn item_record(key: &str, objective: &str) -> ItemRecord {
    ItemRecord::new(
        ResourceId::canonical_item(key),
        Question::new(
            format!("Question {key}"),
            vec![
                Choice::new(CORRECT_CHOICE, "right"),
                Choice::new(WRONG_CHOICE, "wrong"),
                Choice::new("c", "also wrong"),
                Choice::new("d", "still wrong"),
            ],
        ),
    )
    .with_objectives(vec![objective.to_string()])
    .with_answer(CORRECT_CHOICE)
}

/// Insert `count` items linked to `objective`, keyed `<objective>-item-<n>`
pub fn seed_items(store: &InMemoryStore, objective: &str, count: usize) -> Vec<ResourceId> {
    (0..count)
        .map(|n| store.insert_item(item_record(&format!("{objective}-item-{n}"), objective)))
        .collect()
}

pub fn setup_session(store: &Arc<InMemoryStore>) -> MemorySession {
    LookupSession::new(Arc::clone(store), Arc::clone(store), EngineConfig::new())
}

/// Store, session and one scaffold part with its root id
pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub session: MemorySession,
    pub part_id: ResourceId,
    pub root_id: ResourceId,
}

impl Fixture {
    /// Objective of the part built by [`Self::new`]
    pub const ROOT_OBJECTIVE: &'static str = "lo-root";

    /// Part selecting by [`Self::ROOT_OBJECTIVE`] with the given limits
    pub fn new(max_levels: Option<u32>, max_waypoint_items: Option<u32>, waypoint_quota: Option<u32>) -> Self {
        let settings = ScaffoldSettings::builder()
            .objective_ids(vec![Self::ROOT_OBJECTIVE.to_string()])
            .unwrap()
            .max_levels(max_levels)
            .max_waypoint_items(max_waypoint_items)
            .waypoint_quota(waypoint_quota)
            .build();
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: ScaffoldSettings) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let session = setup_session(&store);
        let part_id = store.insert_part(settings);
        let record = store.part(&part_id).unwrap();
        let root_id = session.root_id(&record).unwrap();
        Self {
            store,
            session,
            part_id,
            root_id,
        }
    }

    pub async fn root(&self, section: &SectionSnapshot) -> ScaffoldPart {
        self.session.resolve_part(&self.root_id, section).await.unwrap()
    }

    pub async fn children(&self, part: &ScaffoldPart, section: &SectionSnapshot) -> Vec<ScaffoldPart> {
        self.session.children(part, section).await.unwrap()
    }

    /// Show `part`, then answer it with `choice_id` graded by the catalog
    ///
    /// An incorrect answer records `confused` as the inferred confusion.
    pub async fn answer(
        &self,
        section: &mut SectionSnapshot,
        part: &ScaffoldPart,
        choice_id: &str,
        confused: &[&str],
    ) -> bool {
        let item = show(section, part);
        let correct = self.store.is_response_correct(&item, choice_id).await.unwrap();
        let response = if correct {
            Response::correct()
        } else {
            Response::incorrect(confused.iter().map(|o| (*o).to_string()).collect())
        };
        section.record_response(item, response.with_choice(choice_id));
        correct
    }

    pub async fn answer_correct(&self, section: &mut SectionSnapshot, part: &ScaffoldPart) {
        assert!(self.answer(section, part, CORRECT_CHOICE, &[]).await);
    }

    pub async fn answer_incorrect(&self, section: &mut SectionSnapshot, part: &ScaffoldPart, confused: &[&str]) {
        assert!(!self.answer(section, part, WRONG_CHOICE, confused).await);
    }
}

/// Materialize `part` in the section and return its item
pub fn show(section: &mut SectionSnapshot, part: &ScaffoldPart) -> ResourceId {
    let item = part.item().cloned().unwrap();
    section.push_question(part.id().clone(), item.clone());
    item
}
