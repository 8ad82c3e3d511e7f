//! Section snapshot
//!
//! A plain value implementation of [`SectionState`]: the questions an
//! attempt has materialized and the responses recorded against them.

use crate::collaborators::SectionState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use waypoint_ident::ResourceId;

/// A materialized question: which part presented which item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionQuestion {
    /// Part (canonical or synthetic) that produced the question
    pub part_id: ResourceId,
    /// Item shown
    pub item_id: ResourceId,
}

/// Recorded response to an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Graded outcome
    pub correct: bool,
    /// Choice submitted, if any
    pub choice_id: Option<String>,
    /// Objectives inferred as misunderstood
    pub confused_objectives: Vec<String>,
}

impl Response {
    /// Correct response
    #[inline]
    #[must_use]
    pub fn correct() -> Self {
        Self {
            correct: true,
            ..Self::default()
        }
    }

    /// Incorrect response with inferred confusion
    #[inline]
    #[must_use]
    pub fn incorrect(confused_objectives: Vec<String>) -> Self {
        Self {
            correct: false,
            choice_id: None,
            confused_objectives,
        }
    }

    /// Attach submitted choice
    #[inline]
    #[must_use]
    pub fn with_choice(mut self, choice_id: impl Into<String>) -> Self {
        self.choice_id = Some(choice_id.into());
        self
    }
}

/// In-memory section record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    questions: Vec<SectionQuestion>,
    responses: HashMap<ResourceId, Response>,
}

impl SectionSnapshot {
    /// Empty section
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a materialized question (builder form)
    #[inline]
    #[must_use]
    pub fn with_question(mut self, part_id: ResourceId, item_id: ResourceId) -> Self {
        self.push_question(part_id, item_id);
        self
    }

    /// Add a response (builder form)
    #[inline]
    #[must_use]
    pub fn with_response(mut self, item_id: ResourceId, response: Response) -> Self {
        self.record_response(item_id, response);
        self
    }

    /// Add a materialized question; a part already present is left as is
    pub fn push_question(&mut self, part_id: ResourceId, item_id: ResourceId) {
        if self.questions.iter().any(|q| q.part_id == part_id) {
            return;
        }
        self.questions.push(SectionQuestion { part_id, item_id });
    }

    /// Record or replace the response to an item
    pub fn record_response(&mut self, item_id: ResourceId, response: Response) {
        self.responses.insert(item_id, response);
    }

    /// Materialized questions in order
    #[inline]
    #[must_use]
    pub fn questions(&self) -> &[SectionQuestion] {
        &self.questions
    }

    /// Response recorded for an item
    #[inline]
    #[must_use]
    pub fn response(&self, item_id: &ResourceId) -> Option<&Response> {
        self.responses.get(item_id)
    }

    /// Number of materialized questions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// True when nothing has been materialized
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl SectionState for SectionSnapshot {
    fn confused_objectives_for(&self, item_ref: &ResourceId) -> Vec<String> {
        self.responses
            .get(item_ref)
            .map(|r| r.confused_objectives.clone())
            .unwrap_or_default()
    }

    fn is_answered(&self, item_ref: &ResourceId) -> bool {
        self.responses.contains_key(item_ref)
    }

    fn is_correct(&self, item_ref: &ResourceId) -> bool {
        self.responses.get(item_ref).is_some_and(|r| r.correct)
    }

    fn known_child_parts(&self) -> Vec<(ResourceId, ResourceId)> {
        self.questions
            .iter()
            .map(|q| (q.part_id.clone(), q.item_id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(n: &str) -> ResourceId {
        ResourceId::canonical_part(n)
    }

    fn item(n: &str) -> ResourceId {
        ResourceId::canonical_item(n)
    }

    #[test]
    fn snapshot_known_parts_in_order() {
        let section = SectionSnapshot::new()
            .with_question(part("p1"), item("i1"))
            .with_question(part("p2"), item("i2"));

        let known = section.known_child_parts();
        assert_eq!(known.len(), 2);
        assert_eq!(known[0], (part("p1"), item("i1")));
        assert_eq!(known[1], (part("p2"), item("i2")));
    }

    #[test]
    fn snapshot_duplicate_part_keeps_first_item() {
        let section = SectionSnapshot::new()
            .with_question(part("p1"), item("i1"))
            .with_question(part("p1"), item("i9"));

        assert_eq!(section.len(), 1);
        assert_eq!(section.item_for_part(&part("p1")), Some(item("i1")));
    }

    #[test]
    fn snapshot_answer_state() {
        let section = SectionSnapshot::new()
            .with_question(part("p1"), item("i1"))
            .with_question(part("p2"), item("i2"))
            .with_response(item("i1"), Response::incorrect(vec!["lo-1".into()]));

        assert!(section.is_answered(&item("i1")));
        assert!(!section.is_correct(&item("i1")));
        assert_eq!(section.confused_objectives_for(&item("i1")), vec!["lo-1".to_string()]);

        assert!(!section.is_answered(&item("i2")));
        assert!(!section.is_correct(&item("i2")));
        assert!(section.confused_objectives_for(&item("i2")).is_empty());
    }

    #[test]
    fn snapshot_seen_items_and_known() {
        let section = SectionSnapshot::new()
            .with_question(part("p1"), item("i1"))
            .with_question(part("p2"), item("i2"));

        let seen = section.seen_items();
        assert!(seen.contains(&item("i1")));
        assert!(seen.contains(&item("i2")));
        assert!(section.is_known(&part("p2")));
        assert!(!section.is_known(&part("p3")));
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let section = SectionSnapshot::new()
            .with_question(part("p1"), item("i1"))
            .with_response(item("i1"), Response::correct().with_choice("c2"));

        let json = serde_json::to_string(&section).unwrap();
        let back: SectionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);
    }
}
