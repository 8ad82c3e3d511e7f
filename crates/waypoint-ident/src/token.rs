//! Token payloads carried inside synthetic identifiers
//!
//! - [`PartToken`]: lineage and branching state of a synthetic scaffold part
//! - [`ItemToken`]: the fixed choice permutation of a randomized item

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A payload that can be embedded in a synthetic identifier
pub trait Token: Serialize + DeserializeOwned {
    /// Short name used in diagnostics
    const KIND: &'static str;
}

/// Decoded state of a synthetic scaffold part
///
/// Field names are the wire keys. Absent optional fields decode to their
/// defaults: `depth` 0, `sibling_index` 0, no parent, no quota.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartToken {
    /// Recursion level, 0 at the root scaffold part
    #[serde(default)]
    pub depth: u32,

    /// Learning objectives this part targets; empty when answer-direct
    #[serde(default)]
    pub objective_refs: Vec<String>,

    /// Position among siblings generated by the same parent
    #[serde(default)]
    pub sibling_index: u32,

    /// Identifier of the part that generated this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<String>,

    /// Correct child answers required before the subtree is satisfied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoint_quota: Option<u32>,
}

impl Token for PartToken {
    const KIND: &'static str = "part";
}

impl PartToken {
    /// Root scaffold token (depth 0, no parent)
    #[inline]
    #[must_use]
    pub fn root(objective_refs: Vec<String>, waypoint_quota: Option<u32>) -> Self {
        Self {
            depth: 0,
            objective_refs,
            sibling_index: 0,
            parent_ref: None,
            waypoint_quota,
        }
    }

    /// Token for the child at `sibling_index`, one level deeper
    ///
    /// `None` when `depth` is already `u32::MAX`.
    #[must_use]
    pub fn child(&self, parent_ref: impl Into<String>, objective: impl Into<String>, sibling_index: u32) -> Option<Self> {
        Some(Self {
            depth: self.depth.checked_add(1)?,
            objective_refs: vec![objective.into()],
            sibling_index,
            parent_ref: Some(parent_ref.into()),
            waypoint_quota: self.waypoint_quota,
        })
    }

    /// True when the part selects its item by objective
    #[inline]
    #[must_use]
    pub fn has_objectives(&self) -> bool {
        self.objective_refs.iter().any(|o| !o.is_empty())
    }

    /// True at depth 0
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.depth == 0 && self.parent_ref.is_none()
    }
}

/// Fixed answer-choice order of a randomized item
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemToken {
    /// Choice identifiers in presentation order
    #[serde(rename = "shuffled_choice_order")]
    pub choice_ids: Vec<String>,
}

impl Token for ItemToken {
    const KIND: &'static str = "item";
}

impl ItemToken {
    /// Create token from a presentation order
    #[inline]
    #[must_use]
    pub fn new(choice_ids: Vec<String>) -> Self {
        Self { choice_ids }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_token_root() {
        let token = PartToken::root(vec!["lo-1".into()], Some(2));
        assert!(token.is_root());
        assert!(token.has_objectives());
        assert_eq!(token.waypoint_quota, Some(2));
    }

    #[test]
    fn part_token_child_inherits_quota() {
        let root = PartToken::root(vec!["lo-1".into()], Some(3));
        let child = root.child("parent-id", "lo-9", 2).unwrap();

        assert_eq!(child.depth, 1);
        assert_eq!(child.objective_refs, vec!["lo-9".to_string()]);
        assert_eq!(child.sibling_index, 2);
        assert_eq!(child.parent_ref.as_deref(), Some("parent-id"));
        assert_eq!(child.waypoint_quota, Some(3));
        assert!(!child.is_root());
    }

    #[test]
    fn part_token_child_at_max_depth() {
        let token = PartToken {
            depth: u32::MAX,
            objective_refs: vec!["lo".into()],
            ..PartToken::default()
        };
        assert_eq!(token.child("parent-id", "lo-2", 0), None);
    }

    #[test]
    fn part_token_sentinel_objective_is_not_objective() {
        let token = PartToken::root(vec![String::new()], None);
        assert!(!token.has_objectives());
    }

    #[test]
    fn part_token_missing_fields_default() {
        let token: PartToken = serde_json::from_str("{}").unwrap();
        assert_eq!(token, PartToken::default());
        assert!(token.is_root());
    }

    #[test]
    fn part_token_unknown_fields_ignored() {
        let token: PartToken =
            serde_json::from_str(r#"{"depth":2,"max_levels":4,"objective_refs":["a"]}"#).unwrap();
        assert_eq!(token.depth, 2);
        assert_eq!(token.objective_refs, vec!["a".to_string()]);
    }

    #[test]
    fn part_token_omits_absent_optionals() {
        let json = serde_json::to_string(&PartToken::root(vec!["a".into()], None)).unwrap();
        assert!(!json.contains("parent_ref"));
        assert!(!json.contains("waypoint_quota"));
    }

    #[test]
    fn item_token_key_order_is_stable() {
        let json = serde_json::to_string(&ItemToken::new(vec!["c2".into(), "c1".into()])).unwrap();
        assert_eq!(json, r#"{"shuffled_choice_order":["c2","c1"]}"#);

        let back: ItemToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back.choice_ids, vec!["c2".to_string(), "c1".to_string()]);
    }
}
