//! Canonical record types
//!
//! Parts and items as the canonical store holds them. Synthetic parts are
//! reconstructed from one of these plus a decoded token.

use serde::{Deserialize, Serialize};
use waypoint_ident::ResourceId;

/// One answer choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Choice identifier
    pub id: String,
    /// Display text
    pub text: String,
}

impl Choice {
    /// Create new choice
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Multiple-choice question body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Prompt text
    pub text: String,
    /// Choices in stored order
    pub choices: Vec<Choice>,
}

impl Question {
    /// Create new question
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            text: text.into(),
            choices,
        }
    }

    /// Choice identifiers in current order
    #[must_use]
    pub fn choice_ids(&self) -> Vec<String> {
        self.choices.iter().map(|c| c.id.clone()).collect()
    }

    /// Same question with choices replaced
    #[inline]
    #[must_use]
    pub fn with_choices(&self, choices: Vec<Choice>) -> Self {
        Self {
            text: self.text.clone(),
            choices,
        }
    }
}

/// Canonical assessment item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Item id
    pub id: ResourceId,
    /// Learning objectives the item is linked to
    pub objective_ids: Vec<String>,
    /// Bank holding the item
    pub bank_id: Option<String>,
    /// Question body
    pub question: Question,
    /// Choice id of the correct answer
    pub answer_id: Option<String>,
}

impl ItemRecord {
    /// Create new item
    #[must_use]
    pub fn new(id: ResourceId, question: Question) -> Self {
        Self {
            id,
            objective_ids: Vec::new(),
            bank_id: None,
            question,
            answer_id: None,
        }
    }

    /// Link objectives
    #[inline]
    #[must_use]
    pub fn with_objectives(mut self, objective_ids: Vec<String>) -> Self {
        self.objective_ids = objective_ids;
        self
    }

    /// Place in bank
    #[inline]
    #[must_use]
    pub fn in_bank(mut self, bank_id: impl Into<String>) -> Self {
        self.bank_id = Some(bank_id.into());
        self
    }

    /// Set the correct choice
    #[inline]
    #[must_use]
    pub fn with_answer(mut self, choice_id: impl Into<String>) -> Self {
        self.answer_id = Some(choice_id.into());
        self
    }

    /// True when linked to every given objective
    #[must_use]
    pub fn matches_all(&self, objective_refs: &[String]) -> bool {
        objective_refs
            .iter()
            .filter(|o| !o.is_empty())
            .all(|o| self.objective_ids.contains(o))
    }
}

/// Canonical assessment part carrying scaffold settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    /// Part id
    pub id: ResourceId,
    /// Scaffold-down settings
    pub settings: ScaffoldSettings,
}

impl PartRecord {
    /// Create new part
    #[inline]
    #[must_use]
    pub fn new(id: ResourceId, settings: ScaffoldSettings) -> Self {
        Self { id, settings }
    }
}

/// Scaffold-down branching settings of a part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldSettings {
    /// Depth limit; `None` is unbounded
    pub max_levels: Option<u32>,
    /// Siblings per branch; `None` uses the engine's sentinel
    pub max_waypoint_items: Option<u32>,
    /// Correct answers that satisfy a branch; `None` is no quota
    pub waypoint_quota: Option<u32>,
    /// Whether a seen item may be shown again when the pool runs dry
    pub allow_repeat_items: bool,
    /// Bank to search; `None` searches all banks
    pub item_bank_id: Option<String>,
    /// Objectives for item selection at the root
    pub objective_ids: Vec<String>,
    /// Fixed items for an answer-direct root
    pub item_ids: Vec<ResourceId>,
}

impl Default for ScaffoldSettings {
    fn default() -> Self {
        Self {
            max_levels: None,
            max_waypoint_items: Some(1),
            waypoint_quota: None,
            allow_repeat_items: true,
            item_bank_id: None,
            objective_ids: Vec::new(),
            item_ids: Vec::new(),
        }
    }
}

impl ScaffoldSettings {
    /// Start a builder from defaults
    #[inline]
    #[must_use]
    pub fn builder() -> ScaffoldSettingsBuilder {
        ScaffoldSettingsBuilder::default()
    }
}

/// Validating builder for [`ScaffoldSettings`]
///
/// Objectives and fixed items are mutually exclusive: a root part either
/// selects by objective or asks a fixed item.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldSettingsBuilder {
    settings: ScaffoldSettings,
}

impl ScaffoldSettingsBuilder {
    /// Set depth limit
    #[must_use]
    pub fn max_levels(mut self, max_levels: Option<u32>) -> Self {
        self.settings.max_levels = max_levels;
        self
    }

    /// Set sibling limit
    #[must_use]
    pub fn max_waypoint_items(mut self, max_waypoint_items: Option<u32>) -> Self {
        self.settings.max_waypoint_items = max_waypoint_items;
        self
    }

    /// Set quota
    #[must_use]
    pub fn waypoint_quota(mut self, waypoint_quota: Option<u32>) -> Self {
        self.settings.waypoint_quota = waypoint_quota;
        self
    }

    /// Allow or forbid repeated items
    #[must_use]
    pub fn allow_repeat_items(mut self, allow: bool) -> Self {
        self.settings.allow_repeat_items = allow;
        self
    }

    /// Restrict item search to a bank
    #[must_use]
    pub fn item_bank_id(mut self, bank_id: impl Into<String>) -> Self {
        self.settings.item_bank_id = Some(bank_id.into());
        self
    }

    /// Set root objectives
    ///
    /// # Errors
    /// Returns [`SettingsError::IllegalState`] if fixed items are already set
    pub fn objective_ids(mut self, objective_ids: Vec<String>) -> Result<Self, SettingsError> {
        if !self.settings.item_ids.is_empty() {
            return Err(SettingsError::IllegalState(
                "objectives cannot be set on a part with fixed items".into(),
            ));
        }
        if objective_ids.iter().any(String::is_empty) {
            return Err(SettingsError::InvalidArgument("empty objective id".into()));
        }
        self.settings.objective_ids = objective_ids;
        Ok(self)
    }

    /// Set fixed root items
    ///
    /// # Errors
    /// Returns [`SettingsError::IllegalState`] if objectives are already set
    pub fn item_ids(mut self, item_ids: Vec<ResourceId>) -> Result<Self, SettingsError> {
        if !self.settings.objective_ids.is_empty() {
            return Err(SettingsError::IllegalState(
                "fixed items cannot be set on a part with objectives".into(),
            ));
        }
        self.settings.item_ids = item_ids;
        Ok(self)
    }

    /// Clear root objectives
    #[must_use]
    pub fn clear_objective_ids(mut self) -> Self {
        self.settings.objective_ids.clear();
        self
    }

    /// Clear fixed items
    #[must_use]
    pub fn clear_item_ids(mut self) -> Self {
        self.settings.item_ids.clear();
        self
    }

    /// Finish
    #[must_use]
    pub fn build(self) -> ScaffoldSettings {
        self.settings
    }
}

/// Settings validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Conflicts with another field already set
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Value rejected
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
