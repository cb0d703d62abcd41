//! Types exchanged with the coaching assistant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::training::{Intensity, TrainingSession};

/// What the assistant knows about the player when suggesting a workout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub age: u32,

    /// Skill name -> score (0-100)
    #[serde(default)]
    pub skill_levels: BTreeMap<String, u32>,

    #[serde(default)]
    pub recent_sessions: Vec<TrainingSession>,

    #[serde(default)]
    pub injuries: Vec<String>,
}

impl PlayerProfile {
    pub fn new(age: u32) -> Self {
        Self {
            age,
            ..Default::default()
        }
    }

    pub fn with_skill(mut self, name: impl Into<String>, level: u32) -> Self {
        self.skill_levels.insert(name.into(), level);
        self
    }

    pub fn with_injury(mut self, injury: impl Into<String>) -> Self {
        self.injuries.push(injury.into());
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<TrainingSession>) -> Self {
        self.recent_sessions = sessions;
        self
    }
}

/// A personalized workout recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSuggestion {
    pub suggestion: String,
    #[serde(default)]
    pub reasoning: String,
    pub intensity: Intensity,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

/// Topic of a motivational tip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Motivation,
    Technique,
    Recovery,
    Nutrition,
}

impl std::fmt::Display for TipCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TipCategory::Motivation => write!(f, "motivation"),
            TipCategory::Technique => write!(f, "technique"),
            TipCategory::Recovery => write!(f, "recovery"),
            TipCategory::Nutrition => write!(f, "nutrition"),
        }
    }
}

/// A short motivational message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotivationalTip {
    pub message: String,
    pub category: TipCategory,
}

impl MotivationalTip {
    pub fn new(message: impl Into<String>, category: TipCategory) -> Self {
        Self {
            message: message.into(),
            category,
        }
    }
}

/// Outcome of checking user-generated content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub is_appropriate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ModerationVerdict {
    pub fn approved() -> Self {
        Self {
            is_appropriate: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            is_appropriate: false,
            reason: Some(reason.into()),
        }
    }
}
