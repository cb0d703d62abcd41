//! Fail-soft front for the coaching assistant.
//!
//! A slow or unavailable model must never blank out a screen: each call
//! falls back to static content when the assistant fails, times out or the
//! owning screen cancels.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::guard::{guard, DEFAULT_TIMEOUT};
use crate::adapters::canned::screen_content;
use crate::adapters::Assistant;
use crate::domain::{
    Intensity, ModerationVerdict, MotivationalTip, PlayerProfile, ProgressRecord, TipCategory,
    TrainingSuggestion,
};
use crate::seed;

/// Suggestion shown when the assistant cannot produce one
pub fn fallback_suggestion() -> TrainingSuggestion {
    TrainingSuggestion {
        suggestion: "Keep it light today: a thorough warm-up, some passing against a wall and a long cool-down stretch.".to_string(),
        reasoning: "Personalized suggestions are unavailable right now, so this is a safe general session.".to_string(),
        intensity: Intensity::new(2),
        focus_areas: vec!["passing".to_string(), "recovery".to_string()],
    }
}

/// Tip shown when the assistant cannot produce one: the first built-in tip
/// in a preferred category, else the first built-in tip
pub fn fallback_tip(preferences: &[TipCategory]) -> MotivationalTip {
    let tips = seed::motivational_tips();
    let preferred = tips
        .iter()
        .position(|t| preferences.contains(&t.category))
        .unwrap_or(0);
    tips.into_iter().nth(preferred).unwrap_or_else(seed::default_tip)
}

/// Coaching calls that never fail
#[derive(Clone)]
pub struct CoachService {
    assistant: Arc<dyn Assistant>,
    cancel: CancellationToken,
    timeout: Duration,
}

impl CoachService {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self {
            assistant,
            cancel: CancellationToken::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Tie in-flight calls to an outer token (e.g. the owning screen)
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that aborts this service's in-flight and future calls
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn assistant_name(&self) -> &str {
        self.assistant.name()
    }

    pub async fn training_suggestion(&self, profile: &PlayerProfile) -> TrainingSuggestion {
        guard(
            "training_suggestion",
            &self.cancel,
            self.timeout,
            self.assistant.training_suggestion(profile),
        )
        .await
        .ok()
        .unwrap_or_else(fallback_suggestion)
    }

    pub async fn motivational_tip(&self, preferences: &[TipCategory]) -> MotivationalTip {
        guard(
            "motivational_tip",
            &self.cancel,
            self.timeout,
            self.assistant.motivational_tip(preferences),
        )
        .await
        .ok()
        .unwrap_or_else(|| fallback_tip(preferences))
    }

    /// Insights about recent progress; empty when unavailable
    pub async fn performance_insights(&self, records: &[ProgressRecord]) -> Vec<String> {
        guard(
            "analyze_performance",
            &self.cancel,
            self.timeout,
            self.assistant.analyze_performance(records),
        )
        .await
        .ok()
        .unwrap_or_default()
    }

    /// Moderate a post, falling back to the local keyword screen
    pub async fn moderate(&self, content: &str) -> ModerationVerdict {
        guard(
            "moderate",
            &self.cancel,
            self.timeout,
            self.assistant.moderate(content),
        )
        .await
        .ok()
        .unwrap_or_else(|| screen_content(content))
    }
}
