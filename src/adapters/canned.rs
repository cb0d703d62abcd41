//! Offline coaching assistant.
//!
//! Answers from static data after a short simulated delay, so the rest of
//! the app behaves the same with or without a model API key.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::debug;

use super::{Assistant, AssistantError};
use crate::domain::{
    Intensity, ModerationVerdict, MotivationalTip, PlayerProfile, ProgressRecord, TipCategory,
    TrainingSuggestion,
};
use crate::seed;

/// Words that get a community post rejected
const FLAGGED_TERMS: [&str; 3] = ["offensive", "inappropriate", "harmful"];

/// Simulated response latency per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedDelays {
    pub suggestion: Duration,
    pub tip: Duration,
    pub analysis: Duration,
    pub moderation: Duration,
}

impl Default for CannedDelays {
    fn default() -> Self {
        Self {
            suggestion: Duration::from_millis(1000),
            tip: Duration::from_millis(800),
            analysis: Duration::from_millis(1200),
            moderation: Duration::from_millis(500),
        }
    }
}

impl CannedDelays {
    /// No delay at all
    pub fn none() -> Self {
        Self {
            suggestion: Duration::ZERO,
            tip: Duration::ZERO,
            analysis: Duration::ZERO,
            moderation: Duration::ZERO,
        }
    }
}

/// Assistant backed by canned responses
#[derive(Debug, Clone, Default)]
pub struct CannedAssistant {
    delays: CannedDelays,
}

impl CannedAssistant {
    pub fn new(delays: CannedDelays) -> Self {
        Self { delays }
    }

    /// Assistant that answers immediately
    pub fn instant() -> Self {
        Self::new(CannedDelays::none())
    }

    async fn pause(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Pick a random tip, restricted to `preferences` when any of them has a tip
fn pick_tip(preferences: &[TipCategory]) -> MotivationalTip {
    let tips = seed::motivational_tips();
    let preferred: Vec<_> = tips
        .iter()
        .filter(|t| preferences.contains(&t.category))
        .collect();
    let pool: Vec<_> = if preferred.is_empty() {
        tips.iter().collect()
    } else {
        preferred
    };

    let mut rng = rand::thread_rng();
    pool.choose(&mut rng)
        .map(|t| (*t).clone())
        .unwrap_or_else(seed::default_tip)
}

/// Flag content containing any of the blocked terms, ignoring case
pub fn screen_content(content: &str) -> ModerationVerdict {
    let lowered = content.to_lowercase();
    if FLAGGED_TERMS.iter().any(|term| lowered.contains(term)) {
        ModerationVerdict::rejected("Content contains potentially inappropriate language.")
    } else {
        ModerationVerdict::approved()
    }
}

#[async_trait]
impl Assistant for CannedAssistant {
    fn name(&self) -> &str {
        "canned"
    }

    async fn training_suggestion(
        &self,
        profile: &PlayerProfile,
    ) -> Result<TrainingSuggestion, AssistantError> {
        debug!(age = profile.age, injuries = profile.injuries.len(), "Canned training suggestion");
        Self::pause(self.delays.suggestion).await;

        Ok(TrainingSuggestion {
            suggestion: "Based on your recent training history and skill levels, I recommend focusing on passing accuracy and agility drills today. Your passing skills have shown improvement, but more practice would be beneficial. Keep the intensity moderate (level 3) to avoid overexertion.".to_string(),
            reasoning: "Your recent training shows consistent work on shooting and endurance, but less focus on passing and agility. Balancing your training across all skill areas will lead to better overall performance.".to_string(),
            intensity: Intensity::new(3),
            focus_areas: vec!["passing".to_string(), "agility".to_string()],
        })
    }

    async fn motivational_tip(
        &self,
        preferences: &[TipCategory],
    ) -> Result<MotivationalTip, AssistantError> {
        debug!(?preferences, "Canned motivational tip");
        Self::pause(self.delays.tip).await;
        Ok(pick_tip(preferences))
    }

    async fn analyze_performance(
        &self,
        records: &[ProgressRecord],
    ) -> Result<Vec<String>, AssistantError> {
        debug!(records = records.len(), "Canned performance analysis");
        Self::pause(self.delays.analysis).await;
        Ok(seed::performance_insights())
    }

    async fn moderate(&self, content: &str) -> Result<ModerationVerdict, AssistantError> {
        debug!(chars = content.len(), "Canned moderation");
        Self::pause(self.delays.moderation).await;
        Ok(screen_content(content))
    }
}
