//! Adapter interfaces for external systems.
//!
//! Two capabilities are abstracted here so a real network client can be
//! swapped in without touching call sites:
//! - [`DataStore`]: CRUD access to the relational backend
//! - [`Assistant`]: the generative coaching model
//!
//! Adapters report failures as typed errors. Turning those into benign
//! defaults is the job of the services in [`crate::core`].

pub mod canned;
pub mod openai;
pub mod rest;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Club, CommunityEvent, Drill, DrillCategory, ForumTopic, ModerationVerdict, MotivationalTip,
    PlayerProfile, ProgressRecord, TipCategory, TrainingPlan, TrainingSession, TrainingSuggestion,
};
use crate::library::{CategorySelector, Resource};

pub use canned::{CannedAssistant, CannedDelays};
pub use openai::OpenAiAssistant;
pub use rest::RestStore;
pub use sqlite::SqliteStore;

/// Most recent progress records returned per user
pub const PROGRESS_LIMIT: usize = 10;

/// Most recent training sessions returned per user
pub const SESSION_LIMIT: usize = 10;

/// Errors from a data store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend returned no rows for insert into {0}")]
    EmptyResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors from a coaching assistant
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Assistant API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Assistant returned no content")]
    EmptyResponse,

    #[error("Failed to parse assistant output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// CRUD access to the training backend
///
/// Reads of ordered collections must honor the documented order; the
/// presentation layer renders them as returned.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Training plans belonging to a user
    async fn fetch_training_plans(&self, user_id: &str) -> Result<Vec<TrainingPlan>, StoreError>;

    /// Drill library, optionally restricted to one skill area
    async fn fetch_drills(&self, category: Option<DrillCategory>) -> Result<Vec<Drill>, StoreError>;

    async fn save_training_plan(&self, plan: &TrainingPlan) -> Result<TrainingPlan, StoreError>;

    async fn save_training_session(
        &self,
        session: &TrainingSession,
    ) -> Result<TrainingSession, StoreError>;

    /// Up to [`SESSION_LIMIT`] logged sessions, most recently completed first
    async fn fetch_training_sessions(
        &self,
        user_id: &str,
    ) -> Result<Vec<TrainingSession>, StoreError>;

    /// Up to [`PROGRESS_LIMIT`] progress records, newest first
    async fn fetch_user_progress(&self, user_id: &str) -> Result<Vec<ProgressRecord>, StoreError>;

    async fn save_progress_record(
        &self,
        record: &ProgressRecord,
    ) -> Result<ProgressRecord, StoreError>;

    /// Community events, soonest first
    async fn fetch_community_events(&self) -> Result<Vec<CommunityEvent>, StoreError>;

    /// Forum topics, most recently active first
    async fn fetch_forum_topics(&self) -> Result<Vec<ForumTopic>, StoreError>;

    async fn fetch_clubs(&self) -> Result<Vec<Club>, StoreError>;

    /// Library resources; `All` places no category constraint
    async fn fetch_resources(
        &self,
        category: &CategorySelector,
    ) -> Result<Vec<Resource>, StoreError>;
}

/// Generative coaching model
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Human-readable assistant name
    fn name(&self) -> &str;

    /// Suggest today's workout for a player
    async fn training_suggestion(
        &self,
        profile: &PlayerProfile,
    ) -> Result<TrainingSuggestion, AssistantError>;

    /// A short motivational tip, preferring the given categories
    async fn motivational_tip(
        &self,
        preferences: &[TipCategory],
    ) -> Result<MotivationalTip, AssistantError>;

    /// Observations about recent progress
    async fn analyze_performance(
        &self,
        records: &[ProgressRecord],
    ) -> Result<Vec<String>, AssistantError>;

    /// Check a community post before it is published
    async fn moderate(&self, content: &str) -> Result<ModerationVerdict, AssistantError>;
}
