//! Fail-soft front for the data store.
//!
//! The presentation layer assumes collections are always iterable, so every
//! fetch resolves to a (possibly empty) `Vec` and every save to an `Option`.
//! Failures are logged at this boundary and never reach the caller.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::guard::{guard, DEFAULT_TIMEOUT};
use crate::adapters::DataStore;
use crate::domain::{
    Club, CommunityEvent, Drill, DrillCategory, ForumTopic, PlayerProfile, ProgressRecord,
    TrainingPlan, TrainingSession,
};
use crate::library::{CategorySelector, Resource, ResourceCatalog};

/// Data access that never fails
#[derive(Clone)]
pub struct DataService {
    store: Arc<dyn DataStore>,
    cancel: CancellationToken,
    timeout: Duration,
}

impl DataService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
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

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    pub async fn fetch_training_plans(&self, user_id: &str) -> Vec<TrainingPlan> {
        guard(
            "fetch_training_plans",
            &self.cancel,
            self.timeout,
            self.store.fetch_training_plans(user_id),
        )
        .await
        .ok()
        .unwrap_or_default()
    }

    pub async fn fetch_drills(&self, category: Option<DrillCategory>) -> Vec<Drill> {
        guard(
            "fetch_drills",
            &self.cancel,
            self.timeout,
            self.store.fetch_drills(category),
        )
        .await
        .ok()
        .unwrap_or_default()
    }

    pub async fn save_training_plan(&self, plan: &TrainingPlan) -> Option<TrainingPlan> {
        guard(
            "save_training_plan",
            &self.cancel,
            self.timeout,
            self.store.save_training_plan(plan),
        )
        .await
        .ok()
    }

    pub async fn save_training_session(
        &self,
        session: &TrainingSession,
    ) -> Option<TrainingSession> {
        guard(
            "save_training_session",
            &self.cancel,
            self.timeout,
            self.store.save_training_session(session),
        )
        .await
        .ok()
    }

    /// Recent sessions, most recently completed first
    pub async fn fetch_training_sessions(&self, user_id: &str) -> Vec<TrainingSession> {
        guard(
            "fetch_training_sessions",
            &self.cancel,
            self.timeout,
            self.store.fetch_training_sessions(user_id),
        )
        .await
        .ok()
        .unwrap_or_default()
    }

    pub async fn fetch_user_progress(&self, user_id: &str) -> Vec<ProgressRecord> {
        guard(
            "fetch_user_progress",
            &self.cancel,
            self.timeout,
            self.store.fetch_user_progress(user_id),
        )
        .await
        .ok()
        .unwrap_or_default()
    }

    pub async fn save_progress_record(&self, record: &ProgressRecord) -> Option<ProgressRecord> {
        guard(
            "save_progress_record",
            &self.cancel,
            self.timeout,
            self.store.save_progress_record(record),
        )
        .await
        .ok()
    }

    pub async fn fetch_community_events(&self) -> Vec<CommunityEvent> {
        guard(
            "fetch_community_events",
            &self.cancel,
            self.timeout,
            self.store.fetch_community_events(),
        )
        .await
        .ok()
        .unwrap_or_default()
    }

    pub async fn fetch_forum_topics(&self) -> Vec<ForumTopic> {
        guard(
            "fetch_forum_topics",
            &self.cancel,
            self.timeout,
            self.store.fetch_forum_topics(),
        )
        .await
        .ok()
        .unwrap_or_default()
    }

    pub async fn fetch_clubs(&self) -> Vec<Club> {
        guard("fetch_clubs", &self.cancel, self.timeout, self.store.fetch_clubs())
            .await
            .ok()
            .unwrap_or_default()
    }

    pub async fn fetch_resources(&self, category: &CategorySelector) -> Vec<Resource> {
        guard(
            "fetch_resources",
            &self.cancel,
            self.timeout,
            self.store.fetch_resources(category),
        )
        .await
        .ok()
        .unwrap_or_default()
    }

    /// Build the session catalog from the full resource list
    pub async fn load_catalog(&self) -> ResourceCatalog {
        ResourceCatalog::new(self.fetch_resources(&CategorySelector::All).await)
    }

    /// Coaching profile from the latest skill scores and recent sessions
    pub async fn player_profile(&self, user_id: &str, age: u32) -> PlayerProfile {
        let (progress, sessions) = tokio::join!(
            self.fetch_user_progress(user_id),
            self.fetch_training_sessions(user_id),
        );

        let skills = progress.into_iter().next().map(|r| r.skills).unwrap_or_default();
        skills
            .into_iter()
            .fold(PlayerProfile::new(age), |profile, skill| {
                profile.with_skill(skill.name.to_lowercase(), skill.current)
            })
            .with_sessions(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SqliteStore;

    #[tokio::test]
    async fn test_load_catalog_from_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.seed().await.unwrap();
        let service = DataService::new(Arc::new(store));

        let catalog = service.load_catalog().await;
        assert_eq!(catalog.len(), 8);
        assert_eq!(service.store_name(), "sqlite");
    }

    #[tokio::test]
    async fn test_profile_includes_logged_sessions() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.seed().await.unwrap();
        let service = DataService::new(Arc::new(store));

        let mut settings = crate::domain::TrainingSettings::default();
        settings.set_intensity(3);
        settings.select_drill("2");
        let session = TrainingSession::from_settings("demo", &settings);
        service.save_training_session(&session).await.unwrap();

        let profile = service.player_profile("demo", 47).await;
        assert_eq!(profile.age, 47);
        assert_eq!(profile.recent_sessions, vec![session]);
        assert_eq!(profile.skill_levels.get("passing"), Some(&75));

        let newcomer = service.player_profile("new-user", 38).await;
        assert!(newcomer.recent_sessions.is_empty());
        assert!(newcomer.skill_levels.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_service_returns_defaults() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.seed().await.unwrap();
        let service = DataService::new(Arc::new(store));

        service.cancellation_token().cancel();

        assert!(service.fetch_drills(None).await.is_empty());
        let session = TrainingSession::from_settings("u1", &Default::default());
        assert!(service.save_training_session(&session).await.is_none());
    }
}
