//! Fail-Soft Integration Tests
//!
//! Remote collaborators that error, stall or get cancelled must degrade to
//! empty collections, `None` or built-in content instead of errors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use ageless::adapters::{Assistant, AssistantError, DataStore, StoreError};
use ageless::core::{
    build_home_overview, fallback_suggestion, fallback_tip, CoachService, DataService,
};
use ageless::domain::{
    Club, CommunityEvent, Drill, DrillCategory, ForumTopic, ModerationVerdict, MotivationalTip,
    PlayerProfile, ProgressRecord, TipCategory, TrainingPlan, TrainingSession, TrainingSettings,
    TrainingSuggestion,
};
use ageless::library::{CategorySelector, Resource};
use chrono::Utc;

/// Store whose every call fails with a server error
#[derive(Default)]
struct BrokenStore {
    calls: AtomicUsize,
}

impl BrokenStore {
    fn fail<T>(&self) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

#[async_trait]
impl DataStore for BrokenStore {
    fn name(&self) -> &str {
        "broken"
    }

    async fn fetch_training_plans(&self, _user_id: &str) -> Result<Vec<TrainingPlan>, StoreError> {
        self.fail()
    }

    async fn fetch_drills(
        &self,
        _category: Option<DrillCategory>,
    ) -> Result<Vec<Drill>, StoreError> {
        self.fail()
    }

    async fn save_training_plan(&self, _plan: &TrainingPlan) -> Result<TrainingPlan, StoreError> {
        self.fail()
    }

    async fn save_training_session(
        &self,
        _session: &TrainingSession,
    ) -> Result<TrainingSession, StoreError> {
        self.fail()
    }

    async fn fetch_training_sessions(
        &self,
        _user_id: &str,
    ) -> Result<Vec<TrainingSession>, StoreError> {
        self.fail()
    }

    async fn fetch_user_progress(&self, _user_id: &str) -> Result<Vec<ProgressRecord>, StoreError> {
        self.fail()
    }

    async fn save_progress_record(
        &self,
        _record: &ProgressRecord,
    ) -> Result<ProgressRecord, StoreError> {
        self.fail()
    }

    async fn fetch_community_events(&self) -> Result<Vec<CommunityEvent>, StoreError> {
        self.fail()
    }

    async fn fetch_forum_topics(&self) -> Result<Vec<ForumTopic>, StoreError> {
        self.fail()
    }

    async fn fetch_clubs(&self) -> Result<Vec<Club>, StoreError> {
        self.fail()
    }

    async fn fetch_resources(
        &self,
        _category: &CategorySelector,
    ) -> Result<Vec<Resource>, StoreError> {
        self.fail()
    }
}

/// Assistant that either errors or never answers
struct BrokenAssistant {
    stall: bool,
}

impl BrokenAssistant {
    async fn fail<T>(&self) -> Result<T, AssistantError> {
        if self.stall {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        Err(AssistantError::Status {
            status: 500,
            body: "model overloaded".to_string(),
        })
    }
}

#[async_trait]
impl Assistant for BrokenAssistant {
    fn name(&self) -> &str {
        "broken"
    }

    async fn training_suggestion(
        &self,
        _profile: &PlayerProfile,
    ) -> Result<TrainingSuggestion, AssistantError> {
        self.fail().await
    }

    async fn motivational_tip(
        &self,
        _preferences: &[TipCategory],
    ) -> Result<MotivationalTip, AssistantError> {
        self.fail().await
    }

    async fn analyze_performance(
        &self,
        _records: &[ProgressRecord],
    ) -> Result<Vec<String>, AssistantError> {
        self.fail().await
    }

    async fn moderate(&self, _content: &str) -> Result<ModerationVerdict, AssistantError> {
        self.fail().await
    }
}

#[tokio::test]
async fn test_failing_store_yields_empty_collections() {
    let store = Arc::new(BrokenStore::default());
    let data = DataService::new(store.clone());

    assert!(data.fetch_training_plans("demo").await.is_empty());
    assert!(data.fetch_drills(None).await.is_empty());
    assert!(data.fetch_user_progress("demo").await.is_empty());
    assert!(data.fetch_training_sessions("demo").await.is_empty());
    assert!(data.fetch_community_events().await.is_empty());
    assert!(data.fetch_forum_topics().await.is_empty());
    assert!(data.fetch_clubs().await.is_empty());
    assert!(data.fetch_resources(&CategorySelector::All).await.is_empty());
    assert!(data.load_catalog().await.is_empty());

    assert_eq!(store.calls.load(Ordering::SeqCst), 9);
}

#[tokio::test]
async fn test_failing_store_saves_yield_none() {
    let data = DataService::new(Arc::new(BrokenStore::default()));
    let settings = TrainingSettings::default();

    let plan = TrainingPlan::new("demo", "Tuesday", &settings);
    assert!(data.save_training_plan(&plan).await.is_none());

    let session = TrainingSession::from_settings("demo", &settings);
    assert!(data.save_training_session(&session).await.is_none());

    let record = ProgressRecord::new("demo", Default::default(), Vec::new());
    assert!(data.save_progress_record(&record).await.is_none());
}

#[tokio::test]
async fn test_cancelled_service_skips_store() {
    let store = Arc::new(BrokenStore::default());
    let data = DataService::new(store.clone());

    data.cancellation_token().cancel();
    assert!(data.fetch_drills(None).await.is_empty());
    assert!(data.fetch_clubs().await.is_empty());

    // Calls after cancellation never reach the store
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failing_assistant_yields_fallbacks() {
    let coach = CoachService::new(Arc::new(BrokenAssistant { stall: false }));

    assert_eq!(
        coach.training_suggestion(&PlayerProfile::new(42)).await,
        fallback_suggestion()
    );
    assert_eq!(
        coach.motivational_tip(&[TipCategory::Recovery]).await,
        fallback_tip(&[TipCategory::Recovery])
    );
    assert!(coach.performance_insights(&[]).await.is_empty());

    // Moderation falls back to the local keyword screen
    assert!(coach.moderate("Great session at the park today").await.is_appropriate);
    assert!(!coach.moderate("This is offensive").await.is_appropriate);
}

#[tokio::test]
async fn test_stalled_assistant_times_out() {
    let coach = CoachService::new(Arc::new(BrokenAssistant { stall: true }))
        .with_timeout(Duration::from_millis(50));

    let started = Instant::now();
    let tip = coach.motivational_tip(&[]).await;
    assert_eq!(tip, fallback_tip(&[]));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancelling_in_flight_call_returns_promptly() {
    let coach = CoachService::new(Arc::new(BrokenAssistant { stall: true }));
    let token = coach.cancellation_token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let started = Instant::now();
    let suggestion = coach.training_suggestion(&PlayerProfile::new(50)).await;
    assert_eq!(suggestion, fallback_suggestion());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_profile_from_failing_store_is_bare() {
    let data = DataService::new(Arc::new(BrokenStore::default()));
    let profile = data.player_profile("demo", 45).await;
    assert_eq!(profile, PlayerProfile::new(45));
}

#[tokio::test]
async fn test_home_overview_survives_total_outage() {
    let data = DataService::new(Arc::new(BrokenStore::default()));
    let coach = CoachService::new(Arc::new(BrokenAssistant { stall: false }));

    let overview = build_home_overview(&data, &coach, "demo", Utc::now()).await;
    assert!(overview.featured_drill.is_none());
    assert!(overview.next_event.is_none());
    assert!(overview.weekly.is_none());
    assert_eq!(overview.tip, fallback_tip(&[]));
}
