//! Hosted relational backend over its REST interface.
//!
//! Speaks the PostgREST dialect used by hosted Postgres services:
//! `GET /rest/v1/<table>?select=*&<column>=eq.<value>&order=<column>.<dir>&limit=<n>`
//! for reads and `POST /rest/v1/<table>` with `Prefer: return=representation`
//! for inserts. Auth is the project key sent both as `apikey` and as a
//! bearer token.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{DataStore, StoreError, PROGRESS_LIMIT, SESSION_LIMIT};
use crate::domain::{
    Club, CommunityEvent, Drill, DrillCategory, ForumTopic, ProgressRecord, TrainingPlan,
    TrainingSession,
};
use crate::library::{CategorySelector, Resource};

/// Client for the hosted backend
pub struct RestStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestStore {
    /// Create a client for a project URL and API key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            ..Self::new(base_url, api_key)
        })
    }

    /// Build the endpoint URL for a table
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// `select=*` from a table with extra PostgREST query parameters
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(params.iter().cloned());

        debug!(table, ?query, "Selecting rows");

        let response = self
            .authorized(self.client.get(self.table_url(table)))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Insert one row and return the stored representation
    async fn insert<T: Serialize + DeserializeOwned + Sync>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<T, StoreError> {
        debug!(table, "Inserting row");

        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<T> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::EmptyResponse(table.to_string()))
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl DataStore for RestStore {
    fn name(&self) -> &str {
        "rest"
    }

    async fn fetch_training_plans(&self, user_id: &str) -> Result<Vec<TrainingPlan>, StoreError> {
        self.select("training_plans", &[("user_id", eq(user_id))]).await
    }

    async fn fetch_drills(
        &self,
        category: Option<DrillCategory>,
    ) -> Result<Vec<Drill>, StoreError> {
        let params: Vec<_> = category.map(|c| ("category", eq(c))).into_iter().collect();
        self.select("drills", &params).await
    }

    async fn save_training_plan(&self, plan: &TrainingPlan) -> Result<TrainingPlan, StoreError> {
        self.insert("training_plans", plan).await
    }

    async fn save_training_session(
        &self,
        session: &TrainingSession,
    ) -> Result<TrainingSession, StoreError> {
        self.insert("training_sessions", session).await
    }

    async fn fetch_training_sessions(
        &self,
        user_id: &str,
    ) -> Result<Vec<TrainingSession>, StoreError> {
        self.select(
            "training_sessions",
            &[
                ("user_id", eq(user_id)),
                ("order", "completed_at.desc".to_string()),
                ("limit", SESSION_LIMIT.to_string()),
            ],
        )
        .await
    }

    async fn fetch_user_progress(&self, user_id: &str) -> Result<Vec<ProgressRecord>, StoreError> {
        self.select(
            "user_progress",
            &[
                ("user_id", eq(user_id)),
                ("order", "date.desc".to_string()),
                ("limit", PROGRESS_LIMIT.to_string()),
            ],
        )
        .await
    }

    async fn save_progress_record(
        &self,
        record: &ProgressRecord,
    ) -> Result<ProgressRecord, StoreError> {
        self.insert("user_progress", record).await
    }

    async fn fetch_community_events(&self) -> Result<Vec<CommunityEvent>, StoreError> {
        self.select("community_events", &[("order", "date.asc".to_string())])
            .await
    }

    async fn fetch_forum_topics(&self) -> Result<Vec<ForumTopic>, StoreError> {
        self.select("forum_topics", &[("order", "last_activity.desc".to_string())])
            .await
    }

    async fn fetch_clubs(&self) -> Result<Vec<Club>, StoreError> {
        self.select("clubs", &[]).await
    }

    async fn fetch_resources(
        &self,
        category: &CategorySelector,
    ) -> Result<Vec<Resource>, StoreError> {
        match category {
            CategorySelector::All => self.select("resources", &[]).await,
            CategorySelector::Only(c) => self.select("resources", &[("category", eq(c))]).await,
            CategorySelector::Unknown(_) => Ok(Vec::new()),
        }
    }
}
