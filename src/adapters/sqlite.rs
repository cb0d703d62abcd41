//! Local relational backend on SQLite.
//!
//! Each table keeps the columns used for filtering and ordering alongside
//! the full row as JSON in `data`. Timestamps are stored as fixed-width
//! RFC 3339 strings so lexical order is chronological.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params_from_iter, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::{DataStore, StoreError, PROGRESS_LIMIT, SESSION_LIMIT};
use crate::domain::{
    Club, CommunityEvent, Drill, DrillCategory, ForumTopic, ProgressRecord, SkillMetric,
    TrainingPlan, TrainingSession,
};
use crate::library::{CategorySelector, Resource};
use crate::seed;

/// User the demo progress history belongs to
pub const DEMO_USER: &str = "demo";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS drills (
    id TEXT PRIMARY KEY,
    category TEXT NOT NULL,
    data TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS training_plans (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    data TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS training_sessions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    completed_at TEXT NOT NULL,
    data TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS user_progress (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    date TEXT NOT NULL,
    data TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS community_events (
    id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    data TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS forum_topics (
    id TEXT PRIMARY KEY,
    last_activity TEXT NOT NULL,
    data TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS clubs (
    id TEXT PRIMARY KEY,
    data TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS resources (
    id TEXT PRIMARY KEY,
    category TEXT NOT NULL,
    data TEXT NOT NULL
);
";

/// SQLite-backed data store
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut guard)
        })
        .await?
    }

    /// Load the built-in demo data, replacing rows with the same ids
    pub async fn seed(&self) -> Result<(), StoreError> {
        let now = Utc::now();
        let demo_progress =
            ProgressRecord::new(DEMO_USER, seed::weekly_progress(), seed::skill_metrics())
                .with_consistency(seed::consistency_week());
        let earlier_progress = ProgressRecord {
            date: now - chrono::Duration::days(7),
            ..ProgressRecord::new(
                DEMO_USER,
                crate::domain::WeeklyProgress {
                    sessions_completed: 3,
                    weekly_goal: 5,
                    total_minutes: 90,
                    points_earned: 240,
                },
                seed::skill_metrics()
                    .into_iter()
                    .map(|m| SkillMetric::new(m.name, m.previous, m.previous))
                    .collect(),
            )
        };

        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            for drill in seed::drills() {
                upsert(
                    &tx,
                    "drills",
                    &["id", "category"],
                    &[drill.id.clone(), drill.category.to_string()],
                    &drill,
                )?;
            }
            for resource in seed::resources() {
                upsert(
                    &tx,
                    "resources",
                    &["id", "category"],
                    &[resource.id().to_string(), resource.category().to_string()],
                    &resource,
                )?;
            }
            for event in seed::community_events(now) {
                upsert(
                    &tx,
                    "community_events",
                    &["id", "date"],
                    &[event.id.clone(), timestamp(&event.date)],
                    &event,
                )?;
            }
            for topic in seed::forum_topics(now) {
                upsert(
                    &tx,
                    "forum_topics",
                    &["id", "last_activity"],
                    &[topic.id.clone(), timestamp(&topic.last_activity)],
                    &topic,
                )?;
            }
            for club in seed::clubs() {
                upsert(&tx, "clubs", &["id"], &[club.id.clone()], &club)?;
            }
            for record in [earlier_progress, demo_progress] {
                upsert(
                    &tx,
                    "user_progress",
                    &["id", "user_id", "date"],
                    &[record.id.to_string(), record.user_id.clone(), timestamp(&record.date)],
                    &record,
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await?;

        info!("Seeded local database with demo data");
        Ok(())
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Insert or replace one row; `values` line up with `columns`, `data` is the JSON body
fn upsert<T: Serialize>(
    conn: &Connection,
    table: &str,
    columns: &[&str],
    values: &[String],
    row: &T,
) -> Result<(), StoreError> {
    let data = serde_json::to_string(row)?;
    let placeholders = vec!["?"; columns.len() + 1].join(", ");
    let sql = format!(
        "INSERT OR REPLACE INTO {} ({}, data) VALUES ({})",
        table,
        columns.join(", "),
        placeholders
    );

    let params = values.iter().cloned().chain(std::iter::once(data));
    conn.execute(&sql, params_from_iter(params))?;
    Ok(())
}

/// Run a query selecting a single `data` column and decode every row
fn select_json<T: DeserializeOwned>(
    conn: &Connection,
    sql: &str,
    params: Vec<String>,
) -> Result<Vec<T>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(params), |row| row.get::<_, String>(0))?;

    let mut items = Vec::new();
    for data in rows {
        items.push(serde_json::from_str(&data?)?);
    }
    Ok(items)
}

impl SqliteStore {
    async fn select<T>(
        &self,
        sql: impl Into<String>,
        params: Vec<String>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let sql = sql.into();
        debug!(sql = %sql, "Selecting rows");
        self.with_conn(move |conn| select_json(conn, &sql, params)).await
    }

    async fn save<T>(
        &self,
        table: &'static str,
        columns: &'static [&'static str],
        values: Vec<String>,
        row: &T,
    ) -> Result<T, StoreError>
    where
        T: Serialize + Clone + Send + 'static,
    {
        let row = row.clone();
        self.with_conn(move |conn| {
            upsert(conn, table, columns, &values, &row)?;
            Ok(row)
        })
        .await
    }
}

#[async_trait]
impl DataStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn fetch_training_plans(&self, user_id: &str) -> Result<Vec<TrainingPlan>, StoreError> {
        self.select(
            "SELECT data FROM training_plans WHERE user_id = ?1 ORDER BY created_at",
            vec![user_id.to_string()],
        )
        .await
    }

    async fn fetch_drills(
        &self,
        category: Option<DrillCategory>,
    ) -> Result<Vec<Drill>, StoreError> {
        match category {
            Some(c) => {
                self.select(
                    "SELECT data FROM drills WHERE category = ?1 ORDER BY rowid",
                    vec![c.to_string()],
                )
                .await
            }
            None => self.select("SELECT data FROM drills ORDER BY rowid", Vec::new()).await,
        }
    }

    async fn save_training_plan(&self, plan: &TrainingPlan) -> Result<TrainingPlan, StoreError> {
        self.save(
            "training_plans",
            &["id", "user_id", "created_at"],
            vec![plan.id.to_string(), plan.user_id.clone(), timestamp(&plan.created_at)],
            plan,
        )
        .await
    }

    async fn save_training_session(
        &self,
        session: &TrainingSession,
    ) -> Result<TrainingSession, StoreError> {
        self.save(
            "training_sessions",
            &["id", "user_id", "completed_at"],
            vec![
                session.id.to_string(),
                session.user_id.clone(),
                timestamp(&session.completed_at),
            ],
            session,
        )
        .await
    }

    async fn fetch_training_sessions(
        &self,
        user_id: &str,
    ) -> Result<Vec<TrainingSession>, StoreError> {
        self.select(
            format!(
                "SELECT data FROM training_sessions WHERE user_id = ?1 \
                 ORDER BY completed_at DESC LIMIT {}",
                SESSION_LIMIT
            ),
            vec![user_id.to_string()],
        )
        .await
    }

    async fn fetch_user_progress(&self, user_id: &str) -> Result<Vec<ProgressRecord>, StoreError> {
        self.select(
            format!(
                "SELECT data FROM user_progress WHERE user_id = ?1 ORDER BY date DESC LIMIT {}",
                PROGRESS_LIMIT
            ),
            vec![user_id.to_string()],
        )
        .await
    }

    async fn save_progress_record(
        &self,
        record: &ProgressRecord,
    ) -> Result<ProgressRecord, StoreError> {
        self.save(
            "user_progress",
            &["id", "user_id", "date"],
            vec![record.id.to_string(), record.user_id.clone(), timestamp(&record.date)],
            record,
        )
        .await
    }

    async fn fetch_community_events(&self) -> Result<Vec<CommunityEvent>, StoreError> {
        self.select("SELECT data FROM community_events ORDER BY date ASC", Vec::new())
            .await
    }

    async fn fetch_forum_topics(&self) -> Result<Vec<ForumTopic>, StoreError> {
        self.select("SELECT data FROM forum_topics ORDER BY last_activity DESC", Vec::new())
            .await
    }

    async fn fetch_clubs(&self) -> Result<Vec<Club>, StoreError> {
        self.select("SELECT data FROM clubs ORDER BY rowid", Vec::new()).await
    }

    async fn fetch_resources(
        &self,
        category: &CategorySelector,
    ) -> Result<Vec<Resource>, StoreError> {
        match category {
            CategorySelector::All => {
                self.select("SELECT data FROM resources ORDER BY rowid", Vec::new())
                    .await
            }
            CategorySelector::Only(c) => {
                self.select(
                    "SELECT data FROM resources WHERE category = ?1 ORDER BY rowid",
                    vec![c.to_string()],
                )
                .await
            }
            CategorySelector::Unknown(_) => Ok(Vec::new()),
        }
    }
}
