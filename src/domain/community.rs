//! Community hub: forum topics, events and clubs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A forum discussion thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumTopic {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub replies: u32,
    pub last_activity: DateTime<Utc>,
}

impl ForumTopic {
    /// Case-insensitive match on title or author; empty query matches everything
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        query.is_empty()
            || self.title.to_lowercase().contains(&query)
            || self.author.to_lowercase().contains(&query)
    }
}

/// Search forum topics, keeping their order
pub fn search_topics<'a>(topics: &'a [ForumTopic], query: &str) -> Vec<&'a ForumTopic> {
    topics.iter().filter(|t| t.matches(query)).collect()
}

/// A scheduled community event (friendly match, workshop, tournament)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityEvent {
    pub id: String,
    pub title: String,
    pub location: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub participants: u32,
}

/// The first event at or after `now`, assuming `events` ascends by date
pub fn next_event(events: &[CommunityEvent], now: DateTime<Utc>) -> Option<&CommunityEvent> {
    events.iter().find(|e| e.date >= now)
}

/// A club players can join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: u32,
    pub description: String,
}
