//! Library resources: videos, tutorials and articles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a resource is built with an invalid shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("Resource id must not be empty")]
    EmptyId,

    #[error("Resource '{id}' is a {kind} but has {length}")]
    LengthMismatch {
        id: String,
        kind: ResourceKind,
        length: &'static str,
    },

    #[error("Resource '{0}' must carry either duration_seconds or read_time_minutes, not both")]
    AmbiguousLength(String),

    #[error("Resource '{0}' is missing its duration or read time")]
    MissingLength(String),

    #[error("Unknown resource category: {0}")]
    UnknownCategory(String),

    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),
}

/// Resource identifier (opaque, stable for the item's lifetime)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Library category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technique,
    Fitness,
    Health,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Technique, Category::Fitness, Category::Health];

    /// Wire name, also used by the category selector
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technique => "technique",
            Category::Fitness => "fitness",
            Category::Health => "health",
        }
    }

    /// Label shown on the category tab
    pub fn label(&self) -> &'static str {
        match self {
            Category::Technique => "Technique",
            Category::Fitness => "Fitness",
            Category::Health => "Health & Nutrition",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technique" => Ok(Category::Technique),
            "fitness" => Ok(Category::Fitness),
            "health" => Ok(Category::Health),
            _ => Err(ResourceError::UnknownCategory(s.to_string())),
        }
    }
}

/// Kind of library item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Video,
    Tutorial,
    Article,
}

impl ResourceKind {
    /// Articles are measured in reading time, everything else in playback time
    pub fn is_timed(&self) -> bool {
        !matches!(self, ResourceKind::Article)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Video => write!(f, "video"),
            ResourceKind::Tutorial => write!(f, "tutorial"),
            ResourceKind::Article => write!(f, "article"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" => Ok(ResourceKind::Video),
            "tutorial" => Ok(ResourceKind::Tutorial),
            "article" => Ok(ResourceKind::Article),
            _ => Err(ResourceError::UnknownKind(s.to_string())),
        }
    }
}

/// How long a resource takes to consume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLength {
    /// Playback length of a video or tutorial
    Duration { seconds: u32 },

    /// Estimated reading time of an article
    ReadTime { minutes: u32 },
}

impl ResourceLength {
    pub fn duration_seconds(&self) -> Option<u32> {
        match self {
            ResourceLength::Duration { seconds } => Some(*seconds),
            ResourceLength::ReadTime { .. } => None,
        }
    }

    pub fn read_time_minutes(&self) -> Option<u32> {
        match self {
            ResourceLength::ReadTime { minutes } => Some(*minutes),
            ResourceLength::Duration { .. } => None,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ResourceLength::Duration { .. } => "a playback duration",
            ResourceLength::ReadTime { .. } => "a read time",
        }
    }
}

impl fmt::Display for ResourceLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLength::Duration { seconds } => {
                write!(f, "{}:{:02}", seconds / 60, seconds % 60)
            }
            ResourceLength::ReadTime { minutes } => write!(f, "{} min", minutes),
        }
    }
}

/// A single library item
///
/// Fields are private so the kind/length pairing can only be established
/// through [`Resource::new`] (or deserialization, which goes through it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResourceRecord", into = "ResourceRecord")]
pub struct Resource {
    id: ResourceId,
    title: String,
    description: String,
    category: Category,
    kind: ResourceKind,
    length: ResourceLength,
    thumbnail: Option<String>,
}

impl Resource {
    /// Create a resource, rejecting a length that does not fit the kind
    pub fn new(
        id: impl Into<ResourceId>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        kind: ResourceKind,
        length: ResourceLength,
    ) -> Result<Self, ResourceError> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(ResourceError::EmptyId);
        }

        let fits = match length {
            ResourceLength::Duration { .. } => kind.is_timed(),
            ResourceLength::ReadTime { .. } => !kind.is_timed(),
        };
        if !fits {
            return Err(ResourceError::LengthMismatch {
                id: id.to_string(),
                kind,
                length: length.describe(),
            });
        }

        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            category,
            kind,
            length,
            thumbnail: None,
        })
    }

    /// Attach a thumbnail URL
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn length(&self) -> ResourceLength {
        self.length
    }

    pub fn duration_seconds(&self) -> Option<u32> {
        self.length.duration_seconds()
    }

    pub fn read_time_minutes(&self) -> Option<u32> {
        self.length.read_time_minutes()
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn mentions(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Flat row shape used on the wire and in storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl TryFrom<ResourceRecord> for Resource {
    type Error = ResourceError;

    fn try_from(record: ResourceRecord) -> Result<Self, Self::Error> {
        let length = match (record.duration_seconds, record.read_time_minutes) {
            (Some(seconds), None) => ResourceLength::Duration { seconds },
            (None, Some(minutes)) => ResourceLength::ReadTime { minutes },
            (Some(_), Some(_)) => return Err(ResourceError::AmbiguousLength(record.id)),
            (None, None) => return Err(ResourceError::MissingLength(record.id)),
        };

        let resource = Resource::new(
            record.id,
            record.title,
            record.description,
            record.category,
            record.kind,
            length,
        )?;

        Ok(match record.thumbnail {
            Some(url) => resource.with_thumbnail(url),
            None => resource,
        })
    }
}

impl From<Resource> for ResourceRecord {
    fn from(resource: Resource) -> Self {
        Self {
            duration_seconds: resource.duration_seconds(),
            read_time_minutes: resource.read_time_minutes(),
            id: resource.id.0,
            title: resource.title,
            description: resource.description,
            category: resource.category,
            kind: resource.kind,
            thumbnail: resource.thumbnail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_requires_read_time() {
        let err = Resource::new(
            "9",
            "Stretching 101",
            "Basics",
            Category::Fitness,
            ResourceKind::Article,
            ResourceLength::Duration { seconds: 60 },
        )
        .unwrap_err();

        assert!(matches!(err, ResourceError::LengthMismatch { .. }));
    }

    #[test]
    fn test_video_rejects_read_time() {
        let result = Resource::new(
            "9",
            "Stretching 101",
            "Basics",
            Category::Fitness,
            ResourceKind::Video,
            ResourceLength::ReadTime { minutes: 4 },
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_empty_id_rejected() {
        let result = Resource::new(
            "  ",
            "Title",
            "",
            Category::Health,
            ResourceKind::Article,
            ResourceLength::ReadTime { minutes: 4 },
        );

        assert_eq!(result.unwrap_err(), ResourceError::EmptyId);
    }

    #[test]
    fn test_length_display() {
        assert_eq!(ResourceLength::Duration { seconds: 505 }.to_string(), "8:25");
        assert_eq!(ResourceLength::Duration { seconds: 60 }.to_string(), "1:00");
        assert_eq!(ResourceLength::ReadTime { minutes: 5 }.to_string(), "5 min");
    }

    #[test]
    fn test_deserialize_rejects_both_lengths() {
        let json = r#"{
            "id": "1", "title": "t", "description": "d",
            "category": "fitness", "type": "video",
            "duration_seconds": 30, "read_time_minutes": 2
        }"#;

        let err = serde_json::from_str::<Resource>(json).unwrap_err();
        assert!(err.to_string().contains("not both"));
    }

    #[test]
    fn test_deserialize_article() {
        let json = r#"{
            "id": "3", "title": "Recovery Tips After Training", "description": "d",
            "category": "health", "type": "article", "read_time_minutes": 5
        }"#;

        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.kind(), ResourceKind::Article);
        assert_eq!(resource.read_time_minutes(), Some(5));
        assert_eq!(resource.duration_seconds(), None);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("technique".parse::<Category>().unwrap(), Category::Technique);
        assert_eq!("health".parse::<Category>().unwrap(), Category::Health);
        assert!("nutrition".parse::<Category>().is_err());
    }

    #[test]
    fn test_mentions_is_case_insensitive() {
        let resource = Resource::new(
            "2",
            "Improving Passing Accuracy",
            "Master the art of accurate passing",
            Category::Technique,
            ResourceKind::Tutorial,
            ResourceLength::Duration { seconds: 730 },
        )
        .unwrap();

        assert!(resource.mentions("passing"));
        assert!(resource.mentions("art of"));
        assert!(resource.mentions(""));
        assert!(!resource.mentions("shooting"));
    }
}
