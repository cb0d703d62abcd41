//! Domain types for the training companion.
//!
//! - Training: drills, customization settings, plans and sessions
//! - Community: forum topics, events, clubs
//! - Progress: weekly volume, skill metrics, stored snapshots
//! - Coaching: profile and assistant outputs

pub mod coaching;
pub mod community;
pub mod progress;
pub mod training;

pub use coaching::{
    ModerationVerdict, MotivationalTip, PlayerProfile, TipCategory, TrainingSuggestion,
};
pub use community::{next_event, search_topics, Club, CommunityEvent, ForumTopic};
pub use progress::{completed_days, ConsistencyDay, ProgressRecord, SkillMetric, WeeklyProgress};
pub use training::{
    Drill, DrillCategory, Intensity, TrainingPlan, TrainingSession, TrainingSettings,
};
