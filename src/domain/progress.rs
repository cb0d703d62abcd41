//! Progress dashboard metrics.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Training volume for the current week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeeklyProgress {
    pub sessions_completed: u32,
    pub weekly_goal: u32,
    pub total_minutes: u32,
    pub points_earned: u32,
}

impl WeeklyProgress {
    /// Share of the weekly goal reached, in percent, capped at 100
    pub fn completion_percentage(&self) -> f64 {
        if self.weekly_goal == 0 {
            return 0.0;
        }
        let pct = f64::from(self.sessions_completed) / f64::from(self.weekly_goal) * 100.0;
        pct.min(100.0)
    }
}

/// Current and previous score for one skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMetric {
    pub name: String,
    pub current: u32,
    pub previous: u32,
}

impl SkillMetric {
    pub fn new(name: impl Into<String>, current: u32, previous: u32) -> Self {
        Self {
            name: name.into(),
            current,
            previous,
        }
    }

    /// Points gained since the previous assessment (negative on regression)
    pub fn improvement(&self) -> i64 {
        i64::from(self.current) - i64::from(self.previous)
    }
}

/// Whether a training session happened on a given weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyDay {
    pub day: Weekday,
    pub completed: bool,
}

/// Days with a completed session
pub fn completed_days(week: &[ConsistencyDay]) -> usize {
    week.iter().filter(|d| d.completed).count()
}

/// A stored progress snapshot for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub weekly: WeeklyProgress,
    #[serde(default)]
    pub skills: Vec<SkillMetric>,
    /// Which days of the week had a session
    #[serde(default)]
    pub consistency: Vec<ConsistencyDay>,
}

impl ProgressRecord {
    pub fn new(
        user_id: impl Into<String>,
        weekly: WeeklyProgress,
        skills: Vec<SkillMetric>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            date: Utc::now(),
            weekly,
            skills,
            consistency: Vec::new(),
        }
    }

    pub fn with_consistency(mut self, week: Vec<ConsistencyDay>) -> Self {
        self.consistency = week;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_percentage() {
        let weekly = WeeklyProgress {
            sessions_completed: 4,
            weekly_goal: 5,
            total_minutes: 120,
            points_earned: 350,
        };
        assert_eq!(weekly.completion_percentage(), 80.0);
    }

    #[test]
    fn test_completion_percentage_caps_and_zero_goal() {
        let over = WeeklyProgress {
            sessions_completed: 7,
            weekly_goal: 5,
            ..Default::default()
        };
        assert_eq!(over.completion_percentage(), 100.0);

        let no_goal = WeeklyProgress::default();
        assert_eq!(no_goal.completion_percentage(), 0.0);
    }

    #[test]
    fn test_skill_improvement() {
        assert_eq!(SkillMetric::new("Passing", 75, 68).improvement(), 7);
        assert_eq!(SkillMetric::new("Shooting", 50, 52).improvement(), -2);
    }

    #[test]
    fn test_completed_days() {
        let week = [
            ConsistencyDay {
                day: Weekday::Mon,
                completed: true,
            },
            ConsistencyDay {
                day: Weekday::Tue,
                completed: false,
            },
            ConsistencyDay {
                day: Weekday::Wed,
                completed: true,
            },
        ];
        assert_eq!(completed_days(&week), 2);
    }

    #[test]
    fn test_record_without_consistency_decodes() {
        let json = r#"{
            "id": "7d0f4a8e-2c1b-4f7e-9a55-1e2f3c4d5e6f",
            "user_id": "u1",
            "date": "2026-03-02T10:00:00Z",
            "weekly": {"sessions_completed": 1, "weekly_goal": 3, "total_minutes": 30, "points_earned": 50}
        }"#;
        let record: ProgressRecord = serde_json::from_str(json).unwrap();
        assert!(record.consistency.is_empty());
        assert!(record.skills.is_empty());
    }
}
