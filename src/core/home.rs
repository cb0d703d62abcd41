//! Home screen overview.

use chrono::{DateTime, Utc};

use super::{CoachService, DataService};
use crate::domain::{
    next_event, CommunityEvent, Drill, DrillCategory, MotivationalTip, WeeklyProgress,
};

/// Everything the home screen shows at a glance
#[derive(Debug, Clone, PartialEq)]
pub struct HomeOverview {
    /// Drill highlighted in "Today's Training"
    pub featured_drill: Option<Drill>,
    pub next_event: Option<CommunityEvent>,
    /// Latest weekly snapshot for the user
    pub weekly: Option<WeeklyProgress>,
    pub tip: MotivationalTip,
}

/// Gather the overview, fetching independent parts concurrently
pub async fn build_home_overview(
    data: &DataService,
    coach: &CoachService,
    user_id: &str,
    now: DateTime<Utc>,
) -> HomeOverview {
    let (drills, events, progress, tip) = tokio::join!(
        data.fetch_drills(Some(DrillCategory::Passing)),
        data.fetch_community_events(),
        data.fetch_user_progress(user_id),
        coach.motivational_tip(&[]),
    );

    HomeOverview {
        featured_drill: drills.into_iter().next(),
        next_event: next_event(&events, now).cloned(),
        weekly: progress.first().map(|r| r.weekly),
        tip,
    }
}
