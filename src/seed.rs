//! Built-in demo data.
//!
//! Used by the offline store and the canned assistant so every surface has
//! something to show before a backend is configured.

use chrono::{DateTime, Duration, Utc, Weekday};
use tracing::warn;

use crate::domain::{
    Club, CommunityEvent, ConsistencyDay, Drill, DrillCategory, ForumTopic, MotivationalTip,
    SkillMetric, TipCategory, WeeklyProgress,
};
use crate::library::{Category, Resource, ResourceKind, ResourceLength};

const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/150";

const LAST_RESORT_TIP: &str = "Every session counts. Show up, warm up and enjoy the ball.";

struct SeedResource {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: Category,
    kind: ResourceKind,
    length: ResourceLength,
}

const fn timed(seconds: u32) -> ResourceLength {
    ResourceLength::Duration { seconds }
}

const fn read(minutes: u32) -> ResourceLength {
    ResourceLength::ReadTime { minutes }
}

const RESOURCES: [SeedResource; 8] = [
    SeedResource {
        id: "1",
        title: "Proper Warm-up Routine for 35+ Players",
        description: "Learn the essential warm-up exercises to prevent injuries and prepare your body for training.",
        category: Category::Fitness,
        kind: ResourceKind::Video,
        length: timed(8 * 60 + 25),
    },
    SeedResource {
        id: "2",
        title: "Improving Passing Accuracy",
        description: "Master the art of accurate passing with these specialized drills and techniques.",
        category: Category::Technique,
        kind: ResourceKind::Tutorial,
        length: timed(12 * 60 + 10),
    },
    SeedResource {
        id: "3",
        title: "Recovery Tips After Training",
        description: "Essential recovery strategies to help your body recuperate faster after intense training sessions.",
        category: Category::Health,
        kind: ResourceKind::Article,
        length: read(5),
    },
    SeedResource {
        id: "4",
        title: "Dribbling Techniques for Tight Spaces",
        description: "Learn how to maintain ball control in congested areas with these effective dribbling techniques.",
        category: Category::Technique,
        kind: ResourceKind::Video,
        length: timed(15 * 60 + 45),
    },
    SeedResource {
        id: "5",
        title: "Nutrition Guide for Soccer Players Over 35",
        description: "Optimize your diet to support performance and recovery with this comprehensive nutrition guide.",
        category: Category::Health,
        kind: ResourceKind::Article,
        length: read(8),
    },
    SeedResource {
        id: "6",
        title: "Improving Your Weak Foot",
        description: "Practical exercises to develop better control and confidence with your non-dominant foot.",
        category: Category::Technique,
        kind: ResourceKind::Tutorial,
        length: timed(10 * 60 + 30),
    },
    SeedResource {
        id: "7",
        title: "Preventing Common Soccer Injuries",
        description: "Learn preventative measures and exercises to avoid common soccer-related injuries.",
        category: Category::Health,
        kind: ResourceKind::Video,
        length: timed(18 * 60 + 15),
    },
    SeedResource {
        id: "8",
        title: "Cardio Workouts for Soccer Fitness",
        description: "Effective cardio routines designed specifically to improve your stamina on the soccer field.",
        category: Category::Fitness,
        kind: ResourceKind::Tutorial,
        length: timed(14 * 60 + 20),
    },
];

/// The eight library resources, ids "1" through "8"
pub fn resources() -> Vec<Resource> {
    RESOURCES
        .iter()
        .filter_map(|s| {
            match Resource::new(s.id, s.title, s.description, s.category, s.kind, s.length) {
                Ok(resource) => Some(resource.with_thumbnail(PLACEHOLDER_THUMBNAIL)),
                Err(e) => {
                    warn!(id = s.id, error = %e, "Skipping invalid built-in resource");
                    None
                }
            }
        })
        .collect()
}

pub fn drills() -> Vec<Drill> {
    vec![
        Drill::new(
            "1",
            "Passing Accuracy",
            "Improve your passing precision with stationary targets",
            DrillCategory::Passing,
        ),
        Drill::new(
            "2",
            "Dribbling Control",
            "Enhance ball control while navigating through cones",
            DrillCategory::Dribbling,
        ),
        Drill::new(
            "3",
            "Shooting Practice",
            "Work on your shooting technique with various angles",
            DrillCategory::Shooting,
        ),
        Drill::new(
            "4",
            "Agility Training",
            "Improve your footwork and quick direction changes",
            DrillCategory::Agility,
        ),
        Drill::new(
            "5",
            "Endurance Building",
            "Build stamina with interval training exercises",
            DrillCategory::Endurance,
        ),
    ]
}

/// Forum topics, most recently active first
pub fn forum_topics(now: DateTime<Utc>) -> Vec<ForumTopic> {
    let topic = |id: &str, title: &str, author: &str, replies: u32, ago: Duration| ForumTopic {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        replies,
        last_activity: now - ago,
    };

    vec![
        topic("1", "Best warm-up routines for 35+ players", "SoccerVet", 12, Duration::hours(2)),
        topic(
            "2",
            "Dealing with knee pain during practice",
            "MidfielderMike",
            8,
            Duration::hours(5),
        ),
        topic("3", "Weekend pickup games in Central Park", "NYSoccerFan", 15, Duration::days(1)),
        topic("4", "Nutrition tips for recovery after training", "FitAt40", 7, Duration::days(2)),
        topic("5", "Recommended cleats for artificial turf", "GearGuru", 10, Duration::days(3)),
    ]
}

/// Upcoming events, soonest first
pub fn community_events(now: DateTime<Utc>) -> Vec<CommunityEvent> {
    let event = |id: &str, title: &str, location: &str, ahead: Duration, participants: u32| {
        CommunityEvent {
            id: id.to_string(),
            title: title.to_string(),
            location: location.to_string(),
            date: now + ahead,
            participants,
        }
    };

    vec![
        event("1", "Weekend Friendly Match", "Central Park Field #3", Duration::days(2), 12),
        event("2", "Skills Workshop", "Community Center", Duration::days(3), 8),
        event("3", "Monthly Tournament", "Riverside Soccer Complex", Duration::days(9), 24),
    ]
}

pub fn clubs() -> Vec<Club> {
    let club = |id: &str, name: &str, members: u32, description: &str| Club {
        id: id.to_string(),
        name: name.to_string(),
        members,
        description: description.to_string(),
    };

    vec![
        club(
            "1",
            "Weekend Warriors",
            28,
            "Casual players who meet on weekends for friendly matches",
        ),
        club(
            "2",
            "Technique Masters",
            15,
            "Focus on improving technical skills through specialized drills",
        ),
        club("3", "Fitness First", 20, "Emphasis on maintaining fitness while enjoying soccer"),
    ]
}

pub fn motivational_tips() -> Vec<MotivationalTip> {
    vec![
        MotivationalTip::new(
            "Consistency is key for improvement at any age. Even 15 minutes of practice daily can lead to significant skill development over time.",
            TipCategory::Motivation,
        ),
        MotivationalTip::new(
            "Recovery is just as important as training, especially for players over 35. Make sure to incorporate proper stretching and rest days into your routine.",
            TipCategory::Recovery,
        ),
        MotivationalTip::new(
            "When practicing passing, focus on your non-dominant foot as well. This will make you a more versatile player and improve your overall control.",
            TipCategory::Technique,
        ),
        MotivationalTip::new(
            "Hydration affects performance significantly. Try to drink water consistently throughout the day, not just during training sessions.",
            TipCategory::Nutrition,
        ),
    ]
}

/// The first built-in tip
pub fn default_tip() -> MotivationalTip {
    motivational_tips()
        .into_iter()
        .next()
        .unwrap_or_else(|| MotivationalTip::new(LAST_RESORT_TIP, TipCategory::Motivation))
}

pub fn performance_insights() -> Vec<String> {
    vec![
        "Your passing accuracy has improved by 7% this month. Keep focusing on the passing drills!".to_string(),
        "Your endurance is showing great improvement. Consider increasing training intensity next week.".to_string(),
        "You've been consistent with weekday training. Adding one weekend session could boost your progress.".to_string(),
    ]
}

pub fn weekly_progress() -> WeeklyProgress {
    WeeklyProgress {
        sessions_completed: 4,
        weekly_goal: 5,
        total_minutes: 120,
        points_earned: 350,
    }
}

pub fn skill_metrics() -> Vec<SkillMetric> {
    vec![
        SkillMetric::new("Passing", 75, 68),
        SkillMetric::new("Dribbling", 62, 60),
        SkillMetric::new("Shooting", 58, 52),
        SkillMetric::new("Agility", 70, 65),
        SkillMetric::new("Endurance", 80, 72),
    ]
}

pub fn consistency_week() -> Vec<ConsistencyDay> {
    [
        (Weekday::Mon, true),
        (Weekday::Tue, true),
        (Weekday::Wed, false),
        (Weekday::Thu, true),
        (Weekday::Fri, true),
        (Weekday::Sat, false),
        (Weekday::Sun, false),
    ]
    .into_iter()
    .map(|(day, completed)| ConsistencyDay { day, completed })
    .collect()
}
