//! Command-line interface for ageless.
//!
//! Each command mirrors one surface of the app: the resource library,
//! training customization, community hub, progress dashboard and home
//! overview, plus coaching and setup commands.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;

use crate::adapters::SqliteStore;
use crate::config::{self, ResolvedConfig};
use crate::core::{build_home_overview, CoachService, DataService};
use crate::domain::{
    completed_days, search_topics, ConsistencyDay, DrillCategory, TipCategory, TrainingPlan,
    TrainingSession, TrainingSettings,
};

pub mod library;

/// ageless - training companion for soccer players 35+
#[derive(Parser, Debug)]
#[command(name = "ageless")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the resource library
    Library {
        /// Category tab: all, technique, fitness or health
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Search text (matches title or description)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Load resources from the data store instead of the catalog file
        #[arg(long)]
        remote: bool,
    },

    /// List drills
    Drills {
        /// Skill area (passing, dribbling, shooting, agility, endurance)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List saved training plans
    Plans {
        /// User ID (defaults to the configured user)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Log a training session with customized settings
    Train {
        /// Intensity 1-5
        #[arg(short, long, default_value_t = 2)]
        intensity: u8,

        /// Duration in minutes (15-60, steps of 5)
        #[arg(short, long, default_value_t = 30)]
        duration: u32,

        /// Drill IDs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        drills: Vec<String>,

        /// Session notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Also save these settings as a named plan
        #[arg(long)]
        save_plan: Option<String>,

        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show the progress dashboard
    Progress {
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List upcoming community events
    Events,

    /// List forum topics
    Topics {
        /// Search text (matches title or author)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List clubs
    Clubs,

    /// Get a personalized training suggestion
    Suggest {
        /// Player age (defaults to the configured age)
        #[arg(long)]
        age: Option<u32>,

        /// Current injuries (comma-separated)
        #[arg(long, value_delimiter = ',')]
        injuries: Vec<String>,

        #[arg(short, long)]
        user: Option<String>,
    },

    /// Get a motivational tip
    Tip {
        /// Preferred tip categories
        #[arg(short, long, value_enum, value_delimiter = ',')]
        prefer: Vec<TipKind>,
    },

    /// Get insights on recent progress
    Insights {
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Check a community post before publishing
    Moderate {
        /// Post text
        text: String,
    },

    /// Show the home overview
    Home {
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Load demo data into the local database and write the catalog file
    Seed,

    /// Show resolved configuration (debug)
    Config,
}

/// Tip category for CLI (maps to TipCategory)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TipKind {
    Motivation,
    Technique,
    Recovery,
    Nutrition,
}

impl From<TipKind> for TipCategory {
    fn from(kind: TipKind) -> Self {
        match kind {
            TipKind::Motivation => TipCategory::Motivation,
            TipKind::Technique => TipCategory::Technique,
            TipKind::Recovery => TipCategory::Recovery,
            TipKind::Nutrition => TipCategory::Nutrition,
        }
    }
}

/// Services shared by commands
struct App {
    config: &'static ResolvedConfig,
    data: DataService,
    coach: CoachService,
}

impl App {
    fn build(cancel: CancellationToken) -> Result<Self> {
        let config = config::config()?;
        let data = DataService::new(config.data_store()?)
            .with_timeout(config.timeout)
            .with_cancellation(cancel.child_token());
        let coach = CoachService::new(config.assistant()?)
            .with_timeout(config.timeout)
            .with_cancellation(cancel.child_token());

        Ok(Self {
            config,
            data,
            coach,
        })
    }

    fn user<'a>(&'a self, user: &'a Option<String>) -> &'a str {
        user.as_deref().unwrap_or(&self.config.user_id)
    }
}

impl Cli {
    /// Execute the CLI command; `cancel` aborts in-flight remote calls
    pub async fn execute(self, cancel: CancellationToken) -> Result<()> {
        match self.command {
            Commands::Config => show_config(),
            Commands::Seed => seed_local().await,
            command => {
                let app = App::build(cancel)?;
                run(&app, command).await
            }
        }
    }
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Library {
            category,
            search,
            remote,
        } => library::browse(&app.data, &app.config.catalog, &category, &search, remote).await,
        Commands::Drills { category } => list_drills(app, category).await,
        Commands::Plans { user } => list_plans(app, app.user(&user)).await,
        Commands::Train {
            intensity,
            duration,
            drills,
            notes,
            save_plan,
            user,
        } => {
            let mut settings = TrainingSettings::default();
            settings.set_intensity(intensity);
            settings.set_duration(duration);
            for drill in &drills {
                settings.select_drill(drill);
            }
            log_training(app, app.user(&user), settings, notes, save_plan).await
        }
        Commands::Progress { user } => show_progress(app, app.user(&user)).await,
        Commands::Events => list_events(app).await,
        Commands::Topics { search } => list_topics(app, search.as_deref().unwrap_or("")).await,
        Commands::Clubs => list_clubs(app).await,
        Commands::Suggest {
            age,
            injuries,
            user,
        } => suggest(app, app.user(&user), age, injuries).await,
        Commands::Tip { prefer } => {
            let preferences: Vec<TipCategory> = prefer.into_iter().map(Into::into).collect();
            let tip = app.coach.motivational_tip(&preferences).await;
            println!("[{}] {}", tip.category, tip.message);
            Ok(())
        }
        Commands::Insights { user } => {
            let records = app.data.fetch_user_progress(app.user(&user)).await;
            let insights = app.coach.performance_insights(&records).await;
            if insights.is_empty() {
                println!("No insights available right now");
            }
            for insight in insights {
                println!("• {}", insight);
            }
            Ok(())
        }
        Commands::Moderate { text } => {
            let verdict = app.coach.moderate(&text).await;
            if verdict.is_appropriate {
                println!("OK: post can be published");
            } else {
                println!(
                    "Rejected: {}",
                    verdict.reason.unwrap_or_else(|| "no reason given".to_string())
                );
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Home { user } => show_home(app, app.user(&user)).await,
        Commands::Config | Commands::Seed => unreachable!("handled before services are built"),
    }
}

/// Truncate to `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

async fn list_drills(app: &App, category: Option<String>) -> Result<()> {
    let category = category
        .map(|c| c.parse::<DrillCategory>())
        .transpose()?;
    let drills = app.data.fetch_drills(category).await;

    if drills.is_empty() {
        println!("No drills found");
        return Ok(());
    }

    println!("{:<4} {:<22} {:<11} {}", "ID", "DRILL", "AREA", "DESCRIPTION");
    println!("{}", "-".repeat(90));
    for drill in drills {
        println!(
            "{:<4} {:<22} {:<11} {}",
            drill.id,
            drill.name,
            drill.category.to_string(),
            truncate(&drill.description, 50)
        );
    }

    Ok(())
}

async fn list_plans(app: &App, user_id: &str) -> Result<()> {
    let plans = app.data.fetch_training_plans(user_id).await;

    if plans.is_empty() {
        println!("No training plans for {}", user_id);
        return Ok(());
    }

    println!("{:<38} {:<24} {:<10} {:<8} {}", "PLAN ID", "NAME", "INTENSITY", "MINUTES", "DRILLS");
    println!("{}", "-".repeat(95));
    for plan in plans {
        println!(
            "{:<38} {:<24} {:<10} {:<8} {}",
            plan.id,
            truncate(&plan.name, 24),
            plan.intensity.to_string(),
            plan.duration_minutes,
            plan.drill_ids.join(",")
        );
    }

    Ok(())
}

async fn log_training(
    app: &App,
    user_id: &str,
    settings: TrainingSettings,
    notes: Option<String>,
    save_plan: Option<String>,
) -> Result<()> {
    let mut session = TrainingSession::from_settings(user_id, &settings);
    if let Some(notes) = notes {
        session = session.with_notes(notes);
    }

    match app.data.save_training_session(&session).await {
        Some(saved) => eprintln!(
            "Logged {} min session at intensity {} ({})",
            saved.duration_minutes, saved.intensity, saved.id
        ),
        None => eprintln!("Session could not be saved right now"),
    }

    if let Some(name) = save_plan {
        let plan = TrainingPlan::new(user_id, name, &settings);
        match app.data.save_training_plan(&plan).await {
            Some(saved) => eprintln!("Saved plan '{}' ({})", saved.name, saved.id),
            None => eprintln!("Plan could not be saved right now"),
        }
    }

    Ok(())
}

async fn show_progress(app: &App, user_id: &str) -> Result<()> {
    let records = app.data.fetch_user_progress(user_id).await;

    let Some(latest) = records.first() else {
        println!("No progress recorded for {}", user_id);
        return Ok(());
    };

    let weekly = latest.weekly;
    println!("Weekly progress ({})", latest.date.format("%Y-%m-%d"));
    println!(
        "  Sessions: {}/{} ({:.0}%)",
        weekly.sessions_completed,
        weekly.weekly_goal,
        weekly.completion_percentage()
    );
    println!("  Minutes:  {}", weekly.total_minutes);
    println!("  Points:   {}", weekly.points_earned);
    println!();

    if !latest.skills.is_empty() {
        println!("{:<12} {:>8} {:>8}", "SKILL", "CURRENT", "CHANGE");
        println!("{}", "-".repeat(30));
        for skill in &latest.skills {
            println!("{:<12} {:>8} {:>+8}", skill.name, skill.current, skill.improvement());
        }
        println!();
    }

    if let Some(line) = consistency_line(&latest.consistency) {
        println!("{}", line);
    }

    Ok(())
}

/// One-line week summary, `None` when the record has no day data
fn consistency_line(week: &[ConsistencyDay]) -> Option<String> {
    if week.is_empty() {
        return None;
    }

    let marks: Vec<String> = week
        .iter()
        .map(|d| format!("{}:{}", d.day, if d.completed { "✓" } else { "·" }))
        .collect();
    Some(format!(
        "Consistency: {} ({} of {} days)",
        marks.join(" "),
        completed_days(week),
        week.len()
    ))
}

async fn list_events(app: &App) -> Result<()> {
    let events = app.data.fetch_community_events().await;

    if events.is_empty() {
        println!("No upcoming events");
        return Ok(());
    }

    println!("{:<18} {:<26} {:<28} {}", "DATE", "EVENT", "LOCATION", "GOING");
    println!("{}", "-".repeat(80));
    for event in events {
        println!(
            "{:<18} {:<26} {:<28} {}",
            event.date.format("%a %b %d %H:%M").to_string(),
            truncate(&event.title, 26),
            truncate(&event.location, 28),
            event.participants
        );
    }

    Ok(())
}

async fn list_topics(app: &App, query: &str) -> Result<()> {
    let topics = app.data.fetch_forum_topics().await;
    let matches = search_topics(&topics, query);

    if matches.is_empty() {
        println!("No forum topics found");
        return Ok(());
    }

    println!("{:<48} {:<16} {:>7}  {}", "TOPIC", "AUTHOR", "REPLIES", "LAST ACTIVE");
    println!("{}", "-".repeat(90));
    for topic in matches {
        println!(
            "{:<48} {:<16} {:>7}  {}",
            truncate(&topic.title, 48),
            truncate(&topic.author, 16),
            topic.replies,
            topic.last_activity.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

async fn list_clubs(app: &App) -> Result<()> {
    let clubs = app.data.fetch_clubs().await;

    if clubs.is_empty() {
        println!("No clubs found");
        return Ok(());
    }

    for club in clubs {
        println!("{} ({} members)", club.name, club.members);
        println!("  {}", club.description);
    }

    Ok(())
}

async fn suggest(app: &App, user_id: &str, age: Option<u32>, injuries: Vec<String>) -> Result<()> {
    let age = age
        .or(app.config.user_age)
        .context("Player age unknown. Pass --age or set user.age in .ageless/config.yaml")?;

    let profile = injuries
        .into_iter()
        .fold(app.data.player_profile(user_id, age).await, |profile, injury| {
            profile.with_injury(injury)
        });

    let suggestion = app.coach.training_suggestion(&profile).await;
    println!("{}", suggestion.suggestion);
    if !suggestion.reasoning.is_empty() {
        println!("\nWhy: {}", suggestion.reasoning);
    }
    println!("\nIntensity: {}", suggestion.intensity);
    if !suggestion.focus_areas.is_empty() {
        println!("Focus: {}", suggestion.focus_areas.join(", "));
    }

    Ok(())
}

async fn show_home(app: &App, user_id: &str) -> Result<()> {
    let overview = build_home_overview(&app.data, &app.coach, user_id, Utc::now()).await;

    println!("Today's Training");
    match &overview.featured_drill {
        Some(drill) => println!("  {}: {}", drill.name, drill.description),
        None => println!("  Pick a drill to get started"),
    }
    println!();

    println!("Community");
    match &overview.next_event {
        Some(event) => println!(
            "  {} at {} on {} ({} going)",
            event.title,
            event.location,
            event.date.format("%A %H:%M"),
            event.participants
        ),
        None => println!("  No upcoming events"),
    }
    println!();

    println!("Your Progress");
    match &overview.weekly {
        Some(weekly) => println!(
            "  {} of {} sessions this week",
            weekly.sessions_completed, weekly.weekly_goal
        ),
        None => println!("  No sessions logged yet"),
    }
    println!();

    println!("Tip of the Day");
    println!("  \"{}\"", overview.tip.message);

    Ok(())
}

/// Seed the local database and write the built-in catalog
async fn seed_local() -> Result<()> {
    let cfg = config::config()?;

    let store = SqliteStore::open(&cfg.database)
        .with_context(|| format!("Failed to open database: {}", cfg.database.display()))?;
    store.seed().await.context("Failed to seed database")?;
    eprintln!("Seeded {}", cfg.database.display());

    let catalog = crate::library::ResourceCatalog::seed();
    catalog.save(&cfg.catalog).await?;
    eprintln!("Wrote {} resources to {}", catalog.len(), cfg.catalog.display());

    if cfg.backend.is_some() {
        eprintln!("Note: a hosted backend is configured; seeding only touched local files");
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("ageless configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:     {}", cfg.home.display());
    println!("  Database: {}", cfg.database.display());
    println!("  Catalog:  {}", cfg.catalog.display());
    println!();
    println!("Backend:");
    match &cfg.backend {
        Some(backend) => println!("  Hosted: {}", backend.url),
        None => println!("  Local SQLite"),
    }
    println!();
    println!("Assistant:");
    if cfg.assistant.api_key.is_some() {
        println!("  Model:    {}", cfg.assistant.model);
        println!("  Base URL: {}", cfg.assistant.base_url);
    } else {
        println!("  Canned responses (set OPENAI_API_KEY to use a model)");
    }
    println!("  Timeout:  {}s", cfg.timeout.as_secs());
    println!();
    println!("User: {}", cfg.user_id);
    if let Some(age) = cfg.user_age {
        println!("Age:  {}", age);
    }

    Ok(())
}
