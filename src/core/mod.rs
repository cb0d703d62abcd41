//! Service layer between adapters and the presentation layer.
//!
//! This module contains:
//! - guard: timeout/cancellation boundary that turns failures into `None`
//! - DataService: store access that degrades to empty collections
//! - CoachService: assistant access that degrades to static content
//! - home: the overview composed for the home screen

pub mod coach;
pub mod data;
pub mod guard;
pub mod home;

pub use coach::{fallback_suggestion, fallback_tip, CoachService};
pub use data::DataService;
pub use guard::{guard, Outcome, DEFAULT_TIMEOUT};
pub use home::{build_home_overview, HomeOverview};
