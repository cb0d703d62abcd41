//! Drills, training plans and logged sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Training intensity on a 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Create an intensity, clamping into 1..=5
    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(2)
    }
}

/// Accepts any JSON number; model output is rounded and clamped rather than rejected
impl<'de> Deserialize<'de> for Intensity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = f64::deserialize(deserializer)?.round();
        if level.is_nan() {
            return Ok(Self::default());
        }
        Ok(Self(level.clamp(f64::from(Self::MIN), f64::from(Self::MAX)) as u8))
    }
}

impl From<u8> for Intensity {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

impl From<Intensity> for u8 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Skill area a drill trains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillCategory {
    Passing,
    Dribbling,
    Shooting,
    Agility,
    Endurance,
}

impl DrillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrillCategory::Passing => "passing",
            DrillCategory::Dribbling => "dribbling",
            DrillCategory::Shooting => "shooting",
            DrillCategory::Agility => "agility",
            DrillCategory::Endurance => "endurance",
        }
    }
}

impl std::fmt::Display for DrillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DrillCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "passing" => Ok(DrillCategory::Passing),
            "dribbling" => Ok(DrillCategory::Dribbling),
            "shooting" => Ok(DrillCategory::Shooting),
            "agility" => Ok(DrillCategory::Agility),
            "endurance" => Ok(DrillCategory::Endurance),
            _ => anyhow::bail!("Unknown drill category: {}", s),
        }
    }
}

/// A single drill from the drill library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: DrillCategory,
}

impl Drill {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: DrillCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
        }
    }
}

/// Customization state of the training screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSettings {
    intensity: Intensity,
    duration_minutes: u32,
    selected_drills: Vec<String>,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            intensity: Intensity::default(),
            duration_minutes: 30,
            selected_drills: Vec::new(),
        }
    }
}

impl TrainingSettings {
    pub const MIN_DURATION: u32 = 15;
    pub const MAX_DURATION: u32 = 60;
    pub const DURATION_STEP: u32 = 5;

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Selected drill ids in the order they were picked
    pub fn selected_drills(&self) -> &[String] {
        &self.selected_drills
    }

    pub fn set_intensity(&mut self, level: u8) {
        self.intensity = Intensity::new(level);
    }

    /// Set the session length, clamped to 15..=60 and rounded to the nearest 5
    pub fn set_duration(&mut self, minutes: u32) {
        let clamped = minutes.clamp(Self::MIN_DURATION, Self::MAX_DURATION);
        let step = Self::DURATION_STEP;
        let snapped = (clamped + step / 2) / step * step;
        self.duration_minutes = snapped.min(Self::MAX_DURATION);
    }

    /// Select the drill if unselected, otherwise deselect it.
    ///
    /// Returns whether the drill is selected afterwards.
    pub fn toggle_drill(&mut self, drill_id: &str) -> bool {
        if let Some(pos) = self.selected_drills.iter().position(|id| id == drill_id) {
            self.selected_drills.remove(pos);
            false
        } else {
            self.selected_drills.push(drill_id.to_string());
            true
        }
    }

    /// Select the drill unless it already is; repeated ids are ignored
    pub fn select_drill(&mut self, drill_id: &str) -> bool {
        if self.is_selected(drill_id) {
            return false;
        }
        self.selected_drills.push(drill_id.to_string());
        true
    }

    pub fn is_selected(&self, drill_id: &str) -> bool {
        self.selected_drills.iter().any(|id| id == drill_id)
    }
}

/// A stored training plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub drill_ids: Vec<String>,
    pub intensity: Intensity,
    pub duration_minutes: u32,
    pub created_at: DateTime<Utc>,
}

impl TrainingPlan {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        settings: &TrainingSettings,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: name.into(),
            drill_ids: settings.selected_drills.clone(),
            intensity: settings.intensity,
            duration_minutes: settings.duration_minutes,
            created_at: Utc::now(),
        }
    }
}

/// A completed training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: Uuid,
    pub user_id: String,
    pub intensity: Intensity,
    pub duration_minutes: u32,
    #[serde(default)]
    pub drill_ids: Vec<String>,
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TrainingSession {
    /// Record a session from the current training settings
    pub fn from_settings(user_id: impl Into<String>, settings: &TrainingSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            intensity: settings.intensity,
            duration_minutes: settings.duration_minutes,
            drill_ids: settings.selected_drills.clone(),
            completed_at: Utc::now(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_clamps() {
        assert_eq!(Intensity::new(0).level(), 1);
        assert_eq!(Intensity::new(3).level(), 3);
        assert_eq!(Intensity::new(9).level(), 5);
        assert_eq!(Intensity::default().level(), 2);
    }

    #[test]
    fn test_intensity_deserialize_clamps() {
        let intensity: Intensity = serde_json::from_str("7").unwrap();
        assert_eq!(intensity.level(), 5);
    }

    #[test]
    fn test_intensity_deserialize_any_number() {
        let parse = |json: &str| serde_json::from_str::<Intensity>(json).unwrap().level();
        assert_eq!(parse("6000"), 5);
        assert_eq!(parse("-1"), 1);
        assert_eq!(parse("3.0"), 3);
        assert_eq!(parse("2.6"), 3);
        assert!(serde_json::from_str::<Intensity>("\"high\"").is_err());
    }

    #[test]
    fn test_duration_snaps_to_steps() {
        let mut settings = TrainingSettings::default();
        assert_eq!(settings.duration_minutes(), 30);

        settings.set_duration(42);
        assert_eq!(settings.duration_minutes(), 40);

        settings.set_duration(43);
        assert_eq!(settings.duration_minutes(), 45);

        settings.set_duration(5);
        assert_eq!(settings.duration_minutes(), 15);

        settings.set_duration(90);
        assert_eq!(settings.duration_minutes(), 60);
    }

    #[test]
    fn test_toggle_drill_keeps_selection_order() {
        let mut settings = TrainingSettings::default();
        assert!(settings.toggle_drill("4"));
        assert!(settings.toggle_drill("1"));
        assert!(settings.toggle_drill("3"));
        assert!(!settings.toggle_drill("1"));

        assert_eq!(settings.selected_drills(), &["4".to_string(), "3".to_string()]);
        assert!(settings.is_selected("3"));
        assert!(!settings.is_selected("1"));
    }

    #[test]
    fn test_select_drill_ignores_repeats() {
        let mut settings = TrainingSettings::default();
        assert!(settings.select_drill("1"));
        assert!(!settings.select_drill("1"));
        assert!(settings.select_drill("4"));

        assert_eq!(settings.selected_drills(), &["1".to_string(), "4".to_string()]);
    }

    #[test]
    fn test_session_from_settings() {
        let mut settings = TrainingSettings::default();
        settings.set_intensity(4);
        settings.set_duration(45);
        settings.toggle_drill("2");

        let session = TrainingSession::from_settings("user-1", &settings).with_notes("felt good");
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.intensity.level(), 4);
        assert_eq!(session.duration_minutes, 45);
        assert_eq!(session.drill_ids, vec!["2".to_string()]);
        assert_eq!(session.notes.as_deref(), Some("felt good"));
    }

    #[test]
    fn test_drill_category_from_str() {
        assert_eq!("Agility".parse::<DrillCategory>().unwrap(), DrillCategory::Agility);
        assert!("heading".parse::<DrillCategory>().is_err());
    }
}
