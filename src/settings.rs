//! Solver and gameplay tuning
//!
//! Every field has a default, so a settings file only needs the values it
//! overrides.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::GameTuning;
use crate::sim::{Arena, BodyConfig, SolverConfig};

/// Failure to read a settings file
#[derive(Debug)]
pub enum SettingsError {
    /// The file could not be read
    Io(std::io::Error),
    /// The file is not valid settings JSON
    Parse(serde_json::Error),
    /// The values parse but cannot build a game
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "could not read settings: {e}"),
            Self::Parse(e) => write!(f, "invalid settings: {e}"),
            Self::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playfield; the snake dies when its head leaves it
    pub arena: Arena,
    /// Snake chain layout
    pub body: BodyConfig,
    /// PBD solver tuning
    pub solver: SolverConfig,
    /// Food, enemy and projectile tuning
    pub tuning: GameTuning,
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the snake body cannot be built from
    pub fn validate(&self) -> Result<(), SettingsError> {
        let body = &self.body;
        if body.initial_length == 0 {
            return Err(SettingsError::Invalid("body.initial_length must be at least 1".into()));
        }
        if body.radius.is_nan() || body.radius <= 0.0 {
            return Err(SettingsError::Invalid(format!("body.radius must be positive, got {}", body.radius)));
        }
        if body.initial_spacing.is_nan() || body.initial_spacing <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "body.initial_spacing must be positive, got {}",
                body.initial_spacing
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "solver": { "substeps": 6 } }"#).unwrap();
        assert_eq!(settings.solver.substeps, 6);
        assert_eq!(settings.solver.friction, SolverConfig::default().friction);
        assert_eq!(settings.body, BodyConfig::default());
        assert_eq!(settings.arena, Arena::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.solver.trailing_separation = true;
        settings.tuning.max_enemies = 5;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("invalid settings"));
    }

    #[test]
    fn test_empty_body_is_rejected() {
        let err = Settings::from_json(r#"{ "body": { "initial_length": 0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(err.to_string().contains("initial_length"));
    }

    #[test]
    fn test_non_positive_body_geometry_is_rejected() {
        for json in [
            r#"{ "body": { "radius": 0.0 } }"#,
            r#"{ "body": { "radius": -0.1 } }"#,
            r#"{ "body": { "initial_spacing": 0.0 } }"#,
        ] {
            assert!(matches!(Settings::from_json(json), Err(SettingsError::Invalid(_))), "{json}");
        }
    }

    #[test]
    fn test_invalid_file_falls_back_to_a_playable_game() {
        let path = std::env::temp_dir().join(format!("serpent-settings-empty-body-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "body": { "initial_length": 0 } }"#).unwrap();
        let settings = Settings::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings, Settings::default());
        let state = crate::game::GameState::new(1, settings);
        assert_eq!(state.snake.particle_count(), crate::consts::INITIAL_LENGTH);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("serpent-settings-does-not-exist.json");
        assert!(matches!(Settings::load(&path), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
