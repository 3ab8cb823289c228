//! Application settings, read from `config.toml`, `ATTENDANCE__*` environment variables and the
//! `DATABASE_URL` variable (optionally set through a `.env` file).

use config::{Config, ConfigError, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub log: LogSettings,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path of the SQLite database, or `:memory:`.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

/// Attendance percentages at or above `good` are in good standing, those at or above `warning`
/// are flagged, and everything below is critical.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Thresholds {
    pub good: f64,
    pub warning: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            good: 75.0,
            warning: 60.0,
        }
    }
}

impl Thresholds {
    /// Rejects a `warning` threshold above `good`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.warning > self.good {
            return Err(ConfigError::Message(format!(
                "thresholds.warning ({}) must not exceed thresholds.good ({})",
                self.warning, self.good
            )));
        }
        Ok(())
    }

    pub fn standing(&self, percentage: f64) -> Standing {
        if percentage >= self.good {
            Standing::Good
        } else if percentage >= self.warning {
            Standing::Warning
        } else {
            Standing::Critical
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Good,
    Warning,
    Critical,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::Good => write!(f, "good"),
            Standing::Warning => write!(f, "warning"),
            Standing::Critical => write!(f, "critical"),
        }
    }
}

impl Settings {
    /// Loads settings from the config file at `path` (the extension may be omitted), the
    /// environment, and `.env`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::build(path, env::var("DATABASE_URL").ok())
    }

    /// Like [`Settings::load`], but with the database URL override passed in explicitly.
    pub fn build(path: &str, database_url: Option<String>) -> Result<Self, ConfigError> {
        let defaults = Thresholds::default();

        let settings: Self = Config::builder()
            .set_default("database.url", "attendance.db")?
            .set_default("log.level", "info")?
            .set_default("thresholds.good", defaults.good)?
            .set_default("thresholds.warning", defaults.warning)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("ATTENDANCE").separator("__"))
            .set_override_option("database.url", database_url)?
            .build()?
            .try_deserialize()?;

        settings.thresholds.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let settings = Settings::build(path.to_str().unwrap(), None).unwrap();

        assert_eq!(settings.database.url, "attendance.db");
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.thresholds, Thresholds::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("college.toml");
        fs::write(
            &path,
            "[database]\nurl = \"college.db\"\n\n[thresholds]\ngood = 80.0\nwarning = 65.0\n",
        )
        .unwrap();

        let settings = Settings::build(path.to_str().unwrap(), None).unwrap();

        assert_eq!(settings.database.url, "college.db");
        assert_eq!(settings.log.level, "info");
        assert_eq!(
            settings.thresholds,
            Thresholds {
                good: 80.0,
                warning: 65.0
            }
        );
    }

    #[test]
    fn database_url_override_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("college.toml");
        fs::write(&path, "[database]\nurl = \"college.db\"\n").unwrap();

        let settings =
            Settings::build(path.to_str().unwrap(), Some(":memory:".to_string())).unwrap();

        assert_eq!(settings.database.url, ":memory:");
    }

    #[test]
    fn warning_above_good_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("college.toml");
        fs::write(&path, "[thresholds]\ngood = 60.0\nwarning = 75.0\n").unwrap();

        let err = Settings::build(path.to_str().unwrap(), None).unwrap_err();

        assert!(matches!(err, ConfigError::Message(_)));
        assert!(err.to_string().contains("thresholds.warning"));
    }

    #[test]
    fn equal_thresholds_are_accepted() {
        let thresholds = Thresholds {
            good: 70.0,
            warning: 70.0,
        };
        assert!(thresholds.validate().is_ok());
    }

    #[test]
    fn standing_boundaries() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.standing(100.0), Standing::Good);
        assert_eq!(thresholds.standing(75.0), Standing::Good);
        assert_eq!(thresholds.standing(74.99), Standing::Warning);
        assert_eq!(thresholds.standing(60.0), Standing::Warning);
        assert_eq!(thresholds.standing(59.99), Standing::Critical);
        assert_eq!(thresholds.standing(0.0), Standing::Critical);
    }
}
