//! TOML-based application configuration.
//!
//! Holds the tunable numbers of the app:
//! - Reward rates and badge thresholds
//! - Pet decay rates
//! - Timer defaults
//! - Timetable source and calendar geometry
//!
//! Configuration is stored at `~/.config/procrastinus/config.toml`.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::academic::AcademicCalendarTable;
use crate::calendar::LayoutScale;
use crate::error::{ConfigError, CoreError};
use crate::pet::DecayParams;
use crate::reward::RewardRules;

/// Reward configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default = "default_min_session_secs")]
    pub min_session_secs: u64,
    #[serde(default = "default_full_rate")]
    pub full_rate_coins_per_minute: u64,
    #[serde(default = "default_partial_rate")]
    pub partial_rate_coins_per_minute: u64,
    #[serde(default = "default_max_custom_minutes")]
    pub max_custom_minutes: u32,
    #[serde(default = "default_long_session_minutes")]
    pub long_session_minutes: u64,
    #[serde(default = "default_streak_sessions")]
    pub streak_sessions_per_week: usize,
    /// Pet experience granted per credited study minute.
    #[serde(default = "default_pet_xp_per_minute")]
    pub pet_xp_per_study_minute: u64,
}

/// Pet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetConfig {
    #[serde(default = "default_hunger_threshold")]
    pub hunger_threshold: u32,
    #[serde(default = "default_xp_gain_per_hour")]
    pub xp_gain_per_hour: u64,
    #[serde(default = "default_hunger_drop_per_hour")]
    pub hunger_drop_per_hour: u32,
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
}

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub default_focus_minutes: u32,
    /// A paused stopwatch is cleared after this long without input.
    #[serde(default = "default_idle_clear_secs")]
    pub stopwatch_idle_clear_secs: u64,
}

/// Timetable source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

/// Calendar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_pixels_per_hour")]
    pub pixels_per_hour: f64,
    #[serde(default = "default_lane_height")]
    pub lane_height: f64,
    /// Offset of the campus timezone, used for week boundaries.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/procrastinus/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reward: RewardConfig,
    #[serde(default)]
    pub pet: PetConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub timetable: TimetableConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

// Default functions
fn default_min_session_secs() -> u64 {
    300
}
fn default_full_rate() -> u64 {
    2
}
fn default_partial_rate() -> u64 {
    1
}
fn default_max_custom_minutes() -> u32 {
    300
}
fn default_long_session_minutes() -> u64 {
    120
}
fn default_streak_sessions() -> usize {
    3
}
fn default_pet_xp_per_minute() -> u64 {
    10
}
fn default_hunger_threshold() -> u32 {
    50
}
fn default_xp_gain_per_hour() -> u64 {
    5
}
fn default_hunger_drop_per_hour() -> u32 {
    2
}
fn default_max_name_len() -> usize {
    20
}
fn default_focus_minutes() -> u32 {
    25
}
fn default_idle_clear_secs() -> u64 {
    180
}
fn default_api_base_url() -> String {
    crate::timetable::client::DEFAULT_BASE_URL.into()
}
fn default_pixels_per_hour() -> f64 {
    60.0
}
fn default_lane_height() -> f64 {
    48.0
}
fn default_utc_offset_minutes() -> i32 {
    480
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            min_session_secs: default_min_session_secs(),
            full_rate_coins_per_minute: default_full_rate(),
            partial_rate_coins_per_minute: default_partial_rate(),
            max_custom_minutes: default_max_custom_minutes(),
            long_session_minutes: default_long_session_minutes(),
            streak_sessions_per_week: default_streak_sessions(),
            pet_xp_per_study_minute: default_pet_xp_per_minute(),
        }
    }
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            hunger_threshold: 50,
            xp_gain_per_hour: 5,
            hunger_drop_per_hour: 2,
            max_name_len: 20,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_focus_minutes: 25,
            stopwatch_idle_clear_secs: 180,
        }
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            pixels_per_hour: 60.0,
            lane_height: 48.0,
            utc_offset_minutes: 480,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            let number = serde_json::Number::from_f64(n);
                            number.map(serde_json::Value::Number).ok_or_else(|| {
                                invalid(format!("cannot parse '{value}' as number"))
                            })?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Optional academic calendar override next to the config file.
    pub fn academic_calendar_path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("academic_calendar.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Callers persist with [`Config::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn reward_rules(&self) -> RewardRules {
        RewardRules {
            min_session_secs: self.reward.min_session_secs,
            full_rate_coins_per_minute: self.reward.full_rate_coins_per_minute,
            partial_rate_coins_per_minute: self.reward.partial_rate_coins_per_minute,
            max_custom_minutes: self.reward.max_custom_minutes,
            long_session_minutes: self.reward.long_session_minutes,
            streak_sessions_per_week: self.reward.streak_sessions_per_week,
        }
    }

    pub fn decay_params(&self) -> DecayParams {
        DecayParams {
            hunger_threshold: self.pet.hunger_threshold,
            xp_gain_per_hour: self.pet.xp_gain_per_hour,
            hunger_drop_per_hour: self.pet.hunger_drop_per_hour,
        }
    }

    pub fn layout_scale(&self) -> LayoutScale {
        LayoutScale {
            pixels_per_hour: self.calendar.pixels_per_hour,
            lane_height: self.calendar.lane_height,
        }
    }

    /// Campus timezone. Out-of-range offsets fall back to UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        let minutes = self.calendar.utc_offset_minutes;
        FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| {
            tracing::warn!(minutes, "invalid utc offset, using UTC");
            Utc.fix()
        })
    }

    /// Academic calendar: the override file in the data dir, else built-in.
    pub fn academic_calendar() -> Result<AcademicCalendarTable, CoreError> {
        AcademicCalendarTable::load_or_builtin(&Self::academic_calendar_path()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.reward.min_session_secs, 300);
        assert_eq!(parsed.calendar.pixels_per_hour, 60.0);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[pet]\nhunger_threshold = 40\n").unwrap();
        assert_eq!(cfg.pet.hunger_threshold, 40);
        assert_eq!(cfg.pet.xp_gain_per_hour, 5);
        assert_eq!(cfg.reward.full_rate_coins_per_minute, 2);
        assert_eq!(cfg.timetable.api_base_url, "https://api.nusmods.com/v2");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("reward.min_session_secs").as_deref(), Some("300"));
        assert_eq!(
            cfg.get("timetable.api_base_url").as_deref(),
            Some("https://api.nusmods.com/v2")
        );
        assert!(cfg.get("reward").is_none());
        assert!(cfg.get("reward.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("pet.hunger_threshold", "60").unwrap();
        cfg.set("calendar.pixels_per_hour", "72.5").unwrap();
        cfg.set("calendar.utc_offset_minutes", "-300").unwrap();
        assert_eq!(cfg.pet.hunger_threshold, 60);
        assert_eq!(cfg.calendar.pixels_per_hour, 72.5);
        assert_eq!(cfg.calendar.utc_offset_minutes, -300);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_value() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set("pet.nonexistent", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.set("pet", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            cfg.set("pet.hunger_threshold", "lots"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("pet.hunger_threshold", "-3"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("reward.max_custom_minutes", "2.5"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.default_focus_minutes, 25);
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.set("timer.default_focus_minutes", "50").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.default_focus_minutes, 50);
    }

    #[test]
    fn conversions_follow_config() {
        let mut cfg = Config::default();
        assert_eq!(cfg.reward_rules(), RewardRules::default());
        assert_eq!(cfg.decay_params(), DecayParams::default());
        assert_eq!(cfg.utc_offset().local_minus_utc(), 8 * 3600);
        cfg.calendar.utc_offset_minutes = 100_000;
        assert_eq!(cfg.utc_offset().local_minus_utc(), 0);
    }
}
