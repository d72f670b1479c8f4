//! Runtime configuration.
//!
//! Values come from defaults matching the shipped game, optionally
//! overridden from `PARLEY_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DialogueError;

/// Environment variable holding the per-character reveal interval in milliseconds.
pub const TYPING_INTERVAL_VAR: &str = "PARLEY_TYPING_INTERVAL_MS";
/// Environment variable toggling strict branch id validation.
pub const STRICT_BRANCH_IDS_VAR: &str = "PARLEY_STRICT_BRANCH_IDS";
/// Environment variable overriding the default blink cycle count.
pub const BLINK_COUNT_VAR: &str = "PARLEY_BLINK_COUNT";
/// Environment variable overriding the default blink speed.
pub const BLINK_SPEED_VAR: &str = "PARLEY_BLINK_SPEED";

/// Configuration shared by conversation engines and the effect queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Delay between two revealed characters, in milliseconds.
    pub typing_interval_ms: u64,
    /// Abort a conversation whose source has duplicate or empty branch ids
    /// instead of skipping the offending branches.
    pub strict_branch_ids: bool,
    /// Blink cycles used when a branch asks for fewer than one.
    pub blink_count: u32,
    /// Blink speed used when a branch asks for a non-positive one.
    pub blink_speed: f32,
    /// Blur intensity applied by `blur_start`.
    pub blur_start: f32,
    /// Blur intensity applied by `blur_end`.
    pub blur_end: f32,
    /// Capacity of the player input channel.
    pub input_buffer: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            typing_interval_ms: 100,
            strict_branch_ids: true,
            blink_count: 3,
            blink_speed: 0.8,
            blur_start: 0.0,
            blur_end: 1.4,
            input_buffer: 16,
        }
    }
}

impl DialogueConfig {
    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::Config` if a variable is set but unparsable.
    pub fn from_env() -> Result<Self, DialogueError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup, starting from
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::Config` if a present value is unparsable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DialogueError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(ms) = parse_var(&lookup, TYPING_INTERVAL_VAR)? {
            config.typing_interval_ms = ms;
        }
        if let Some(strict) = parse_var(&lookup, STRICT_BRANCH_IDS_VAR)? {
            config.strict_branch_ids = strict;
        }
        if let Some(count) = parse_var::<u32, _>(&lookup, BLINK_COUNT_VAR)? {
            if count == 0 {
                return Err(DialogueError::Config(format!(
                    "{BLINK_COUNT_VAR} must be at least 1"
                )));
            }
            config.blink_count = count;
        }
        if let Some(speed) = parse_var::<f32, _>(&lookup, BLINK_SPEED_VAR)? {
            if speed <= 0.0 {
                return Err(DialogueError::Config(format!(
                    "{BLINK_SPEED_VAR} must be positive"
                )));
            }
            config.blink_speed = speed;
        }
        Ok(config)
    }

    /// Returns the reveal interval as a `Duration`.
    #[must_use]
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, DialogueError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| DialogueError::Config(format!("{key} is invalid: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_without_variables_returns_defaults() {
        let config = DialogueConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config, DialogueConfig::default());
        assert_eq!(config.typing_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_from_lookup_applies_overrides() {
        // Arrange
        let lookup = lookup_from(&[
            (TYPING_INTERVAL_VAR, "40"),
            (STRICT_BRANCH_IDS_VAR, "false"),
            (BLINK_COUNT_VAR, "5"),
            (BLINK_SPEED_VAR, " 1.5 "),
        ]);

        // Act
        let config = DialogueConfig::from_lookup(lookup).unwrap();

        // Assert
        assert_eq!(config.typing_interval_ms, 40);
        assert!(!config.strict_branch_ids);
        assert_eq!(config.blink_count, 5);
        assert!((config.blink_speed - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_lookup_rejects_unparsable_interval() {
        let result = DialogueConfig::from_lookup(lookup_from(&[(TYPING_INTERVAL_VAR, "fast")]));

        assert!(matches!(result, Err(DialogueError::Config(_))));
    }

    #[test]
    fn test_from_lookup_rejects_zero_blink_count() {
        let result = DialogueConfig::from_lookup(lookup_from(&[(BLINK_COUNT_VAR, "0")]));

        assert!(matches!(result, Err(DialogueError::Config(_))));
    }

    #[test]
    fn test_deserialize_partial_config_fills_defaults() {
        let config: DialogueConfig =
            serde_json::from_str(r#"{ "typing_interval_ms": 25 }"#).unwrap();

        assert_eq!(config.typing_interval_ms, 25);
        assert_eq!(config.blink_count, 3);
    }
}
