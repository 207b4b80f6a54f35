//! Engine configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;
use duel_core::{DrawCheck, DuelRules};

/// Configuration required to build a [`crate::CombatEngine`].
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Base URL of the character service. Required unless a client is injected.
    pub character_service_url: Option<String>,
    pub character_service_timeout: Duration,
    pub rules: DuelRules,
    pub reward_queue_size: usize,
    pub event_buffer_size: usize,
    /// When set, duels are stored as JSON files under this directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            character_service_url: None,
            character_service_timeout: Duration::from_millis(5_000),
            rules: DuelRules::default(),
            reward_queue_size: 32,
            event_buffer_size: 100,
            data_dir: None,
        }
    }
}

impl EngineConfig {
    /// Applies `.env` (if present) and then reads the process environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CHARACTER_SERVICE_URL` - Character service base URL
    /// - `CHARACTER_SERVICE_TIMEOUT_MS` - Per-request timeout (default: 5000)
    /// - `DUEL_DRAW_AFTER_SECS` - Age at which a duel becomes a draw (default: 300)
    /// - `DUEL_DRAW_CHECK` - `attack` or `all` (default: attack)
    /// - `DUEL_REWARD_QUEUE` - Reward job queue size (default: 32)
    /// - `DUEL_EVENT_BUFFER` - Event bus buffer per subscriber (default: 100)
    /// - `DUEL_DATA_DIR` - Directory for file-backed duel storage (default: in memory)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_string());
        let mut config = Self::default();

        config.character_service_url = read("CHARACTER_SERVICE_URL").filter(|url| !url.is_empty());

        if let Some(ms) = parse::<u64>(read("CHARACTER_SERVICE_TIMEOUT_MS")) {
            config.character_service_timeout = Duration::from_millis(ms.max(1));
        }

        let draw_after = parse::<i64>(read("DUEL_DRAW_AFTER_SECS"))
            .filter(|secs| *secs > 0)
            .unwrap_or(DuelRules::DEFAULT_DRAW_AFTER_SECS);
        let draw_check = read("DUEL_DRAW_CHECK")
            .and_then(|value| parse_draw_check(&value))
            .unwrap_or_default();
        config.rules = DuelRules::default()
            .with_draw_after(TimeDelta::seconds(draw_after))
            .with_draw_check(draw_check);

        if let Some(size) = parse::<usize>(read("DUEL_REWARD_QUEUE")) {
            config.reward_queue_size = size.max(1);
        }
        if let Some(size) = parse::<usize>(read("DUEL_EVENT_BUFFER")) {
            config.event_buffer_size = size.max(1);
        }

        config.data_dir = read("DUEL_DATA_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        config
    }

    pub fn with_character_service_url(mut self, url: impl Into<String>) -> Self {
        self.character_service_url = Some(url.into());
        self
    }

    pub fn with_rules(mut self, rules: DuelRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value?.parse().ok()
}

fn parse_draw_check(value: &str) -> Option<DrawCheck> {
    match value.to_ascii_lowercase().as_str() {
        "attack" => Some(DrawCheck::AttackOnly),
        "all" => Some(DrawCheck::AllActions),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert!(config.character_service_url.is_none());
        assert_eq!(config.character_service_timeout, Duration::from_millis(5_000));
        assert_eq!(config.rules, DuelRules::default());
        assert_eq!(config.reward_queue_size, 32);
        assert_eq!(config.event_buffer_size, 100);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("CHARACTER_SERVICE_URL", "http://characters:3000"),
            ("CHARACTER_SERVICE_TIMEOUT_MS", "750"),
            ("DUEL_DRAW_AFTER_SECS", "60"),
            ("DUEL_DRAW_CHECK", "ALL"),
            ("DUEL_REWARD_QUEUE", "0"),
            ("DUEL_DATA_DIR", "/var/lib/duels"),
        ]);

        assert_eq!(
            config.character_service_url.as_deref(),
            Some("http://characters:3000")
        );
        assert_eq!(config.character_service_timeout, Duration::from_millis(750));
        assert_eq!(config.rules.draw_after, TimeDelta::seconds(60));
        assert_eq!(config.rules.draw_check, DrawCheck::AllActions);
        assert_eq!(config.reward_queue_size, 1);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/duels")));
    }

    #[test]
    fn ignores_unparseable_values() {
        let config = config_from(&[
            ("DUEL_DRAW_AFTER_SECS", "soon"),
            ("DUEL_DRAW_CHECK", "sometimes"),
            ("DUEL_EVENT_BUFFER", "-3"),
        ]);
        assert_eq!(
            config.rules.draw_after,
            TimeDelta::seconds(DuelRules::DEFAULT_DRAW_AFTER_SECS)
        );
        assert_eq!(config.rules.draw_check, DrawCheck::AttackOnly);
        assert_eq!(config.event_buffer_size, 100);
    }
}
