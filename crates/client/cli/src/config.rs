//! Headless client configuration.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Which built-in controller plays the player's turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerKind {
    #[default]
    Aggressive,
    Skip,
}

impl FromStr for ControllerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aggressive" => Ok(Self::Aggressive),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown controller {other:?}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub scenario: PathBuf,
    /// Upper bound on player/enemy exchanges to play.
    pub rounds: u64,
    /// Skip pacing delays.
    pub instant: bool,
    pub controller: ControllerKind,
    /// `tracing_subscriber::EnvFilter` directives.
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            scenario: PathBuf::from("scenarios/forest-0.ron"),
            rounds: 10,
            instant: false,
            controller: ControllerKind::default(),
            log_filter: "info".to_owned(),
        }
    }
}

impl CliConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_SCENARIO` - Scenario RON file (default: scenarios/forest-0.ron)
    /// - `TACTICS_ROUNDS` - Maximum exchanges to play (default: 10)
    /// - `TACTICS_INSTANT` - `1`/`true` disables pacing delays
    /// - `TACTICS_CONTROLLER` - `aggressive` or `skip`
    /// - `RUST_LOG` - Log filter (default: info)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("TACTICS_SCENARIO") {
            config.scenario = PathBuf::from(path);
        }
        if let Some(rounds) = read_parsed::<u64>(&lookup, "TACTICS_ROUNDS") {
            config.rounds = rounds.max(1);
        }
        if let Some(flag) = lookup("TACTICS_INSTANT") {
            config.instant = matches!(flag.trim(), "1" | "true" | "yes");
        }
        if let Some(kind) = read_parsed::<ControllerKind>(&lookup, "TACTICS_CONTROLLER") {
            config.controller = kind;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }

        config
    }
}

fn read_parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    lookup(key)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]);
        assert_eq!(config.rounds, 10);
        assert!(!config.instant);
        assert_eq!(config.controller, ControllerKind::Aggressive);
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let config = config(&[
            ("TACTICS_SCENARIO", "maps/cave.ron"),
            ("TACTICS_ROUNDS", "0"),
            ("TACTICS_INSTANT", "true"),
            ("TACTICS_CONTROLLER", "Skip"),
        ]);
        assert_eq!(config.scenario, PathBuf::from("maps/cave.ron"));
        assert_eq!(config.rounds, 1);
        assert!(config.instant);
        assert_eq!(config.controller, ControllerKind::Skip);

        let config = super::tests::config(&[("TACTICS_ROUNDS", "many")]);
        assert_eq!(config.rounds, 10);
    }
}
