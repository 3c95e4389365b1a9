//! Runtime configuration read from environment variables.
//!
//! Every value has a default so the server starts with no environment at all.
//! Parsing goes through a lookup function so it can be exercised without touching
//! the process environment.

use serde::{Deserialize, Serialize};

/// Rules enforced by the registration and grouping layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    /// Maximum number of registered teams.
    pub max_teams: usize,
    /// Inclusive length bounds for team and member names.
    pub min_name_len: usize,
    pub max_name_len: usize,
    /// Inclusive bounds on the number of teams placed in groups by a bulk grouping.
    pub min_grouped_teams: usize,
    pub max_grouped_teams: usize,
    /// Reject a bulk grouping of exactly 20 teams.
    pub exclude_twenty_teams: bool,
    /// Highest score a side can record in one match.
    pub max_score: u32,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            max_teams: 32,
            min_name_len: 5,
            max_name_len: 20,
            min_grouped_teams: 8,
            max_grouped_teams: 32,
            exclude_twenty_teams: false,
            max_score: 10,
        }
    }
}

impl TournamentSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unknown or unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_teams: parse_or(&lookup, "TOURNAMENT_MAX_TEAMS", defaults.max_teams),
            max_score: parse_or(&lookup, "TOURNAMENT_MAX_SCORE", defaults.max_score),
            exclude_twenty_teams: lookup("TOURNAMENT_EXCLUDE_20")
                .map(|v| flag_true(&v))
                .unwrap_or(defaults.exclude_twenty_teams),
            ..defaults
        }
    }
}

/// Where the HTTP server listens and who may administer it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Token accepted by the admin login. `None` means one is generated at startup.
    pub admin_token: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST")
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(default_host),
            port: parse_or(&lookup, "PORT", default_port()),
            admin_token: lookup("ADMIN_TOKEN")
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_true(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
