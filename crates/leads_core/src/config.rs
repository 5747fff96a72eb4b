use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// Startup failures. None of these are retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("team name for {slot} must not be empty")]
    MissingTeam { slot: &'static str },
    #[error("team names must differ (both are '{0}')")]
    DuplicateTeam(String),
    #[error("split ratio must be between 0.0 and 1.0 (got {0})")]
    RatioOutOfRange(f64),
}

/// Immutable distributor settings, validated once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributorConfig {
    pub team_a: String,
    pub team_b: String,
    /// Fraction of leads (ceiling-rounded) assigned to team A.
    pub split_ratio: f64,
    /// Fixed shuffle seed; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DistributorConfig {
    pub fn new(team_a: impl Into<String>, team_b: impl Into<String>, split_ratio: f64) -> Self {
        Self {
            team_a: team_a.into(),
            team_b: team_b.into(),
            split_ratio,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Trim team names and reject unusable settings.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let team_a = self.team_a.trim().to_string();
        let team_b = self.team_b.trim().to_string();

        if team_a.is_empty() {
            return Err(ConfigError::MissingTeam { slot: "team A" });
        }
        if team_b.is_empty() {
            return Err(ConfigError::MissingTeam { slot: "team B" });
        }
        if team_a == team_b {
            return Err(ConfigError::DuplicateTeam(team_a));
        }
        // NaN fails the range check as well
        if !(0.0..=1.0).contains(&self.split_ratio) {
            return Err(ConfigError::RatioOutOfRange(self.split_ratio));
        }

        Ok(Self {
            team_a,
            team_b,
            split_ratio: self.split_ratio,
            seed: self.seed,
        })
    }
}
