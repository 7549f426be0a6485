use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::epoch::{find_epoch, Epoch};

pub const MAX_LEVEL: u8 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthTier {
    #[default]
    Short,
    Medium,
    Long,
}

impl LengthTier {
    pub const ALL: [LengthTier; 3] = [LengthTier::Short, LengthTier::Medium, LengthTier::Long];

    /// Target word-count band, quoted in the prompt. Advisory only.
    pub fn word_band(self) -> (u32, u32) {
        match self {
            LengthTier::Short => (100, 200),
            LengthTier::Medium => (300, 500),
            LengthTier::Long => (600, 800),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LengthTier::Short => "Court (100-200 mots)",
            LengthTier::Medium => "Moyen (300-500 mots)",
            LengthTier::Long => "Long (600-800 mots)",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("unknown epoch: {0}")]
    UnknownEpoch(String),

    #[error("{name} must be between 0 and 100, got {value}")]
    LevelOutOfRange { name: &'static str, value: u8 },
}

/// One user request. Snapshotted into history as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub epoch: String,
    pub tech_level: u8,
    pub social_change: u8,
    pub fantasy_elements: u8,
    pub length_tier: LengthTier,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            epoch: crate::model::epoch::default_epoch().name.to_string(),
            tech_level: 30,
            social_change: 40,
            fantasy_elements: 20,
            length_tier: LengthTier::default(),
        }
    }
}

impl GenerationParameters {
    /// Checks ranges and returns the catalog epoch these parameters refer to.
    pub fn resolve(&self) -> Result<&'static Epoch, ParameterError> {
        for (name, value) in [
            ("tech_level", self.tech_level),
            ("social_change", self.social_change),
            ("fantasy_elements", self.fantasy_elements),
        ] {
            if value > MAX_LEVEL {
                return Err(ParameterError::LevelOutOfRange { name, value });
            }
        }

        find_epoch(&self.epoch).ok_or_else(|| ParameterError::UnknownEpoch(self.epoch.clone()))
    }
}
