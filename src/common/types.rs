use crate::common::error::EnvError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Build profile selecting one whole environment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Development,
    Production,
}

impl Profile {
    /// Profile the crate was compiled for.
    pub const fn compiled() -> Self {
        if cfg!(debug_assertions) {
            Profile::Development
        } else {
            Profile::Production
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Profile::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }
}

impl From<bool> for Profile {
    fn from(production: bool) -> Self {
        if production {
            Profile::Production
        } else {
            Profile::Development
        }
    }
}

impl FromStr for Profile {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            _ => Err(EnvError::UnknownProfile(s.to_string())),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
