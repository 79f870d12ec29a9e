use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported environment file format: {0:?} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Missing value for {0}")]
    MissingField(&'static str),

    #[error("Invalid URL for {field}: {value:?}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Invalid Auth0 domain: {0:?}")]
    InvalidDomain(String),

    #[error("Profile mismatch: expected {expected}, found {found}")]
    ProfileMismatch {
        expected: crate::common::Profile,
        found: crate::common::Profile,
    },

    #[error("Environment already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, EnvError>;
