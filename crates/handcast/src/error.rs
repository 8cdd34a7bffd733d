use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by handcast
#[derive(Error, Debug)]
pub enum HandcastError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Skeleton has {actual} rotations, expected at least {expected}")]
    SkeletonTooShort { expected: usize, actual: usize },

    #[error("Tracking provider already registered: {0}")]
    DuplicateProvider(String),

    #[error("Tracking provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Tracking provider {id} failed: {message}")]
    Provider { id: String, message: String },
}

pub type Result<T> = std::result::Result<T, HandcastError>;
