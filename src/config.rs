//! Runtime configuration read from environment variables.
//!
//! ## Environment Variables
//! - `PORT` - port to listen on (default: `8000`)
//! - `UPLOAD_DIR` - directory uploads are written to (default: `uploads`)
//! - `FRONTEND_DIR` - static front-end root (default: `frontend`)
//! - `MODEL_REPO` - Hugging Face repo of a ViT image classifier
//! - `MODEL_REVISION` - Hub revision (default: `main`)
//! - `FAKE_CLASS_INDEX` - output class reported as "fake" (default: `1`)
//! - `CLASSIFIER` - `vit` or `noop` (default: `vit`)
//! - `MAX_UPLOAD_BYTES` - request body limit (default: 200 MB)
//!
//! A `.env` file in the working directory is loaded first when present.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    DEFAULT_FAKE_CLASS_INDEX, DEFAULT_FRONTEND_DIR, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL_REPO,
    DEFAULT_MODEL_REVISION, DEFAULT_PORT, DEFAULT_UPLOAD_DIR,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Unknown classifier {0:?} (expected \"vit\" or \"noop\")")]
    UnknownClassifier(String),
}

/// Which classifier backs `/analyze`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Vit,
    NoOp,
}

impl FromStr for ClassifierKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vit" => Ok(ClassifierKind::Vit),
            "noop" | "none" => Ok(ClassifierKind::NoOp),
            other => Err(ConfigError::UnknownClassifier(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub repo: String,
    pub revision: String,
    pub fake_class_index: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub classifier: ClassifierKind,
    pub model: ModelConfig,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let classifier = match lookup("CLASSIFIER") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => ClassifierKind::Vit,
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            upload_dir: PathBuf::from(string_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            frontend_dir: PathBuf::from(string_or("FRONTEND_DIR", DEFAULT_FRONTEND_DIR)),
            classifier,
            model: ModelConfig {
                repo: string_or("MODEL_REPO", DEFAULT_MODEL_REPO),
                revision: string_or("MODEL_REVISION", DEFAULT_MODEL_REVISION),
                fake_class_index: parse_or(&lookup, "FAKE_CLASS_INDEX", DEFAULT_FAKE_CLASS_INDEX)?,
            },
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value })
        }
        _ => Ok(default),
    }
}
