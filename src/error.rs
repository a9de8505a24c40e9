use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvionicsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    InvalidConfig(String),

    #[error("Leg index {index} out of range for a plan with {len} legs")]
    LegIndex { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, AvionicsError>;
