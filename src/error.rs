//! Error types for the calculator library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoiError {
    /// START was pressed but nothing is wired to receive the handoff
    #[error("no transition handler wired for the investment screen")]
    MissingTransitionHandler,

    #[error("action '{action}' is not valid while {state}")]
    InvalidAction { action: &'static str, state: &'static str },

    #[error("invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("invalid configuration value for {key}: {value}")]
    Config { key: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RoiError>;
