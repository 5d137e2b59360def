// src/services/errors.rs

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no questions")]
    Empty,
    #[error("question {0} has no options")]
    NoOptions(String),
    #[error("borderline threshold {borderline} must be below adequate threshold {adequate}")]
    InvertedThresholds { borderline: i32, adequate: i32 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session value {key} could not be converted: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("session store unavailable: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum QuestionnaireError {
    #[error("Session expired. Please restart questionnaire.")]
    SessionExpired,
    #[error("No result available. Please complete the questionnaire first.")]
    NoResultAvailable,
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("Invalid data: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}
