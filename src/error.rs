use std::sync::PoisonError;

use thiserror::Error;

use crate::dataitem::DataItemKind;

#[derive(Error, Debug)]
pub enum SemtypesError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    #[error("Parse error in {type_id}: {message}")]
    Parse { type_id: String, message: String },
    #[error("Query error: {0}")]
    Query(String),
    #[error("No default type for data item kind {0}")]
    NoDefaultType(DataItemKind),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, SemtypesError>;

impl SemtypesError {
    pub fn parse(type_id: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            type_id: type_id.to_owned(),
            message: message.into(),
        }
    }
}

// Helper conversions
impl From<config::ConfigError> for SemtypesError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for SemtypesError {
    fn from(e: serde_json::Error) -> Self { Self::Query(e.to_string()) }
}
impl<T> From<PoisonError<T>> for SemtypesError {
    fn from(e: PoisonError<T>) -> Self { Self::Lock(e.to_string()) }
}
