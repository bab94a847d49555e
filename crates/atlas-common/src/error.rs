//! Error types for county-atlas crates.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias using AtlasError.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// The user-facing picker a selection error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionField {
    Year,
    Factor,
    State,
    County,
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionField::Year => "year",
            SelectionField::Factor => "factor",
            SelectionField::State => "state",
            SelectionField::County => "county",
        };
        f.write_str(name)
    }
}

/// Primary error type for registry loading, selection and rendering.
#[derive(Debug, Error)]
pub enum AtlasError {
    // === Startup Errors ===
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Schema violation in {table} for year {year}: {reason}")]
    SchemaViolation {
        year: String,
        table: String,
        reason: String,
    },

    // === Selection Errors ===
    #[error("Unknown year: {year}")]
    UnknownYear { year: String, available: Vec<String> },

    #[error("Unknown state: {state}")]
    UnknownState {
        state: String,
        available: Vec<String>,
    },

    #[error("Invalid {field} selection: {value}")]
    InvalidSelection {
        field: SelectionField,
        value: String,
        available: Vec<String>,
    },

    // === Rendering Errors ===
    #[error("No rows joined for state: {state}")]
    EmptyJoin { state: String },
}

impl AtlasError {
    pub fn schema(year: impl Into<String>, table: impl Into<String>, reason: impl Into<String>) -> Self {
        AtlasError::SchemaViolation {
            year: year.into(),
            table: table.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(field: SelectionField, value: impl Into<String>, available: Vec<String>) -> Self {
        AtlasError::InvalidSelection {
            field,
            value: value.into(),
            available,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AtlasError::DataUnavailable(_) => "DataUnavailable",
            AtlasError::SchemaViolation { .. } => "SchemaViolation",
            AtlasError::UnknownYear { .. } => "UnknownYear",
            AtlasError::UnknownState { .. } => "UnknownState",
            AtlasError::InvalidSelection { .. } => "InvalidSelection",
            AtlasError::EmptyJoin { .. } => "EmptyJoin",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AtlasError::InvalidSelection { .. } => 400,

            AtlasError::UnknownYear { .. } | AtlasError::UnknownState { .. } => 404,

            AtlasError::EmptyJoin { .. } => 409,

            AtlasError::DataUnavailable(_) => 503,
            AtlasError::SchemaViolation { .. } => 500,
        }
    }

    /// The picker this error refers to, if it was raised by a user selection.
    pub fn field(&self) -> Option<SelectionField> {
        match self {
            AtlasError::UnknownYear { .. } => Some(SelectionField::Year),
            AtlasError::UnknownState { .. } => Some(SelectionField::State),
            AtlasError::InvalidSelection { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Valid alternatives a corrected picker can offer.
    pub fn available(&self) -> Option<&[String]> {
        match self {
            AtlasError::UnknownYear { available, .. }
            | AtlasError::UnknownState { available, .. }
            | AtlasError::InvalidSelection { available, .. } => Some(available),
            _ => None,
        }
    }

    /// Whether the error came from user input rather than from the artifacts.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AtlasError::UnknownYear { .. }
                | AtlasError::UnknownState { .. }
                | AtlasError::InvalidSelection { .. }
        )
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(err: std::io::Error) -> Self {
        AtlasError::DataUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        AtlasError::DataUnavailable(format!("JSON error: {}", err))
    }
}
