//! Error types.
//!
//! Every failure surfaced by this crate is an [`Error`]. Callers that only
//! care about the broad category match on [`Error::kind`].

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::convert::CoerceError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The record type's annotations do not fit the header, or the
    /// stream has no header at all. Raised at construction.
    SchemaInvalid,
    /// A file, URL or stream could not be opened. Raised at construction.
    SourceUnavailable,
    /// A required field had an empty or absent cell.
    MissingRequiredValue,
    /// A cell could not be coerced into its field's type.
    TypeMismatch,
    /// A field's declared type has no coercion rule.
    UnsupportedType,
    /// The tokenizer rejected the input (bad quoting, invalid UTF-8, I/O).
    Malformed,
    /// The iterator was advanced after failing or being closed.
    InvalidState,
    /// A reader option was given an unusable value.
    InvalidConfig,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("field {field} missing required 'csv' annotation")]
    MissingAnnotation { field: &'static str },

    #[error("field {field} has an empty column name in annotation {tag:?}")]
    EmptyColumnName {
        field: &'static str,
        tag: &'static str,
    },

    #[error("required CSV column '{column}' not found for field {field}")]
    MissingColumn {
        column: &'static str,
        field: &'static str,
    },

    /// A shared plan was applied to a stream whose header places a column
    /// somewhere else.
    #[error("column '{column}' is at position {found:?} but the plan expects {expected}")]
    PlanMismatch {
        column: &'static str,
        expected: usize,
        found: Option<usize>,
    },

    #[error("failed to read headers: stream is empty")]
    NoHeader,

    #[error("field {field} has unsupported type {type_name}")]
    UnsupportedType {
        field: &'static str,
        type_name: String,
    },

    #[error("failed to open file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid URL {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to fetch URL {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error fetching {url}: {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("missing required value for field {field} (column {column}) in row {row}")]
    MissingValue {
        field: &'static str,
        column: &'static str,
        row: u64,
    },

    #[error("failed to parse field {field} (column {column}) in row {row}: {source}")]
    TypeMismatch {
        field: &'static str,
        column: &'static str,
        row: u64,
        #[source]
        source: CoerceError,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("iterator is {state} and cannot be advanced")]
    InvalidState { state: &'static str },

    #[error("invalid value {value:?} for option {name}")]
    InvalidOption { name: &'static str, value: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingAnnotation { .. }
            | Error::EmptyColumnName { .. }
            | Error::MissingColumn { .. }
            | Error::PlanMismatch { .. }
            | Error::NoHeader => ErrorKind::SchemaInvalid,
            Error::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Error::Open { .. }
            | Error::InvalidUrl { .. }
            | Error::Fetch { .. }
            | Error::HttpStatus { .. } => ErrorKind::SourceUnavailable,
            Error::MissingValue { .. } => ErrorKind::MissingRequiredValue,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::Csv(_) => ErrorKind::Malformed,
            Error::InvalidState { .. } => ErrorKind::InvalidState,
            Error::InvalidOption { .. } => ErrorKind::InvalidConfig,
        }
    }

    /// Field the error is attributed to, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::MissingAnnotation { field }
            | Error::EmptyColumnName { field, .. }
            | Error::MissingColumn { field, .. }
            | Error::UnsupportedType { field, .. }
            | Error::MissingValue { field, .. }
            | Error::TypeMismatch { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Column the error is attributed to, when there is one.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Error::MissingColumn { column, .. }
            | Error::PlanMismatch { column, .. }
            | Error::MissingValue { column, .. }
            | Error::TypeMismatch { column, .. } => Some(*column),
            _ => None,
        }
    }
}
