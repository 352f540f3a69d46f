//! Error types for the site crate

use gathering_runtime::StoreError;
use std::fmt;
use thiserror::Error;

/// Errors raised outside the reducer: parsing, form input, configuration
///
/// The reducer itself cannot fail; everything here is caught before an
/// action is built or after a dispatch is rejected by the store.
#[derive(Error, Debug)]
pub enum SiteError {
    /// A date string matched none of the accepted formats
    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        /// The rejected input
        value: String,
        /// Parser failure for the last format tried
        #[source]
        source: chrono::ParseError,
    },

    /// Admin form input failed validation; nothing was dispatched
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// An environment variable held an unusable value
    #[error("Invalid configuration for {key}: {message}")]
    Config {
        /// Variable name
        key: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// The store refused a dispatch
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A line of the action log was not a valid action
    #[error("Invalid action on line {line}: {source}")]
    ActionLog {
        /// 1-based line number
        line: usize,
        /// Decoder failure
        #[source]
        source: serde_json::Error,
    },

    /// Reading an input file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a page model failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name, as the form labels it (`videoUrl`, `title`, ...)
    pub field: &'static str,
    /// Message shown next to the field
    pub message: String,
}

/// Every field error found in one form submission, in field order
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records an error against `field`
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether no field failed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All recorded errors
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages recorded for one field
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    ///
    /// # Errors
    ///
    /// Returns `self` if any field error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}
