//! Core error types for wheelpick-core.
//!
//! Configuration problems are fatal and surface from constructors. Runtime
//! input anomalies (malformed samples, stale timestamps) are absorbed by the
//! engine and never reach these types.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wheelpick-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Picker construction errors
    #[error("Picker configuration error: {0}")]
    Picker(#[from] PickerConfigError),

    /// Runtime selection errors
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Gesture script that cannot be replayed
    #[error("Invalid gesture script: {0}")]
    Script(String),
}

/// Errors raised while building sequences, columns and composite pickers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PickerConfigError {
    /// A value sequence must hold at least one value
    #[error("Value sequence is empty")]
    EmptySequence,

    /// A circular sequence needs two values to wrap
    #[error("Circular sequence needs at least 2 values, got {len}")]
    DegenerateCircular { len: usize },

    /// Values must be unique within a sequence
    #[error("Duplicate value at index {index} (first seen at {first})")]
    DuplicateValue { index: usize, first: usize },

    /// Item extent must be a positive finite number
    #[error("Item extent must be positive and finite, got {0}")]
    InvalidItemExtent(f64),

    /// Visible window must be odd so there is a center item
    #[error("Visible window must be an odd positive integer, got {0}")]
    InvalidVisibleWindow(usize),

    /// Circular sequences need padding slots beyond each edge
    #[error("Boundary margin must be at least 1 for circular sequences")]
    ZeroBoundaryMargin,

    /// Initial value is not part of the sequence
    #[error("Initial value for column '{column}' is not in its sequence")]
    InitialValueMissing { column: String },

    /// Invalid tunable value
    #[error("Invalid value for '{field}': {message}")]
    InvalidTunable { field: &'static str, message: String },

    /// Composite picker without columns
    #[error("Composite picker needs at least one column")]
    NoColumns,

    /// Two columns share a name
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// Committed tuple does not match the picker's layout
    #[error("Commit has {got} values, expected {expected}")]
    CommitShape { expected: usize, got: usize },
}

/// Errors for explicit selection requests. State is unchanged when returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Value is not part of the column's sequence
    #[error("Value is not in the sequence of column '{column}'")]
    ValueNotInSequence { column: String },

    /// No column with that name
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// Number of values passed to a whole-picker reset does not match
    #[error("Expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },
}

/// Configuration-file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {}: {message}", path.display())]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {}: {message}", path.display())]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
