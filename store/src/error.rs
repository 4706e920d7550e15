//! Error types raised by the container store and the query engine.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The given path does not resolve to a readable container file.
    #[error("no container found at \"{path}\"")]
    NotFound { path: PathBuf },

    /// A unit was requested by name but is not present in the container.
    #[error("unit \"{unit}\" is not present in the container")]
    UnknownUnit { unit: String },

    /// The container's structure cannot be decoded into units and tests.
    #[error("malformed container: {reason}")]
    Format { reason: String },

    /// A test attribute exists but its value cannot be parsed.
    #[error("test \"{test}\": attribute \"{attribute}\" has unparsable value \"{value}\"")]
    Validation {
        test: String,
        attribute: String,
        value: String,
    },

    /// A filter constraint itself is unusable.
    #[error("filter constraint \"{key}\": {reason}")]
    Constraint { key: &'static str, reason: String },
}
