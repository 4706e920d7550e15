//! Shared definitions for the soft-sensing pipeline components.
//!
//! Holds the scalar type used throughout the pipeline, the single code path
//! for parsing the container's locale-formatted decimal attributes, and the
//! tracing bootstrap used by the binaries.
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// The scalar type used for all measurement and feature values.
pub type Real = f64;

#[derive(Debug, Error)]
#[error("invalid decimal value \"{value}\"")]
pub struct DecimalParseError {
    /// The string that failed to parse.
    pub value: String,
}

/// Parses a decimal string that uses a comma as the decimal separator.
///
/// The qualification rig records set-point temperatures as strings such as
/// `"12,5"`. Every attribute that carries such a value is parsed through this
/// function, so a malformed value always fails in one place.
pub fn parse_decimal(value: &str) -> Result<Real, DecimalParseError> {
    value
        .trim()
        .replace(',', ".")
        .parse::<Real>()
        .map_err(|_| DecimalParseError {
            value: value.to_owned(),
        })
}

/// Initialises the standard tracing subscriber.
///
/// Honours `RUST_LOG` when set, defaulting to `info`. Called once from each
/// binary's `main`.
pub fn init_tracer() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
