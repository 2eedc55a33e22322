//! Error types surfaced by the crate itself.
//!
//! Stream errors are whatever `Err` type an observable carries; the types
//! here cover the two places the library produces errors of its own.

use thiserror::Error;

/// Invalid construction-time parameters.
///
/// Returned synchronously from the constructor, never delivered through an
/// observer's error channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("`{operator}` needs a non-zero period")]
  ZeroPeriod { operator: &'static str },
}

/// Failure of a request issued through [`crate::observable::request`].
#[derive(Debug, Error)]
pub enum RequestError {
  #[error("transport failed: {0}")]
  Transport(String),
  #[error("server answered with status {0}")]
  Status(u16),
  #[error("response body could not be decoded: {0}")]
  Decode(#[from] serde_json::Error),
}
