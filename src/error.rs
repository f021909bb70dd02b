//! Crate-level errors.
//!
//! The list controller never returns errors; these cover setup: reading
//! configuration, opening the token store, building the HTTP client.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::session::SessionError;

/// Errors raised while wiring the console together.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[source] reqwest::Error),
}

/// Result alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
