//! Roster: a terminal console for managing the users of a remote REST
//! collection.
//!
//! The [`services::ListController`] owns the paged user list, its search
//! filter, in-place editing and deletion. The [`ui::Console`] drives it
//! from typed commands and renders its read model as text.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod ui;

pub use error::{Error, Result};
