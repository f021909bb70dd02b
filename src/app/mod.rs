//! Application wiring and lifecycle.
//!
//! This module contains:
//! - Notifications from controllers to the console (events.rs)
//! - Routes and the navigation seam (routes.rs)
//! - Startup: logging, token storage, the HTTP gateway and the console

pub mod events;
pub mod routes;

pub use events::{Notification, NotificationLevel, Notifier};
pub use routes::{Navigator, Route};

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, TokenStoreKind};
use crate::services::{
    HttpOptions, HttpRecordGateway, KeyringTokenStore, MemoryTokenStore, Session, TokenStore,
};
use crate::ui::Console;

/// Main application entry point
pub struct App;

impl App {
    /// Runs the console on stdin and stdout until the user quits.
    pub async fn run(config: Config) -> Result<()> {
        Self::init_logging(&config);
        tracing::info!(base_url = %config.base_url, profile = %config.profile, "Starting");

        let store = Self::token_store(&config)?;
        let session = Arc::new(Session::restore(store));

        let gateway = Arc::new(
            HttpRecordGateway::new(
                &config.base_url,
                session.clone(),
                HttpOptions {
                    api_key: config.api_key.clone(),
                    timeout: config.request_timeout(),
                },
            )
            .context("Failed to build HTTP gateway")?,
        );

        let mut console = Console::new(gateway.clone(), gateway, session);
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        console.run(stdin, &mut stdout).await?;

        tracing::info!("Exiting");
        Ok(())
    }

    /// Installs the stderr log subscriber. `RUST_LOG` wins over the config.
    fn init_logging(config: &Config) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

        // A subscriber may already be installed when embedded.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }

    fn token_store(config: &Config) -> Result<Arc<dyn TokenStore>> {
        let store: Arc<dyn TokenStore> = match config.token_store {
            TokenStoreKind::Keyring => Arc::new(
                KeyringTokenStore::new(&config.profile).context("Failed to open keychain")?,
            ),
            TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        };
        tracing::debug!(kind = ?config.token_store, "Token store ready");
        Ok(store)
    }
}
