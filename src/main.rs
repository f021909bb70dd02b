use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use roster::app::App;
use roster::config::{Config, TokenStoreKind};

/// Terminal console for managing remote users.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root of the remote API.
    #[arg(long)]
    base_url: Option<String>,

    /// API key sent as `x-api-key`.
    #[arg(long)]
    api_key: Option<String>,

    /// Keychain account to store the token under.
    #[arg(long)]
    profile: Option<String>,

    /// Keep the token in memory only.
    #[arg(long)]
    ephemeral: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(api_key) = self.api_key {
            config.api_key = Some(api_key);
        }
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if self.ephemeral {
            config.token_store = TokenStoreKind::Memory;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);
    App::run(config).await
}
