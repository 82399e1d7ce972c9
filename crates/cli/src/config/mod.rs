//! CLI configuration module

use clap::Parser;

use crate::{
    commands::Command,
    config::{api::ApiConfig, display::DisplayConfig, identity::IdentityConfig, logging::LoggingConfig},
};

pub(crate) mod api;
pub(crate) mod display;
pub(crate) mod identity;
pub(crate) mod logging;

/// Breakfast storefront CLI configuration
#[derive(Debug, Parser)]
#[command(name = "breakfast", about = "Breakfast storefront CLI", long_about = None)]
pub(crate) struct CliConfig {
    /// Storefront service settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Signed-in user settings.
    #[command(flatten)]
    pub identity: IdentityConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Price display settings.
    #[command(flatten)]
    pub display: DisplayConfig,

    /// Run add/update/remove/clear/checkout one at a time.
    #[arg(long, env = "BREAKFAST_SERIALIZE_MUTATIONS", default_value_t = false)]
    pub serialize_mutations: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
