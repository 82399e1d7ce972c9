//! Breakfast storefront CLI

use std::{io, process::ExitCode};

use tracing::{debug, error};

use breakfast_app::{context::AppContext, domain::carts::CartControllerOptions};

use crate::{config::CliConfig, errors::CliError};

mod commands;
mod config;
mod errors;
mod observability;
mod render;

/// Breakfast storefront CLI entry point
#[tokio::main]
pub async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(error) => {
            // Prints help and version output as well as parse errors.
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(error = %failure, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "user-facing failure message belongs on stderr"
            )]
            {
                eprintln!("{}", failure.user_message());
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(config: CliConfig) -> Result<(), CliError> {
    let app = AppContext::from_http_config(
        config.api.http_config(),
        config.identity.provider(),
        CartControllerOptions {
            serialize_mutations: config.serialize_mutations,
        },
    )?;

    if config.command.uses_cart() {
        app.cart.apply_identity(&app.identity.current()).await?;

        debug!(
            user = ?app.cart.user(),
            lines = app.cart.items().len(),
            "cart loaded"
        );
    }

    config
        .command
        .run(&app, config.display.currency, io::stdout().lock())
        .await
}
