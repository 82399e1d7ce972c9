//! Display Config

use clap::Args;
use rusty_money::iso::{self, Currency};

/// Price display settings.
#[derive(Debug, Args)]
pub(crate) struct DisplayConfig {
    /// ISO 4217 currency code used to format prices
    #[arg(long, env = "BREAKFAST_CURRENCY", default_value = "TWD", value_parser = parse_currency)]
    pub currency: &'static Currency,
}

fn parse_currency(code: &str) -> Result<&'static Currency, String> {
    iso::find(&code.to_ascii_uppercase()).ok_or_else(|| format!("unknown currency code: {code}"))
}
