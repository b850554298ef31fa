//! Command line configuration

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use realce::{
    fixtures::{Fixture, FixtureError},
    pricing::PricingEngine,
};

/// Where the cart is kept.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Path of the stored cart
    #[arg(
        long,
        global = true,
        env = "REALCE_CART_PATH",
        default_value = ".realce/cart.json"
    )]
    pub(crate) cart_path: PathBuf,
}

/// Which prices and sizes the cart is priced with.
#[derive(Debug, Args)]
pub(crate) struct CatalogConfig {
    /// Directory holding the pricing and size fixtures
    #[arg(long, global = true, env = "REALCE_FIXTURES", default_value = "fixtures")]
    pub(crate) fixtures: PathBuf,

    /// Pricing fixture name; built-in storefront pricing when omitted
    #[arg(long, global = true, env = "REALCE_PRICING")]
    pub(crate) pricing: Option<String>,

    /// Canvas size fixture name; built-in size table when omitted
    #[arg(long, global = true, env = "REALCE_SIZES")]
    pub(crate) sizes: Option<String>,
}

impl CatalogConfig {
    /// Build the pricing engine described by this configuration.
    pub(crate) fn engine(&self) -> Result<PricingEngine, FixtureError> {
        Fixture::with_base_path(&self.fixtures)
            .engine(self.pricing.as_deref(), self.sizes.as_deref())
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        global = true,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact
    )]
    pub(crate) log_format: LogFormat,
}
