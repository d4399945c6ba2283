//! Command-line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;
use mizan::{localization::Language, variants::AttributeSelection};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Catalog and presentation settings.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Directory holding `catalogs/<name>.yml`
    #[arg(long, env = "MIZAN_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Catalog name to load
    #[arg(short, long, env = "MIZAN_CATALOG", default_value = "storefront")]
    pub catalog: String,

    /// Display language (en, ar, or a locale tag such as ar-SA)
    #[arg(long, env = "MIZAN_LANG", default_value = "en")]
    pub lang: Language,

    /// ISO 4217 currency used to format prices
    #[arg(long, env = "MIZAN_CURRENCY", default_value = "SAR")]
    pub currency: String,
}

/// Mizan storefront pricing tool configuration
#[derive(Debug, Parser)]
#[command(name = "mizan", about = "Storefront pricing and catalog inspection", long_about = None)]
pub struct CliConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Catalog settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// What to show.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the price of every product
    Prices {
        /// Instant to price at (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<Timestamp>,
    },

    /// Quote a product for an attribute selection
    Variant {
        /// Product id
        product: String,

        /// Attribute choices, e.g. `color=red,size=l`
        #[arg(short, long, default_value = "")]
        select: AttributeSelection,

        /// Instant to price at (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<Timestamp>,
    },

    /// Show the category navigation tree
    Categories,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
