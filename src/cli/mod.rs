//! The `mizan` command line

use std::io::{self, Write};

use anyhow::Context;
use jiff::Timestamp;
use mizan::{
    catalog::quote,
    categories::{build_category_tree, flatten_category_tree},
    fixtures::Fixture,
    report::Report,
};
use tracing::info;

pub mod config;
pub mod logging;

use config::{CliConfig, Command};

/// Load the configured catalog and write the requested table to `out`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the product is unknown, the currency
/// is not recognised, or the output cannot be written.
pub fn run(config: &CliConfig, mut out: impl Write) -> anyhow::Result<()> {
    let catalog = &config.catalog;

    let mut fixture = Fixture::with_base_path(&catalog.fixtures_dir);
    fixture
        .load_catalog(&catalog.catalog)
        .with_context(|| format!("loading catalog {:?}", catalog.catalog))?;

    let report = Report::new(catalog.lang, &catalog.currency)?;

    match &config.command {
        Command::Prices { at } => {
            let now = at.unwrap_or_else(Timestamp::now);

            info!(%now, products = fixture.products().len(), "pricing catalog");

            report.write_prices(&mut out, fixture.products(), now)?;
        }
        Command::Variant {
            product,
            select,
            at,
        } => {
            let now = at.unwrap_or_else(Timestamp::now);
            let product = fixture.product(product)?;

            info!(%now, product = %product.id, selection = %select, "quoting variant");

            report.write_quote(&mut out, &quote(product, select, now))?;
        }
        Command::Categories => {
            let tree = build_category_tree(fixture.categories());

            report.write_categories(&mut out, &flatten_category_tree(&tree))?;
        }
    }

    out.flush()?;

    Ok(())
}

/// Run against the locked standard output.
///
/// # Errors
///
/// See [`run`].
pub fn run_to_stdout(config: &CliConfig) -> anyhow::Result<()> {
    run(config, io::stdout().lock())
}
