//! Report
//!
//! Console tables for catalog prices, variant quotes and the category menu.

use std::{io, ops::Range};

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Findable, Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::{Product, Quote},
    categories::FlatCategory,
    discounts::{DiscountResult, calculate_product_price},
    localization::Language,
};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The currency code is not an ISO 4217 code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Writing to the output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Renders storefront data as tables in one language and currency.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    language: Language,
    currency: &'static Currency,
}

impl Report {
    /// Create a report for `language`, formatting money in `currency_code`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownCurrency`] if the code is not recognised.
    pub fn new(language: Language, currency_code: &str) -> Result<Self, ReportError> {
        let currency = Currency::find(&currency_code.to_uppercase())
            .ok_or_else(|| ReportError::UnknownCurrency(currency_code.to_string()))?;

        Ok(Self { language, currency })
    }

    /// Language names are shown in.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Format an amount in the report currency.
    pub fn money(&self, amount: Decimal) -> String {
        Money::from_decimal(amount, self.currency).to_string()
    }

    /// Write the price of every product at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_prices(
        &self,
        mut out: impl io::Write,
        products: &[Product],
        now: Timestamp,
    ) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record(["Product", "Price", "Sale Price", "Savings", "From / To"]);

        for product in products {
            let pricing = calculate_product_price(&product.discountable(), now);
            let (low, high) = product.price_range();

            builder.push_record([
                product.display_name(self.language).to_string(),
                self.money(pricing.original_price),
                self.sale_cell(&pricing),
                self.savings_cell(&pricing),
                format!("{} / {}", self.money(low), self.money(high)),
            ]);
        }

        write_table(&mut out, builder, 1..5)
    }

    /// Write a single variant quote.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_quote(&self, mut out: impl io::Write, quote: &Quote<'_>) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record(["Field", "Value"]);
        builder.push_record([
            "Product".to_string(),
            quote.product.display_name(self.language).to_string(),
        ]);
        builder.push_record([
            "Variant".to_string(),
            quote
                .variant
                .map_or_else(|| "-".to_string(), |variant| variant.id.clone()),
        ]);
        builder.push_record(["SKU".to_string(), quote.sku().unwrap_or("-").to_string()]);
        builder.push_record(["Unit Price".to_string(), self.money(quote.unit_price)]);
        builder.push_record(["Sale Price".to_string(), self.sale_cell(&quote.pricing)]);
        builder.push_record(["Savings".to_string(), self.savings_cell(&quote.pricing)]);
        builder.push_record([
            "In Stock".to_string(),
            if quote.in_stock { "yes" } else { "no" }.to_string(),
        ]);

        write_table(&mut out, builder, 1..2)
    }

    /// Write a flattened category tree, indented by depth.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_categories(
        &self,
        mut out: impl io::Write,
        categories: &[FlatCategory<'_>],
    ) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record(["Category", "Slug"]);

        for category in categories {
            builder.push_record([
                format!(
                    "{}{}",
                    "  ".repeat(category.depth),
                    category.name.get(self.language)
                ),
                category.slug.to_string(),
            ]);
        }

        write_table(&mut out, builder, 0..0)
    }

    fn sale_cell(&self, pricing: &DiscountResult) -> String {
        if pricing.has_discount {
            self.money(pricing.discounted_price)
        } else {
            "-".to_string()
        }
    }

    fn savings_cell(&self, pricing: &DiscountResult) -> String {
        if pricing.has_discount {
            format!(
                "({}%) -{}",
                pricing.savings_percent,
                self.money(pricing.savings_amount)
            )
        } else {
            "-".to_string()
        }
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    money_columns: Range<usize>,
) -> Result<(), ReportError> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    if !money_columns.is_empty() {
        table.modify(Columns::new(money_columns), Alignment::right());
    }

    writeln!(out, "{table}")?;

    Ok(())
}
