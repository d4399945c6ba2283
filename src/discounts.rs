//! Discounts
//!
//! Sale price calculation for a single product. A discount only applies while the
//! product is flagged as on sale, the current time falls inside the sale window, and
//! either a flat sale price or a percentage off is usable.

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Number of decimal places prices are rounded to.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Inclusive time range during which a sale is active. Either side may be unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleWindow {
    /// First instant the sale is active, if bounded
    pub start: Option<Timestamp>,

    /// Last instant the sale is active, if bounded
    pub end: Option<Timestamp>,
}

impl SaleWindow {
    /// Create a new sale window.
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Whether `now` falls inside the window, bounds included.
    pub fn contains(&self, now: Timestamp) -> bool {
        self.start.is_none_or(|start| now >= start) && self.end.is_none_or(|end| now <= end)
    }
}

/// The pricing fields of a product needed to work out its sale price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountableProduct {
    /// Product identifier
    pub id: String,

    /// Base price
    pub price: Decimal,

    /// Flat sale price, only usable when below `price`
    pub sale_price: Option<Decimal>,

    /// Percentage off, only usable when strictly between 0 and 100
    pub discount_percent: Option<Decimal>,

    /// Whether the product is flagged as on sale
    #[serde(default)]
    pub on_sale: bool,

    /// Start of the sale window
    pub sale_start_date: Option<Timestamp>,

    /// End of the sale window
    pub sale_end_date: Option<Timestamp>,
}

impl DiscountableProduct {
    /// The product's sale window.
    pub fn sale_window(&self) -> SaleWindow {
        SaleWindow::new(self.sale_start_date, self.sale_end_date)
    }
}

/// Outcome of a price calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountResult {
    /// Whether a discount applies
    pub has_discount: bool,

    /// Price before any discount
    pub original_price: Decimal,

    /// Price the customer pays
    pub discounted_price: Decimal,

    /// `original_price - discounted_price`
    pub savings_amount: Decimal,

    /// Savings as a whole percentage of the original price
    pub savings_percent: u32,
}

impl DiscountResult {
    /// A result with no discount applied.
    pub fn none(price: Decimal) -> Self {
        Self {
            has_discount: false,
            original_price: price,
            discounted_price: price,
            savings_amount: Decimal::ZERO,
            savings_percent: 0,
        }
    }
}

/// Calculate the price of a product at the instant `now`.
///
/// Invalid or incomplete sale data never produces an error; it produces a result
/// without a discount.
pub fn calculate_product_price(product: &DiscountableProduct, now: Timestamp) -> DiscountResult {
    let price = product.price;

    if !product.on_sale {
        return DiscountResult::none(price);
    }

    if !product.sale_window().contains(now) {
        trace!(product_id = %product.id, %now, "sale window not active");

        return DiscountResult::none(price);
    }

    let Some(discounted) = sale_price_for(product) else {
        debug!(
            product_id = %product.id,
            "product is on sale without a usable sale price or discount percent"
        );

        return DiscountResult::none(price);
    };

    if discounted >= price || discounted < Decimal::ZERO {
        debug!(
            product_id = %product.id,
            %price,
            %discounted,
            "discarding discount outside the valid price range"
        );

        return DiscountResult::none(price);
    }

    let savings_amount = (price - discounted).max(Decimal::ZERO);

    DiscountResult {
        has_discount: true,
        original_price: price,
        discounted_price: discounted,
        savings_amount,
        savings_percent: savings_percent(savings_amount, price),
    }
}

/// Calculate the price of a product using the system clock.
pub fn calculate_product_price_now(product: &DiscountableProduct) -> DiscountResult {
    calculate_product_price(product, Timestamp::now())
}

/// Apply a percentage off to a price, rounding half-up to minor units.
///
/// Returns `None` if the arithmetic overflows.
pub fn percent_off(price: Decimal, percent: Decimal) -> Option<Decimal> {
    let remaining = Decimal::ONE_HUNDRED.checked_sub(percent)?;

    Some(
        price
            .checked_mul(remaining)?
            .checked_div(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
    )
}

/// Savings as a whole percentage of `original`, or 0 when `original` is not positive.
pub fn savings_percent(savings: Decimal, original: Decimal) -> u32 {
    if original <= Decimal::ZERO {
        return 0;
    }

    savings
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(original))
        .map(|ratio| ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|ratio| ratio.to_u32())
        .unwrap_or(0)
}

/// The flat sale price if usable, else the percentage price if usable.
fn sale_price_for(product: &DiscountableProduct) -> Option<Decimal> {
    let price = product.price;

    if let Some(sale_price) = product
        .sale_price
        .filter(|sale_price| *sale_price > Decimal::ZERO && *sale_price < price)
    {
        return Some(sale_price);
    }

    product
        .discount_percent
        .filter(|percent| *percent > Decimal::ZERO && *percent < Decimal::ONE_HUNDRED)
        .and_then(|percent| percent_off(price, percent))
}
