//! Catalog
//!
//! The storefront product record and price quotes that combine variant resolution
//! with the sale price calculation.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    discounts::{DiscountResult, DiscountableProduct, calculate_product_price},
    localization::{Language, LocalizedContent},
    variants::{
        AttributeSelection, ProductAttribute, ProductVariant, resolve_variant_price,
        variant_price_range,
    },
};

/// A product as the storefront API returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: LocalizedContent,

    /// Long description
    #[serde(default)]
    pub description: LocalizedContent,

    /// Category the product is listed under
    #[serde(default)]
    pub category_id: Option<String>,

    /// ISO 4217 currency code, if not the store default
    #[serde(default)]
    pub currency: Option<String>,

    /// Base price
    pub price: Decimal,

    /// Flat sale price
    #[serde(default)]
    pub sale_price: Option<Decimal>,

    /// Percentage off
    #[serde(default)]
    pub discount_percent: Option<Decimal>,

    /// Whether the product is flagged as on sale
    #[serde(default)]
    pub on_sale: bool,

    /// Start of the sale window
    #[serde(default)]
    pub sale_start_date: Option<Timestamp>,

    /// End of the sale window
    #[serde(default)]
    pub sale_end_date: Option<Timestamp>,

    /// Selectable attributes
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,

    /// Purchasable variants
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Pricing view of the product at its base price.
    pub fn discountable(&self) -> DiscountableProduct {
        self.discountable_at(self.price)
    }

    /// Pricing view of the product with `price` in place of the base price.
    ///
    /// The flat sale price was set against the base price, so it only carries over when
    /// `price` is the base price. The percentage off applies to any price.
    pub fn discountable_at(&self, price: Decimal) -> DiscountableProduct {
        DiscountableProduct {
            id: self.id.clone(),
            price,
            sale_price: self.sale_price.filter(|_| price == self.price),
            discount_percent: self.discount_percent,
            on_sale: self.on_sale,
            sale_start_date: self.sale_start_date,
            sale_end_date: self.sale_end_date,
        }
    }

    /// Display name in `language`.
    pub fn display_name(&self, language: Language) -> &str {
        self.name.get(language)
    }

    /// Lowest and highest unit price across attributes and variants.
    pub fn price_range(&self) -> (Decimal, Decimal) {
        variant_price_range(self.price, &self.attributes, &self.variants)
    }
}

/// Price of a product for a selection at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote<'a> {
    /// The quoted product
    pub product: &'a Product,

    /// Variant matching the selection, if any
    pub variant: Option<&'a ProductVariant>,

    /// Unit price after variant resolution, before any sale
    pub unit_price: Decimal,

    /// Sale calculation applied to `unit_price`
    pub pricing: DiscountResult,

    /// Whether the selection can be bought
    pub in_stock: bool,
}

impl Quote<'_> {
    /// SKU of the matched variant.
    pub fn sku(&self) -> Option<&str> {
        self.variant.and_then(|variant| variant.sku.as_deref())
    }

    /// Price the customer pays.
    pub fn final_price(&self) -> Decimal {
        self.pricing.discounted_price
    }
}

/// Quote `product` for `selection` at `now`.
///
/// The sale fields of the product apply to the variant-resolved unit price. Stock is the
/// matched variant's. Without a match, a product with variants is in stock when some
/// in-stock variant agrees with the selection, and one without variants when every
/// selected value exists and is in stock.
pub fn quote<'a>(product: &'a Product, selection: &AttributeSelection, now: Timestamp) -> Quote<'a> {
    let resolved = resolve_variant_price(
        product.price,
        &product.attributes,
        &product.variants,
        selection,
    );

    let pricing = calculate_product_price(&product.discountable_at(resolved.price), now);

    let in_stock = match resolved.matched_variant {
        Some(variant) => variant.in_stock,
        None if product.variants.is_empty() => selected_values_in_stock(product, selection),
        None => product
            .variants
            .iter()
            .any(|variant| variant.in_stock && variant.matches(selection)),
    };

    Quote {
        product,
        variant: resolved.matched_variant,
        unit_price: resolved.price,
        pricing,
        in_stock,
    }
}

fn selected_values_in_stock(product: &Product, selection: &AttributeSelection) -> bool {
    selection.iter().all(|(attribute_id, value_id)| {
        product
            .attributes
            .iter()
            .find(|attribute| attribute.id == attribute_id)
            .and_then(|attribute| attribute.value(value_id))
            .is_some_and(|value| value.in_stock)
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;
    use crate::variants::{AttributeType, ProductAttributeValue};

    fn sized_thobe() -> Product {
        Product {
            id: "thobe".to_string(),
            name: LocalizedContent::new("Classic Thobe", "ثوب كلاسيكي"),
            price: dec!(200),
            on_sale: true,
            discount_percent: Some(dec!(10)),
            attributes: vec![ProductAttribute {
                id: "size".to_string(),
                name: LocalizedContent::new("Size", "المقاس"),
                attribute_type: AttributeType::Size,
                values: vec![
                    ProductAttributeValue {
                        id: "m".to_string(),
                        value: "M".to_string(),
                        in_stock: true,
                        ..ProductAttributeValue::default()
                    },
                    ProductAttributeValue {
                        id: "xl".to_string(),
                        value: "XL".to_string(),
                        price_modifier: Some(dec!(20)),
                        in_stock: false,
                        ..ProductAttributeValue::default()
                    },
                ],
            }],
            ..Product::default()
        }
    }

    fn now() -> Result<Timestamp, jiff::Error> {
        "2026-05-01T09:30:00Z".parse()
    }

    #[test]
    fn sale_applies_to_resolved_price() -> TestResult {
        let product = sized_thobe();
        let selection = AttributeSelection::new().with("size", "xl");

        let quoted = quote(&product, &selection, now()?);

        assert_eq!(quoted.unit_price, dec!(220));
        assert_eq!(quoted.final_price(), dec!(198));
        assert!(quoted.pricing.has_discount);
        assert!(!quoted.in_stock);

        Ok(())
    }

    #[test]
    fn matched_variant_supplies_sku_and_stock() -> TestResult {
        let mut product = sized_thobe();
        product.on_sale = false;
        product.variants = vec![ProductVariant {
            id: "thobe-m".to_string(),
            attribute_values: [("size".to_string(), "m".to_string())]
                .into_iter()
                .collect(),
            price: Some(dec!(180)),
            sku: Some("THB-M".to_string()),
            in_stock: true,
            stock_quantity: 3,
            ..ProductVariant::default()
        }];

        let selection = AttributeSelection::new().with("size", "m");
        let quoted = quote(&product, &selection, now()?);

        assert_eq!(quoted.sku(), Some("THB-M"));
        assert_eq!(quoted.final_price(), dec!(180));
        assert!(quoted.in_stock);

        Ok(())
    }

    #[test]
    fn flat_sale_price_above_variant_price_is_dropped() -> TestResult {
        let mut product = sized_thobe();
        product.discount_percent = None;
        product.sale_price = Some(dec!(190));
        product.variants = vec![ProductVariant {
            id: "thobe-m".to_string(),
            attribute_values: [("size".to_string(), "m".to_string())]
                .into_iter()
                .collect(),
            price: Some(dec!(150)),
            in_stock: true,
            ..ProductVariant::default()
        }];

        let selection = AttributeSelection::new().with("size", "m");
        let quoted = quote(&product, &selection, now()?);

        assert!(!quoted.pricing.has_discount);
        assert_eq!(quoted.final_price(), dec!(150));

        Ok(())
    }

    #[test]
    fn flat_sale_price_stays_on_base_price() -> TestResult {
        let mut product = sized_thobe();
        product.discount_percent = None;
        product.sale_price = Some(dec!(150));
        product.variants = vec![ProductVariant {
            id: "thobe-m".to_string(),
            attribute_values: [("size".to_string(), "m".to_string())]
                .into_iter()
                .collect(),
            price: Some(dec!(300)),
            in_stock: true,
            ..ProductVariant::default()
        }];

        let overridden = quote(&product, &AttributeSelection::new().with("size", "m"), now()?);

        assert_eq!(overridden.unit_price, dec!(300));
        assert!(!overridden.pricing.has_discount);
        assert_eq!(overridden.final_price(), dec!(300));

        let base = quote(&product, &AttributeSelection::new(), now()?);

        assert_eq!(base.final_price(), dec!(150));
        assert_eq!(base.pricing.savings_percent, 25);

        Ok(())
    }

    #[test]
    fn unmatched_selection_needs_an_in_stock_variant() -> TestResult {
        let mut product = sized_thobe();
        product.variants = vec![ProductVariant {
            id: "thobe-m".to_string(),
            attribute_values: [("size".to_string(), "m".to_string())]
                .into_iter()
                .collect(),
            in_stock: false,
            ..ProductVariant::default()
        }];

        let nothing_selected = quote(&product, &AttributeSelection::new(), now()?);

        assert!(nothing_selected.variant.is_none());
        assert!(!nothing_selected.in_stock);

        let dangling = quote(&product, &AttributeSelection::new().with("size", "xxl"), now()?);

        assert!(!dangling.in_stock);

        product.variants.push(ProductVariant {
            id: "thobe-xl".to_string(),
            attribute_values: [("size".to_string(), "xl".to_string())]
                .into_iter()
                .collect(),
            in_stock: true,
            ..ProductVariant::default()
        });

        assert!(quote(&product, &AttributeSelection::new(), now()?).in_stock);

        Ok(())
    }

    #[test]
    fn unknown_values_are_out_of_stock_without_variants() -> TestResult {
        let product = sized_thobe();

        let known = quote(&product, &AttributeSelection::new().with("size", "m"), now()?);
        let unknown = quote(&product, &AttributeSelection::new().with("size", "xxl"), now()?);

        assert!(known.in_stock);
        assert!(!unknown.in_stock);
        assert!(quote(&product, &AttributeSelection::new(), now()?).in_stock);

        Ok(())
    }

    #[test]
    fn display_name_and_range() {
        let product = sized_thobe();

        assert_eq!(product.display_name(Language::Ar), "ثوب كلاسيكي");
        assert_eq!(product.price_range(), (dec!(200), dec!(220)));
    }
}
