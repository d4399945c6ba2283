//! Mizan prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Product, Quote, quote},
    categories::{
        Category, CategoryNode, FlatCategory, build_category_tree, category_path,
        flatten_category_tree,
    },
    discounts::{
        DiscountResult, DiscountableProduct, SaleWindow, calculate_product_price,
        calculate_product_price_now,
    },
    fixtures::{Fixture, FixtureError},
    localization::{
        Language, LocalizableInput, LocalizedContent, TextDirection, ensure_localized_content,
        get_localized_string,
    },
    report::{Report, ReportError},
    variants::{
        AttributeSelection, AttributeType, ProductAttribute, ProductAttributeValue,
        ProductVariant, SelectionParseError, VariantPrice, find_variant, is_value_available,
        resolve_variant_price, variant_price_range,
    },
};
