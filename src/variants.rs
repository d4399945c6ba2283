//! Variants
//!
//! Matches a customer's attribute choices (colour, size, ...) against a product's
//! variants. An exact variant with its own price is authoritative; otherwise the price
//! is the base price plus the modifiers of the chosen attribute values.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::localization::LocalizedContent;

/// Kind of product attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Colour swatches
    Color,

    /// Sizes
    Size,

    /// Materials
    Material,

    /// Styles
    Style,

    /// Anything else
    #[default]
    #[serde(other)]
    Custom,
}

/// A selectable value of a product attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributeValue {
    /// Value identifier
    pub id: String,

    /// Raw value (e.g. `red`, `XL`)
    pub value: String,

    /// Display label
    #[serde(default)]
    pub label: Option<LocalizedContent>,

    /// Swatch colour, for colour attributes
    #[serde(default)]
    pub hex_color: Option<String>,

    /// Amount added to the base price when this value is chosen
    #[serde(default)]
    pub price_modifier: Option<Decimal>,

    /// Whether this value is in stock
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,
}

/// An attribute of a product with its ordered values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    /// Attribute identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: LocalizedContent,

    /// Kind of attribute
    #[serde(rename = "type", default)]
    pub attribute_type: AttributeType,

    /// Selectable values, in display order
    #[serde(default)]
    pub values: Vec<ProductAttributeValue>,
}

impl ProductAttribute {
    /// Find a value by id.
    pub fn value(&self, value_id: &str) -> Option<&ProductAttributeValue> {
        self.values.iter().find(|value| value.id == value_id)
    }
}

/// A purchasable combination of attribute values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant identifier
    pub id: String,

    /// Attribute id -> value id for every attribute defining this variant
    #[serde(default)]
    pub attribute_values: FxHashMap<String, String>,

    /// Price override
    #[serde(default)]
    pub price: Option<Decimal>,

    /// Variant image
    #[serde(default)]
    pub image: Option<String>,

    /// Stock keeping unit
    #[serde(default)]
    pub sku: Option<String>,

    /// Whether the variant is in stock
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,

    /// Units in stock
    #[serde(default)]
    pub stock_quantity: u32,
}

impl ProductVariant {
    /// Whether every selected attribute agrees with this variant.
    ///
    /// Attributes of the variant that are not selected do not prevent a match.
    pub fn matches(&self, selection: &AttributeSelection) -> bool {
        selection
            .iter()
            .all(|(attribute_id, value_id)| self.has_value(attribute_id, value_id))
    }

    fn has_value(&self, attribute_id: &str, value_id: &str) -> bool {
        self.attribute_values
            .get(attribute_id)
            .is_some_and(|value| value == value_id)
    }
}

fn in_stock_default() -> bool {
    true
}

/// Errors parsing an attribute selection from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionParseError {
    /// A pair was not in `attribute=value` form.
    #[error("expected attribute=value, got: {0}")]
    InvalidPair(String),
}

/// The attribute values a customer has chosen so far, by attribute id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSelection {
    choices: FxHashMap<String, String>,
}

impl AttributeSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose `value_id` for `attribute_id`, replacing any earlier choice.
    pub fn select(&mut self, attribute_id: impl Into<String>, value_id: impl Into<String>) {
        self.choices.insert(attribute_id.into(), value_id.into());
    }

    /// Builder form of [`AttributeSelection::select`].
    #[must_use]
    pub fn with(mut self, attribute_id: impl Into<String>, value_id: impl Into<String>) -> Self {
        self.select(attribute_id, value_id);
        self
    }

    /// Clear the choice for `attribute_id`.
    pub fn deselect(&mut self, attribute_id: &str) -> Option<String> {
        self.choices.remove(attribute_id)
    }

    /// The chosen value id for `attribute_id`.
    pub fn get(&self, attribute_id: &str) -> Option<&str> {
        self.choices.get(attribute_id).map(String::as_str)
    }

    /// Iterate over `(attribute id, value id)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.choices
            .iter()
            .map(|(attribute, value)| (attribute.as_str(), value.as_str()))
    }

    /// Number of chosen attributes.
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Whether nothing has been chosen.
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Whether every attribute has a choice.
    pub fn is_complete(&self, attributes: &[ProductAttribute]) -> bool {
        attributes
            .iter()
            .all(|attribute| self.choices.contains_key(&attribute.id))
    }
}

impl<A: Into<String>, V: Into<String>> FromIterator<(A, V)> for AttributeSelection {
    fn from_iter<I: IntoIterator<Item = (A, V)>>(iter: I) -> Self {
        Self {
            choices: iter
                .into_iter()
                .map(|(attribute, value)| (attribute.into(), value.into()))
                .collect(),
        }
    }
}

impl FromStr for AttributeSelection {
    type Err = SelectionParseError;

    /// Parse `color=red,size=l`. Blank input is an empty selection.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((attribute, value))
                    if !attribute.trim().is_empty() && !value.trim().is_empty() =>
                {
                    Ok((attribute.trim(), value.trim()))
                }
                _ => Err(SelectionParseError::InvalidPair(pair.to_string())),
            })
            .collect()
    }
}

impl fmt::Display for AttributeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable();

        for (i, (attribute, value)) in pairs.into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{attribute}={value}")?;
        }

        Ok(())
    }
}

/// Resolved price for a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantPrice<'a> {
    /// Unit price for the selection
    pub price: Decimal,

    /// The variant matching the selection, if any
    pub matched_variant: Option<&'a ProductVariant>,
}

/// Find the first variant agreeing with every selected attribute.
///
/// Stock status does not affect matching. An empty selection matches nothing.
pub fn find_variant<'a>(
    variants: &'a [ProductVariant],
    selection: &AttributeSelection,
) -> Option<&'a ProductVariant> {
    if selection.is_empty() {
        return None;
    }

    variants.iter().find(|variant| variant.matches(selection))
}

/// Resolve the unit price of a selection.
///
/// A matched variant's own price wins outright. Otherwise the price is `base_price`
/// plus the modifier of each selected value; unknown attributes or values add nothing.
pub fn resolve_variant_price<'a>(
    base_price: Decimal,
    attributes: &[ProductAttribute],
    variants: &'a [ProductVariant],
    selection: &AttributeSelection,
) -> VariantPrice<'a> {
    let matched_variant = find_variant(variants, selection);

    if let Some(price) = matched_variant.and_then(|variant| variant.price) {
        return VariantPrice {
            price,
            matched_variant,
        };
    }

    VariantPrice {
        price: base_price.saturating_add(selected_modifiers(attributes, selection)),
        matched_variant,
    }
}

/// Whether choosing `value_id` for `attribute_id` can still lead to something in stock.
///
/// Other choices in `selection` are kept. Without variants the value's own stock flag
/// decides. Matching never uses this; it is for greying out options.
pub fn is_value_available(
    attributes: &[ProductAttribute],
    variants: &[ProductVariant],
    selection: &AttributeSelection,
    attribute_id: &str,
    value_id: &str,
) -> bool {
    if variants.is_empty() {
        return attributes
            .iter()
            .find(|attribute| attribute.id == attribute_id)
            .and_then(|attribute| attribute.value(value_id))
            .is_some_and(|value| value.in_stock);
    }

    let candidate = selection.clone().with(attribute_id, value_id);

    variants
        .iter()
        .any(|variant| variant.in_stock && variant.matches(&candidate))
}

/// Lowest and highest unit price a product can resolve to.
///
/// With variants this is the spread of their unit prices, where an unpriced variant costs
/// `base_price` plus the modifiers of its own attribute values. Without variants it is
/// `base_price` plus the cheapest and dearest modifier of each attribute.
pub fn variant_price_range(
    base_price: Decimal,
    attributes: &[ProductAttribute],
    variants: &[ProductVariant],
) -> (Decimal, Decimal) {
    if !variants.is_empty() {
        return variants
            .iter()
            .map(|variant| {
                variant.price.unwrap_or_else(|| {
                    let pairs = variant
                        .attribute_values
                        .iter()
                        .map(|(attribute, value)| (attribute.as_str(), value.as_str()));

                    base_price.saturating_add(modifier_total(attributes, pairs))
                })
            })
            .fold((Decimal::MAX, Decimal::MIN), |(low, high), price| {
                (low.min(price), high.max(price))
            });
    }

    attributes
        .iter()
        .filter(|attribute| !attribute.values.is_empty())
        .fold((base_price, base_price), |(low, high), attribute| {
            let modifiers = attribute
                .values
                .iter()
                .map(|value| value.price_modifier.unwrap_or_default());

            let cheapest = modifiers.clone().min().unwrap_or_default();
            let dearest = modifiers.max().unwrap_or_default();

            (low.saturating_add(cheapest), high.saturating_add(dearest))
        })
}

fn selected_modifiers(attributes: &[ProductAttribute], selection: &AttributeSelection) -> Decimal {
    modifier_total(attributes, selection.iter())
}

fn modifier_total<'s>(
    attributes: &[ProductAttribute],
    pairs: impl Iterator<Item = (&'s str, &'s str)>,
) -> Decimal {
    pairs
        .filter_map(|(attribute_id, value_id)| {
            let modifier = attributes
                .iter()
                .find(|attribute| attribute.id == attribute_id)
                .and_then(|attribute| attribute.value(value_id))
                .and_then(|value| value.price_modifier);

            if modifier.is_none() {
                trace!(attribute_id, value_id, "no price modifier for selection");
            }

            modifier
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
