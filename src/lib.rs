//! Mizan
//!
//! Mizan is the pricing and content resolution core of a bilingual (English/Arabic)
//! storefront: localized strings with fallbacks, sale prices inside time windows,
//! variant matching with additive price modifiers, and category navigation trees.

pub mod catalog;
pub mod categories;
pub mod discounts;
pub mod fixtures;
pub mod localization;
pub mod prelude;
pub mod report;
pub mod variants;
