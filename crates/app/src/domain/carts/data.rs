//! Cart Data

use crate::domain::products::{PurchaseOption, records::ProductUuid};

/// A line to add to a cart, or an item sent with a checkout request.
///
/// `quantity` is the raw requested amount and is validated before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartLine {
    pub product_uuid: ProductUuid,
    pub quantity: i64,
    pub purchase_option: PurchaseOption,
}

/// Replacement quantity for an existing line. Zero or less removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLineUpdate {
    pub product_uuid: ProductUuid,
    pub purchase_option: PurchaseOption,
    pub quantity: i64,
}
