//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{
        products::{PurchaseOption, records::ProductUuid},
        users::records::UserUuid,
    },
    pricing::{self, PricingError},
};

/// A stored cart line, keyed by `(user, product, purchase option)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineRecord {
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
    pub purchase_option: PurchaseOption,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line joined against the live catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub purchase_option: PurchaseOption,
    pub line_total: u64,
}

/// Materialized cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub user_uuid: UserUuid,
    pub lines: Vec<CartLine>,
    pub subtotal: u64,
}

impl Cart {
    /// Build a cart from materialized lines, summing the subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit.
    pub fn from_lines(user_uuid: UserUuid, lines: Vec<CartLine>) -> Result<Self, PricingError> {
        let subtotal = pricing::subtotal(lines.iter().map(|line| line.line_total))?;

        Ok(Self {
            user_uuid,
            lines,
            subtotal,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
