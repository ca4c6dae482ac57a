//! Pricing
//!
//! Pure arithmetic for checkout. All amounts are minor currency units (cents), so
//! every stored value is already exact to two decimal places; rounding only
//! happens when a percentage is applied and is half-up at the cent.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Errors raised while computing order amounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An amount does not fit in minor units.
    #[error("amount overflowed")]
    Overflow,

    /// A percentage below zero was supplied.
    #[error("percentage must not be negative")]
    NegativePercentage,
}

/// How a coupon reduces a subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountRule {
    /// Take `percentage` percent of the subtotal, capped at `max_discount` when set.
    Percentage {
        percentage: Decimal,
        max_discount: Option<u64>,
    },

    /// Take a fixed amount off.
    Fixed { amount: u64 },
}

impl DiscountRule {
    #[must_use]
    pub const fn kind_as_str(&self) -> &'static str {
        match self {
            Self::Percentage { .. } => "percentage",
            Self::Fixed { .. } => "fixed",
        }
    }
}

/// Computed amounts for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
}

impl Totals {
    /// Totals without any discount.
    #[must_use]
    pub const fn undiscounted(subtotal: u64) -> Self {
        Self {
            subtotal,
            discount: 0,
            total: subtotal,
        }
    }

    /// Build totals, clamping the discount so the total never goes negative.
    #[must_use]
    pub fn new(subtotal: u64, discount: u64) -> Self {
        let discount = discount.min(subtotal);

        Self {
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }
}

/// `unit_price * quantity`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in a `u64`.
pub fn line_total(unit_price: u64, quantity: u32) -> Result<u64, PricingError> {
    unit_price
        .checked_mul(u64::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Sum of line totals.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the sum does not fit in a `u64`.
pub fn subtotal<I>(line_totals: I) -> Result<u64, PricingError>
where
    I: IntoIterator<Item = u64>,
{
    line_totals
        .into_iter()
        .try_fold(0_u64, u64::checked_add)
        .ok_or(PricingError::Overflow)
}

/// `percentage` percent of `amount`, rounded half-up to the nearest minor unit.
///
/// # Errors
///
/// Returns an error for negative percentages or results that overflow.
pub fn percentage_of(amount: u64, percentage: Decimal) -> Result<u64, PricingError> {
    if percentage.is_sign_negative() && !percentage.is_zero() {
        return Err(PricingError::NegativePercentage);
    }

    Decimal::from(amount)
        .checked_mul(percentage)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .map(|raw| raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_u64())
        .ok_or(PricingError::Overflow)
}

/// The discount a rule grants on `subtotal`, never more than `subtotal` itself.
///
/// # Errors
///
/// Returns an error when the percentage arithmetic fails.
pub fn discount_for(rule: &DiscountRule, subtotal: u64) -> Result<u64, PricingError> {
    let discount = match rule {
        DiscountRule::Percentage {
            percentage,
            max_discount,
        } => {
            let raw = percentage_of(subtotal, *percentage)?;

            max_discount.map_or(raw, |cap| raw.min(cap))
        }
        DiscountRule::Fixed { amount } => *amount,
    };

    Ok(discount.min(subtotal))
}

/// Totals for `subtotal` with an optional discount rule applied.
///
/// # Errors
///
/// Returns an error when the discount cannot be computed.
pub fn price(subtotal: u64, rule: Option<&DiscountRule>) -> Result<Totals, PricingError> {
    match rule {
        Some(rule) => Ok(Totals::new(subtotal, discount_for(rule, subtotal)?)),
        None => Ok(Totals::undiscounted(subtotal)),
    }
}
