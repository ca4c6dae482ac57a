//! Coupon rules
//!
//! A coupon applies when it is active, `now` falls inside its validity window
//! (both ends inclusive), the subtotal reaches its minimum purchase and its usage
//! limit has not been reached. The first failing rule is reported.

use jiff::Timestamp;

use crate::{
    domain::coupons::{
        errors::{CouponRejection, CouponsServiceError},
        records::{CouponQuote, CouponRecord},
    },
    pricing,
};

/// Canonical form of a coupon code: trimmed and upper-cased.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Check every rule except existence, in order.
///
/// # Errors
///
/// Returns the first [`CouponRejection`] that applies.
pub fn check(coupon: &CouponRecord, subtotal: u64, now: Timestamp) -> Result<(), CouponRejection> {
    if !coupon.active {
        return Err(CouponRejection::Inactive);
    }

    if now < coupon.valid_from || now > coupon.valid_to {
        return Err(CouponRejection::Expired);
    }

    if subtotal < coupon.min_purchase {
        return Err(CouponRejection::MinPurchaseNotMet {
            min_purchase: coupon.min_purchase,
        });
    }

    if coupon
        .usage_limit
        .is_some_and(|limit| coupon.used_count >= limit)
    {
        return Err(CouponRejection::UsageLimitExceeded);
    }

    Ok(())
}

/// Check `coupon` against `subtotal` and compute its discount.
///
/// # Errors
///
/// Returns [`CouponsServiceError::Rejected`] when a rule fails, or a pricing
/// error when the discount cannot be computed.
pub fn quote(
    coupon: CouponRecord,
    subtotal: u64,
    now: Timestamp,
) -> Result<CouponQuote, CouponsServiceError> {
    check(&coupon, subtotal, now)?;

    let discount = pricing::discount_for(&coupon.discount, subtotal)?;

    Ok(CouponQuote { coupon, discount })
}
