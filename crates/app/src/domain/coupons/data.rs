//! Coupon Data

use jiff::Timestamp;

use crate::{domain::coupons::records::CouponUuid, pricing::DiscountRule};

/// New Coupon Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    /// Normalized (trimmed, upper-cased) before it is stored.
    pub code: String,
    pub discount: DiscountRule,
    pub min_purchase: u64,
    pub valid_from: Timestamp,
    pub valid_to: Timestamp,
    pub usage_limit: Option<u64>,
    pub active: bool,
}
