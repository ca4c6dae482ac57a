//! Coupon Records

use jiff::Timestamp;

use crate::{pricing::DiscountRule, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Coupon Record
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount: DiscountRule,
    pub min_purchase: u64,
    pub valid_from: Timestamp,
    pub valid_to: Timestamp,
    pub usage_limit: Option<u64>,
    pub used_count: u64,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A coupon that passed every rule, with the discount it grants.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponQuote {
    pub coupon: CouponRecord,
    pub discount: u64,
}
