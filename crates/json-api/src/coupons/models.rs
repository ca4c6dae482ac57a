//! Coupon request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use storefront_app::{
    domain::coupons::records::{CouponQuote, CouponRecord},
    pricing::DiscountRule,
};

/// Coupon
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponResponse {
    pub code: String,

    /// `percentage` or `fixed`
    pub discount_type: String,

    /// Percent for percentage coupons, minor units for fixed ones
    pub discount_value: String,

    /// Cap on a percentage discount, in minor units
    pub max_discount: Option<u64>,

    /// Smallest qualifying subtotal, in minor units
    pub min_purchase: u64,

    pub valid_from: String,
    pub valid_to: String,
    pub usage_limit: Option<u64>,
    pub used_count: u64,
}

impl From<CouponRecord> for CouponResponse {
    fn from(coupon: CouponRecord) -> Self {
        let (discount_value, max_discount) = match &coupon.discount {
            DiscountRule::Percentage {
                percentage,
                max_discount,
            } => (percentage.normalize().to_string(), *max_discount),
            DiscountRule::Fixed { amount } => (amount.to_string(), None),
        };

        Self {
            discount_type: coupon.discount.kind_as_str().to_string(),
            discount_value,
            max_discount,
            min_purchase: coupon.min_purchase,
            valid_from: coupon.valid_from.to_string(),
            valid_to: coupon.valid_to.to_string(),
            usage_limit: coupon.usage_limit,
            used_count: coupon.used_count,
            code: coupon.code,
        }
    }
}

/// Active coupons
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponsResponse {
    pub coupons: Vec<CouponResponse>,
}

/// Validate Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateCouponRequest {
    /// Matched case-insensitively
    pub code: String,

    /// Subtotal to price the coupon against, in minor units
    pub total: u64,
}

/// Coupon preview
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateCouponResponse {
    pub valid: bool,

    /// Discount the coupon would grant, in minor units
    pub discount: u64,

    pub coupon: CouponResponse,
}

impl From<CouponQuote> for ValidateCouponResponse {
    fn from(quote: CouponQuote) -> Self {
        Self {
            valid: true,
            discount: quote.discount,
            coupon: quote.coupon.into(),
        }
    }
}
