//! Coupon Handlers

pub(crate) mod index;
pub(crate) mod validate;

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use rust_decimal::Decimal;

    use storefront_app::{
        domain::coupons::records::{CouponRecord, CouponUuid},
        pricing::DiscountRule,
    };

    /// `SAVE10`: 10% off, capped at 15.00, from a 20.00 subtotal.
    pub(super) fn make_coupon() -> CouponRecord {
        let now = Timestamp::now();

        CouponRecord {
            uuid: CouponUuid::new(),
            code: "SAVE10".to_string(),
            discount: DiscountRule::Percentage {
                percentage: Decimal::TEN,
                max_discount: Some(15_00),
            },
            min_purchase: 20_00,
            valid_from: now - SignedDuration::from_hours(1),
            valid_to: now + SignedDuration::from_hours(24),
            usage_limit: Some(100),
            used_count: 3,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
