//! Test Helpers

use jiff::{SignedDuration, Timestamp};

use crate::{
    domain::{
        coupons::{data::NewCoupon, records::CouponUuid},
        products::{PurchaseOption, data::NewProduct, records::ProductUuid},
    },
    pricing::DiscountRule,
};

/// A standard-shipping product in the "general" category.
pub(crate) fn new_product(uuid: ProductUuid, price: u64) -> NewProduct {
    NewProduct {
        uuid,
        name: "Product".to_string(),
        price,
        category: "general".to_string(),
        brand: "Generic".to_string(),
        subcategory: None,
        purchase_options: vec![PurchaseOption::Standard],
    }
}

/// An active, unlimited coupon valid from an hour ago until tomorrow.
pub(crate) fn new_coupon(code: &str, discount: DiscountRule) -> NewCoupon {
    let now = Timestamp::now();

    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        discount,
        min_purchase: 0,
        valid_from: now - SignedDuration::from_hours(1),
        valid_to: now + SignedDuration::from_hours(24),
        usage_limit: None,
        active: true,
    }
}
