//! Order Data

use crate::domain::carts::data::NewCartLine;

/// Payment method recorded when the request does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "card";

/// Shipping address. Every part is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

/// Checkout request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceOrder {
    /// Lines to buy. When absent the user's cart is used.
    pub items: Option<Vec<NewCartLine>>,
    pub coupon_code: Option<String>,
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<String>,
}
