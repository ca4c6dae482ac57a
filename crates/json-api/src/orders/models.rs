//! Order request and response bodies.

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    carts::data::NewCartLine,
    orders::{
        data::{PlaceOrder, ShippingAddress},
        records::{OrderLineSnapshot, OrderRecord},
    },
    products::records::ProductUuid,
};

use crate::carts::models::purchase_option_or_default;

/// Place Order Request
///
/// Every field is optional. Without `items` the shopper's cart is ordered.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Option<Vec<OrderItemRequest>>,

    #[serde(default)]
    pub coupon_code: Option<String>,

    #[serde(default)]
    pub shipping_address: Option<ShippingAddressBody>,

    /// Defaults to `card`
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl PlaceOrderRequest {
    pub(crate) fn into_place_order(self) -> Result<PlaceOrder, StatusError> {
        let items = self
            .items
            .map(|items| {
                items
                    .into_iter()
                    .map(OrderItemRequest::into_line)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(PlaceOrder {
            items,
            coupon_code: self.coupon_code,
            shipping_address: self.shipping_address.map(Into::into).unwrap_or_default(),
            payment_method: self.payment_method,
        })
    }
}

/// Order item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemRequest {
    pub product_id: Uuid,

    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Defaults to `standard`
    #[serde(default)]
    pub purchase_option: Option<String>,
}

impl OrderItemRequest {
    fn into_line(self) -> Result<NewCartLine, StatusError> {
        Ok(NewCartLine {
            product_uuid: ProductUuid::from_uuid(self.product_id),
            quantity: self.quantity,
            purchase_option: purchase_option_or_default(self.purchase_option.as_deref())?,
        })
    }
}

fn default_quantity() -> i64 {
    1
}

/// Shipping address
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct ShippingAddressBody {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        Self {
            street: body.street,
            city: body.city,
            state: body.state,
            zip: body.zip,
            country: body.country,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        Self {
            street: address.street,
            city: address.city,
            state: address.state,
            zip: address.zip,
            country: address.country,
        }
    }
}

/// Order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub id: Uuid,
    pub items: Vec<OrderLineResponse>,

    /// Sum of line totals, in minor units
    pub subtotal: u64,

    /// Coupon discount, in minor units
    pub discount: u64,

    /// `subtotal - discount`, in minor units
    pub total: u64,

    /// Set only when a coupon was applied
    pub coupon_code: Option<String>,

    pub shipping_address: ShippingAddressBody,
    pub payment_method: String,
    pub status: String,
    pub created_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            id: order.uuid.into_uuid(),
            items: order.lines.into_iter().map(Into::into).collect(),
            subtotal: order.subtotal,
            discount: order.discount,
            total: order.total,
            coupon_code: order.coupon_code,
            shipping_address: order.shipping_address.into(),
            payment_method: order.payment_method,
            status: order.status.to_string(),
            created_at: order.created_at.to_string(),
        }
    }
}

/// Order line, as priced when the order was placed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderLineResponse {
    pub product_id: Uuid,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub purchase_option: String,
    pub line_total: u64,
}

impl From<OrderLineSnapshot> for OrderLineResponse {
    fn from(line: OrderLineSnapshot) -> Self {
        Self {
            product_id: line.product_uuid.into_uuid(),
            name: line.product_name,
            price: line.unit_price,
            quantity: line.quantity,
            purchase_option: line.purchase_option.to_string(),
            line_total: line.line_total,
        }
    }
}

/// Orders
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Newest first
    pub orders: Vec<OrderResponse>,
}
