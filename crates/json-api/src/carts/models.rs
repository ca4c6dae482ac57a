//! Cart request and response bodies.

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    carts::records::{Cart, CartLine},
    products::PurchaseOption,
};

/// Materialized cart
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    /// Lines for live products, with current prices
    pub items: Vec<CartLineResponse>,

    /// Sum of line totals, in minor units
    pub subtotal: u64,

    /// Total units across all lines
    pub item_count: u64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            subtotal: cart.subtotal,
            items: cart.lines.into_iter().map(CartLineResponse::from).collect(),
        }
    }
}

/// Cart line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineResponse {
    pub product_id: Uuid,
    pub name: String,

    /// Current unit price, in minor units
    pub price: u64,

    pub quantity: u32,
    pub purchase_option: String,

    /// `price × quantity`, in minor units
    pub line_total: u64,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
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

/// Add Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCartLineRequest {
    pub product_id: Uuid,

    /// Units to add; merged into an existing line with the same option
    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Defaults to `standard`
    #[serde(default)]
    pub purchase_option: Option<String>,
}

/// Update Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateCartLineRequest {
    /// New quantity; zero or less removes the line
    pub quantity: i64,

    /// Defaults to `standard`
    #[serde(default)]
    pub purchase_option: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

/// Parse an optional purchase option, defaulting to `standard`.
pub(crate) fn purchase_option_or_default(
    value: Option<&str>,
) -> Result<PurchaseOption, StatusError> {
    value.map_or(Ok(PurchaseOption::default()), |value| {
        value
            .parse()
            .map_err(|_ignored| StatusError::bad_request().brief("Unknown purchase option"))
    })
}
