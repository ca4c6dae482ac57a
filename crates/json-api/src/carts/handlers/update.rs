//! Update Cart Line Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use storefront_app::domain::{carts::data::CartLineUpdate, products::records::ProductUuid};

use crate::{
    carts::{
        errors::into_status_error,
        models::{CartResponse, UpdateCartLineRequest, purchase_option_or_default},
    },
    extensions::*,
    state::State,
};

/// Update Cart Line Handler
///
/// Sets a line's quantity. Zero or less removes the line.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or purchase option"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateCartLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let request = json.into_inner();

    let update = CartLineUpdate {
        product_uuid: ProductUuid::from_uuid(product.into_inner()),
        purchase_option: purchase_option_or_default(request.purchase_option.as_deref())?,
        quantity: request.quantity,
    };

    let cart = state
        .app
        .carts
        .set_line_quantity(user, update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
