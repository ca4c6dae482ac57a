//! Add Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use storefront_app::domain::{carts::data::NewCartLine, products::records::ProductUuid};

use crate::{
    carts::{
        errors::into_status_error,
        models::{AddCartLineRequest, CartResponse, purchase_option_or_default},
    },
    extensions::*,
    state::State,
};

/// Add Cart Line Handler
///
/// Adds units of a product. A line with the same product and purchase option
/// is incremented rather than duplicated.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or purchase option"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let request = json.into_inner();

    let line = NewCartLine {
        product_uuid: ProductUuid::from_uuid(request.product_id),
        quantity: request.quantity,
        purchase_option: purchase_option_or_default(request.purchase_option.as_deref())?,
    };

    let cart = state
        .app
        .carts
        .add_line(user, line)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
