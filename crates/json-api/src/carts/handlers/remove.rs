//! Remove Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::products::records::ProductUuid;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Line Handler
///
/// Removes the product's line for one purchase option, or every line for the
/// product when the `purchaseOption` query parameter is omitted. Removing
/// nothing is not an error.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown purchase option"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let purchase_option = req
        .query::<String>("purchaseOption")
        .map(|value| value.parse())
        .transpose()
        .map_err(|_ignored| StatusError::bad_request().brief("Unknown purchase option"))?;

    let cart = state
        .app
        .carts
        .remove_line(user, ProductUuid::from_uuid(product.into_inner()), purchase_option)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
