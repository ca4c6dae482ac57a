//! Validate Coupon Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    coupons::{
        errors::into_status_error,
        models::{ValidateCouponRequest, ValidateCouponResponse},
    },
    extensions::*,
    state::State,
};

/// Validate Coupon Handler
///
/// Previews the discount a coupon grants on `total` without using it up.
#[endpoint(
    tags("coupons"),
    summary = "Validate Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon applies"),
        (status_code = StatusCode::BAD_REQUEST, description = "Coupon inactive, expired, below minimum purchase or used up"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon code not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<ValidateCouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner();

    let quote = state
        .app
        .coupons
        .validate(&request.code, request.total)
        .await
        .map_err(into_status_error)?;

    Ok(Json(quote.into()))
}
