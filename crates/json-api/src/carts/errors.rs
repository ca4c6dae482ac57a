//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be a positive whole number")
        }
        CartsServiceError::InvalidPurchaseOption => {
            StatusError::bad_request().brief("Purchase option not offered for this product")
        }
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::LineNotFound => StatusError::not_found().brief("Cart line not found"),
        CartsServiceError::NotFound => StatusError::not_found(),
        CartsServiceError::AlreadyExists => StatusError::conflict().brief("Cart line conflict"),
        CartsServiceError::Sql(source) => {
            error!("cart storage failure: {source}");

            StatusError::internal_server_error()
        }
        CartsServiceError::Pricing(source) => {
            error!("cart pricing failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
