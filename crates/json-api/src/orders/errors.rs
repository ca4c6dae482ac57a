//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        OrdersServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be a positive whole number")
        }
        OrdersServiceError::ProductUnavailable(product) => {
            StatusError::bad_request().brief(format!("Product {product} is unavailable"))
        }
        OrdersServiceError::InvalidPurchaseOption(product) => StatusError::bad_request()
            .brief(format!("Purchase option not offered for product {product}")),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::Sql(source) => {
            error!("order storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
