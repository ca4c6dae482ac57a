//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{
        carts::lines::QuantityOutOfRange, coupons::CouponsServiceError,
        products::records::ProductUuid,
    },
    pricing::PricingError,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("there is nothing to order")]
    EmptyCart,

    #[error("quantity must be a positive whole number")]
    InvalidQuantity,

    #[error("product {0} is unavailable")]
    ProductUnavailable(ProductUuid),

    #[error("purchase option not offered for product {0}")]
    InvalidPurchaseOption(ProductUuid),

    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<QuantityOutOfRange> for OrdersServiceError {
    fn from(_: QuantityOutOfRange) -> Self {
        Self::InvalidQuantity
    }
}

impl From<PricingError> for OrdersServiceError {
    fn from(_: PricingError) -> Self {
        Self::InvalidData
    }
}

/// Coupon failures that are not rejections. Rejections never reach here.
impl From<CouponsServiceError> for OrdersServiceError {
    fn from(error: CouponsServiceError) -> Self {
        match error {
            CouponsServiceError::Sql(error) => Self::Sql(error),
            CouponsServiceError::NotFound => Self::NotFound,
            CouponsServiceError::AlreadyExists => Self::AlreadyExists,
            CouponsServiceError::InvalidReference => Self::InvalidReference,
            CouponsServiceError::MissingRequiredData => Self::MissingRequiredData,
            CouponsServiceError::Rejected(_)
            | CouponsServiceError::InvalidData
            | CouponsServiceError::Pricing(_) => Self::InvalidData,
        }
    }
}
