//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{domain::carts::lines::QuantityOutOfRange, pricing::PricingError};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must be a positive whole number")]
    InvalidQuantity,

    #[error("product not found")]
    ProductNotFound,

    #[error("purchase option not offered for this product")]
    InvalidPurchaseOption,

    #[error("cart line not found")]
    LineNotFound,

    #[error("cart already exists")]
    AlreadyExists,

    #[error("cart not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("cart amounts could not be computed")]
    Pricing(#[from] PricingError),
}

impl From<Error> for CartsServiceError {
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

impl From<QuantityOutOfRange> for CartsServiceError {
    fn from(_: QuantityOutOfRange) -> Self {
        Self::InvalidQuantity
    }
}
