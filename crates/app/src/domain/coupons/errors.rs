//! Coupons service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::pricing::PricingError;

/// Why a coupon cannot be applied. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponRejection {
    #[error("coupon code not found")]
    CodeNotFound,

    #[error("coupon is inactive")]
    Inactive,

    #[error("coupon is not valid at this time")]
    Expired,

    #[error("minimum purchase of {min_purchase} not met")]
    MinPurchaseNotMet { min_purchase: u64 },

    #[error("coupon usage limit exceeded")]
    UsageLimitExceeded,
}

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error(transparent)]
    Rejected(#[from] CouponRejection),

    #[error("coupon already exists")]
    AlreadyExists,

    #[error("coupon not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("discount could not be computed")]
    Pricing(#[from] PricingError),
}

impl From<Error> for CouponsServiceError {
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
