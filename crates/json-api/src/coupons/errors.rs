//! Coupon Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::coupons::{CouponRejection, CouponsServiceError};

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::Rejected(rejection) => rejection_status(rejection),
        CouponsServiceError::NotFound => StatusError::not_found().brief("Coupon not found"),
        CouponsServiceError::AlreadyExists => StatusError::conflict().brief("Coupon already exists"),
        CouponsServiceError::InvalidReference
        | CouponsServiceError::MissingRequiredData
        | CouponsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid coupon payload")
        }
        CouponsServiceError::Sql(source) => {
            error!("coupon storage failure: {source}");

            StatusError::internal_server_error()
        }
        CouponsServiceError::Pricing(source) => {
            error!("coupon pricing failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

fn rejection_status(rejection: CouponRejection) -> StatusError {
    let status = match rejection {
        CouponRejection::CodeNotFound => StatusError::not_found(),
        CouponRejection::Inactive
        | CouponRejection::Expired
        | CouponRejection::MinPurchaseNotMet { .. }
        | CouponRejection::UsageLimitExceeded => StatusError::bad_request(),
    };

    status.brief(rejection.to_string())
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn unknown_code_is_not_found() {
        let status = into_status_error(CouponRejection::CodeNotFound.into());

        assert_eq!(status.code, StatusCode::NOT_FOUND);
    }

    #[test]
    fn rule_failures_are_bad_requests_with_reason() {
        let status = into_status_error(
            CouponRejection::MinPurchaseNotMet {
                min_purchase: 50_00,
            }
            .into(),
        );

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.brief, "minimum purchase of 5000 not met");
    }
}
