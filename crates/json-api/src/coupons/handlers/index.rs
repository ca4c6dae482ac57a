//! Coupon Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    coupons::{errors::into_status_error, models::CouponsResponse},
    extensions::*,
    state::State,
};

/// Coupon Index Handler
///
/// Returns the active coupons, ordered by code.
#[endpoint(
    tags("coupons"),
    summary = "List Active Coupons",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CouponsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let coupons = state
        .app
        .coupons
        .list_active()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CouponsResponse {
        coupons: coupons.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::coupons::MockCouponsService;

    use crate::test_helpers::Mocks;

    use super::{super::tests::make_coupon, *};

    fn make_service(coupons: MockCouponsService) -> Service {
        Mocks {
            coupons,
            ..Mocks::default()
        }
        .service(Router::with_path("coupons").get(handler))
    }

    #[tokio::test]
    async fn index_returns_active_coupons() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_list_active()
            .once()
            .return_once(|| Ok(vec![make_coupon()]));

        let mut res = TestClient::get("http://example.com/coupons")
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CouponsResponse = res.take_json().await?;

        assert_eq!(body.coupons.len(), 1);

        let coupon = body.coupons.first().ok_or("missing coupon")?;

        assert_eq!(coupon.code, "SAVE10");
        assert_eq!(coupon.discount_type, "percentage");
        assert_eq!(coupon.discount_value, "10");
        assert_eq!(coupon.max_discount, Some(15_00));
        assert_eq!(coupon.used_count, 3);

        Ok(())
    }

    #[tokio::test]
    async fn index_without_coupons_returns_empty_list() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_list_active()
            .once()
            .return_once(|| Ok(Vec::new()));

        let mut res = TestClient::get("http://example.com/coupons")
            .send(&make_service(coupons))
            .await;

        let body: CouponsResponse = res.take_json().await?;

        assert!(body.coupons.is_empty());

        Ok(())
    }
}
