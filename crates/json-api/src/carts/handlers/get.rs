//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's cart with current prices. Lines for products that
/// have left the catalog are omitted.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Materialized cart"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::{
        domain::{
            carts::{CartsServiceError, MockCartsService, records::Cart},
            products::records::ProductUuid,
        },
        pricing::PricingError,
    };

    use crate::test_helpers::{Mocks, TEST_USER_UUID};

    use super::{super::tests::make_cart, *};

    fn make_service(carts: MockCartsService) -> Service {
        Mocks {
            carts,
            ..Mocks::default()
        }
        .service(Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn get_returns_materialized_cart() -> TestResult {
        let product = ProductUuid::new();
        let cart = make_cart(product);

        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.subtotal, 40_00);
        assert_eq!(body.item_count, 2);
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].product_id, product.into_uuid());
        assert_eq!(body.items[0].purchase_option, "standard");

        Ok(())
    }

    #[tokio::test]
    async fn get_empty_cart_returns_zero_subtotal() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_get_cart().once().return_once(|_| {
            Ok(Cart {
                user_uuid: TEST_USER_UUID,
                lines: Vec::new(),
                subtotal: 0,
            })
        });

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert!(body.items.is_empty(), "expected no items");
        assert_eq!(body.subtotal, 0);

        Ok(())
    }

    #[tokio::test]
    async fn pricing_failure_returns_500() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::Pricing(PricingError::Overflow)));

        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
