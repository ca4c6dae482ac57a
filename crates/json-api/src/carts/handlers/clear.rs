//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Clear Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    state
        .app
        .carts
        .clear(user)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use storefront_app::domain::carts::MockCartsService;

    use crate::test_helpers::{Mocks, TEST_USER_UUID};

    use super::*;

    #[tokio::test]
    async fn clear_returns_200() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(()));

        let service = Mocks {
            carts,
            ..Mocks::default()
        }
        .service(Router::with_path("cart").delete(handler));

        let res = TestClient::delete("http://example.com/cart")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
