//! App Router

use salvo::Router;

use crate::{auth, carts, coupons, orders, products};

/// Routes that require a bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(carts::handlers::get::handler)
                .post(carts::handlers::add::handler)
                .delete(carts::handlers::clear::handler)
                .push(
                    Router::with_path("{product}")
                        .put(carts::handlers::update::handler)
                        .delete(carts::handlers::remove::handler),
                ),
        )
        .push(
            Router::with_path("coupons")
                .get(coupons::handlers::index::handler)
                .push(Router::with_path("validate").post(coupons::handlers::validate::handler)),
        )
        .push(
            Router::with_path("orders")
                .get(orders::handlers::index::handler)
                .post(orders::handlers::create::handler)
                .push(Router::with_path("{order}").get(orders::handlers::get::handler)),
        )
        .push(Router::with_path("products/facets").get(products::handlers::facets::handler))
}
