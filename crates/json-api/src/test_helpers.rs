//! Test helpers.

use std::sync::Arc;

use salvo::{
    affix_state::{AffixList, inject},
    prelude::*,
};
use storefront_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::MockCartsService, coupons::MockCouponsService, orders::MockOrdersService,
        products::MockProductsService, users::MockUsersService, users::records::UserUuid,
    },
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// One mock per service. Any call without a matching expectation fails the
/// test.
pub(crate) struct Mocks {
    pub users: MockUsersService,
    pub products: MockProductsService,
    pub carts: MockCartsService,
    pub coupons: MockCouponsService,
    pub orders: MockOrdersService,
    pub auth: MockAuthService,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            users: MockUsersService::new(),
            products: MockProductsService::new(),
            carts: MockCartsService::new(),
            coupons: MockCouponsService::new(),
            orders: MockOrdersService::new(),
            auth: MockAuthService::new(),
        }
    }
}

impl Mocks {
    pub(crate) fn inject(self) -> AffixList {
        inject(State::from_app_context(AppContext {
            users: Arc::new(self.users),
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            coupons: Arc::new(self.coupons),
            orders: Arc::new(self.orders),
            auth: Arc::new(self.auth),
        }))
    }

    /// Serve `route` as [`TEST_USER_UUID`], skipping bearer auth.
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(self.inject())
                .hoop(inject_user)
                .push(route),
        )
    }
}

#[salvo::handler]
async fn inject_user(req: &mut Request, depot: &mut Depot, res: &mut Response, ctrl: &mut FlowCtrl) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}
