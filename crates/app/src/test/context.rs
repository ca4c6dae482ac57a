//! Test context for service-level integration tests.

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        carts::PgCartsService,
        coupons::PgCouponsService,
        orders::PgOrdersService,
        products::PgProductsService,
        users::{PgUsersService, UsersService, UsersServiceError, data::NewUser, records::UserUuid},
    },
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub user_uuid: UserUuid,
    pub users: PgUsersService,
    pub products: PgProductsService,
    pub carts: PgCartsService,
    pub coupons: PgCouponsService,
    pub orders: PgOrdersService,
    pub auth: PgAuthService,
}

impl TestContext {
    /// Fresh database with one shopper already registered as `user_uuid`.
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let users = PgUsersService::new(db.clone());

        let user_uuid = UserUuid::new();

        users
            .create_user(NewUser {
                uuid: user_uuid,
                email: "shopper@example.com".to_string(),
                name: "Test Shopper".to_string(),
            })
            .await
            .expect("Failed to create default test user");

        Self {
            products: PgProductsService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            coupons: PgCouponsService::new(db.clone()),
            orders: PgOrdersService::new(db.clone()),
            auth: PgAuthService::new(db),
            users,
            user_uuid,
            db: test_db,
        }
    }

    /// Register another shopper, for isolation and concurrency tests.
    pub async fn create_user(&self, email: &str) -> Result<UserUuid, UsersServiceError> {
        let uuid = UserUuid::new();

        self.users
            .create_user(NewUser {
                uuid,
                email: email.to_string(),
                name: "Another Shopper".to_string(),
            })
            .await?;

        Ok(uuid)
    }
}
