//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use storefront_app::domain::users::records::UserUuid;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// The authenticated shopper, set by the auth middleware.
    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError>;

    fn insert_user_uuid(&mut self, user: UserUuid);
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError> {
        self.obtain::<UserUuid>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn insert_user_uuid(&mut self, user: UserUuid) {
        self.inject(user);
    }
}
