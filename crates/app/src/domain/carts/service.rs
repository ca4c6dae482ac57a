//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{CartLineUpdate, NewCartLine},
            errors::CartsServiceError,
            lines::positive_quantity,
            records::Cart,
            repository::PgCartsRepository,
        },
        products::{PurchaseOption, records::ProductUuid, repository::PgProductsRepository},
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    repository: PgCartsRepository,
    products: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCartsRepository::new(),
            products: PgProductsRepository::new(),
        }
    }
}

/// Read the user's cart joined against the live catalog.
pub(crate) async fn materialize(
    repository: &PgCartsRepository,
    tx: &mut Transaction<'_, Postgres>,
    user: UserUuid,
) -> Result<Cart, CartsServiceError> {
    let lines = repository.get_lines(tx, user).await?;

    Ok(Cart::from_lines(user, lines)?)
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = materialize(&self.repository, &mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_line",
        skip(self, line),
        fields(
            user_uuid = %user,
            product_uuid = %line.product_uuid,
            purchase_option = %line.purchase_option,
            quantity = line.quantity
        ),
        err
    )]
    async fn add_line(
        &self,
        user: UserUuid,
        line: NewCartLine,
    ) -> Result<Cart, CartsServiceError> {
        let quantity = positive_quantity(line.quantity)?;

        let mut tx = self.db.begin().await?;

        self.repository.lock_cart(&mut tx, user).await?;

        let product = self
            .products
            .get_product(&mut tx, line.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        if !product.offers(line.purchase_option) {
            return Err(CartsServiceError::InvalidPurchaseOption);
        }

        let record = self
            .repository
            .upsert_line(
                &mut tx,
                user,
                line.product_uuid,
                line.purchase_option,
                quantity,
            )
            .await?;

        debug!(quantity = record.quantity, "upserted cart line");

        let cart = materialize(&self.repository, &mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.set_line_quantity",
        skip(self, update),
        fields(
            user_uuid = %user,
            product_uuid = %update.product_uuid,
            purchase_option = %update.purchase_option,
            quantity = update.quantity
        ),
        err
    )]
    async fn set_line_quantity(
        &self,
        user: UserUuid,
        update: CartLineUpdate,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.lock_cart(&mut tx, user).await?;

        if update.quantity <= 0 {
            self.repository
                .delete_line(&mut tx, user, update.product_uuid, update.purchase_option)
                .await?;
        } else {
            let quantity = positive_quantity(update.quantity)?;

            self.repository
                .set_quantity(
                    &mut tx,
                    user,
                    update.product_uuid,
                    update.purchase_option,
                    quantity,
                )
                .await?
                .ok_or(CartsServiceError::LineNotFound)?;
        }

        let cart = materialize(&self.repository, &mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.remove_line",
        skip(self),
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn remove_line(
        &self,
        user: UserUuid,
        product: ProductUuid,
        purchase_option: Option<PurchaseOption>,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.lock_cart(&mut tx, user).await?;

        let removed = match purchase_option {
            Some(option) => {
                self.repository
                    .delete_line(&mut tx, user, product, option)
                    .await?
            }
            None => {
                self.repository
                    .delete_product_lines(&mut tx, user, product)
                    .await?
            }
        };

        debug!(removed, "removed cart lines");

        let cart = materialize(&self.repository, &mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.clear",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn clear(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.lock_cart(&mut tx, user).await?;

        let removed = self.repository.clear(&mut tx, user).await?;

        tx.commit().await?;

        debug!(removed, "cleared cart");

        Ok(())
    }
}

/// Per-user shopping cart.
///
/// Every mutation locks the user's cart row first, so concurrent changes to
/// one cart apply one after another. Mutations return the materialized cart.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The cart with live names and prices. Lines for deleted products are left out.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add `quantity` of a product, merging with an existing line of the same option.
    async fn add_line(&self, user: UserUuid, line: NewCartLine) -> Result<Cart, CartsServiceError>;

    /// Replace a line's quantity; zero or less removes the line.
    async fn set_line_quantity(
        &self,
        user: UserUuid,
        update: CartLineUpdate,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove one line, or every line for the product when no option is given.
    async fn remove_line(
        &self,
        user: UserUuid,
        product: ProductUuid,
        purchase_option: Option<PurchaseOption>,
    ) -> Result<Cart, CartsServiceError>;

    /// Empty the cart.
    async fn clear(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}
