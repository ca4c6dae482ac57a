//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductFacet, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        product.ok_or(ProductsServiceError::NotFound)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if product.purchase_options.is_empty() {
            return Err(ProductsServiceError::NoPurchaseOptions);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_price(&mut tx, product, update.price)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_distinct(
        &self,
        facet: ProductFacet,
    ) -> Result<Vec<String>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let values = self.repository.list_distinct(&mut tx, facet).await?;

        tx.commit().await?;

        Ok(values)
    }
}

/// Catalog lookup. Read-only as far as checkout is concerned.
#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve a single live product.
    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Changes a product's current price.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Distinct values of a catalog column across live products, sorted.
    async fn list_distinct(
        &self,
        facet: ProductFacet,
    ) -> Result<Vec<String>, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::PurchaseOption,
        test::{TestContext, helpers::new_product},
    };

    use super::*;

    #[tokio::test]
    async fn create_product_returns_record() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(NewProduct {
                purchase_options: vec![
                    PurchaseOption::Express,
                    PurchaseOption::Standard,
                    PurchaseOption::Express,
                ],
                ..new_product(uuid, 20_00)
            })
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.price, 20_00);
        assert_eq!(
            product.purchase_options.as_slice(),
            &[PurchaseOption::Standard, PurchaseOption::Express]
        );
        assert!(product.offers(PurchaseOption::Express));
        assert!(!product.offers(PurchaseOption::Bulk));

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_product_reflects_new_price() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products.create_product(new_product(uuid, 500)).await?;

        let updated = ctx
            .products
            .update_product(uuid, ProductUpdate { price: 750 })
            .await?;

        assert_eq!(updated.price, 750);

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products.create_product(new_product(uuid, 300)).await?;
        ctx.products.delete_product(uuid).await?;

        let result = ctx.products.get_product(uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        let again = ctx.products.delete_product(uuid).await;

        assert!(
            matches!(again, Err(ProductsServiceError::NotFound)),
            "expected NotFound on second delete, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_distinct_ignores_deleted_products() -> TestResult {
        let ctx = TestContext::new().await;
        let deleted = ProductUuid::new();

        ctx.products
            .create_product(NewProduct {
                category: "audio".to_string(),
                brand: "Acme".to_string(),
                ..new_product(ProductUuid::new(), 100)
            })
            .await?;

        ctx.products
            .create_product(NewProduct {
                category: "books".to_string(),
                brand: "Acme".to_string(),
                ..new_product(ProductUuid::new(), 100)
            })
            .await?;

        ctx.products
            .create_product(NewProduct {
                category: "garden".to_string(),
                ..new_product(deleted, 100)
            })
            .await?;

        ctx.products.delete_product(deleted).await?;

        let categories = ctx.products.list_distinct(ProductFacet::Category).await?;
        let brands = ctx.products.list_distinct(ProductFacet::Brand).await?;

        assert_eq!(categories, vec!["audio".to_string(), "books".to_string()]);
        assert_eq!(brands, vec!["Acme".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn create_product_with_blank_name_is_invalid() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(NewProduct {
                name: "   ".to_string(),
                ..new_product(ProductUuid::new(), 100)
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_without_purchase_options_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(NewProduct {
                purchase_options: Vec::new(),
                ..new_product(ProductUuid::new(), 100)
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NoPurchaseOptions)),
            "expected NoPurchaseOptions, got {result:?}"
        );
    }
}
