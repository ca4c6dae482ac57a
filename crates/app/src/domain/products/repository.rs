//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use smallvec::SmallVec;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{try_get_amount, try_i64_from_u64},
    domain::products::{
        PurchaseOption,
        data::{NewProduct, ProductFacet},
        records::{ProductRecord, ProductUuid},
    },
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const DISTINCT_CATEGORIES_SQL: &str = include_str!("sql/distinct_categories.sql");
const DISTINCT_BRANDS_SQL: &str = include_str!("sql/distinct_brands.sql");
const DISTINCT_SUBCATEGORIES_SQL: &str = include_str!("sql/distinct_subcategories.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Live catalog lookup; soft-deleted products are not found.
    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        let price = try_i64_from_u64(product.price, "price")?;

        let mut options = product.purchase_options;

        options.sort_unstable();
        options.dedup();

        let options: Vec<String> = options.iter().map(ToString::to_string).collect();

        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name)
            .bind(price)
            .bind(product.category)
            .bind(product.brand)
            .bind(product.subcategory)
            .bind(options)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        price: u64,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(try_i64_from_u64(price, "price")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_distinct(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        facet: ProductFacet,
    ) -> Result<Vec<String>, sqlx::Error> {
        let sql = match facet {
            ProductFacet::Category => DISTINCT_CATEGORIES_SQL,
            ProductFacet::Brand => DISTINCT_BRANDS_SQL,
            ProductFacet::Subcategory => DISTINCT_SUBCATEGORIES_SQL,
        };

        query_scalar::<Postgres, String>(sql)
            .fetch_all(&mut **tx)
            .await
    }
}

pub(crate) fn try_get_purchase_option(
    row: &PgRow,
    col: &str,
) -> Result<PurchaseOption, sqlx::Error> {
    let value: String = row.try_get(col)?;

    value
        .parse::<PurchaseOption>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: col.to_string(),
            source: Box::new(e),
        })
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let purchase_options = row
            .try_get::<Vec<String>, _>("purchase_options")?
            .iter()
            .map(|value| value.parse::<PurchaseOption>())
            .collect::<Result<SmallVec<[PurchaseOption; 4]>, _>>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "purchase_options".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            category: row.try_get("category")?,
            brand: row.try_get("brand")?,
            subcategory: row.try_get("subcategory")?,
            purchase_options,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
