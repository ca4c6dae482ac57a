//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{try_get_amount, try_get_quantity},
    domain::{
        carts::records::{CartLine, CartLineRecord},
        products::{PurchaseOption, records::ProductUuid, repository::try_get_purchase_option},
        users::records::UserUuid,
    },
    pricing,
};

const TOUCH_CART_SQL: &str = include_str!("sql/touch_cart.sql");
const UPSERT_CART_LINE_SQL: &str = include_str!("sql/upsert_cart_line.sql");
const SET_CART_LINE_QUANTITY_SQL: &str = include_str!("sql/set_cart_line_quantity.sql");
const DELETE_CART_LINE_SQL: &str = include_str!("sql/delete_cart_line.sql");
const DELETE_PRODUCT_LINES_SQL: &str = include_str!("sql/delete_product_lines.sql");
const CLEAR_CART_SQL: &str = include_str!("sql/clear_cart.sql");
const GET_CART_LINES_SQL: &str = include_str!("sql/get_cart_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Create the user's cart row if missing and lock it for the rest of the transaction.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_CART_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Insert a line, or add to the quantity of the existing line with the same key.
    pub(crate) async fn upsert_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        purchase_option: PurchaseOption,
        quantity: u32,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(UPSERT_CART_LINE_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(purchase_option.as_str())
            .bind(i64::from(quantity))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        purchase_option: PurchaseOption,
        quantity: u32,
    ) -> Result<Option<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(SET_CART_LINE_QUANTITY_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(purchase_option.as_str())
            .bind(i64::from(quantity))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        purchase_option: PurchaseOption,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_LINE_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(purchase_option.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Remove every line for `product`, whatever its purchase option.
    pub(crate) async fn delete_product_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_LINES_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Lines joined against live products. Lines for deleted products are skipped.
    pub(crate) async fn get_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(GET_CART_LINES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            purchase_option: try_get_purchase_option(row, "purchase_option")?,
            quantity: try_get_quantity(row, "quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let unit_price = try_get_amount(row, "unit_price")?;
        let quantity = try_get_quantity(row, "quantity")?;

        let line_total =
            pricing::line_total(unit_price, quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "unit_price".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            unit_price,
            quantity,
            purchase_option: try_get_purchase_option(row, "purchase_option")?,
            line_total,
        })
    }
}
