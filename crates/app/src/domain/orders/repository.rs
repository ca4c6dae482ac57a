//! Orders Repository

use std::collections::HashMap;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{try_get_amount, try_get_quantity, try_i64_from_u64},
    domain::{
        orders::{
            data::ShippingAddress,
            records::{OrderLineSnapshot, OrderRecord, OrderStatus, OrderUuid},
        },
        products::{records::ProductUuid, repository::try_get_purchase_option},
        users::records::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_LINES_SQL: &str = include_str!("sql/create_order_lines.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_LINES_SQL: &str = include_str!("sql/get_order_lines.sql");

/// Everything needed to insert an order row.
#[derive(Debug, Clone)]
pub(crate) struct OrderInsert<'a> {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
    pub coupon_code: Option<&'a str>,
    pub shipping_address: &'a ShippingAddress,
    pub payment_method: &'a str,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the order row. The returned record has no lines.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderInsert<'_>,
    ) -> Result<OrderRecord, sqlx::Error> {
        let address = order.shipping_address;

        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user.into_uuid())
            .bind(try_i64_from_u64(order.subtotal, "subtotal")?)
            .bind(try_i64_from_u64(order.discount, "discount")?)
            .bind(try_i64_from_u64(order.total, "total")?)
            .bind(order.coupon_code)
            .bind(address.street.as_deref())
            .bind(address.city.as_deref())
            .bind(address.state.as_deref())
            .bind(address.zip.as_deref())
            .bind(address.country.as_deref())
            .bind(order.payment_method)
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "orders.repository.create_order_lines",
        skip(self, tx, order, lines),
        fields(order_uuid = %order, line_count = lines.len()),
        err
    )]
    pub(crate) async fn create_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        lines: &[OrderLineSnapshot],
    ) -> Result<(), sqlx::Error> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut positions = Vec::with_capacity(lines.len());
        let mut product_uuids = Vec::with_capacity(lines.len());
        let mut product_names = Vec::with_capacity(lines.len());
        let mut quantities = Vec::with_capacity(lines.len());
        let mut unit_prices = Vec::with_capacity(lines.len());
        let mut purchase_options = Vec::with_capacity(lines.len());
        let mut line_totals = Vec::with_capacity(lines.len());

        for (position, line) in lines.iter().enumerate() {
            positions.push(i32::try_from(position).map_err(|e| sqlx::Error::ColumnDecode {
                index: "position".to_string(),
                source: Box::new(e),
            })?);
            product_uuids.push(line.product_uuid.into_uuid());
            product_names.push(line.product_name.clone());
            quantities.push(i64::from(line.quantity));
            unit_prices.push(try_i64_from_u64(line.unit_price, "unit_price")?);
            purchase_options.push(line.purchase_option.as_str());
            line_totals.push(try_i64_from_u64(line.line_total, "line_total")?);
        }

        query(CREATE_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .bind(&positions)
            .bind(&product_uuids)
            .bind(&product_names)
            .bind(&quantities)
            .bind(&unit_prices)
            .bind(&purchase_options)
            .bind(&line_totals)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// A user's orders with their lines, newest first.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        self.attach_lines(tx, &mut orders).await?;

        Ok(orders)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let Some(record) = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        let mut orders = vec![record];

        self.attach_lines(tx, &mut orders).await?;

        Ok(orders.pop())
    }

    async fn attach_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), sqlx::Error> {
        if orders.is_empty() {
            return Ok(());
        }

        let order_uuids: Vec<Uuid> = orders.iter().map(|o| o.uuid.into_uuid()).collect();

        let rows = query_as::<Postgres, OrderLineRow>(GET_ORDER_LINES_SQL)
            .bind(&order_uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_order: HashMap<OrderUuid, Vec<OrderLineSnapshot>> = HashMap::new();

        for row in rows {
            by_order.entry(row.order_uuid).or_default().push(row.line);
        }

        for order in orders.iter_mut() {
            order.lines = by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }
}

#[derive(Debug)]
struct OrderLineRow {
    order_uuid: OrderUuid,
    line: OrderLineSnapshot,
}

impl<'r> FromRow<'r, PgRow> for OrderLineRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            line: OrderLineSnapshot {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                product_name: row.try_get("product_name")?,
                quantity: try_get_quantity(row, "quantity")?,
                unit_price: try_get_amount(row, "unit_price")?,
                purchase_option: try_get_purchase_option(row, "purchase_option")?,
                line_total: try_get_amount(row, "line_total")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            lines: Vec::new(),
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            total: try_get_amount(row, "total")?,
            coupon_code: row.try_get("coupon_code")?,
            shipping_address: ShippingAddress {
                street: row.try_get("shipping_street")?,
                city: row.try_get("shipping_city")?,
                state: row.try_get("shipping_state")?,
                zip: row.try_get("shipping_zip")?,
                country: row.try_get("shipping_country")?,
            },
            payment_method: row.try_get("payment_method")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
