//! Coupons Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{
        try_get_amount, try_get_optional_amount, try_i64_from_u64, try_optional_i64_from_u64,
    },
    domain::coupons::{
        data::NewCoupon,
        records::{CouponRecord, CouponUuid},
    },
    pricing::DiscountRule,
};

const GET_COUPON_BY_CODE_SQL: &str = include_str!("sql/get_coupon_by_code.sql");
const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const REDEEM_COUPON_SQL: &str = include_str!("sql/redeem_coupon.sql");
const DEACTIVATE_COUPON_SQL: &str = include_str!("sql/deactivate_coupon.sql");
const LIST_ACTIVE_COUPONS_SQL: &str = include_str!("sql/list_active_coupons.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Look up a coupon by its normalized code.
    pub(crate) async fn get_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: NewCoupon,
    ) -> Result<CouponRecord, sqlx::Error> {
        let (percentage, amount, max_discount) = match &coupon.discount {
            DiscountRule::Percentage {
                percentage,
                max_discount,
            } => (
                Some(*percentage),
                None,
                try_optional_i64_from_u64(*max_discount, "max_discount")?,
            ),
            DiscountRule::Fixed { amount } => {
                (None, Some(try_i64_from_u64(*amount, "discount_amount")?), None)
            }
        };

        query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(coupon.code)
            .bind(coupon.discount.kind_as_str())
            .bind(percentage)
            .bind(amount)
            .bind(max_discount)
            .bind(try_i64_from_u64(coupon.min_purchase, "min_purchase")?)
            .bind(SqlxTimestamp::from(coupon.valid_from))
            .bind(SqlxTimestamp::from(coupon.valid_to))
            .bind(try_optional_i64_from_u64(coupon.usage_limit, "usage_limit")?)
            .bind(coupon.active)
            .fetch_one(&mut **tx)
            .await
    }

    /// Count one use, but only if the coupon is still active, valid at `now`
    /// and under its usage limit.
    ///
    /// `None` means the conditions no longer hold. The updated row stays locked
    /// until the transaction ends, so concurrent redeemers queue up behind it and
    /// re-check the limit against the committed count.
    pub(crate) async fn redeem(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        now: Timestamp,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(REDEEM_COUPON_SQL)
            .bind(coupon.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn deactivate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(DEACTIVATE_COUPON_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LIST_ACTIVE_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

fn try_get_discount(row: &PgRow) -> Result<DiscountRule, sqlx::Error> {
    let kind: String = row.try_get("discount_kind")?;

    let missing = |col: &str| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: format!("{col} is required for {kind} coupons").into(),
    };

    match kind.as_str() {
        "percentage" => Ok(DiscountRule::Percentage {
            percentage: row
                .try_get::<Option<Decimal>, _>("discount_percentage")?
                .ok_or_else(|| missing("discount_percentage"))?,
            max_discount: try_get_optional_amount(row, "max_discount")?,
        }),
        "fixed" => Ok(DiscountRule::Fixed {
            amount: try_get_optional_amount(row, "discount_amount")?
                .ok_or_else(|| missing("discount_amount"))?,
        }),
        _ => Err(sqlx::Error::ColumnDecode {
            index: "discount_kind".to_string(),
            source: format!("unknown discount kind {kind}").into(),
        }),
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            discount: try_get_discount(row)?,
            min_purchase: try_get_amount(row, "min_purchase")?,
            valid_from: row.try_get::<SqlxTimestamp, _>("valid_from")?.to_jiff(),
            valid_to: row.try_get::<SqlxTimestamp, _>("valid_to")?.to_jiff(),
            usage_limit: try_get_optional_amount(row, "usage_limit")?,
            used_count: try_get_amount(row, "used_count")?,
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
