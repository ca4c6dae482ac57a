//! Coupons service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::coupons::{
        data::NewCoupon,
        errors::{CouponRejection, CouponsServiceError},
        records::{CouponQuote, CouponRecord},
        repository::PgCouponsRepository,
        rules,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

/// Evaluate and redeem `code` inside the caller's transaction.
///
/// The usage counter is only bumped when every rule passes; the bump itself is
/// conditional, so losing a race for the last use yields
/// [`CouponRejection::UsageLimitExceeded`]. Nothing is counted unless the
/// caller commits.
pub(crate) async fn redeem(
    repository: &PgCouponsRepository,
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
    subtotal: u64,
    now: Timestamp,
) -> Result<CouponQuote, CouponsServiceError> {
    let code = rules::normalize_code(code);

    let coupon = repository
        .get_by_code(tx, &code)
        .await?
        .ok_or(CouponRejection::CodeNotFound)?;

    let quote = rules::quote(coupon, subtotal, now)?;

    let redeemed = repository
        .redeem(tx, quote.coupon.uuid, now)
        .await?
        .ok_or(CouponRejection::UsageLimitExceeded)?;

    Ok(CouponQuote {
        coupon: redeemed,
        discount: quote.discount,
    })
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.validate",
        skip(self, code),
        fields(code = tracing::field::Empty),
        err
    )]
    async fn validate(
        &self,
        code: &str,
        subtotal: u64,
    ) -> Result<CouponQuote, CouponsServiceError> {
        let code = rules::normalize_code(code);

        Span::current().record("code", tracing::field::display(&code));

        let mut tx = self.db.begin().await?;

        let coupon = self.repository.get_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        let coupon = coupon.ok_or(CouponRejection::CodeNotFound)?;

        rules::quote(coupon, subtotal, Timestamp::now())
    }

    #[tracing::instrument(
        name = "coupons.service.try_redeem",
        skip(self, code),
        fields(code = tracing::field::Empty),
        err
    )]
    async fn try_redeem(
        &self,
        code: &str,
        subtotal: u64,
    ) -> Result<CouponQuote, CouponsServiceError> {
        Span::current().record("code", tracing::field::display(rules::normalize_code(code)));

        let mut tx = self.db.begin().await?;

        let now = Timestamp::now();

        let quote = redeem(&self.repository, &mut tx, code, subtotal, now).await?;

        tx.commit().await?;

        info!(
            coupon_uuid = %quote.coupon.uuid,
            used_count = quote.coupon.used_count,
            "redeemed coupon"
        );

        Ok(quote)
    }

    async fn list_active(&self) -> Result<Vec<CouponRecord>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupons = self.repository.list_active(&mut tx).await?;

        tx.commit().await?;

        Ok(coupons)
    }

    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(
            coupon_uuid = %coupon.uuid,
            discount_kind = coupon.discount.kind_as_str()
        ),
        err
    )]
    async fn create_coupon(
        &self,
        coupon: NewCoupon,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let coupon = NewCoupon {
            code: rules::normalize_code(&coupon.code),
            ..coupon
        };

        if coupon.code.is_empty() {
            return Err(CouponsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let record = self.repository.create_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        info!(code = %record.code, "created coupon");

        Ok(record)
    }

    #[tracing::instrument(name = "coupons.service.deactivate_coupon", skip(self), err)]
    async fn deactivate_coupon(&self, code: &str) -> Result<CouponRecord, CouponsServiceError> {
        let code = rules::normalize_code(code);

        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .deactivate(&mut tx, &code)
            .await?
            .ok_or(CouponsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(record)
    }
}

/// Coupon ledger.
#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Preview the discount `code` grants on `subtotal` without using it.
    async fn validate(
        &self,
        code: &str,
        subtotal: u64,
    ) -> Result<CouponQuote, CouponsServiceError>;

    /// Evaluate `code` and count one use of it if it applies.
    async fn try_redeem(
        &self,
        code: &str,
        subtotal: u64,
    ) -> Result<CouponQuote, CouponsServiceError>;

    /// Active coupons, ordered by code.
    async fn list_active(&self) -> Result<Vec<CouponRecord>, CouponsServiceError>;

    /// Create a coupon. The code is normalized first.
    async fn create_coupon(
        &self,
        coupon: NewCoupon,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// Stop a coupon from applying to future orders.
    async fn deactivate_coupon(&self, code: &str) -> Result<CouponRecord, CouponsServiceError>;
}
