//! Orders service.
//!
//! Checkout turns a set of cart lines and an optional coupon code into an
//! immutable order. Lines are re-read from the catalog inside the order
//! transaction and copied onto the order, the coupon is redeemed in that same
//! transaction, and the cart is cleared once the order has committed.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartLine,
            lines::{ConsolidatedLine, consolidate},
            repository::PgCartsRepository,
        },
        coupons::{self, CouponsServiceError, repository::PgCouponsRepository},
        orders::{
            data::{DEFAULT_PAYMENT_METHOD, PlaceOrder},
            errors::OrdersServiceError,
            records::{OrderLineSnapshot, OrderRecord, OrderUuid},
            repository::{OrderInsert, PgOrdersRepository},
        },
        products::repository::PgProductsRepository,
        users::records::UserUuid,
    },
    pricing::{self, Totals},
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    carts: PgCartsRepository,
    coupons: PgCouponsRepository,
    products: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            carts: PgCartsRepository::new(),
            coupons: PgCouponsRepository::new(),
            products: PgProductsRepository::new(),
        }
    }

    /// Lines to order: the request's items when given, the cart otherwise.
    async fn source_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        items: Option<Vec<NewCartLine>>,
    ) -> Result<Vec<ConsolidatedLine>, OrdersServiceError> {
        if let Some(items) = items {
            return Ok(consolidate(items)?);
        }

        self.carts.lock_cart(tx, user).await?;

        let lines = self.carts.get_lines(tx, user).await?;

        Ok(lines
            .into_iter()
            .map(|line| ConsolidatedLine {
                product_uuid: line.product_uuid,
                purchase_option: line.purchase_option,
                quantity: line.quantity,
            })
            .collect())
    }

    /// Copy current catalog data onto each line.
    async fn snapshot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lines: &[ConsolidatedLine],
    ) -> Result<Vec<OrderLineSnapshot>, OrdersServiceError> {
        let mut snapshots = Vec::with_capacity(lines.len());

        for line in lines {
            let product = self
                .products
                .get_product(tx, line.product_uuid)
                .await?
                .ok_or(OrdersServiceError::ProductUnavailable(line.product_uuid))?;

            if !product.offers(line.purchase_option) {
                return Err(OrdersServiceError::InvalidPurchaseOption(line.product_uuid));
            }

            snapshots.push(OrderLineSnapshot {
                product_uuid: product.uuid,
                line_total: pricing::line_total(product.price, line.quantity)?,
                product_name: product.name,
                quantity: line.quantity,
                unit_price: product.price,
                purchase_option: line.purchase_option,
            });
        }

        Ok(snapshots)
    }

    /// Redeem the coupon if it applies. Rejections leave the order undiscounted.
    async fn apply_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: Option<&str>,
        subtotal: u64,
    ) -> Result<(Totals, Option<String>), OrdersServiceError> {
        let Some(code) = code.map(str::trim).filter(|code| !code.is_empty()) else {
            return Ok((Totals::undiscounted(subtotal), None));
        };

        let now = Timestamp::now();

        match coupons::service::redeem(&self.coupons, tx, code, subtotal, now).await {
            Ok(quote) => Ok((
                Totals::new(subtotal, quote.discount),
                Some(quote.coupon.code),
            )),
            Err(CouponsServiceError::Rejected(rejection)) => {
                warn!(
                    code,
                    %rejection,
                    "coupon not applied; placing order without discount"
                );

                Ok((Totals::undiscounted(subtotal), None))
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Empty the cart after checkout. Failures are logged and swallowed.
    async fn clear_cart(&self, user: UserUuid) {
        let result = async {
            let mut tx = self.db.begin().await?;

            self.carts.lock_cart(&mut tx, user).await?;

            let removed = self.carts.clear(&mut tx, user).await?;

            tx.commit().await?;

            Ok::<u64, sqlx::Error>(removed)
        }
        .await;

        if let Err(error) = result {
            warn!(user_uuid = %user, %error, "failed to clear cart after checkout");
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            user_uuid = %user,
            from_cart = order.items.is_none(),
            order_uuid = tracing::field::Empty,
            line_count = tracing::field::Empty,
            coupon_applied = tracing::field::Empty
        ),
        err
    )]
    async fn place_order(
        &self,
        user: UserUuid,
        order: PlaceOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let PlaceOrder {
            items,
            coupon_code,
            shipping_address,
            payment_method,
        } = order;

        let mut tx = self.db.begin().await?;

        let lines = self.source_lines(&mut tx, user, items).await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let snapshots = self.snapshot(&mut tx, &lines).await?;

        let subtotal = pricing::subtotal(snapshots.iter().map(|line| line.line_total))?;

        let (totals, applied_code) = self
            .apply_coupon(&mut tx, coupon_code.as_deref(), subtotal)
            .await?;

        let payment_method = payment_method
            .as_deref()
            .map(str::trim)
            .filter(|method| !method.is_empty())
            .unwrap_or(DEFAULT_PAYMENT_METHOD);

        let uuid = OrderUuid::new();

        let mut record = self
            .orders
            .create_order(
                &mut tx,
                OrderInsert {
                    uuid,
                    user,
                    subtotal: totals.subtotal,
                    discount: totals.discount,
                    total: totals.total,
                    coupon_code: applied_code.as_deref(),
                    shipping_address: &shipping_address,
                    payment_method,
                },
            )
            .await?;

        self.orders
            .create_order_lines(&mut tx, uuid, &snapshots)
            .await?;

        tx.commit().await?;

        record.lines = snapshots;

        let span = Span::current();

        span.record("order_uuid", tracing::field::display(uuid));
        span.record("line_count", record.lines.len());
        span.record("coupon_applied", applied_code.is_some());

        info!(
            subtotal = record.subtotal,
            discount = record.discount,
            total = record.total,
            "placed order"
        );

        self.clear_cart(user).await;

        Ok(record)
    }

    #[tracing::instrument(
        name = "orders.service.list_orders",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders.list_orders(&mut tx, user).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.orders.get_order(&mut tx, user, order).await?;

        tx.commit().await?;

        record.ok_or(OrdersServiceError::NotFound)
    }
}

/// Checkout and order history.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Create an order from the request items, or from the user's cart.
    ///
    /// A coupon that does not apply is skipped and the order is placed at full
    /// price. The cart is emptied once the order has been stored.
    async fn place_order(
        &self,
        user: UserUuid,
        order: PlaceOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// The user's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// One of the user's orders.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::CartsService,
            coupons::{CouponsService, data::NewCoupon},
            orders::{OrderStatus, data::ShippingAddress},
            products::{
                ProductsService, PurchaseOption,
                data::{NewProduct, ProductUpdate},
                records::ProductUuid,
            },
        },
        pricing::DiscountRule,
        test::{
            TestContext,
            helpers::{new_coupon, new_product},
        },
    };

    use super::*;

    fn item(product_uuid: ProductUuid, quantity: i64) -> NewCartLine {
        NewCartLine {
            product_uuid,
            quantity,
            purchase_option: PurchaseOption::Standard,
        }
    }

    fn ten_percent() -> DiscountRule {
        DiscountRule::Percentage {
            percentage: Decimal::from(10),
            max_discount: None,
        }
    }

    /// Product A at 20.00 with two units in the test user's cart.
    async fn cart_with_two_of_a(ctx: &TestContext) -> TestResult<ProductUuid> {
        let product = ProductUuid::new();

        ctx.products
            .create_product(NewProduct {
                name: "A".to_string(),
                ..new_product(product, 20_00)
            })
            .await?;

        ctx.carts.add_line(ctx.user_uuid, item(product, 2)).await?;

        Ok(product)
    }

    #[tokio::test]
    async fn place_order_applies_percentage_coupon() -> TestResult {
        let ctx = TestContext::new().await;

        cart_with_two_of_a(&ctx).await?;

        ctx.coupons
            .create_coupon(new_coupon("SAVE10", ten_percent()))
            .await?;

        let order = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    coupon_code: Some(" save10".to_string()),
                    ..PlaceOrder::default()
                },
            )
            .await?;

        assert_eq!(order.subtotal, 40_00);
        assert_eq!(order.discount, 4_00);
        assert_eq!(order.total, 36_00);
        assert_eq!(order.coupon_code.as_deref(), Some("SAVE10"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_method, DEFAULT_PAYMENT_METHOD);
        assert_eq!(order.lines.len(), 1);

        let quote = ctx.coupons.validate("SAVE10", 40_00).await?;

        assert_eq!(quote.coupon.used_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_with_expired_coupon_charges_full_price() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        cart_with_two_of_a(&ctx).await?;

        ctx.coupons
            .create_coupon(NewCoupon {
                valid_from: now - SignedDuration::from_hours(48),
                valid_to: now - SignedDuration::from_hours(24),
                ..new_coupon("SAVE10", ten_percent())
            })
            .await?;

        let order = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    coupon_code: Some("SAVE10".to_string()),
                    ..PlaceOrder::default()
                },
            )
            .await?;

        assert_eq!(order.subtotal, 40_00);
        assert_eq!(order.discount, 0);
        assert_eq!(order.total, 40_00);
        assert!(order.coupon_code.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn place_order_with_unknown_coupon_charges_full_price() -> TestResult {
        let ctx = TestContext::new().await;

        cart_with_two_of_a(&ctx).await?;

        let order = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    coupon_code: Some("NOSUCHCODE".to_string()),
                    ..PlaceOrder::default()
                },
            )
            .await?;

        assert_eq!(order.total, 40_00);
        assert!(order.coupon_code.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn fixed_coupon_larger_than_subtotal_is_clamped() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ProductUuid::new();

        ctx.products.create_product(new_product(product, 3_00)).await?;
        ctx.coupons
            .create_coupon(new_coupon("FIXED5", DiscountRule::Fixed { amount: 5_00 }))
            .await?;

        let order = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    items: Some(vec![item(product, 1)]),
                    coupon_code: Some("FIXED5".to_string()),
                    ..PlaceOrder::default()
                },
            )
            .await?;

        assert_eq!(order.subtotal, 3_00);
        assert_eq!(order.discount, 3_00);
        assert_eq!(order.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_creates_no_order() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .place_order(ctx.user_uuid, PlaceOrder::default())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );

        let empty_items = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    items: Some(Vec::new()),
                    ..PlaceOrder::default()
                },
            )
            .await;

        assert!(
            matches!(empty_items, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart, got {empty_items:?}"
        );

        assert!(ctx.orders.list_orders(ctx.user_uuid).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn checkout_clears_the_cart() -> TestResult {
        let ctx = TestContext::new().await;

        cart_with_two_of_a(&ctx).await?;

        ctx.orders
            .place_order(ctx.user_uuid, PlaceOrder::default())
            .await?;

        assert!(ctx.carts.get_cart(ctx.user_uuid).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn request_items_are_consolidated_and_validated() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ProductUuid::new();

        ctx.products.create_product(new_product(product, 1_50)).await?;

        let order = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    items: Some(vec![item(product, 1), item(product, 2)]),
                    ..PlaceOrder::default()
                },
            )
            .await?;

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines.first().map(|l| l.quantity), Some(3));
        assert_eq!(order.subtotal, 4_50);

        let invalid = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    items: Some(vec![item(product, 0)]),
                    ..PlaceOrder::default()
                },
            )
            .await;

        assert!(
            matches!(invalid, Err(OrdersServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {invalid:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_in_items_is_unavailable() -> TestResult {
        let ctx = TestContext::new().await;
        let missing = ProductUuid::new();

        let result = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    items: Some(vec![item(missing, 1)]),
                    ..PlaceOrder::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::ProductUnavailable(uuid)) if uuid == missing),
            "expected ProductUnavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_checkout_does_not_consume_coupon() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ProductUuid::new();

        ctx.products.create_product(new_product(product, 10_00)).await?;
        ctx.coupons
            .create_coupon(NewCoupon {
                usage_limit: Some(1),
                ..new_coupon("ONCE", ten_percent())
            })
            .await?;

        let result = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    items: Some(vec![
                        item(product, 1),
                        NewCartLine {
                            purchase_option: PurchaseOption::Subscription,
                            ..item(product, 1)
                        },
                    ]),
                    coupon_code: Some("ONCE".to_string()),
                    ..PlaceOrder::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidPurchaseOption(_))),
            "expected InvalidPurchaseOption, got {result:?}"
        );

        let quote = ctx.coupons.validate("ONCE", 10_00).await?;

        assert_eq!(quote.coupon.used_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn order_lines_keep_price_at_order_time() -> TestResult {
        let ctx = TestContext::new().await;

        let product = cart_with_two_of_a(&ctx).await?;

        let placed = ctx
            .orders
            .place_order(ctx.user_uuid, PlaceOrder::default())
            .await?;

        ctx.products
            .update_product(product, ProductUpdate { price: 99_00 })
            .await?;
        ctx.products.delete_product(product).await?;

        let orders = ctx.orders.list_orders(ctx.user_uuid).await?;
        let stored = orders.first().ok_or("missing order")?;

        assert_eq!(stored.uuid, placed.uuid);
        assert_eq!(stored.subtotal, 40_00);

        let line = stored.lines.first().ok_or("missing line")?;

        assert_eq!(line.product_name, "A");
        assert_eq!(line.unit_price, 20_00);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_total, 40_00);

        Ok(())
    }

    #[tokio::test]
    async fn shipping_and_payment_are_recorded() -> TestResult {
        let ctx = TestContext::new().await;

        cart_with_two_of_a(&ctx).await?;

        let shipping_address = ShippingAddress {
            street: Some("1 Main St".to_string()),
            city: Some("Springfield".to_string()),
            state: None,
            zip: Some("12345".to_string()),
            country: Some("US".to_string()),
        };

        let placed = ctx
            .orders
            .place_order(
                ctx.user_uuid,
                PlaceOrder {
                    shipping_address: shipping_address.clone(),
                    payment_method: Some("paypal".to_string()),
                    ..PlaceOrder::default()
                },
            )
            .await?;

        let stored = ctx.orders.get_order(ctx.user_uuid, placed.uuid).await?;

        assert_eq!(stored.shipping_address, shipping_address);
        assert_eq!(stored.payment_method, "paypal");
        assert_eq!(stored, placed);

        Ok(())
    }

    #[tokio::test]
    async fn get_order_of_another_user_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        cart_with_two_of_a(&ctx).await?;

        let placed = ctx
            .orders
            .place_order(ctx.user_uuid, PlaceOrder::default())
            .await?;

        let stranger = ctx.create_user("stranger@example.com").await?;

        let result = ctx.orders.get_order(stranger, placed.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_is_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ProductUuid::new();

        ctx.products.create_product(new_product(product, 1_00)).await?;

        let mut placed = Vec::new();

        for quantity in 1..=3 {
            let order = ctx
                .orders
                .place_order(
                    ctx.user_uuid,
                    PlaceOrder {
                        items: Some(vec![item(product, quantity)]),
                        ..PlaceOrder::default()
                    },
                )
                .await?;

            placed.push(order.uuid);
        }

        let listed: Vec<OrderUuid> = ctx
            .orders
            .list_orders(ctx.user_uuid)
            .await?
            .into_iter()
            .map(|o| o.uuid)
            .collect();

        placed.reverse();

        assert_eq!(listed, placed);

        Ok(())
    }

    #[tokio::test]
    async fn coupon_limit_holds_under_concurrent_checkouts() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ProductUuid::new();

        ctx.products.create_product(new_product(product, 10_00)).await?;
        ctx.coupons
            .create_coupon(NewCoupon {
                usage_limit: Some(2),
                ..new_coupon("LIMITED", ten_percent())
            })
            .await?;

        let mut handles = Vec::new();

        for n in 0..6 {
            let user = ctx.create_user(&format!("racer{n}@example.com")).await?;
            let orders = ctx.orders.clone();

            handles.push(tokio::spawn(async move {
                orders
                    .place_order(
                        user,
                        PlaceOrder {
                            items: Some(vec![item(product, 1)]),
                            coupon_code: Some("LIMITED".to_string()),
                            ..PlaceOrder::default()
                        },
                    )
                    .await
            }));
        }

        let mut discounted = 0;

        for handle in handles {
            let order = handle.await??;

            if order.coupon_code.is_some() {
                assert_eq!(order.discount, 1_00);
                discounted += 1;
            } else {
                assert_eq!(order.total, 10_00);
            }
        }

        assert_eq!(discounted, 2);

        let quote = ctx.coupons.list_active().await?;
        let limited = quote
            .iter()
            .find(|c| c.code == "LIMITED")
            .ok_or("missing coupon")?;

        assert_eq!(limited.used_count, 2);

        Ok(())
    }
}
