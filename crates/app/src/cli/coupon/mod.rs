use clap::{Args, Subcommand, ValueEnum};
use jiff::Timestamp;
use rust_decimal::Decimal;
use storefront_app::{
    domain::coupons::{
        CouponsService, PgCouponsService,
        data::NewCoupon,
        records::{CouponRecord, CouponUuid},
    },
    pricing::DiscountRule,
};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    Create(CreateCouponArgs),
    List(DatabaseArgs),
    Deactivate(DeactivateCouponArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiscountKind {
    Percentage,
    Fixed,
}

#[derive(Debug, Args)]
struct CreateCouponArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Code shoppers type in; stored upper-cased
    #[arg(long)]
    code: String,

    #[arg(long, value_enum)]
    kind: DiscountKind,

    /// Percentage off for percentage coupons, e.g. 12.5
    #[arg(long, required_if_eq("kind", "percentage"))]
    percentage: Option<Decimal>,

    /// Amount off in minor units for fixed coupons
    #[arg(long, required_if_eq("kind", "fixed"))]
    amount: Option<u64>,

    /// Cap on a percentage discount, in minor units
    #[arg(long)]
    max_discount: Option<u64>,

    /// Minimum cart subtotal in minor units
    #[arg(long, default_value_t = 0)]
    min_purchase: u64,

    /// Start of validity (RFC 3339); defaults to now
    #[arg(long)]
    valid_from: Option<Timestamp>,

    /// End of validity (RFC 3339)
    #[arg(long)]
    valid_to: Timestamp,

    #[arg(long)]
    usage_limit: Option<u64>,

    /// Create the coupon switched off
    #[arg(long)]
    inactive: bool,
}

#[derive(Debug, Args)]
struct DeactivateCouponArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    #[arg(long)]
    code: String,
}

pub(crate) async fn run(command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Create(args) => create(args).await,
        CouponSubcommand::List(args) => list(args).await,
        CouponSubcommand::Deactivate(args) => deactivate(args).await,
    }
}

fn print_coupon(coupon: &CouponRecord) {
    println!("code: {}", coupon.code);
    match coupon.discount {
        DiscountRule::Percentage {
            percentage,
            max_discount,
        } => {
            println!("discount: {percentage}%");
            if let Some(max_discount) = max_discount {
                println!("max_discount: {max_discount}");
            }
        }
        DiscountRule::Fixed { amount } => println!("discount: {amount} off"),
    }
    println!("min_purchase: {}", coupon.min_purchase);
    println!("valid: {} .. {}", coupon.valid_from, coupon.valid_to);
    match coupon.usage_limit {
        Some(limit) => println!("used: {} of {limit}", coupon.used_count),
        None => println!("used: {}", coupon.used_count),
    }
    println!("active: {}", coupon.active);
}

async fn create(args: CreateCouponArgs) -> Result<(), String> {
    let discount = match (args.kind, args.percentage, args.amount) {
        (DiscountKind::Percentage, Some(percentage), None) => DiscountRule::Percentage {
            percentage,
            max_discount: args.max_discount,
        },
        (DiscountKind::Fixed, None, Some(amount)) if args.max_discount.is_none() => {
            DiscountRule::Fixed { amount }
        }
        _ => return Err("pass --percentage for percentage coupons, --amount for fixed".to_string()),
    };

    let service = PgCouponsService::new(args.database.connect().await?);

    let coupon = service
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code,
            discount,
            min_purchase: args.min_purchase,
            valid_from: args.valid_from.unwrap_or_else(Timestamp::now),
            valid_to: args.valid_to,
            usage_limit: args.usage_limit,
            active: !args.inactive,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    print_coupon(&coupon);

    Ok(())
}

async fn list(args: DatabaseArgs) -> Result<(), String> {
    let service = PgCouponsService::new(args.connect().await?);

    let coupons = service
        .list_active()
        .await
        .map_err(|error| format!("failed to list coupons: {error}"))?;

    if coupons.is_empty() {
        println!("no active coupons");
    }

    for coupon in &coupons {
        print_coupon(coupon);
        println!();
    }

    Ok(())
}

async fn deactivate(args: DeactivateCouponArgs) -> Result<(), String> {
    let service = PgCouponsService::new(args.database.connect().await?);

    let coupon = service
        .deactivate_coupon(&args.code)
        .await
        .map_err(|error| format!("failed to deactivate coupon: {error}"))?;

    println!("deactivated coupon {}", coupon.code);

    Ok(())
}
