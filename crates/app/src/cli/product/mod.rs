use clap::{Args, Subcommand};
use storefront_app::domain::products::{
    PgProductsService, ProductsService, PurchaseOption,
    data::{NewProduct, ProductUpdate},
    records::ProductUuid,
};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    Create(CreateProductArgs),
    SetPrice(SetPriceArgs),
    Delete(DeleteProductArgs),
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    #[arg(long)]
    name: String,

    /// Price in minor currency units
    #[arg(long)]
    price: u64,

    #[arg(long)]
    category: String,

    #[arg(long)]
    brand: String,

    #[arg(long)]
    subcategory: Option<String>,

    /// Purchase option the product offers; repeat for several
    #[arg(long = "option", default_value = "standard")]
    purchase_options: Vec<PurchaseOption>,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct SetPriceArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    #[arg(long)]
    product_uuid: Uuid,

    /// New price in minor currency units
    #[arg(long)]
    price: u64,
}

#[derive(Debug, Args)]
struct DeleteProductArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    #[arg(long)]
    product_uuid: Uuid,
}

pub(crate) async fn run(command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => create(args).await,
        ProductSubcommand::SetPrice(args) => set_price(args).await,
        ProductSubcommand::Delete(args) => delete(args).await,
    }
}

async fn create(args: CreateProductArgs) -> Result<(), String> {
    let service = PgProductsService::new(args.database.connect().await?);

    let product = service
        .create_product(NewProduct {
            uuid: args
                .product_uuid
                .map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: args.name,
            price: args.price,
            category: args.category,
            brand: args.brand,
            subcategory: args.subcategory,
            purchase_options: args.purchase_options,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("price: {}", product.price);

    Ok(())
}

async fn set_price(args: SetPriceArgs) -> Result<(), String> {
    let service = PgProductsService::new(args.database.connect().await?);

    let product = service
        .update_product(
            ProductUuid::from_uuid(args.product_uuid),
            ProductUpdate { price: args.price },
        )
        .await
        .map_err(|error| format!("failed to update product: {error}"))?;

    println!("product {} now costs {}", product.uuid, product.price);

    Ok(())
}

async fn delete(args: DeleteProductArgs) -> Result<(), String> {
    let service = PgProductsService::new(args.database.connect().await?);

    service
        .delete_product(ProductUuid::from_uuid(args.product_uuid))
        .await
        .map_err(|error| format!("failed to delete product: {error}"))?;

    println!("deleted product {}", args.product_uuid);

    Ok(())
}
