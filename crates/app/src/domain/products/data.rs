//! Products Data

use crate::domain::products::{PurchaseOption, records::ProductUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub category: String,
    pub brand: String,
    pub subcategory: Option<String>,
    pub purchase_options: Vec<PurchaseOption>,
}

/// Product Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub price: u64,
}

/// Catalog column that distinct values can be listed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFacet {
    Category,
    Brand,
    Subcategory,
}
