//! Product Records

use jiff::Timestamp;
use smallvec::SmallVec;

use crate::{domain::products::PurchaseOption, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub category: String,
    pub brand: String,
    pub subcategory: Option<String>,
    pub purchase_options: SmallVec<[PurchaseOption; 4]>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    /// Whether the product can be bought with the given option.
    #[must_use]
    pub fn offers(&self, option: PurchaseOption) -> bool {
        self.purchase_options.contains(&option)
    }
}
