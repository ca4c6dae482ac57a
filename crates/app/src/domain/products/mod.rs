//! Products

pub mod data;
pub mod errors;
pub mod purchase_options;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use purchase_options::PurchaseOption;
pub use service::*;
