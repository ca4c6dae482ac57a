//! Carts

pub mod data;
pub mod errors;
pub mod lines;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
