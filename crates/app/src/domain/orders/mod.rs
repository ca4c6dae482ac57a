//! Orders

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use records::OrderStatus;
pub use service::*;
