//! Coupons

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod rules;
pub mod service;

pub use errors::{CouponRejection, CouponsServiceError};
pub use service::*;
