//! Storefront application domain, persistence and pricing.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod pricing;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
