//! Authentication

mod errors;
mod records;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use records::*;
pub use service::*;
pub use token::*;
