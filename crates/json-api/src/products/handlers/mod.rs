//! Product Handlers

pub(crate) mod facets;
