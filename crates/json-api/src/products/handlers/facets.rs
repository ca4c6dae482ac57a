//! Catalog Facets Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::data::ProductFacet;

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Distinct catalog values, each list sorted
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FacetsResponse {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub subcategories: Vec<String>,
}

/// Catalog Facets Handler
///
/// Lists the categories, brands and subcategories of live products.
#[endpoint(
    tags("products"),
    summary = "Catalog Facets",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<FacetsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = &state.app.products;

    let categories = products
        .list_distinct(ProductFacet::Category)
        .await
        .map_err(into_status_error)?;

    let brands = products
        .list_distinct(ProductFacet::Brand)
        .await
        .map_err(into_status_error)?;

    let subcategories = products
        .list_distinct(ProductFacet::Subcategory)
        .await
        .map_err(into_status_error)?;

    Ok(Json(FacetsResponse {
        categories,
        brands,
        subcategories,
    }))
}
