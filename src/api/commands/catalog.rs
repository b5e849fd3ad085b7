//! Catalog listing

use crate::api::error::{success, ApiResult};
use crate::core::features::unit_converter::categories as all_categories;
use crate::shared::types::{CategoriesResponse, CategoryInfo};

/// `GET /api/categories`
pub async fn categories() -> ApiResult<CategoriesResponse> {
    let categories = all_categories().iter().copied().map(CategoryInfo::from).collect();
    Ok(success(CategoriesResponse { categories }))
}
