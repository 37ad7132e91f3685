//! 产品处理器

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::{
    model::{
        CreateProductRequest, ListProductsQuery, Product, SearchProductsQuery,
        UpdateProductRequest,
    },
    service::Page,
};
use crate::app::AppState;
use crate::core::{error::CoreError, validation::ValidatedJson};

type ApiResult<T> = Result<T, CoreError>;

/// `GET /products?category=&page=&limit=`
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(query) = query?;
    let page = Page::resolve(query.page, query.limit, &state.pagination)?;
    // `?category=` 为空时不过滤
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let products = state.product_service.list_products(category, page);
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state.product_service.get_product(&id)?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> (StatusCode, Json<Product>) {
    let product = state.product_service.create_product(payload);
    (StatusCode::CREATED, Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<Json<Product>> {
    let product = state.product_service.update_product(&id, payload)?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.product_service.delete_product(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /products/search?name=`
pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<SearchProductsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(query) = query?;
    let name = query
        .name
        .ok_or_else(|| CoreError::BadRequest("name query parameter is required".to_string()))?;
    Ok(Json(state.product_service.search_products(&name)))
}

/// `GET /products/stats/category`
pub async fn category_stats(State(state): State<AppState>) -> Json<BTreeMap<String, usize>> {
    Json(state.product_service.category_stats())
}
