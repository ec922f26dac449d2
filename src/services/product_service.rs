use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::AppResult,
    models::Product,
    response::{ApiResponse, Deleted, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let products = state.store.list_products().await?;
    let (items, meta) = query.apply(products);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = state.store.get_product(id).await?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let new_product = payload.validate().inspect_err(|err| {
        tracing::warn!(field = err.field(), error = %err, "product rejected");
    })?;
    let product = state.store.create_product(new_product).await?;
    tracing::info!(product_id = %product.id, "product created");

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let changes = payload.validate().inspect_err(|err| {
        tracing::warn!(product_id = %id, field = err.field(), error = %err, "product update rejected");
    })?;
    let product = state.store.update_product(id, changes).await?;
    tracing::debug!(product_id = %id, "product updated");

    Ok(ApiResponse::success("Updated", product, Some(Meta::empty())))
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Deleted>> {
    state.store.delete_product(id).await?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(ApiResponse::deleted(id))
}
