use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        CreateOrderRequest, OrderDetail, OrderFulfillment, OrderList, OrderTotal,
        StatusChoice, UpdateOrderRequest,
    },
    error::{AppResult, ErrorData},
    extract::AppJson,
    response::{ApiResponse, Deleted},
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/statuses", get(status_choices))
        .route(
            "/{id}",
            get(get_order).patch(update_order).delete(delete_order),
        )
        .route("/{id}/total-price", get(total_price))
        .route("/{id}/fulfillable", get(fulfillment))
        .route(
            "/{id}/products/{product_id}",
            post(add_product).delete(remove_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "List orders", body = ApiResponse<OrderList>),
        (status = 400, description = "Unknown status filter", body = ApiResponse<ErrorData>),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(order_service::list_orders(&state, query).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Create order", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Validation failed", body = ApiResponse<ErrorData>),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderDetail>>)> {
    let response = order_service::create_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/statuses",
    responses(
        (status = 200, description = "Allowed order statuses with their labels", body = ApiResponse<Vec<StatusChoice>>),
    ),
    tag = "Orders"
)]
pub async fn status_choices() -> Json<ApiResponse<Vec<StatusChoice>>> {
    Json(order_service::status_choices())
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with products, total price and fulfillability", body = ApiResponse<OrderDetail>),
        (status = 404, description = "Order not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    Ok(Json(order_service::get_order(&state, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Validation failed", body = ApiResponse<ErrorData>),
        (status = 404, description = "Order not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    Ok(Json(order_service::update_order(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Deleted order", body = ApiResponse<Deleted>),
        (status = 404, description = "Order not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    Ok(Json(order_service::delete_order(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/total-price",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Sum of the associated product prices", body = ApiResponse<OrderTotal>),
        (status = 404, description = "Order not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Orders"
)]
pub async fn total_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderTotal>>> {
    Ok(Json(order_service::total_price(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/fulfillable",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Whether every associated product is available", body = ApiResponse<OrderFulfillment>),
        (status = 404, description = "Order not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Orders"
)]
pub async fn fulfillment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderFulfillment>>> {
    Ok(Json(order_service::fulfillment(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/products/{product_id}",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("product_id" = Uuid, Path, description = "Product ID"),
    ),
    responses(
        (status = 200, description = "Product associated", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Unknown order or product", body = ApiResponse<ErrorData>),
    ),
    tag = "Orders"
)]
pub async fn add_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    Ok(Json(order_service::add_product(&state, id, product_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/products/{product_id}",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("product_id" = Uuid, Path, description = "Product ID"),
    ),
    responses(
        (status = 200, description = "Product dissociated", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Unknown order or product", body = ApiResponse<ErrorData>),
    ),
    tag = "Orders"
)]
pub async fn remove_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    Ok(Json(
        order_service::remove_product(&state, id, product_id).await?,
    ))
}
