use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
    error::{AppResult, ErrorData},
    extract::AppJson,
    models::Customer,
    response::{ApiResponse, Deleted},
    routes::params::Pagination,
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
}

#[utoipa::path(
    get,
    path = "/api/customers",
    params(Pagination),
    responses(
        (status = 200, description = "List customers", body = ApiResponse<CustomerList>)
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    Ok(Json(customer_service::list_customers(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Get customer", body = ApiResponse<Customer>),
        (status = 404, description = "Customer not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    Ok(Json(customer_service::get_customer(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Create customer", body = ApiResponse<Customer>),
        (status = 400, description = "Validation failed", body = ApiResponse<ErrorData>),
    ),
    tag = "Customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Customer>>)> {
    let response = customer_service::create_customer(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Updated customer", body = ApiResponse<Customer>),
        (status = 400, description = "Validation failed", body = ApiResponse<ErrorData>),
        (status = 404, description = "Customer not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateCustomerRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    Ok(Json(customer_service::update_customer(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Deleted customer and their orders", body = ApiResponse<Deleted>),
        (status = 404, description = "Customer not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    Ok(Json(customer_service::delete_customer(&state, id).await?))
}
