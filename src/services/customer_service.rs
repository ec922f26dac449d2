use uuid::Uuid;

use crate::{
    dto::customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
    error::AppResult,
    models::Customer,
    response::{ApiResponse, Deleted, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_customers(
    state: &AppState,
    query: Pagination,
) -> AppResult<ApiResponse<CustomerList>> {
    let customers = state.store.list_customers().await?;
    let (items, meta) = query.apply(customers);
    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(meta),
    ))
}

pub async fn get_customer(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Customer>> {
    let customer = state.store.get_customer(id).await?;
    Ok(ApiResponse::success("Customer", customer, None))
}

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    let new_customer = payload.validate().inspect_err(|err| {
        tracing::warn!(field = err.field(), error = %err, "customer rejected");
    })?;
    let customer = state.store.create_customer(new_customer).await?;
    tracing::info!(customer_id = %customer.id, "customer created");

    Ok(ApiResponse::success(
        "Customer created",
        customer,
        Some(Meta::empty()),
    ))
}

pub async fn update_customer(
    state: &AppState,
    id: Uuid,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    let changes = payload.validate().inspect_err(|err| {
        tracing::warn!(customer_id = %id, field = err.field(), error = %err, "customer update rejected");
    })?;
    let customer = state.store.update_customer(id, changes).await?;

    Ok(ApiResponse::success("Updated", customer, Some(Meta::empty())))
}

/// Also deletes every order placed by the customer.
pub async fn delete_customer(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Deleted>> {
    state.store.delete_customer(id).await?;
    tracing::info!(customer_id = %id, "customer and their orders deleted");
    Ok(ApiResponse::deleted(id))
}
