use uuid::Uuid;

use crate::{
    dto::orders::{
        CreateOrderRequest, OrderDetail, OrderFulfillment, OrderList, OrderTotal,
        StatusChoice, UpdateOrderRequest,
    },
    error::AppResult,
    models::{Order, OrderStatus},
    order_logic::{calculate_total_price, can_be_fulfilled},
    response::{ApiResponse, Deleted, Meta},
    routes::params::OrderListQuery,
    state::AppState,
    validation,
};

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let status: Option<OrderStatus> = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(validation::order_status)
        .transpose()?;

    let orders: Vec<Order> = state
        .store
        .list_orders()
        .await?
        .into_iter()
        .filter(|order| status.is_none_or(|status| order.status == status))
        .filter(|order| {
            query
                .customer_id
                .is_none_or(|customer_id| order.customer_id == customer_id)
        })
        .collect();

    let (items, meta) = query.pagination().apply(orders);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub fn status_choices() -> ApiResponse<Vec<StatusChoice>> {
    let choices = OrderStatus::ALL.into_iter().map(StatusChoice::from).collect();
    ApiResponse::success("Statuses", choices, None)
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderDetail>> {
    let order = state.store.get_order(id).await?;
    tracing::debug!(order_id = %id, "order loaded");
    Ok(ApiResponse::success(
        "OK",
        order_detail(state, order).await?,
        Some(Meta::empty()),
    ))
}

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    let new_order = payload.validate().inspect_err(|err| {
        tracing::warn!(field = err.field(), error = %err, "order rejected");
    })?;
    let order = state.store.create_order(new_order).await?;
    tracing::info!(
        order_id = %order.id,
        customer_id = %order.customer_id,
        status = %order.status,
        products = order.products.len(),
        "order created"
    );

    Ok(ApiResponse::success(
        "Order created",
        order_detail(state, order).await?,
        Some(Meta::empty()),
    ))
}

pub async fn update_order(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    let changes = payload.validate().inspect_err(|err| {
        tracing::warn!(order_id = %id, field = err.field(), error = %err, "order update rejected");
    })?;
    let order = if changes.is_empty() {
        state.store.get_order(id).await?
    } else {
        state.store.update_order(id, changes).await?
    };

    Ok(ApiResponse::success(
        "Updated",
        order_detail(state, order).await?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Deleted>> {
    state.store.delete_order(id).await?;
    tracing::info!(order_id = %id, "order deleted");
    Ok(ApiResponse::deleted(id))
}

pub async fn add_product(
    state: &AppState,
    order_id: Uuid,
    product_id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    let order = state.store.add_product(order_id, product_id).await?;
    tracing::debug!(order_id = %order_id, product_id = %product_id, "product associated");
    Ok(ApiResponse::success(
        "Product added",
        order_detail(state, order).await?,
        Some(Meta::empty()),
    ))
}

pub async fn remove_product(
    state: &AppState,
    order_id: Uuid,
    product_id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    let order = state.store.remove_product(order_id, product_id).await?;
    tracing::debug!(order_id = %order_id, product_id = %product_id, "product dissociated");
    Ok(ApiResponse::success(
        "Product removed",
        order_detail(state, order).await?,
        Some(Meta::empty()),
    ))
}

pub async fn total_price(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderTotal>> {
    let products = state.store.order_products(id).await?;
    Ok(ApiResponse::success(
        "Total price",
        OrderTotal {
            order_id: id,
            total_price: calculate_total_price(&products),
        },
        None,
    ))
}

pub async fn fulfillment(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<OrderFulfillment>> {
    let products = state.store.order_products(id).await?;
    Ok(ApiResponse::success(
        "Fulfillment",
        OrderFulfillment {
            order_id: id,
            can_be_fulfilled: can_be_fulfilled(&products),
        },
        None,
    ))
}

/// Reads the live association set and derives totals from it.
async fn order_detail(state: &AppState, order: Order) -> AppResult<OrderDetail> {
    let products = state.store.order_products(order.id).await?;
    Ok(OrderDetail {
        total_price: calculate_total_price(&products),
        can_be_fulfilled: can_be_fulfilled(&products),
        order,
        products,
    })
}
