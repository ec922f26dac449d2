#![allow(dead_code)]

use rust_decimal::Decimal;
use shop_orders_api::{
    dto::{
        customers::CreateCustomerRequest,
        orders::{CreateOrderRequest, OrderDetail},
        products::CreateProductRequest,
    },
    error::AppResult,
    models::{Customer, Product},
    response::ApiResponse,
    services::{customer_service, order_service, product_service},
    state::AppState,
};
use uuid::Uuid;

pub fn data<T>(response: ApiResponse<T>) -> T {
    response.data.expect("response data")
}

pub async fn create_product(
    state: &AppState,
    name: &str,
    price: Decimal,
    available: bool,
) -> AppResult<Product> {
    let response = product_service::create_product(
        state,
        CreateProductRequest {
            name: Some(name.into()),
            price: Some(price),
            available: Some(available),
        },
    )
    .await?;
    Ok(data(response))
}

pub async fn create_customer(state: &AppState, name: &str, address: &str) -> AppResult<Customer> {
    let response = customer_service::create_customer(
        state,
        CreateCustomerRequest {
            name: Some(name.into()),
            address: Some(address.into()),
        },
    )
    .await?;
    Ok(data(response))
}

pub async fn create_order(
    state: &AppState,
    customer_id: Uuid,
    status: &str,
    products: Vec<Uuid>,
) -> AppResult<OrderDetail> {
    let response = order_service::create_order(
        state,
        CreateOrderRequest {
            customer_id: Some(customer_id),
            status: Some(status.into()),
            products,
        },
    )
    .await?;
    Ok(data(response))
}

/// The three-product, one-customer catalog used by several flows.
pub struct Catalog {
    pub customer: Customer,
    pub p1: Product,
    pub p2: Product,
    pub p3: Product,
}

pub async fn seed_catalog(state: &AppState) -> AppResult<Catalog> {
    use rust_decimal_macros::dec;

    Ok(Catalog {
        customer: create_customer(state, "Test customer 1", "Xxx 123").await?,
        p1: create_product(state, "Test product 1", dec!(9.99), true).await?,
        p2: create_product(state, "Test product 2", dec!(1.99), true).await?,
        p3: create_product(state, "Test product 3", dec!(5), false).await?,
    })
}
