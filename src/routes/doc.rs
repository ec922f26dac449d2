use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
        orders::{
            CreateOrderRequest, OrderDetail, OrderFulfillment, OrderList, OrderTotal,
            StatusChoice, UpdateOrderRequest,
        },
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
    },
    error::ErrorData,
    models::{Customer, Order, OrderStatus, Product},
    response::{ApiResponse, Deleted, Meta},
    routes::{customers, health, orders, params, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        customers::list_customers,
        customers::create_customer,
        customers::get_customer,
        customers::update_customer,
        customers::delete_customer,
        orders::list_orders,
        orders::create_order,
        orders::status_choices,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        orders::total_price,
        orders::fulfillment,
        orders::add_product,
        orders::remove_product
    ),
    components(
        schemas(
            Product,
            Customer,
            Order,
            OrderStatus,
            CreateProductRequest,
            UpdateProductRequest,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CreateOrderRequest,
            UpdateOrderRequest,
            ProductList,
            CustomerList,
            OrderList,
            OrderDetail,
            OrderTotal,
            OrderFulfillment,
            StatusChoice,
            Deleted,
            ErrorData,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<Customer>,
            ApiResponse<ProductList>,
            ApiResponse<CustomerList>,
            ApiResponse<OrderDetail>,
            ApiResponse<OrderList>,
            ApiResponse<ErrorData>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Orders", description = "Order endpoints, including derived totals"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
