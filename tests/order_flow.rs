mod common;

use common::{create_customer, create_order, create_product, data, seed_catalog};
use rust_decimal_macros::dec;
use shop_orders_api::{
    dto::{
        orders::{CreateOrderRequest, UpdateOrderRequest},
        products::{CreateProductRequest, UpdateProductRequest},
    },
    error::AppError,
    models::OrderStatus,
    routes::params::{OrderListQuery, Pagination},
    services::{customer_service, order_service, product_service},
    state::AppState,
    validation::ValidationError,
};
use uuid::Uuid;

#[tokio::test]
async fn sample_orders_report_totals_and_fulfillment() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;
    let c1 = catalog.customer.id;

    let o1 = create_order(&state, c1, "NEW", vec![catalog.p1.id]).await?;
    assert_eq!(o1.total_price, dec!(9.99));
    assert!(o1.can_be_fulfilled);

    let o2 = create_order(&state, c1, "IN_PROCESS", vec![catalog.p1.id, catalog.p2.id]).await?;
    assert_eq!(o2.total_price.to_string(), "11.98");
    assert!(o2.can_be_fulfilled);
    assert_eq!(o2.order.status, OrderStatus::InProcess);

    let o3 = create_order(&state, c1, "COMPLETED", vec![catalog.p3.id]).await?;
    assert_eq!(o3.total_price.to_string(), "5.00");
    assert!(!o3.can_be_fulfilled);

    let total = data(order_service::total_price(&state, o2.order.id).await?);
    assert_eq!(total.total_price, dec!(11.98));
    let fulfillment = data(order_service::fulfillment(&state, o3.order.id).await?);
    assert!(!fulfillment.can_be_fulfilled);

    Ok(())
}

#[tokio::test]
async fn deleting_a_customer_cascades_to_orders() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;
    let other = create_customer(&state, "Test customer 2", "Yyy 456").await?;

    let c1 = catalog.customer.id;
    let mut mine = Vec::new();
    for (status, products) in [
        ("NEW", vec![catalog.p1.id]),
        ("IN_PROCESS", vec![catalog.p1.id, catalog.p2.id]),
        ("COMPLETED", vec![catalog.p3.id]),
    ] {
        mine.push(create_order(&state, c1, status, products).await?.order.id);
    }
    let kept = create_order(&state, other.id, "SENT", vec![catalog.p2.id]).await?;

    customer_service::delete_customer(&state, c1).await?;

    for id in mine {
        let err = order_service::get_order(&state, id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "order", .. }));
    }
    assert!(order_service::get_order(&state, kept.order.id).await.is_ok());

    // Products are untouched by the cascade.
    assert!(product_service::get_product(&state, catalog.p1.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn totals_follow_the_live_association_set() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;
    let order = create_order(&state, catalog.customer.id, "NEW", vec![]).await?;
    let id = order.order.id;

    assert_eq!(order.total_price, dec!(0));
    assert_eq!(order.total_price.to_string(), "0.00");
    assert!(order.can_be_fulfilled);

    order_service::add_product(&state, id, catalog.p1.id).await?;
    let detail = data(order_service::add_product(&state, id, catalog.p3.id).await?);
    assert_eq!(detail.total_price, dec!(14.99));
    assert!(!detail.can_be_fulfilled);
    assert_eq!(detail.order.products, vec![catalog.p1.id, catalog.p3.id]);

    // Adding the same product again does not double count it.
    let detail = data(order_service::add_product(&state, id, catalog.p1.id).await?);
    assert_eq!(detail.total_price, dec!(14.99));

    let detail = data(order_service::remove_product(&state, id, catalog.p3.id).await?);
    assert_eq!(detail.total_price, dec!(9.99));
    assert!(detail.can_be_fulfilled);

    // Price changes are visible on the next read.
    product_service::update_product(
        &state,
        catalog.p1.id,
        UpdateProductRequest {
            price: Some(dec!(10.01)),
            ..Default::default()
        },
    )
    .await?;
    let detail = data(order_service::get_order(&state, id).await?);
    assert_eq!(detail.total_price, dec!(10.01));
    Ok(())
}

#[tokio::test]
async fn deleting_a_product_drops_it_from_orders() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;
    let order = create_order(
        &state,
        catalog.customer.id,
        "NEW",
        vec![catalog.p1.id, catalog.p3.id],
    )
    .await?;
    assert!(!order.can_be_fulfilled);

    product_service::delete_product(&state, catalog.p3.id).await?;

    let detail = data(order_service::get_order(&state, order.order.id).await?);
    assert_eq!(detail.order.products, vec![catalog.p1.id]);
    assert_eq!(detail.total_price, dec!(9.99));
    assert!(detail.can_be_fulfilled);
    Ok(())
}

#[tokio::test]
async fn second_delete_reports_not_found() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;

    product_service::delete_product(&state, catalog.p2.id).await?;
    let err = product_service::delete_product(&state, catalog.p2.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { entity: "product", .. }));

    customer_service::delete_customer(&state, catalog.customer.id).await?;
    let err = customer_service::delete_customer(&state, catalog.customer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { entity: "customer", .. }));
    Ok(())
}

#[tokio::test]
async fn orders_need_an_existing_customer_and_products() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;
    let ghost = Uuid::new_v4();

    let err = create_order(&state, ghost, "NEW", vec![]).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::DanglingReference { field: "customer_id", id, .. }) if id == ghost
    ));

    let err = create_order(&state, catalog.customer.id, "NEW", vec![catalog.p1.id, ghost])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::DanglingReference { entity: "product", .. })
    ));

    // Failed writes leave nothing behind.
    let orders = data(order_service::list_orders(&state, OrderListQuery::default()).await?);
    assert!(orders.items.is_empty());

    let err = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id: None,
            status: Some("NEW".into()),
            products: vec![],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::RequiredField { field: "customer_id" })
    ));

    let err = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id: Some(catalog.customer.id),
            status: None,
            products: vec![],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::RequiredField { field: "status" })
    ));

    let err = create_order(&state, catalog.customer.id, "INVALID", vec![])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InvalidEnumValue { field: "status", .. })
    ));
    Ok(())
}

#[tokio::test]
async fn association_changes_reject_unknown_ids() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;
    let order = create_order(&state, catalog.customer.id, "NEW", vec![]).await?;

    let err = order_service::add_product(&state, order.order.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::DanglingReference { field: "product", .. })
    ));

    let err = order_service::remove_product(&state, Uuid::new_v4(), catalog.p1.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::DanglingReference { field: "order", .. })
    ));
    Ok(())
}

#[tokio::test]
async fn duplicate_products_collapse_on_create() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;
    let order = create_order(
        &state,
        catalog.customer.id,
        "NEW",
        vec![catalog.p2.id, catalog.p1.id, catalog.p2.id],
    )
    .await?;
    assert_eq!(order.order.products, vec![catalog.p2.id, catalog.p1.id]);
    assert_eq!(order.total_price, dec!(11.98));
    Ok(())
}

#[tokio::test]
async fn products_round_trip() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let created = create_product(&state, "Temporary product", dec!(1.99), true).await?;
    let fetched = data(product_service::get_product(&state, created.id).await?);

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Temporary product");
    assert_eq!(fetched.price.to_string(), "1.99");
    assert!(fetched.available);

    let max = create_product(&state, "Valid product", dec!(99999999.99), false).await?;
    assert_eq!(max.price, dec!(99999999.99));
    assert!(!max.available);
    Ok(())
}

#[tokio::test]
async fn invalid_products_are_not_stored() -> anyhow::Result<()> {
    let state = AppState::in_memory();

    let cases = [
        (
            CreateProductRequest {
                name: None,
                price: Some(dec!(1.99)),
                available: Some(true),
            },
            ValidationError::RequiredField { field: "name" },
        ),
        (
            CreateProductRequest {
                name: Some("Invalid product".into()),
                price: None,
                available: Some(true),
            },
            ValidationError::RequiredField { field: "price" },
        ),
        (
            CreateProductRequest {
                name: Some("Invalid product".into()),
                price: Some(dec!(1.99)),
                available: None,
            },
            ValidationError::RequiredField { field: "available" },
        ),
        (
            CreateProductRequest {
                name: Some(String::new()),
                price: Some(dec!(0.01)),
                available: Some(true),
            },
            ValidationError::BlankValue { field: "name" },
        ),
        (
            CreateProductRequest {
                name: Some("Invalid product".into()),
                price: Some(dec!(0.0)),
                available: Some(true),
            },
            ValidationError::NonPositiveValue { field: "price" },
        ),
    ];

    for (request, expected) in cases {
        let err = product_service::create_product(&state, request)
            .await
            .unwrap_err();
        match err {
            AppError::Validation(actual) => assert_eq!(actual, expected),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    let err = create_product(&state, "Invalid product", dec!(0.003), true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::Precision { .. })
    ));
    let err = create_product(&state, &"X".repeat(256), dec!(1.99), true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::TooLong { max: 255, .. })
    ));

    let products = data(product_service::list_products(&state, Pagination::default()).await?);
    assert!(products.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn partial_updates_touch_only_given_fields() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let product = create_product(&state, "Temporary product", dec!(1.99), true).await?;

    let updated = data(
        product_service::update_product(
            &state,
            product.id,
            UpdateProductRequest {
                available: Some(false),
                ..Default::default()
            },
        )
        .await?,
    );
    assert_eq!(updated.name, product.name);
    assert_eq!(updated.price, product.price);
    assert!(!updated.available);

    let err = product_service::update_product(
        &state,
        product.id,
        UpdateProductRequest {
            name: Some("Renamed".into()),
            price: Some(dec!(-1)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::NonPositiveValue { .. })
    ));
    let unchanged = data(product_service::get_product(&state, product.id).await?);
    assert_eq!(unchanged, updated);

    let err = product_service::update_product(&state, Uuid::new_v4(), UpdateProductRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn order_updates_keep_the_creation_date() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;
    let other = create_customer(&state, "Test customer 2", "Yyy 456").await?;
    let created = create_order(&state, catalog.customer.id, "NEW", vec![catalog.p1.id]).await?;

    let updated = data(
        order_service::update_order(
            &state,
            created.order.id,
            UpdateOrderRequest {
                customer_id: Some(other.id),
                status: Some("SENT".into()),
                products: Some(vec![catalog.p2.id, catalog.p3.id]),
            },
        )
        .await?,
    );
    assert_eq!(updated.order.date, created.order.date);
    assert_eq!(updated.order.customer_id, other.id);
    assert_eq!(updated.order.status, OrderStatus::Sent);
    assert_eq!(updated.total_price, dec!(6.99));
    assert!(!updated.can_be_fulfilled);

    let err = order_service::update_order(
        &state,
        created.order.id,
        UpdateOrderRequest {
            status: Some("SHIPPED".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InvalidEnumValue { .. })
    ));

    let err = order_service::update_order(
        &state,
        created.order.id,
        UpdateOrderRequest {
            customer_id: Some(Uuid::new_v4()),
            status: Some("COMPLETED".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::DanglingReference { field: "customer_id", .. })
    ));
    // The rejected update did not apply its status either.
    let current = data(order_service::get_order(&state, created.order.id).await?);
    assert_eq!(current.order.status, OrderStatus::Sent);
    Ok(())
}

#[tokio::test]
async fn orders_can_be_filtered_and_paged() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await?;
    let other = create_customer(&state, "Test customer 2", "Yyy 456").await?;
    create_order(&state, catalog.customer.id, "NEW", vec![]).await?;
    create_order(&state, other.id, "IN_PROCESS", vec![]).await?;
    create_order(&state, other.id, "COMPLETED", vec![]).await?;

    let response = order_service::list_orders(
        &state,
        OrderListQuery {
            customer_id: Some(other.id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(response.meta.as_ref().and_then(|m| m.total), Some(2));
    assert_eq!(data(response).items.len(), 2);

    let response = order_service::list_orders(
        &state,
        OrderListQuery {
            status: Some("COMPLETED".into()),
            ..Default::default()
        },
    )
    .await?;
    let items = data(response).items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, OrderStatus::Completed);

    let response = order_service::list_orders(
        &state,
        OrderListQuery {
            page: Some(2),
            per_page: Some(2),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(data(response).items.len(), 1);

    let err = order_service::list_orders(
        &state,
        OrderListQuery {
            status: Some("LOST".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    Ok(())
}
