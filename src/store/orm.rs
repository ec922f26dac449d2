use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{CUSTOMER, EntityStore, ORDER, PRODUCT, dangling};
use crate::{
    entity::{
        customers::{
            ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers,
            Model as CustomerModel,
        },
        order_products::{
            ActiveModel as OrderProductActive, Column as OrderProductCol,
            Entity as OrderProducts,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{
            ActiveModel as ProductActive, Column as ProdCol, Entity as Products,
            Model as ProductModel,
        },
    },
    error::{AppError, AppResult},
    models::{
        Customer, CustomerChanges, NewCustomer, NewOrder, NewProduct, Order, OrderChanges,
        OrderStatus, Product, ProductChanges,
    },
};

/// Relational store over a SeaORM connection. Multi-row writes run in a
/// transaction; dropping it on an early return rolls the write back.
#[derive(Clone)]
pub struct SeaOrmStore {
    orm: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl EntityStore for SeaOrmStore {
    async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        let model = ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set(product.name),
            price: Set(product.price),
            available: Set(product.available),
            created_at: NotSet,
        }
        .insert(&self.orm)
        .await?;
        Ok(product_from_entity(model))
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity)
            .ok_or_else(|| AppError::not_found(PRODUCT, id))
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product> {
        let existing = Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .ok_or_else(|| AppError::not_found(PRODUCT, id))?;

        let mut active: ProductActive = existing.clone().into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(available) = changes.available {
            active.available = Set(available);
        }
        if !active.is_changed() {
            return Ok(product_from_entity(existing));
        }

        let model = active
            .update(&self.orm)
            .await
            .map_err(|err| missing_row(err, PRODUCT, id))?;
        Ok(product_from_entity(model))
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let txn = self.orm.begin().await?;

        OrderProducts::delete_many()
            .filter(OrderProductCol::ProductId.eq(id))
            .exec(&txn)
            .await?;
        let result = Products::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found(PRODUCT, id));
        }

        txn.commit().await?;
        Ok(())
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        Ok(Products::find()
            .order_by_asc(ProdCol::CreatedAt)
            .order_by_asc(ProdCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect())
    }

    async fn create_customer(&self, customer: NewCustomer) -> AppResult<Customer> {
        let model = CustomerActive {
            id: Set(Uuid::new_v4()),
            name: Set(customer.name),
            address: Set(customer.address),
            created_at: NotSet,
        }
        .insert(&self.orm)
        .await?;
        Ok(customer_from_entity(model))
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Customer> {
        Customers::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(customer_from_entity)
            .ok_or_else(|| AppError::not_found(CUSTOMER, id))
    }

    async fn update_customer(&self, id: Uuid, changes: CustomerChanges) -> AppResult<Customer> {
        let existing = Customers::find_by_id(id)
            .one(&self.orm)
            .await?
            .ok_or_else(|| AppError::not_found(CUSTOMER, id))?;

        let mut active: CustomerActive = existing.clone().into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if !active.is_changed() {
            return Ok(customer_from_entity(existing));
        }

        let model = active
            .update(&self.orm)
            .await
            .map_err(|err| missing_row(err, CUSTOMER, id))?;
        Ok(customer_from_entity(model))
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<()> {
        let txn = self.orm.begin().await?;

        let order_ids: Vec<Uuid> = Orders::find()
            .select_only()
            .column(OrderCol::Id)
            .filter(OrderCol::CustomerId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        if !order_ids.is_empty() {
            OrderProducts::delete_many()
                .filter(OrderProductCol::OrderId.is_in(order_ids.clone()))
                .exec(&txn)
                .await?;
            Orders::delete_many()
                .filter(OrderCol::Id.is_in(order_ids.clone()))
                .exec(&txn)
                .await?;
        }

        let result = Customers::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found(CUSTOMER, id));
        }

        txn.commit().await?;
        tracing::debug!(customer_id = %id, orders = order_ids.len(), "cascaded customer delete");
        Ok(())
    }

    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(Customers::find()
            .order_by_asc(CustomerCol::CreatedAt)
            .order_by_asc(CustomerCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(customer_from_entity)
            .collect())
    }

    async fn create_order(&self, order: NewOrder) -> AppResult<Order> {
        let txn = self.orm.begin().await?;

        ensure_customer(&txn, order.customer_id).await?;
        ensure_products(&txn, &order.products).await?;

        let model = OrderActive {
            id: Set(Uuid::new_v4()),
            customer_id: Set(order.customer_id),
            status: Set(order.status.as_str().to_string()),
            date: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;
        replace_products(&txn, model.id, &order.products).await?;

        txn.commit().await?;
        order_from_entity(model, order.products)
    }

    async fn get_order(&self, id: Uuid) -> AppResult<Order> {
        let model = Orders::find_by_id(id)
            .one(&self.orm)
            .await?
            .ok_or_else(|| AppError::not_found(ORDER, id))?;
        let products = product_ids(&self.orm, id).await?;
        order_from_entity(model, products)
    }

    async fn update_order(&self, id: Uuid, changes: OrderChanges) -> AppResult<Order> {
        let txn = self.orm.begin().await?;

        let existing = Orders::find_by_id(id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found(ORDER, id))?;

        if let Some(customer_id) = changes.customer_id {
            ensure_customer(&txn, customer_id).await?;
        }
        if let Some(products) = &changes.products {
            ensure_products(&txn, products).await?;
        }

        let mut active: OrderActive = existing.clone().into();
        if let Some(customer_id) = changes.customer_id {
            active.customer_id = Set(customer_id);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        let model = if active.is_changed() {
            active.update(&txn).await?
        } else {
            existing
        };

        if let Some(products) = &changes.products {
            replace_products(&txn, id, products).await?;
        }
        let products = product_ids(&txn, id).await?;

        txn.commit().await?;
        order_from_entity(model, products)
    }

    async fn delete_order(&self, id: Uuid) -> AppResult<()> {
        let txn = self.orm.begin().await?;

        OrderProducts::delete_many()
            .filter(OrderProductCol::OrderId.eq(id))
            .exec(&txn)
            .await?;
        let result = Orders::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found(ORDER, id));
        }

        txn.commit().await?;
        Ok(())
    }

    async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let orders = Orders::find()
            .order_by_asc(OrderCol::Date)
            .order_by_asc(OrderCol::Id)
            .all(&self.orm)
            .await?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let mut associations: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        let rows = OrderProducts::find()
            .filter(OrderProductCol::OrderId.is_in(orders.iter().map(|o| o.id)))
            .order_by_asc(OrderProductCol::Position)
            .all(&self.orm)
            .await?;
        for row in rows {
            associations
                .entry(row.order_id)
                .or_default()
                .push(row.product_id);
        }

        orders
            .into_iter()
            .map(|model| {
                let products = associations.remove(&model.id).unwrap_or_default();
                order_from_entity(model, products)
            })
            .collect()
    }

    async fn add_product(&self, order_id: Uuid, product_id: Uuid) -> AppResult<Order> {
        let txn = self.orm.begin().await?;

        let order = Orders::find_by_id(order_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| dangling("order", ORDER, order_id))?;
        if Products::find_by_id(product_id).count(&txn).await? == 0 {
            return Err(dangling("product", PRODUCT, product_id));
        }

        let linked = OrderProducts::find_by_id((order_id, product_id))
            .one(&txn)
            .await?
            .is_some();
        if !linked {
            let position = OrderProducts::find()
                .filter(OrderProductCol::OrderId.eq(order_id))
                .order_by_desc(OrderProductCol::Position)
                .one(&txn)
                .await?
                .map_or(0, |last| last.position + 1);
            OrderProducts::insert(OrderProductActive {
                order_id: Set(order_id),
                product_id: Set(product_id),
                position: Set(position),
            })
            .exec_without_returning(&txn)
            .await?;
        }
        let products = product_ids(&txn, order_id).await?;

        txn.commit().await?;
        order_from_entity(order, products)
    }

    async fn remove_product(&self, order_id: Uuid, product_id: Uuid) -> AppResult<Order> {
        let txn = self.orm.begin().await?;

        let order = Orders::find_by_id(order_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| dangling("order", ORDER, order_id))?;
        if Products::find_by_id(product_id).count(&txn).await? == 0 {
            return Err(dangling("product", PRODUCT, product_id));
        }

        OrderProducts::delete_many()
            .filter(OrderProductCol::OrderId.eq(order_id))
            .filter(OrderProductCol::ProductId.eq(product_id))
            .exec(&txn)
            .await?;
        let products = product_ids(&txn, order_id).await?;

        txn.commit().await?;
        order_from_entity(order, products)
    }

    async fn order_products(&self, order_id: Uuid) -> AppResult<Vec<Product>> {
        if Orders::find_by_id(order_id).count(&self.orm).await? == 0 {
            return Err(AppError::not_found(ORDER, order_id));
        }

        Ok(OrderProducts::find()
            .filter(OrderProductCol::OrderId.eq(order_id))
            .order_by_asc(OrderProductCol::Position)
            .find_also_related(Products)
            .all(&self.orm)
            .await?
            .into_iter()
            .filter_map(|(_, product)| product.map(product_from_entity))
            .collect())
    }
}

async fn ensure_customer<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<()> {
    if Customers::find_by_id(id).count(conn).await? == 0 {
        return Err(dangling("customer_id", CUSTOMER, id));
    }
    Ok(())
}

async fn ensure_products<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let found: HashSet<Uuid> = Products::find()
        .select_only()
        .column(ProdCol::Id)
        .filter(ProdCol::Id.is_in(ids.iter().copied()))
        .into_tuple::<Uuid>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    match ids.iter().find(|id| !found.contains(*id)) {
        Some(missing) => Err(dangling("products", PRODUCT, *missing)),
        None => Ok(()),
    }
}

async fn product_ids<C: ConnectionTrait>(conn: &C, order_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
    Ok(OrderProducts::find()
        .filter(OrderProductCol::OrderId.eq(order_id))
        .order_by_asc(OrderProductCol::Position)
        .all(conn)
        .await?
        .into_iter()
        .map(|row| row.product_id)
        .collect())
}

async fn replace_products<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    products: &[Uuid],
) -> Result<(), DbErr> {
    OrderProducts::delete_many()
        .filter(OrderProductCol::OrderId.eq(order_id))
        .exec(conn)
        .await?;
    if products.is_empty() {
        return Ok(());
    }

    let rows = products
        .iter()
        .enumerate()
        .map(|(position, product_id)| OrderProductActive {
            order_id: Set(order_id),
            product_id: Set(*product_id),
            position: Set(position as i32),
        });
    OrderProducts::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// A row that vanished between read and update is reported as not found.
fn missing_row(err: DbErr, entity: &'static str, id: Uuid) -> AppError {
    match err {
        DbErr::RecordNotUpdated => AppError::not_found(entity, id),
        other => other.into(),
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        price: model.price,
        available: model.available,
    }
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        address: model.address,
    }
}

fn order_from_entity(model: OrderModel, products: Vec<Uuid>) -> AppResult<Order> {
    let status: OrderStatus = model
        .status
        .parse()
        .map_err(|err| anyhow::anyhow!("order {} has a corrupt status: {err}", model.id))?;
    Ok(Order {
        id: model.id,
        customer_id: model.customer_id,
        products,
        date: model.date.with_timezone(&Utc),
        status,
    })
}
