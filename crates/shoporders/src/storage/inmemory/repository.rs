use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use shoporders_core::market::{
    new_shop_token, random_order_id, Order, OrderLineItem, OrderStatus, PlaceOrder, Product, Shop,
};
use shoporders_core::storage::{
    OrderRepository, Result, ServiceStatistics, ShopRepository, StatisticsRepository, StoreError,
};

#[derive(Debug, Clone)]
struct StoredOrder {
    header: Order,
    customer_key: String,
    lines: Vec<OrderLineItem>,
}

#[derive(Debug, Default)]
struct Tables {
    shops: HashMap<String, Shop>,
    products: HashMap<(String, String), Product>,
    orders: HashMap<String, StoredOrder>,
}

/// Repository backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ShopRepository for InMemoryRepository {
    async fn get_shop(&self, shop_id: &str) -> Result<Option<Shop>> {
        Ok(self.read().shops.get(shop_id).cloned())
    }

    async fn list_shops(&self) -> Result<Vec<Shop>> {
        let mut shops: Vec<Shop> = self.read().shops.values().cloned().collect();
        shops.sort_by(|a, b| a.shop_id.cmp(&b.shop_id));
        Ok(shops)
    }

    async fn list_products_by_shop(&self, shop_id: &str) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self
            .read()
            .products
            .values()
            .filter(|product| product.shop_id == shop_id)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        Ok(products)
    }

    async fn put_shop(&self, shop: &Shop) -> Result<()> {
        self.write()
            .shops
            .insert(shop.shop_id.clone(), shop.clone());
        Ok(())
    }

    async fn put_product(&self, product: &Product) -> Result<()> {
        self.write().products.insert(
            (product.shop_id.clone(), product.product_id.clone()),
            product.clone(),
        );
        Ok(())
    }

    async fn regenerate_shop_token(&self, shop_id: &str) -> Result<String> {
        let mut tables = self.write();
        let shop = tables
            .shops
            .get_mut(shop_id)
            .ok_or_else(|| StoreError::PreconditionFailed {
                entity_type: "Shop",
                id: shop_id.to_string(),
            })?;

        let token = new_shop_token();
        shop.shop_token = Some(token.clone());
        Ok(token)
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepository {
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        Ok(self
            .read()
            .orders
            .get(order_id)
            .map(|stored| stored.header.clone()))
    }

    async fn get_order_items(&self, order_id: &str) -> Result<Vec<OrderLineItem>> {
        Ok(self
            .read()
            .orders
            .get(order_id)
            .map(|stored| stored.lines.clone())
            .unwrap_or_default())
    }

    async fn list_orders_by_shop(&self, shop_id: &str) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .read()
            .orders
            .values()
            .filter(|stored| stored.header.shop_id == shop_id)
            .map(|stored| stored.header.clone())
            .collect();
        orders.sort_by(|a, b| a.order_id.cmp(&b.order_id));
        Ok(orders)
    }

    async fn total_amount_by_shop(&self, shop_id: &str) -> Result<Decimal> {
        let orders = self.list_orders_by_shop(shop_id).await?;
        Ok(orders.iter().map(|order| order.amount).sum())
    }

    async fn place_order(&self, request: &PlaceOrder, customer_key: &str) -> Result<String> {
        let order_id = self.generate_unique_order_id(4, 10).await?;

        let mut tables = self.write();

        let mut lines = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = tables
                .products
                .get(&(request.shop_id.clone(), item.product_id.clone()))
                .ok_or_else(|| StoreError::NotFound {
                    entity_type: "Product",
                    id: item.product_id.clone(),
                })?;

            lines.push(OrderLineItem {
                product_id: product.product_id.clone(),
                quantity: item.quantity,
                name: product.name.clone(),
                price: product.price,
            });
        }

        let amount: Decimal = lines.iter().map(OrderLineItem::line_total).sum();
        let customer_id = customer_key
            .rsplit('#')
            .next()
            .unwrap_or(customer_key)
            .to_string();

        let header = Order {
            order_id: order_id.clone(),
            shop_id: request.shop_id.clone(),
            customer_id,
            status: OrderStatus::Pending,
            amount,
            phone_number: request.phone_number.clone(),
            name: request.name.clone(),
            date: Utc::now(),
        };

        tables.orders.insert(
            order_id.clone(),
            StoredOrder {
                header,
                customer_key: customer_key.to_string(),
                lines,
            },
        );

        Ok(order_id)
    }

    async fn generate_unique_order_id(&self, length: usize, max_attempts: u32) -> Result<String> {
        for _ in 0..max_attempts {
            let candidate = random_order_id(length);
            if !self.read().orders.contains_key(&candidate) {
                return Ok(candidate);
            }
        }

        Err(StoreError::IdGenerationExhausted {
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl StatisticsRepository for InMemoryRepository {
    async fn compute_statistics(&self) -> Result<ServiceStatistics> {
        let tables = self.read();

        let mut by_shop: HashMap<&str, u64> = HashMap::new();
        let mut by_customer: HashMap<&str, u64> = HashMap::new();
        for stored in tables.orders.values() {
            *by_shop.entry(stored.header.shop_id.as_str()).or_insert(0) += 1;
            *by_customer
                .entry(stored.customer_key.as_str())
                .or_insert(0) += 1;
        }

        let shop_counts: Vec<u64> = by_shop.into_values().collect();
        let customer_counts: Vec<u64> = by_customer.into_values().collect();

        Ok(ServiceStatistics::from_counts(
            &shop_counts,
            &customer_counts,
        ))
    }
}
