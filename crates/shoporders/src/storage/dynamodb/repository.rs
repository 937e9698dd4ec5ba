use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use rust_decimal::Decimal;
use shoporders_core::market::{
    new_shop_token, random_order_id, Order, OrderLineItem, OrderStatus, PlaceOrder, Product, Shop,
};
use shoporders_core::storage::{
    OrderRepository, Result, ServiceStatistics, ShopRepository, StatisticsRepository, StoreError,
};

use super::client::TableClient;
use super::conversions::{
    item_to_line_item, item_to_order, item_to_product, item_to_shop, line_item_to_item,
    order_to_item, product_to_item, shop_to_item, ENTITY_TYPE_ORDER,
};
use super::keys;

/// Repository over a single wide-column table. All entity types share the
/// table; queries select them through key prefixes and the two secondary
/// indexes.
#[derive(Debug, Clone)]
pub struct DynamoDbRepository {
    table: TableClient,
}

impl DynamoDbRepository {
    pub fn new(table: TableClient) -> Self {
        Self { table }
    }
}

#[async_trait]
impl ShopRepository for DynamoDbRepository {
    async fn get_shop(&self, shop_id: &str) -> Result<Option<Shop>> {
        keys::ensure_id(shop_id, "shop")?;

        let item = self
            .table
            .get_item(keys::shop_pk(shop_id), keys::shop_sk(shop_id))
            .await?;

        item.as_ref().map(item_to_shop).transpose()
    }

    async fn list_shops(&self) -> Result<Vec<Shop>> {
        let items = self
            .table
            .scan_entity(None, super::conversions::ENTITY_TYPE_SHOP)
            .await?;

        items.iter().map(item_to_shop).collect()
    }

    async fn list_products_by_shop(&self, shop_id: &str) -> Result<Vec<Product>> {
        keys::ensure_id(shop_id, "shop")?;

        let items = self
            .table
            .query(
                None,
                keys::ATTR_PK,
                keys::shop_pk(shop_id),
                Some((keys::ATTR_SK, keys::product_sk_prefix().to_string())),
            )
            .await?;

        if items.is_empty() {
            tracing::warn!(shop_id, "No products found for shop");
        }

        items.iter().map(item_to_product).collect()
    }

    async fn put_shop(&self, shop: &Shop) -> Result<()> {
        keys::ensure_id(&shop.shop_id, "shop")?;
        self.table.put_item(shop_to_item(shop)).await
    }

    async fn put_product(&self, product: &Product) -> Result<()> {
        keys::ensure_id(&product.shop_id, "shop")?;
        keys::ensure_id(&product.product_id, "product")?;
        self.table.put_item(product_to_item(product)).await
    }

    async fn regenerate_shop_token(&self, shop_id: &str) -> Result<String> {
        keys::ensure_id(shop_id, "shop")?;

        let token = new_shop_token();
        self.table
            .conditional_update(
                keys::shop_pk(shop_id),
                keys::shop_sk(shop_id),
                "SET shopToken = :token",
                vec![(":token".to_string(), AttributeValue::S(token.clone()))],
                "attribute_exists(PK)",
                "Shop",
                shop_id,
            )
            .await?;

        Ok(token)
    }
}

#[async_trait]
impl OrderRepository for DynamoDbRepository {
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        keys::ensure_id(order_id, "order")?;

        let item = self
            .table
            .get_item(keys::order_pk(order_id), keys::order_sk(order_id))
            .await?;

        item.as_ref().map(item_to_order).transpose()
    }

    async fn get_order_items(&self, order_id: &str) -> Result<Vec<OrderLineItem>> {
        keys::ensure_id(order_id, "order")?;

        let items = self
            .table
            .query(
                None,
                keys::ATTR_PK,
                keys::order_pk(order_id),
                Some((keys::ATTR_SK, keys::product_sk_prefix().to_string())),
            )
            .await?;

        items.iter().map(item_to_line_item).collect()
    }

    async fn list_orders_by_shop(&self, shop_id: &str) -> Result<Vec<Order>> {
        keys::ensure_id(shop_id, "shop")?;

        let items = self
            .table
            .query(
                Some(keys::GSI1_INDEX),
                keys::ATTR_GSI1_PK,
                keys::shop_pk(shop_id),
                None,
            )
            .await?;

        items.iter().map(item_to_order).collect()
    }

    async fn total_amount_by_shop(&self, shop_id: &str) -> Result<Decimal> {
        let orders = self.list_orders_by_shop(shop_id).await?;
        Ok(orders.iter().map(|order| order.amount).sum())
    }

    async fn place_order(&self, request: &PlaceOrder, customer_key: &str) -> Result<String> {
        let order_id = self.generate_unique_order_id(4, 10).await?;

        // Snapshot each product's current name and price into the line
        // items so later catalog edits leave placed orders untouched.
        let mut lines = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = self
                .table
                .get_item(
                    keys::shop_pk(&request.shop_id),
                    keys::product_sk(&item.product_id),
                )
                .await?
                .ok_or_else(|| StoreError::NotFound {
                    entity_type: "Product",
                    id: item.product_id.clone(),
                })?;
            let product = item_to_product(&product)?;

            lines.push(OrderLineItem {
                product_id: product.product_id,
                quantity: item.quantity,
                name: product.name,
                price: product.price,
            });
        }

        let amount: Decimal = lines.iter().map(OrderLineItem::line_total).sum();
        let order = Order {
            order_id: order_id.clone(),
            shop_id: request.shop_id.clone(),
            customer_id: keys::id_from_key(customer_key).to_string(),
            status: OrderStatus::Pending,
            amount,
            phone_number: request.phone_number.clone(),
            name: request.name.clone(),
            date: Utc::now(),
        };

        // Line items go into the batch before the header so a reader that
        // sees the header also sees its lines, modulo batch reordering.
        let mut batch: Vec<_> = lines
            .iter()
            .map(|line| line_item_to_item(&order_id, line))
            .collect();
        batch.push(order_to_item(&order, customer_key));

        self.table.batch_put_items(batch).await?;

        tracing::info!(order_id, shop_id = %request.shop_id, %amount, "Order placed");

        Ok(order_id)
    }

    async fn generate_unique_order_id(&self, length: usize, max_attempts: u32) -> Result<String> {
        for _ in 0..max_attempts {
            let candidate = random_order_id(length);
            if self.get_order(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }

        Err(StoreError::IdGenerationExhausted {
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl StatisticsRepository for DynamoDbRepository {
    async fn compute_statistics(&self) -> Result<ServiceStatistics> {
        let by_shop = self
            .table
            .scan_entity(Some(keys::GSI1_INDEX), ENTITY_TYPE_ORDER)
            .await?;
        let by_customer = self
            .table
            .scan_entity(Some(keys::GSI2_INDEX), ENTITY_TYPE_ORDER)
            .await?;

        let shop_counts = group_counts(&by_shop, keys::ATTR_GSI1_PK)?;
        let customer_counts = group_counts(&by_customer, keys::ATTR_GSI2_PK)?;

        Ok(ServiceStatistics::from_counts(
            &shop_counts,
            &customer_counts,
        ))
    }
}

/// Counts orders per distinct partition key value.
fn group_counts(items: &[super::client::Item], pk_attr: &str) -> Result<Vec<u64>> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for item in items {
        let key = item
            .get(pk_attr)
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| {
                StoreError::InvalidData(format!("Missing or invalid field: {}", pk_attr))
            })?;
        *counts.entry(key.as_str()).or_insert(0) += 1;
    }

    Ok(counts.into_values().collect())
}
