use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::market::{Order, OrderLineItem, PlaceOrder, Product, Shop};

use super::{Result, ServiceStatistics};

/// Repository for shop and product operations.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// Gets a shop by its id.
    async fn get_shop(&self, shop_id: &str) -> Result<Option<Shop>>;

    /// Lists every shop, draining store pagination fully. Order is
    /// unspecified.
    async fn list_shops(&self) -> Result<Vec<Shop>>;

    /// Lists the products of a shop. An unknown shop or a shop without
    /// products yields an empty list, not an error.
    async fn list_products_by_shop(&self, shop_id: &str) -> Result<Vec<Product>>;

    /// Writes a shop record. Administrative/seed path only.
    async fn put_shop(&self, shop: &Shop) -> Result<()>;

    /// Writes a product record. Administrative/seed path only.
    async fn put_product(&self, product: &Product) -> Result<()>;

    /// Rotates the shop token with a conditional write requiring the shop
    /// to exist. Returns the new token, or
    /// [`StoreError::PreconditionFailed`](super::StoreError::PreconditionFailed)
    /// when the shop is absent; no write happens in that case.
    async fn regenerate_shop_token(&self, shop_id: &str) -> Result<String>;
}

/// Repository for order operations.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Gets an order header by id. `None` signals an unknown id.
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>>;

    /// Gets the line items of an order, with name and price as snapshotted
    /// at placement time.
    async fn get_order_items(&self, order_id: &str) -> Result<Vec<OrderLineItem>>;

    /// Lists all orders placed at a shop via the shop index.
    async fn list_orders_by_shop(&self, shop_id: &str) -> Result<Vec<Order>>;

    /// Sums the order amounts of a shop. A shop with no orders yields
    /// exactly zero.
    async fn total_amount_by_shop(&self, shop_id: &str) -> Result<Decimal>;

    /// Places an order: snapshots each product's current price and name,
    /// computes the total, and writes the header plus all line items as a
    /// single batch under a freshly generated unique order id. The batch
    /// is not atomic across items; a failure leaves order state unknown
    /// to the caller.
    async fn place_order(&self, request: &PlaceOrder, customer_key: &str) -> Result<String>;

    /// Draws random numeric ids of `length` digits until one is unused,
    /// giving up after `max_attempts` draws with
    /// [`StoreError::IdGenerationExhausted`](super::StoreError::IdGenerationExhausted).
    async fn generate_unique_order_id(&self, length: usize, max_attempts: u32) -> Result<String>;
}

/// Repository for service-wide statistics.
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Groups orders by shop and by customer over the secondary indexes
    /// and reports distinct counts and per-group averages.
    async fn compute_statistics(&self) -> Result<ServiceStatistics>;
}
