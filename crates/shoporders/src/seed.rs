//! Test-data seeding for local development and demos.

use rust_decimal::Decimal;
use shoporders_core::market::{OrderItemRequest, PlaceOrder, Product, Shop};
use shoporders_core::storage::Result;

use crate::state::AppState;

/// Seeds two shops with two products each and two visitor customers with
/// one order per shop. Idempotent for shops and products; orders get
/// fresh ids on every run.
pub async fn prefill_test_data(state: &AppState) -> Result<()> {
    for shop_id in ["0001", "0002"] {
        let shop = Shop::new(
            shop_id,
            format!("Shop {shop_id}"),
            format!("07700000{}", &shop_id[2..]),
        );
        state.shops.put_shop(&shop).await?;

        for suffix in ["1", "2"] {
            let product_id = format!("00{}{suffix}", &shop_id[3..]);
            let price = Decimal::from(product_id.parse::<u32>().unwrap_or(0) * 10);
            let product = Product::new(
                shop_id,
                product_id.clone(),
                format!("Product {product_id}"),
                price,
            );
            state.shops.put_product(&product).await?;
        }
    }

    ensure_shop_tokens(state).await?;

    for (index, visitor) in ["visitor-1", "visitor-2"].iter().enumerate() {
        for shop_id in ["0001", "0002"] {
            let product_id = format!("00{}1", &shop_id[3..]);
            let request = PlaceOrder {
                shop_id: shop_id.to_string(),
                phone_number: format!("077000111{index}"),
                name: format!("Visitor Customer #{}", index + 1),
                items: vec![OrderItemRequest {
                    product_id,
                    quantity: 1,
                }],
            };
            let order_id = state
                .orders
                .place_order(&request, &format!("v#{visitor}"))
                .await?;
            tracing::debug!(order_id, shop_id, visitor, "Seeded order");
        }
    }

    tracing::info!("Test data seeded");
    Ok(())
}

/// Rotates a token for every shop that has none, so seeded shops are
/// immediately orderable.
pub async fn ensure_shop_tokens(state: &AppState) -> Result<()> {
    for shop in state.shops.list_shops().await? {
        if shop.shop_token.is_none() {
            let token = state.shops.regenerate_shop_token(&shop.shop_id).await?;
            tracing::info!(shop_id = %shop.shop_id, token, "Issued shop token");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prefill_creates_shops_products_and_orders() {
        let state = AppState::inmemory();
        prefill_test_data(&state).await.unwrap();

        let shops = state.shops.list_shops().await.unwrap();
        assert_eq!(shops.len(), 2);
        assert!(shops.iter().all(|shop| shop.shop_token.is_some()));

        let products = state.shops.list_products_by_shop("0001").await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product_id, "0011");
        assert_eq!(products[0].price, Decimal::from(110));

        let stats = state.stats.compute_statistics().await.unwrap();
        assert_eq!(stats.total_number_of_shops, 2);
        assert_eq!(stats.average_number_of_orders_per_shop, 2.0);
        assert_eq!(stats.total_number_of_customers, 2);
        assert_eq!(stats.average_number_of_orders_per_customer, 2.0);
    }

    #[tokio::test]
    async fn test_ensure_tokens_leaves_existing_tokens_alone() {
        let state = AppState::inmemory();
        state
            .shops
            .put_shop(&Shop::new("0009", "Shop 0009", "0770000009").with_token("ZZZ999"))
            .await
            .unwrap();

        ensure_shop_tokens(&state).await.unwrap();

        let shop = state.shops.get_shop("0009").await.unwrap().unwrap();
        assert_eq!(shop.shop_token.as_deref(), Some("ZZZ999"));
    }
}
