use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::{
        health::health,
        orders::{get_order, place_order},
        products::list_products,
        shops::{get_shop, list_shop_orders, list_shops, regenerate_token, shop_sales},
        stats::get_stats,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, config: &Config) -> Router {
    let allow_origin = match &config.cors_origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(origin, "Invalid CORS origin, allowing any");
                AllowOrigin::any()
            }
        },
        None => Any.into(),
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/shops", get(list_shops))
        .route("/shops/{id}", get(get_shop))
        .route("/shops/{id}/sales", get(shop_sales))
        .route("/shops/{id}/orders", get(list_shop_orders))
        .route("/shops/{id}/token", post(regenerate_token))
        .route("/products", get(list_products))
        .route("/orders", post(place_order))
        .route("/orders/{id}", get(get_order))
        .route("/stats", get(get_stats))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use rust_decimal::Decimal;
    use shoporders_core::auth::{ROLE_ATTRIBUTE, SHOP_ID_ATTRIBUTE};
    use shoporders_core::market::{Product, Shop};
    use tower::ServiceExt;

    use super::*;
    use crate::identity::{
        StaticDirectory, AUTH_PROVIDER_HEADER, AUTH_TYPE_HEADER, IDENTITY_ID_HEADER,
    };

    async fn seeded_state() -> AppState {
        let state = AppState::inmemory();

        state
            .shops
            .put_shop(&Shop::new("0001", "Shop 0001", "0770000001").with_token("AAA111"))
            .await
            .unwrap();
        state
            .shops
            .put_shop(&Shop::new("0002", "Shop 0002", "0770000002").with_token("BBB222"))
            .await
            .unwrap();
        state
            .shops
            .put_product(&Product::new("0001", "0011", "Product 0011", Decimal::from(110)))
            .await
            .unwrap();
        state
            .shops
            .put_product(&Product::new("0001", "0012", "Product 0012", Decimal::from(120)))
            .await
            .unwrap();

        state
    }

    fn app(state: AppState) -> Router {
        create_app(state, &Config::default())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn visitor_request(
        method: &str,
        uri: &str,
        visitor: &str,
        body: Option<&str>,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTH_TYPE_HEADER, "unauthenticated")
            .header(IDENTITY_ID_HEADER, format!("eu-west-1:{visitor}"));
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        builder.body(body).unwrap()
    }

    const ORDER_BODY: &str = r#"{
        "shopId": "0001",
        "phoneNumber": "0770001111",
        "name": "Visitor Customer #1",
        "items": [
            {"productId": "0011", "quantity": 2},
            {"productId": "0012", "quantity": 1}
        ]
    }"#;

    #[tokio::test]
    async fn test_health() {
        let response = app(AppState::inmemory())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_responses_disable_caching() {
        let response = app(AppState::inmemory())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-cache, no-store"
        );
    }

    #[tokio::test]
    async fn test_list_shops() {
        let response = app(seeded_state().await)
            .oneshot(Request::builder().uri("/shops").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let shops = body_json(response).await;
        assert_eq!(shops.as_array().unwrap().len(), 2);
        assert_eq!(shops[0]["shopId"], "0001");
    }

    #[tokio::test]
    async fn test_get_unknown_shop_is_not_found() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .uri("/shops/9999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Not found");
    }

    #[tokio::test]
    async fn test_products_require_both_parameters() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .uri("/products?shopId=0001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_products_unknown_shop_is_not_found() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .uri("/products?shopId=9999&shopToken=AAA111")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_products_wrong_token_is_unauthorized() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .uri("/products?shopId=0001&shopToken=WRONG1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["error"],
            "Unauthorized this is not the Token we hanged at the door"
        );
    }

    #[tokio::test]
    async fn test_products_with_valid_token() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .uri("/products?shopId=0001&shopToken=AAA111")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["shopId"], "0001");
        assert_eq!(payload["productsList"].as_array().unwrap().len(), 2);
        assert_eq!(payload["productsList"][0]["price"], 110);
    }

    #[tokio::test]
    async fn test_token_regeneration_has_no_body() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/shops/0001/token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_token_regeneration_unknown_shop() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/shops/9999/token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Shop does not exist");
    }

    #[tokio::test]
    async fn test_place_order_requires_shop_token() {
        let response = app(seeded_state().await)
            .oneshot(visitor_request("POST", "/orders", "visitor-1", Some(ORDER_BODY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_place_order_rejects_malformed_body() {
        let response = app(seeded_state().await)
            .oneshot(visitor_request(
                "POST",
                "/orders?shopToken=AAA111",
                "visitor-1",
                Some(r#"{"shopId": "0001"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_place_order_wrong_token_is_unauthorized() {
        let response = app(seeded_state().await)
            .oneshot(visitor_request(
                "POST",
                "/orders?shopToken=WRONG1",
                "visitor-1",
                Some(ORDER_BODY),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_place_order_without_identity_is_unauthorized() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/orders?shopToken=AAA111")
                    .header("Content-Type", "application/json")
                    .body(Body::from(ORDER_BODY))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_place_and_fetch_order_as_visitor() {
        let state = seeded_state().await;
        let app = app(state);

        let response = app
            .clone()
            .oneshot(visitor_request(
                "POST",
                "/orders?shopToken=AAA111",
                "visitor-1",
                Some(ORDER_BODY),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let order_id = body_json(response).await["orderId"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(order_id.len(), 4);

        let response = app
            .clone()
            .oneshot(visitor_request(
                "GET",
                &format!("/orders/{order_id}"),
                "visitor-1",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let order = body_json(response).await;
        assert_eq!(order["amount"], 340);
        assert_eq!(order["status"], "PENDING");

        // Someone else's order is off limits.
        let response = app
            .oneshot(visitor_request(
                "GET",
                &format!("/orders/{order_id}"),
                "visitor-2",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_shop_owner_sees_own_shop_orders_only() {
        let state = seeded_state().await;
        let directory = StaticDirectory::new()
            .with_user(
                "owner-1",
                HashMap::from([
                    (ROLE_ATTRIBUTE.to_string(), "shop_owner".to_string()),
                    (SHOP_ID_ATTRIBUTE.to_string(), "0001".to_string()),
                ]),
            )
            .with_user(
                "owner-2",
                HashMap::from([
                    (ROLE_ATTRIBUTE.to_string(), "shop_owner".to_string()),
                    (SHOP_ID_ATTRIBUTE.to_string(), "0002".to_string()),
                ]),
            );
        let app = app(state.with_directory(Arc::new(directory)));

        let response = app
            .clone()
            .oneshot(visitor_request(
                "POST",
                "/orders?shopToken=AAA111",
                "visitor-1",
                Some(ORDER_BODY),
            ))
            .await
            .unwrap();
        let order_id = body_json(response).await["orderId"]
            .as_str()
            .unwrap()
            .to_string();

        let owner_request = |sub: &str| {
            Request::builder()
                .uri(format!("/orders/{order_id}"))
                .header(AUTH_TYPE_HEADER, "authenticated")
                .header(
                    AUTH_PROVIDER_HEADER,
                    format!("cognito-idp.eu-west-1.amazonaws.com/pool:CognitoSignIn:{sub}"),
                )
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(owner_request("owner-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(owner_request("owner-2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_unknown_order_is_not_found() {
        let response = app(seeded_state().await)
            .oneshot(visitor_request("GET", "/orders/9999", "visitor-1", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_shop_orders() {
        let state = seeded_state().await;
        let app = app(state);

        let response = app
            .clone()
            .oneshot(visitor_request(
                "POST",
                "/orders?shopToken=AAA111",
                "visitor-1",
                Some(ORDER_BODY),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/shops/0001/orders")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let orders = body_json(response).await;
        assert_eq!(orders.as_array().unwrap().len(), 1);
        assert_eq!(orders[0]["shopId"], "0001");
        assert_eq!(orders[0]["amount"], 340);
    }

    #[tokio::test]
    async fn test_list_shop_orders_unknown_shop_is_empty() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .uri("/shops/9999/orders")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shop_sales_totals_orders() {
        let state = seeded_state().await;
        let app = app(state);

        let response = app
            .clone()
            .oneshot(visitor_request(
                "POST",
                "/orders?shopToken=AAA111",
                "visitor-1",
                Some(ORDER_BODY),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/shops/0001/sales")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["shopId"], "0001");
        assert_eq!(payload["totalAmount"], 340);
    }

    #[tokio::test]
    async fn test_shop_sales_unknown_shop_is_not_found() {
        let response = app(seeded_state().await)
            .oneshot(
                Request::builder()
                    .uri("/shops/9999/sales")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Not found");
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let response = app(AppState::inmemory())
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["totalNumberOfShops"], 0);
        assert_eq!(payload["averageNumberOfOrdersPerShop"], 0.0);
    }
}
