use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use shoporders_core::auth::{can_view_order, shop_token_matches};
use shoporders_core::market::PlaceOrder;

use crate::{
    handlers::{products::WRONG_TOKEN_MESSAGE, AppError},
    identity::RequestIdentity,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuery {
    pub shop_token: Option<String>,
}

/// Place an order (POST /orders?shopToken=..).
///
/// The shop token gates ordering the same way it gates the catalog, and
/// only customers (visitors or registered users with the customer role)
/// may order. Returns the generated order id.
pub async fn place_order(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
    body: Result<Json<PlaceOrder>, JsonRejection>,
) -> Result<Response, AppError> {
    let Some(shop_token) = query.shop_token else {
        return Ok(bad_request("shopToken is required"));
    };

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return Ok(bad_request(&rejection.body_text())),
    };
    if let Err(err) = request.validate() {
        return Ok(bad_request(&err.to_string()));
    }

    let Some(shop) = state.shops.get_shop(&request.shop_id).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Shop does not exist" })),
        )
            .into_response());
    };

    if !shop_token_matches(&shop, &shop_token) {
        return Ok(unauthorized(WRONG_TOKEN_MESSAGE));
    }

    let Some(identity) = RequestIdentity::from_headers(&headers) else {
        return Ok(unauthorized("Unauthorized"));
    };
    let user = identity.resolve(&state.directory).await?;
    let Some(customer_key) = user.customer_key() else {
        return Ok(unauthorized("Unauthorized"));
    };

    let order_id = state.orders.place_order(&request, &customer_key).await?;

    Ok(Json(serde_json::json!({ "orderId": order_id })).into_response())
}

/// Get an order header by id (GET /orders/{id}).
///
/// Visible to the customer who placed it and to the owner of the shop it
/// was placed at.
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(order) = state.orders.get_order(&order_id).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "Not found" })),
        )
            .into_response());
    };

    let Some(identity) = RequestIdentity::from_headers(&headers) else {
        return Ok(unauthorized("Unauthorized"));
    };
    let user = identity.resolve(&state.directory).await?;

    if !can_view_order(&user, &order) {
        return Ok(unauthorized("Unauthorized"));
    }

    Ok(Json(order).into_response())
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
