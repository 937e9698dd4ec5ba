use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shoporders_core::storage::StoreError;

use crate::{handlers::AppError, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShopSales {
    shop_id: String,
    #[serde(with = "shoporders_core::serde::decimal_number")]
    total_amount: Decimal,
}

/// List all shops (GET /shops).
pub async fn list_shops(State(state): State<AppState>) -> Result<Response, AppError> {
    let shops = state.shops.list_shops().await?;
    Ok(Json(shops).into_response())
}

/// Get a single shop by id (GET /shops/{id}).
pub async fn get_shop(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
) -> Result<Response, AppError> {
    match state.shops.get_shop(&shop_id).await? {
        Some(shop) => Ok(Json(shop).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "Not found" })),
        )
            .into_response()),
    }
}

/// Total sales of a shop (GET /shops/{id}/sales).
pub async fn shop_sales(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
) -> Result<Response, AppError> {
    if state.shops.get_shop(&shop_id).await?.is_none() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "Not found" })),
        )
            .into_response());
    }

    let total = state.orders.total_amount_by_shop(&shop_id).await?;

    Ok(Json(ShopSales {
        shop_id,
        total_amount: total,
    })
    .into_response())
}

/// Orders placed at a shop (GET /shops/{id}/orders).
pub async fn list_shop_orders(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
) -> Result<Response, AppError> {
    let orders = state.orders.list_orders_by_shop(&shop_id).await?;
    Ok(Json(orders).into_response())
}

/// Rotate the shop token (POST /shops/{id}/token).
///
/// The new token is handed to the owner out of band, never in the
/// response. An unknown shop yields 404 without writing anything.
pub async fn regenerate_token(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
) -> Result<Response, AppError> {
    match state.shops.regenerate_shop_token(&shop_id).await {
        Ok(_) => {
            tracing::info!(shop_id, "Shop token rotated");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        Err(StoreError::PreconditionFailed { .. }) => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Shop does not exist" })),
        )
            .into_response()),
        Err(err) => Err(err.into()),
    }
}
