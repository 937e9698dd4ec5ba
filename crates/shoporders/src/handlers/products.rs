use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use shoporders_core::auth::shop_token_matches;

use crate::{handlers::AppError, state::AppState};

pub const WRONG_TOKEN_MESSAGE: &str = "Unauthorized this is not the Token we hanged at the door";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    pub shop_id: Option<String>,
    pub shop_token: Option<String>,
}

/// Product catalog of a shop (GET /products?shopId=..&shopToken=..).
///
/// The shop token gates the catalog: both parameters are required, the
/// shop must exist, and the presented token must match the stored one.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Response, AppError> {
    let (Some(shop_id), Some(shop_token)) = (query.shop_id, query.shop_token) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "shopId and shopToken are required" })),
        )
            .into_response());
    };

    let Some(shop) = state.shops.get_shop(&shop_id).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Shop does not exist" })),
        )
            .into_response());
    };

    if !shop_token_matches(&shop, &shop_token) {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": WRONG_TOKEN_MESSAGE })),
        )
            .into_response());
    }

    let products = state.shops.list_products_by_shop(&shop_id).await?;

    Ok(Json(serde_json::json!({
        "shopId": shop_id,
        "productsList": products,
    }))
    .into_response())
}
