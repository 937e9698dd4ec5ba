use axum::{extract::State, response::IntoResponse, Json};

use crate::{handlers::AppError, state::AppState};

/// Service-wide order statistics (GET /stats).
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.stats.compute_statistics().await?;
    Ok(Json(stats))
}
