//! Queue API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::ActiveBooking;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct QueueParams {
    pub user_id: Option<String>,
}

/// GET /api/my-queue - 用户当前的未关闭预订，新的在前
pub async fn my_queue(
    State(state): State<ServerState>,
    Query(params): Query<QueueParams>,
) -> AppResult<Json<Vec<ActiveBooking>>> {
    let user_id = params.user_id.as_deref().unwrap_or("anon");
    let bookings = state.queue().my_active_bookings(user_id).await?;
    Ok(Json(bookings))
}
