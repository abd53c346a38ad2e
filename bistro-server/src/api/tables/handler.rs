//! Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::BookingCreate;
use crate::utils::AppResult;

const RESOURCE: &str = "dining_table";

#[derive(Serialize)]
pub struct BookedResponse {
    pub booking_id: String,
}

/// POST /api/tables/{restaurant_id}/{table_id}/book - 预订桌台
///
/// body 可省略，user_id 缺省 "anon" (沿用旧客户端行为)。
pub async fn book(
    State(state): State<ServerState>,
    Path((restaurant_id, table_id)): Path<(String, String)>,
    payload: Option<Json<BookingCreate>>,
) -> AppResult<Json<BookedResponse>> {
    let user_id = payload
        .map(|Json(p)| p.user_id)
        .unwrap_or_else(|| "anon".to_string());

    let booking = state
        .reservations()
        .book_table(&restaurant_id, &table_id, &user_id)
        .await?;

    let booking_id = booking
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    state.broadcast_change("booking", "created", &booking_id, Some(&booking));
    state.broadcast_change::<()>(RESOURCE, "updated", &table_id, None);

    Ok(Json(BookedResponse { booking_id }))
}

#[derive(Serialize)]
pub struct ClearedResponse {
    pub updated: usize,
}

/// PATCH /api/tables/{restaurant_id}/{table_id}/clear - 店主清台
///
/// 同时关闭该桌台的未关闭预订。
pub async fn clear(
    State(state): State<ServerState>,
    Path((restaurant_id, table_id)): Path<(String, String)>,
) -> AppResult<Json<ClearedResponse>> {
    let table = state
        .reservations()
        .clear_table(&restaurant_id, &table_id)
        .await?;

    state.broadcast_change(RESOURCE, "updated", &table_id, Some(&table));
    Ok(Json(ClearedResponse { updated: 1 }))
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// DELETE /api/tables/{restaurant_id}/{table_id} - 删桌
///
/// 有未关闭预订时拒绝 (409)。
pub async fn remove(
    State(state): State<ServerState>,
    Path((restaurant_id, table_id)): Path<(String, String)>,
) -> AppResult<Json<DeletedResponse>> {
    let deleted = state
        .reservations()
        .remove_table(&restaurant_id, &table_id)
        .await?;

    if deleted {
        state.broadcast_change::<()>(RESOURCE, "deleted", &table_id, None);
    }
    Ok(Json(DeletedResponse { deleted }))
}
