//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::Booking;
use crate::utils::AppResult;

/// POST /api/bookings/{id}/cancel - 取消预订
///
/// 幂等：重复取消 409。桌台无其它未关闭预订时翻回 available。
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.reservations().cancel_booking(&id).await?;

    state.broadcast_change("booking", "updated", &id, Some(&booking));
    state.broadcast_change::<()>("dining_table", "updated", &booking.dining_table.to_string(), None);
    Ok(Json(booking))
}
