//! Restaurant API 模块

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/nearby", get(handler::nearby))
        .route("/owner/{owner_id}", get(handler::by_owner))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/tables", post(handler::add_table))
        .route("/{id}/tables/clear", patch(handler::clear_all_tables))
}
