//! Table API 模块
//!
//! 路径总带餐厅前缀：跨餐厅的桌台 id 直接 404。

mod handler;

use axum::{
    Router,
    routing::{delete, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{restaurant_id}/{table_id}", delete(handler::remove))
        .route("/{restaurant_id}/{table_id}/clear", patch(handler::clear))
        .route("/{restaurant_id}/{table_id}/book", post(handler::book))
}
