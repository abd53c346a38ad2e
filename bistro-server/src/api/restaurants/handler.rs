//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{
    DiningTable, Restaurant, RestaurantCreate, RestaurantUpdate, RestaurantWithDistance,
    TableCreate,
};
use crate::search::NearbyQuery;
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "restaurant";

fn id_of(restaurant: &Restaurant) -> String {
    restaurant
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default()
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// POST /api/restaurants - 创建餐厅 (geohash 服务端计算)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<CreatedResponse>> {
    payload.validate()?;
    let restaurant = state.restaurants().create(payload).await?;

    let id = id_of(&restaurant);
    state.broadcast_change(RESOURCE, "created", &id, Some(&restaurant));
    Ok(Json(CreatedResponse { id }))
}

/// PUT /api/restaurants/{id} - 更新餐厅 (坐标变化时重算 geohash)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    payload.validate()?;
    let restaurant = state.restaurants().update(&id, payload).await?;

    state.broadcast_change(RESOURCE, "updated", &id_of(&restaurant), Some(&restaurant));
    Ok(Json(restaurant))
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// 公里，缺省 2.0
    pub radius: Option<f64>,
    pub limit: Option<usize>,
    pub user_id: Option<String>,
}

/// GET /api/restaurants/nearby - 半径搜索，按距离升序
pub async fn nearby(
    State(state): State<ServerState>,
    Query(params): Query<NearbyParams>,
) -> AppResult<Json<Vec<RestaurantWithDistance>>> {
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return Err(AppError::validation("lat and lng are required"));
    };

    let results = state
        .search()
        .find_nearby(NearbyQuery {
            latitude: lat,
            longitude: lng,
            radius_km: params.radius,
            limit: params.limit,
            user_id: params.user_id,
        })
        .await?;
    Ok(Json(results))
}

#[derive(Serialize)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub tables: Vec<DiningTable>,
}

/// GET /api/restaurants/{id} - 餐厅详情及其桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RestaurantDetail>> {
    let restaurant = state
        .restaurants()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", id)))?;
    let tables = state.queue().tables_of(&id).await?;
    Ok(Json(RestaurantDetail { restaurant, tables }))
}

/// GET /api/restaurants/owner/{owner_id} - 店主名下的餐厅
pub async fn by_owner(
    State(state): State<ServerState>,
    Path(owner_id): Path<String>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = state.restaurants().find_by_owner(&owner_id).await?;
    Ok(Json(restaurants))
}

/// POST /api/restaurants/{id}/tables - 加桌
pub async fn add_table(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableCreate>,
) -> AppResult<Json<CreatedResponse>> {
    payload.validate()?;
    let table = state
        .reservations()
        .add_table(&id, payload.table_number)
        .await?;

    let table_id = table
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    state.broadcast_change("dining_table", "created", &table_id, Some(&table));
    Ok(Json(CreatedResponse { id: table_id }))
}

#[derive(Serialize)]
pub struct ClearedResponse {
    pub updated: usize,
}

/// PATCH /api/restaurants/{id}/tables/clear - 店主清空全部桌台
pub async fn clear_all_tables(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ClearedResponse>> {
    let updated = state.reservations().clear_all_tables(&id).await?;

    state.broadcast_change::<()>("dining_table", "cleared", &id, None);
    Ok(Json(ClearedResponse { updated }))
}
