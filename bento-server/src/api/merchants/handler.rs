//! Merchant Directory Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{MenuItem, Merchant};

use crate::core::ServerState;
use crate::db::repository::{MenuItemRepository, MerchantRepository};
use crate::utils::{AppError, AppResult};

/// GET /api/merchants - list all merchants
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Merchant>>> {
    let merchants = MerchantRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(merchants))
}

/// GET /api/merchants/:id - one merchant
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Merchant>> {
    let merchant = MerchantRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Merchant {}", id)))?;
    Ok(Json(merchant))
}

/// GET /api/merchants/:merchant_id/menu - a merchant's menu
pub async fn menu(
    State(state): State<ServerState>,
    Path(merchant_id): Path<i64>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = MenuItemRepository::new(state.db.clone())
        .find_by_merchant(merchant_id)
        .await?;
    Ok(Json(items))
}
