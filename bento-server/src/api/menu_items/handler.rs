//! Menu Item Handlers
//!
//! Create and update arrive as multipart forms (the image rides along
//! with the text fields); the owning merchant always comes from the
//! session, never from the form.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;

use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::auth::CurrentMerchant;
use crate::core::ServerState;
use crate::db::repository::{MenuItemRepository, Repository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Fields collected from a menu item multipart form.
#[derive(Debug, Default)]
struct MenuItemForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    image_url: Option<String>,
}

async fn read_form(state: &ServerState, mut multipart: Multipart) -> AppResult<MenuItemForm> {
    let mut form = MenuItemForm::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("name") => form.name = Some(field.text().await?),
            Some("description") => form.description = Some(field.text().await?),
            Some("price") => {
                let text = field.text().await?;
                let price: Decimal = text
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Validation(format!("Invalid price: {text}")))?;
                if price < Decimal::ZERO {
                    return Err(AppError::Validation("Price must not be negative".to_string()));
                }
                form.price = Some(price);
            }
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    form.image_url = Some(state.uploads.save(file_name.as_deref(), &bytes).await?);
                }
            }
            _ => {}
        }
    }

    validate_optional_text(&form.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&form.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&form.image_url, "image", MAX_URL_LEN)?;
    Ok(form)
}

/// POST /api/menu-items - create a menu item for the session merchant
pub async fn create(
    State(state): State<ServerState>,
    CurrentMerchant(merchant): CurrentMerchant,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    let form = read_form(&state, multipart).await?;

    let name = form
        .name
        .ok_or_else(|| AppError::Validation("name is required".to_string()))?;
    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    let price = form
        .price
        .ok_or_else(|| AppError::Validation("price is required".to_string()))?;

    let item = MenuItemRepository::new(state.db.clone())
        .create(MenuItemCreate {
            merchant_id: merchant.id,
            name,
            description: form.description.unwrap_or_default(),
            price,
            image_url: form.image_url.unwrap_or_default(),
        })
        .await?;

    tracing::info!(item_id = item.id, merchant_id = merchant.id, "Menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/menu-items/:id - partial update, owner only
pub async fn update(
    State(state): State<ServerState>,
    CurrentMerchant(merchant): CurrentMerchant,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Menu item {}", id)))?;
    if existing.merchant_id != merchant.id {
        return Err(AppError::Forbidden("Not your menu item".to_string()));
    }

    let form = read_form(&state, multipart).await?;
    if let Some(name) = &form.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let item = repo
        .update(
            id,
            MenuItemUpdate {
                name: form.name,
                description: form.description,
                price: form.price,
                image_url: form.image_url,
            },
        )
        .await?;

    tracing::info!(item_id = id, merchant_id = merchant.id, "Menu item updated");
    Ok(Json(item))
}

/// DELETE /api/menu-items/:id - owner only; deleting an absent item is a
/// success so the operation stays idempotent
pub async fn delete(
    State(state): State<ServerState>,
    CurrentMerchant(merchant): CurrentMerchant,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let repo = MenuItemRepository::new(state.db.clone());

    if let Some(existing) = repo.find_by_id(id).await? {
        if existing.merchant_id != merchant.id {
            return Err(AppError::Forbidden("Not your menu item".to_string()));
        }
        repo.delete(id).await?;
        tracing::info!(item_id = id, merchant_id = merchant.id, "Menu item deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}
