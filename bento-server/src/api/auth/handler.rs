//! Authentication Handlers
//!
//! Registration, login, logout, and current-principal lookup for both
//! account kinds. Registration establishes a session immediately, so a
//! freshly registered account is logged in.

use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use shared::client::{
    CustomerRegisterRequest, LoginRequest, MerchantRegisterRequest, PrincipalInfo,
};
use shared::models::{CustomerCreate, MerchantCreate, Principal, PrincipalKind};

use crate::auth::session::{self, PrincipalRef};
use crate::auth::{CurrentPrincipal, password};
use crate::core::ServerState;
use crate::db::repository::{CustomerRepository, MerchantRepository};
use crate::utils::AppError;

/// Fixed delay for failed authentication to blunt timing probes
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/merchant/register
pub async fn register_merchant(
    State(state): State<ServerState>,
    Json(req): Json<MerchantRegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let password_hash = password::hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let merchant = MerchantRepository::new(state.db.clone())
        .create(MerchantCreate {
            username: req.username,
            password_hash,
            company_name: req.company_name,
            address: req.address,
            description: req.description,
            phone: req.phone,
        })
        .await?;

    let token = state.sessions.create(PrincipalRef {
        kind: PrincipalKind::Merchant,
        id: merchant.id,
    });

    tracing::info!(merchant_id = merchant.id, username = %merchant.username, "Merchant registered");

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session::session_cookie(&token))],
        Json(merchant),
    ))
}

/// POST /api/auth/customer/register
pub async fn register_customer(
    State(state): State<ServerState>,
    Json(req): Json<CustomerRegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let password_hash = password::hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let customer = CustomerRepository::new(state.db.clone())
        .create(CustomerCreate {
            username: req.username,
            password_hash,
            company_name: req.company_name,
            address: req.address,
            phone: req.phone,
        })
        .await?;

    let token = state.sessions.create(PrincipalRef {
        kind: PrincipalKind::Customer,
        id: customer.id,
    });

    tracing::info!(customer_id = customer.id, username = %customer.username, "Customer registered");

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session::session_cookie(&token))],
        Json(customer),
    ))
}

/// POST /api/auth/merchant/login
pub async fn login_merchant(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let merchant = MerchantRepository::new(state.db.clone())
        .find_by_username(&req.username)
        .await?;

    // Fixed delay before reporting any outcome; lookup misses and password
    // mismatches must be indistinguishable.
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let merchant = merchant
        .filter(|m| password::verify_password(&req.password, &m.password_hash))
        .ok_or_else(|| {
            tracing::warn!(target: "auth", username = %req.username, kind = "merchant", "Login failed");
            AppError::invalid_credentials()
        })?;

    let token = state.sessions.create(PrincipalRef {
        kind: PrincipalKind::Merchant,
        id: merchant.id,
    });

    tracing::info!(merchant_id = merchant.id, username = %merchant.username, "Merchant logged in");

    let info = PrincipalInfo::from(&Principal::Merchant(merchant));
    Ok((
        [(header::SET_COOKIE, session::session_cookie(&token))],
        Json(info),
    ))
}

/// POST /api/auth/customer/login
pub async fn login_customer(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let customer = CustomerRepository::new(state.db.clone())
        .find_by_username(&req.username)
        .await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let customer = customer
        .filter(|c| password::verify_password(&req.password, &c.password_hash))
        .ok_or_else(|| {
            tracing::warn!(target: "auth", username = %req.username, kind = "customer", "Login failed");
            AppError::invalid_credentials()
        })?;

    let token = state.sessions.create(PrincipalRef {
        kind: PrincipalKind::Customer,
        id: customer.id,
    });

    tracing::info!(customer_id = customer.id, username = %customer.username, "Customer logged in");

    let info = PrincipalInfo::from(&Principal::Customer(customer));
    Ok((
        [(header::SET_COOKIE, session::session_cookie(&token))],
        Json(info),
    ))
}

/// POST /api/auth/logout
///
/// Destroys the session server-side. Idempotent: logging out without a
/// session is still a success.
pub async fn logout(State(state): State<ServerState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(session::token_from_cookie_header)
    {
        state.sessions.destroy(token);
    }

    (
        [(header::SET_COOKIE, session::clear_session_cookie())],
        StatusCode::OK,
    )
}

/// GET /api/auth/user
pub async fn user(CurrentPrincipal(principal): CurrentPrincipal) -> Json<PrincipalInfo> {
    Json(PrincipalInfo::from(&principal))
}
