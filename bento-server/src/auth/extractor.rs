//! Session Extractors
//!
//! Request guards for protected handlers. [`CurrentPrincipal`] resolves
//! the session cookie back to a full principal, re-reading the identity
//! store on every request so a session never serves stale account data.
//! [`CurrentMerchant`] and [`CurrentCustomer`] additionally enforce the
//! role: an authenticated principal of the wrong kind is rejected with
//! `Forbidden`, an unauthenticated request with `Unauthorized`.

use axum::{extract::FromRequestParts, http::request::Parts};

use shared::models::{Customer, Merchant, Principal, PrincipalKind};

use crate::auth::session::{self, PrincipalRef};
use crate::core::ServerState;
use crate::db::repository::{CustomerRepository, MerchantRepository};
use crate::utils::AppError;

/// The authenticated principal, any kind.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

/// The authenticated merchant.
#[derive(Debug, Clone)]
pub struct CurrentMerchant(pub Merchant);

/// The authenticated customer.
#[derive(Debug, Clone)]
pub struct CurrentCustomer(pub Customer);

impl FromRequestParts<ServerState> for CurrentPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(http::header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(session::token_from_cookie_header);

        let Some(token) = token else {
            return Err(AppError::Unauthorized);
        };

        let Some(PrincipalRef { kind, id }) = state.sessions.resolve(token) else {
            tracing::warn!(target: "auth", uri = %parts.uri, "Rejected request with invalid session");
            return Err(AppError::Unauthorized);
        };

        // Re-resolve the full principal; a dangling reference means the
        // session is no longer good.
        let principal = match kind {
            PrincipalKind::Merchant => MerchantRepository::new(state.db.clone())
                .find_by_id(id)
                .await?
                .map(Principal::Merchant),
            PrincipalKind::Customer => CustomerRepository::new(state.db.clone())
                .find_by_id(id)
                .await?
                .map(Principal::Customer),
        };

        match principal {
            Some(p) => Ok(CurrentPrincipal(p)),
            None => {
                tracing::warn!(target: "auth", kind = %kind, id, "Session references a missing principal");
                state.sessions.destroy(token);
                Err(AppError::Unauthorized)
            }
        }
    }
}

impl FromRequestParts<ServerState> for CurrentMerchant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentPrincipal(principal) = CurrentPrincipal::from_request_parts(parts, state).await?;
        match principal {
            Principal::Merchant(m) => Ok(CurrentMerchant(m)),
            Principal::Customer(_) => {
                Err(AppError::Forbidden("Merchant account required".to_string()))
            }
        }
    }
}

impl FromRequestParts<ServerState> for CurrentCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentPrincipal(principal) = CurrentPrincipal::from_request_parts(parts, state).await?;
        match principal {
            Principal::Customer(c) => Ok(CurrentCustomer(c)),
            Principal::Merchant(_) => {
                Err(AppError::Forbidden("Customer account required".to_string()))
            }
        }
    }
}
