//! Account endpoint handlers.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::account::{LoginRequest, RegisterRequest, Registration, UpdateAccountRequest};
use crate::api::envelope::ResultEnvelope;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::CurrentUser;
use crate::user::UserInfo;

/// Login response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Identity carried by the caller's token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAccount {
    pub email: String,
    pub roles: Vec<String>,
}

/// `POST /v1/accounts`
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<ResultEnvelope<Registration>> {
    let Json(request) = payload?;
    let registration = state.accounts.register(request).await?;
    Ok(ResultEnvelope::success(registration))
}

/// `POST /v1/accounts/login`
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<ResultEnvelope<TokenResponse>> {
    let Json(request) = payload?;
    let token = state.accounts.login(request).await?;
    Ok(ResultEnvelope::success(TokenResponse { token }))
}

/// `GET /v1/accounts/me`
pub async fn current_account(user: CurrentUser) -> ResultEnvelope<CurrentAccount> {
    ResultEnvelope::success(CurrentAccount {
        email: user.email().to_string(),
        roles: user.roles().to_vec(),
    })
}

/// `PUT /v1/accounts/{id}`
#[instrument(skip(state, user, payload), fields(actor = %user.email()))]
pub async fn update_account(
    user: CurrentUser,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> ApiResult<ResultEnvelope<UserInfo>> {
    let Path(id) = id.map_err(|_| ApiError::not_found("Account not found"))?;
    let Json(request) = payload?;
    let info = state
        .accounts
        .update_account(&user.claims, id, request)
        .await?;
    Ok(ResultEnvelope::success(info))
}
