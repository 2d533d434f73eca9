//! Account endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::account::{validate_username, Account, USERNAME_HELP_TEXT};
use crate::domain::utils::normalize_username;
use crate::infrastructure::account::{ChangePasswordRequest, RegisterRequest};

/// Signup request body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterApiRequest {
    pub username: String,
    pub password: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordApiRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyAgeApiRequest {
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAccountsQuery {
    pub active: Option<bool>,
}

/// Account as returned by the API; never includes the password hash
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub url: String,
    pub status: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub is_of_age: bool,
    pub date_joined: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            username: account.username().to_string(),
            url: account.absolute_url(),
            status: account.status().to_string(),
            is_staff: account.is_staff(),
            is_superuser: account.is_superuser(),
            is_active: account.is_active(),
            is_of_age: account.is_of_age(),
            date_joined: account.date_joined().to_rfc3339(),
            last_login: account.last_login().map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListAccountsResponse {
    pub accounts: Vec<AccountResponse>,
    pub total: usize,
}

/// Routes under `/accounts`
pub fn create_accounts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(register))
        .route("/{slug}", get(get_account).delete(delete_account))
        .route("/{slug}/", get(get_account).delete(delete_account))
        .route("/{slug}/password", put(change_password))
        .route("/{slug}/age-verification", post(verify_age))
}

/// GET /accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<Json<ListAccountsResponse>, ApiError> {
    debug!(active = ?query.active, "Listing accounts");

    let accounts = state.account_service.list(query.active).await?;

    let accounts: Vec<AccountResponse> = accounts.iter().map(AccountResponse::from).collect();
    let total = accounts.len();

    Ok(Json(ListAccountsResponse { accounts, total }))
}

/// POST /accounts
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterApiRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    debug!(username = %request.username, "Registering account");

    validate_username(&normalize_username(&request.username)).map_err(|e| {
        ApiError::bad_request(format!("{} ({})", e, USERNAME_HELP_TEXT))
            .with_param("username")
            .with_code(e.code())
    })?;

    let account = state
        .account_service
        .register(RegisterRequest {
            username: request.username,
            password: request.password,
            date_of_birth: request.date_of_birth,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// GET /accounts/{slug}
pub async fn get_account(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .account_service
        .get(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Account '{}' not found", slug)))?;

    Ok(Json(AccountResponse::from(&account)))
}

/// DELETE /accounts/{slug}
pub async fn delete_account(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(slug = %slug, "Deleting account");

    if state.account_service.delete(&slug).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Account '{}' not found", slug)))
    }
}

/// PUT /accounts/{slug}/password
pub async fn change_password(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<ChangePasswordApiRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .account_service
        .change_password(
            &slug,
            ChangePasswordRequest {
                current_password: request.current_password,
                new_password: request.new_password,
            },
        )
        .await?;

    Ok(Json(AccountResponse::from(&account)))
}

/// POST /accounts/{slug}/age-verification
pub async fn verify_age(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<VerifyAgeApiRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .account_service
        .verify_age(&slug, request.date_of_birth)
        .await
        .map_err(|e| ApiError::from(e).with_param("date_of_birth"))?;

    Ok(Json(AccountResponse::from(&account)))
}
