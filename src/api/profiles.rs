//! Profile endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::profile::{AccountProfile, ProfileDetails};

/// Request to create the profile of an existing account
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileApiRequest {
    pub account: String,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub account: String,
    pub url: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub short_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

impl From<&AccountProfile> for ProfileResponse {
    fn from(profile: &AccountProfile) -> Self {
        Self {
            account: profile.account().to_string(),
            url: profile.absolute_url(),
            first_name: profile.first_name().to_string(),
            last_name: profile.last_name().to_string(),
            full_name: profile.full_name(),
            short_name: profile.short_name(),
            email: profile.email().to_string(),
            phone: profile.phone().map(String::from),
            is_public: profile.is_public(),
            description: profile.description().map(String::from),
            profile_pic: profile.profile_pic().map(String::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListProfilesResponse {
    pub profiles: Vec<ProfileResponse>,
    pub total: usize,
}

/// Routes under `/profiles`
pub fn create_profiles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route("/{slug}", get(get_profile).put(update_profile))
        .route("/{slug}/", get(get_profile).put(update_profile))
}

/// GET /profiles
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<ListProfilesResponse>, ApiError> {
    let profiles = state.profile_service.list_public().await?;

    let profiles: Vec<ProfileResponse> = profiles.iter().map(ProfileResponse::from).collect();
    let total = profiles.len();

    Ok(Json(ListProfilesResponse { profiles, total }))
}

/// POST /profiles
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileApiRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    debug!(account = %request.account, "Creating profile");

    let profile = state
        .profile_service
        .create(&request.account, request.details)
        .await?;

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(&profile))))
}

/// GET /profiles/{slug}
///
/// Private profiles answer 404.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state
        .profile_service
        .get_public(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Profile '{}' not found", slug)))?;

    Ok(Json(ProfileResponse::from(&profile)))
}

/// PUT /profiles/{slug}
pub async fn update_profile(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(details): Json<ProfileDetails>,
) -> Result<Json<ProfileResponse>, ApiError> {
    debug!(slug = %slug, "Updating profile");

    let profile = state.profile_service.update(&slug, details).await?;

    Ok(Json(ProfileResponse::from(&profile)))
}
