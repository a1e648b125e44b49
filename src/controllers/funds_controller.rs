use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError, models::CurrentUser, services::funds_service};

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Deserialize)]
pub struct SavePayload {
    #[serde(rename = "fundId", default)]
    pub fund_id: String,
    #[serde(default)]
    pub name: String,
}

fn is_scheme_code(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

// mfapi answers unknown scheme codes with 200 and an empty meta object
fn has_meta(fund: &serde_json::Value) -> bool {
    match fund.get("meta") {
        Some(serde_json::Value::Object(m)) => !m.is_empty(),
        Some(serde_json::Value::Null) | None => false,
        Some(_) => true,
    }
}

pub async fn get_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let q = query.query.unwrap_or_default().trim().to_string();

    if q.is_empty() {
        return Err(ApiError::BadRequest("Search query is required".into()));
    }

    let results = match state.mfapi.search(&q).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("fund search failed: {e}");
            return Err(ApiError::Upstream(
                "Error fetching funds. Please try again later.".into(),
            ));
        }
    };

    Ok(Json(results))
}

pub async fn get_fund(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_scheme_code(&id) {
        return Err(ApiError::BadRequest("Valid fund ID is required".into()));
    }

    let fund = match state.mfapi.fund(&id).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("fund detail fetch failed: {e}");
            return Err(ApiError::Upstream(
                "Error fetching fund details. Please try again later.".into(),
            ));
        }
    };

    if !has_meta(&fund) {
        return Err(ApiError::NotFound("Fund not found".into()));
    }

    Ok(Json(fund))
}

pub async fn post_save(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SavePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let list = funds_service::save_fund(
        &state,
        user.id,
        payload.fund_id.trim(),
        payload.name.trim(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn get_saved_all(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let list = funds_service::list_saved(&state, user.id).await?;
    Ok(Json(list))
}

pub async fn delete_saved(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let list = funds_service::remove_fund(&state, user.id, &id).await?;
    Ok(Json(list))
}

pub async fn get_saved_check(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let saved = funds_service::is_saved(&state, user.id, &id).await?;
    Ok(Json(json!({ "isSaved": saved })))
}
