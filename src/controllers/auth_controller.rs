use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError, models::CurrentUser, services::auth_service};

#[derive(Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn post_register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();

    let user =
        auth_service::register_user(&state, &payload.name, &email, &payload.password).await?;
    let token = auth_service::make_jwt(&state, &user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": token,
            "user": { "id": user.id.to_hex(), "name": user.name, "email": user.email },
        })),
    ))
}

pub async fn post_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();

    let user = auth_service::login_user(&state, &email, &payload.password).await?;
    let token = auth_service::make_jwt(&state, &user.id)?;

    Ok(Json(json!({
        "token": token,
        "user": { "id": user.id.to_hex(), "name": user.name, "email": user.email },
    })))
}

pub async fn get_me(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    Json(json!({
        "id": user.id.to_hex(),
        "name": user.name,
        "email": user.email,
    }))
}
