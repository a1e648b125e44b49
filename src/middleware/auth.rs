use axum::{
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::ApiError,
    models::{CurrentUser, User},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    // user id as hex string
    pub sub: String,
    // expiry (unix timestamp seconds)
    pub exp: usize,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Gate for protected routes: verifies the bearer token, resolves it to a
/// user and stores a `CurrentUser` in request extensions. Handlers behind
/// this layer never run without an authenticated user.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return ApiError::Unauthorized.into_response();
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.settings.jwt_secret.as_bytes()),
        &validation,
    );

    let Ok(data) = decoded else {
        return ApiError::Unauthorized.into_response();
    };

    let Ok(user_id) = ObjectId::parse_str(&data.claims.sub) else {
        return ApiError::Unauthorized.into_response();
    };

    let users = state.db.collection::<User>("users");

    match users.find_one(doc! { "_id": user_id }, None).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(CurrentUser::from(user));
            next.run(req).await
        }
        Ok(None) => ApiError::Unauthorized.into_response(),
        Err(e) => ApiError::Database(e).into_response(),
    }
}
