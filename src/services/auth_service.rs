use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use mongodb::bson::{doc, oid::ObjectId};
use regex::Regex;

use crate::{
    AppState,
    auth::Claims,
    error::{ApiError, is_duplicate_key},
    models::User,
};

fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    re.is_match(email)
}

pub fn make_jwt(state: &AppState, user_id: &ObjectId) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::days(state.settings.jwt_days)).timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_hex(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.to_string()))
}

pub async fn register_user(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    if name.trim().is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(
            "Name, email and password are required".into(),
        ));
    }
    if !is_valid_email(email) {
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if password.len() < 6 {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters".into(),
        ));
    }

    let users = state.db.collection::<User>("users");

    // unique email; the index still rejects a concurrent duplicate
    if users.find_one(doc! { "email": email }, None).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let password_hash = hash(password, DEFAULT_COST).map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = User {
        id: ObjectId::new(),
        name: name.trim().to_string(),
        email: email.to_string(),
        password_hash,
    };

    match users.insert_one(&user, None).await {
        Ok(_) => Ok(user),
        Err(e) if is_duplicate_key(&e) => Err(ApiError::Conflict("User already exists".into())),
        Err(e) => Err(e.into()),
    }
}

pub async fn login_user(state: &AppState, email: &str, password: &str) -> Result<User, ApiError> {
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    }

    let users = state.db.collection::<User>("users");

    let Some(user) = users.find_one(doc! { "email": email }, None).await? else {
        // same message for unknown email and wrong password
        return Err(ApiError::BadRequest("Invalid credentials".into()));
    };

    if !verify(password, &user.password_hash).unwrap_or(false) {
        return Err(ApiError::BadRequest("Invalid credentials".into()));
    }

    Ok(user)
}
