use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::{AppState, auth, controllers::auth_controller};

pub fn add_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/auth/register", post(auth_controller::post_register))
        .route("/api/auth/login", post(auth_controller::post_login));

    let protected = Router::new()
        .route("/api/auth/me", get(auth_controller::get_me))
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth));

    router.merge(public).merge(protected)
}
