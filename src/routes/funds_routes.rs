use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};

use crate::{AppState, auth, controllers::funds_controller};

pub fn add_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    // search and fund detail are public; the saved-fund routes are gated
    let public = Router::new()
        .route("/api/funds/search", get(funds_controller::get_search))
        .route("/api/funds/:id", get(funds_controller::get_fund));

    let protected = Router::new()
        .route("/api/funds/save", post(funds_controller::post_save))
        .route("/api/funds/saved/all", get(funds_controller::get_saved_all))
        .route("/api/funds/saved/:id", delete(funds_controller::delete_saved))
        .route(
            "/api/funds/saved/check/:id",
            get(funds_controller::get_saved_check),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth));

    router.merge(public).merge(protected)
}
