use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

use crate::{AppState, controllers::home_controller};

pub mod auth_routes;
pub mod funds_routes;
pub mod home_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = auth_routes::add_routes(router, &state);
    let router = funds_routes::add_routes(router, &state);

    let cors = CorsLayer::new()
        .allow_origin(
            state
                .settings
                .cors_origin
                .parse::<HeaderValue>()
                .expect("CORS_ORIGIN must be a valid origin"),
        )
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    router
        .fallback(home_controller::not_found)
        .layer(cors)
        .with_state(state)
}
