use std::net::SocketAddr;

use mongodb::Client;

use fundtracker::{AppState, config, routes, services};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    // the unique indexes are the authority for the uniqueness rules, so
    // refuse to start without them
    services::db_init::ensure_indexes(&db)
        .await
        .expect("Failed to create MongoDB indexes");

    let state = AppState {
        db,
        settings: settings.clone(),
        mfapi: services::mfapi::MfapiClient::new(settings.mfapi_base_url.clone()),
    };

    let app = routes::app(state);

    let addr = SocketAddr::from((
        settings.host.parse::<std::net::IpAddr>().unwrap(),
        settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
