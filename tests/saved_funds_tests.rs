//! Saved-fund CRUD and end-to-end flows against a running mongod.
//!
//! Run with: cargo test -- --ignored

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::{get, post},
};
use http_body_util::BodyExt;
use mongodb::{Client, bson::doc, bson::oid::ObjectId};
use tower::ServiceExt;

use fundtracker::{
    AppState, config,
    controllers::funds_controller,
    models::{CurrentUser, SavedFund},
    routes, services,
};

async fn test_state() -> AppState {
    let settings = config::load();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    services::db_init::ensure_indexes(&db)
        .await
        .expect("indexes");

    let mfapi = services::mfapi::MfapiClient::new(settings.mfapi_base_url.clone());

    AppState {
        db,
        settings,
        mfapi,
    }
}

async fn response_body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(verb: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(verb)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn test_user() -> CurrentUser {
    CurrentUser {
        id: ObjectId::new(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires a running mongod"]
async fn save_duplicate_remove_resave_cycle() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/funds/save", post(funds_controller::post_save))
        .route(
            "/api/funds/saved/:id",
            axum::routing::delete(funds_controller::delete_saved),
        )
        .route(
            "/api/funds/saved/check/:id",
            get(funds_controller::get_saved_check),
        )
        .with_state(state);

    let user = test_user();
    let save_body = serde_json::json!({ "fundId": "100033", "name": "Test Fund" });

    // not saved yet
    let mut req = get_request("/api/funds/saved/check/100033", None);
    req.extensions_mut().insert(user.clone());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response_body_json(res).await["isSaved"], false);

    // first save succeeds
    let mut req = json_request("POST", "/api/funds/save", None, save_body.clone());
    req.extensions_mut().insert(user.clone());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let list = response_body_json(res).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Test Fund");

    // now reported as saved
    let mut req = get_request("/api/funds/saved/check/100033", None);
    req.extensions_mut().insert(user.clone());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response_body_json(res).await["isSaved"], true);

    // identical save is rejected
    let mut req = json_request("POST", "/api/funds/save", None, save_body.clone());
    req.extensions_mut().insert(user.clone());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_body_json(res).await["message"], "Fund already saved");

    // remove
    let mut req = json_request("DELETE", "/api/funds/saved/100033", None, serde_json::json!({}));
    req.extensions_mut().insert(user.clone());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(response_body_json(res).await.as_array().unwrap().is_empty());

    // no longer saved, and removing again is not found
    let mut req = get_request("/api/funds/saved/check/100033", None);
    req.extensions_mut().insert(user.clone());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response_body_json(res).await["isSaved"], false);

    let mut req = json_request("DELETE", "/api/funds/saved/100033", None, serde_json::json!({}));
    req.extensions_mut().insert(user.clone());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // no permanent duplicate barrier: the same pair saves again
    let mut req = json_request("POST", "/api/funds/save", None, save_body);
    req.extensions_mut().insert(user.clone());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "requires a running mongod"]
async fn save_with_missing_fields_is_bad_request() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/funds/save", post(funds_controller::post_save))
        .with_state(state);

    let user = test_user();

    for body in [
        serde_json::json!({}),
        serde_json::json!({ "fundId": "100033" }),
        serde_json::json!({ "name": "Test Fund" }),
        serde_json::json!({ "fundId": "   ", "name": "Test Fund" }),
    ] {
        let mut req = json_request("POST", "/api/funds/save", None, body);
        req.extensions_mut().insert(user.clone());
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
#[ignore = "requires a running mongod"]
async fn saved_list_is_newest_first() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/funds/save", post(funds_controller::post_save))
        .route("/api/funds/saved/all", get(funds_controller::get_saved_all))
        .with_state(state);

    let user = test_user();

    for (fund_id, name) in [
        ("100001", "Fund One"),
        ("100002", "Fund Two"),
        ("100003", "Fund Three"),
    ] {
        let mut req = json_request(
            "POST",
            "/api/funds/save",
            None,
            serde_json::json!({ "fundId": fund_id, "name": name }),
        );
        req.extensions_mut().insert(user.clone());
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let mut req = get_request("/api/funds/saved/all", None);
    req.extensions_mut().insert(user.clone());
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let list = response_body_json(res).await;
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["fund_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["100003", "100002", "100001"]);
}

#[tokio::test]
#[ignore = "requires a running mongod"]
async fn concurrent_duplicate_saves_keep_one_record() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/funds/save", post(funds_controller::post_save))
        .with_state(state.clone());

    let user = test_user();

    let make_request = || {
        let mut req = json_request(
            "POST",
            "/api/funds/save",
            None,
            serde_json::json!({ "fundId": "100033", "name": "Test Fund" }),
        );
        req.extensions_mut().insert(user.clone());
        req
    };

    let (r1, r2) = tokio::join!(
        app.clone().oneshot(make_request()),
        app.clone().oneshot(make_request())
    );
    let (r1, r2) = (r1.unwrap(), r2.unwrap());

    let statuses = [r1.status(), r2.status()];
    assert!(statuses.contains(&StatusCode::CREATED), "{statuses:?}");
    assert!(statuses.contains(&StatusCode::BAD_REQUEST), "{statuses:?}");

    let saved = state.db.collection::<SavedFund>("saved_funds");
    let count = saved
        .count_documents(doc! { "user_id": user.id, "fund_id": "100033" }, None)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires a running mongod"]
async fn register_login_save_list_remove_flow() {
    let state = test_state().await;
    let app = routes::app(state);

    let email = format!("user-{}@example.com", ObjectId::new().to_hex());

    // register
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            serde_json::json!({ "name": "Test User", "email": email, "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // registering the same email again is rejected
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            serde_json::json!({ "name": "Test User", "email": email, "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_body_json(res).await["message"], "User already exists");

    // wrong password is rejected
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": email, "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // login
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": email, "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = response_body_json(res).await;
    let token = body["token"].as_str().unwrap().to_string();

    // profile
    let res = app
        .clone()
        .oneshot(get_request("/api/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(response_body_json(res).await["email"], email.as_str());

    // save a fund
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/funds/save",
            Some(&token),
            serde_json::json!({ "fundId": "100033", "name": "Test Fund" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // the list has exactly that one entry
    let res = app
        .clone()
        .oneshot(get_request("/api/funds/saved/all", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list = response_body_json(res).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Test Fund");

    // remove it again
    let res = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/funds/saved/100033",
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(get_request("/api/funds/saved/all", Some(&token)))
        .await
        .unwrap();
    assert!(response_body_json(res).await.as_array().unwrap().is_empty());
}
