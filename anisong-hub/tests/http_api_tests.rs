//! HTTP Server & Routing Integration Tests

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use anisong_hub::api::USER_ID_HEADER;
use anisong_hub::models::TrackMatch;
use anisong_hub::{build_router, AppState};
use helpers::{aggregator, count_rows, guren_no_yumiya, test_pool, Answer, FakeCatalog, FakeTrack, FakeVideo};

async fn test_app() -> (Router, sqlx::SqlitePool) {
    let pool = test_pool().await;
    let catalog = Arc::new(
        FakeCatalog::new().answer("theme_type:OP", Answer::Records(vec![guren_no_yumiya()])),
    );
    let aggregator = aggregator(
        catalog,
        FakeVideo(Ok(Some("https://www.youtube.com/watch?v=8OkpRK2_gVs".to_string()))),
        FakeTrack(Ok(Some(TrackMatch::new("https://open.spotify.com/track/1")))),
        pool.clone(),
    );
    let state = AppState::new(pool.clone(), Arc::new(aggregator), 5);
    (build_router(state), pool)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str, user_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header(USER_ID_HEADER, user_id);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, user_id: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(USER_ID_HEADER, user_id)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_app().await;

    let response = app.oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "anisong-hub");
}

#[tokio::test]
async fn test_search_returns_resolved_songs() {
    let (app, pool) = test_app().await;

    let response = app
        .oneshot(get("/anisong/search?q=OP&limit=5", Some("7")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    let song = &json["results"][0];
    assert_eq!(song["song_title"], "Guren no Yumiya");
    assert_eq!(song["anime"], "Attack on Titan");
    assert_eq!(song["theme_type"], "OP");
    assert_eq!(song["youtube_url"], "https://www.youtube.com/watch?v=8OkpRK2_gVs");
    assert_eq!(song["spotify_url"], "https://open.spotify.com/track/1");

    assert_eq!(count_rows(&pool, "user_history").await, 1);
}

#[tokio::test]
async fn test_search_provider_parameter() {
    let (app, _) = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/anisong/search?q=OP&provider=youtube", Some("7")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let song = &json["results"][0];
    assert_eq!(song["youtube_url"], "https://www.youtube.com/watch?v=8OkpRK2_gVs");
    assert!(song.as_object().unwrap().contains_key("spotify_url"));
    assert!(song["spotify_url"].is_null());

    let response = app
        .oneshot(get("/anisong/search?q=OP&provider=vimeo", Some("7")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_without_identity_is_unauthorized() {
    let (app, pool) = test_app().await;

    let response = app.oneshot(get("/anisong/search?q=OP", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
    assert_eq!(count_rows(&pool, "songs").await, 0);
}

#[tokio::test]
async fn test_search_with_invalid_identity_is_unauthorized() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(get("/anisong/search?q=OP", Some("not-a-number")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_search_with_blank_query_is_bad_request() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(get("/anisong/search?q=%20,%20", Some("7")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_themes_endpoint_validates_type() {
    let (app, _) = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/anisong/themes?theme_type=OP", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"], 1);

    let response = app
        .oneshot(get("/anisong/themes?theme_type=XX", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preferences_round_trip() {
    let (app, _) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/preferences/reinforce",
            "7",
            json!({ "tags": ["EGOIST", "EGOIST", "Guilty Crown"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(post_json("/preferences", "7", json!({ "tag": "Aimer", "weight": 0.5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/preferences", Some("7"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[0]["tag"], "EGOIST");
    assert_eq!(json[0]["weight"], 2.0);
    assert_eq!(json[1]["tag"], "Guilty Crown");
    assert_eq!(json[2]["tag"], "Aimer");
}

#[tokio::test]
async fn test_set_preference_with_blank_tag_is_bad_request() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(post_json("/preferences", "7", json!({ "tag": " ", "weight": 1.0 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_lists_only_callers_entries() {
    let (app, _) = test_app().await;

    app.clone()
        .oneshot(get("/anisong/search?q=OP", Some("7")))
        .await
        .unwrap();
    app.clone()
        .oneshot(get("/anisong/search?q=OP", Some("8")))
        .await
        .unwrap();

    let response = app.oneshot(get("/history", Some("7"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["user_id"], 7);
}

#[tokio::test]
async fn test_song_lookup_follows_history_entry() {
    let (app, _) = test_app().await;

    app.clone()
        .oneshot(get("/anisong/search?q=OP", Some("7")))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/history", Some("7"))).await.unwrap();
    let song_id = body_json(response).await[0]["song_id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/songs/{}", song_id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Guren no Yumiya");
    assert_eq!(json["artist"], "LINKED HORIZON");

    let response = app.oneshot(get("/songs/9999", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}
