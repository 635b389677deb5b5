//! Integration tests for the anonymous engagement endpoints: likes, views,
//! claims and unclaims.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, request, TestApp};
use futures::future::join_all;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Owner token, public wishlist JSON and one item JSON.
async fn shared_list(app: &TestApp) -> (String, Value, Value) {
    let (_, token) = app.login("amaka@example.com", "Amaka Eze").await;
    let wishlist = app.create_wishlist(&token, "Wedding Registry", true).await;
    let item = app
        .add_item(&token, wishlist["id"].as_i64().unwrap(), "Dinner set")
        .await;
    (token, wishlist, item)
}

fn like_from(slug: &str, address: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(format!("/api/wishlists/{slug}/like"))
        .header("x-forwarded-for", address)
        .body(Body::empty())
        .unwrap()
}

fn claim_uri(slug: &str, item_id: i64, action: &str) -> String {
    format!("/api/wishlists/{slug}/items/{item_id}/{action}")
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn like_is_counted_once_per_visitor() {
    let app = build_test_app();
    let (_, wishlist, _) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();

    let first = app.send(like_from(slug, "203.0.113.10")).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    assert_eq!(first["like_count"], 1);
    assert_eq!(first["already_liked"], false);

    let repeat = body_json(app.send(like_from(slug, "203.0.113.10")).await).await;
    assert_eq!(repeat["like_count"], 1);
    assert_eq!(repeat["already_liked"], true);

    let other = body_json(app.send(like_from(slug, "203.0.113.11")).await).await;
    assert_eq!(other["like_count"], 2);
}

#[tokio::test]
async fn concurrent_likes_respect_fingerprints() {
    let app = build_test_app();
    let (_, wishlist, _) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();

    join_all((0..15).map(|_| app.send(like_from(slug, "198.51.100.1")))).await;
    join_all((0..15).map(|n| app.send(like_from(slug, &format!("192.0.2.{n}"))))).await;

    let response = app.send(like_from(slug, "198.51.100.1")).await;
    let json = body_json(response).await;
    assert_eq!(json["like_count"], 16);
    assert_eq!(json["already_liked"], true);
}

#[tokio::test]
async fn like_unknown_wishlist_is_404() {
    let app = build_test_app();
    let response = app.send(like_from("no-such-list", "10.0.0.1")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Wishlist not found");
}

// ---------------------------------------------------------------------------
// Views and projections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn public_read_counts_views_and_hides_names() {
    let app = build_test_app();
    let (_, wishlist, item) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();
    let item_id = item["id"].as_i64().unwrap();

    for name in ["Chioma", "Tunde"] {
        let response = app
            .post(&claim_uri(slug, item_id, "claim"), None, json!({ "name": name }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let mut last = Value::Null;
    for _ in 0..5 {
        let response = app.get(&format!("/api/wishlists/{slug}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        last = body_json(response).await;
    }

    assert_eq!(last["view_count"], 5);
    assert_eq!(last["owner_name"], "Amaka Eze");
    let public_item = &last["items"][0];
    assert_eq!(public_item["reservations_count"], 2);
    assert_eq!(public_item["is_claimed"], true);
    assert_eq!(public_item["reserver_initials"], json!(["C", "T"]));
    assert!(public_item.get("reservations").is_none());
    assert!(!last.to_string().contains("Chioma"));
}

#[tokio::test]
async fn owner_read_shows_names_without_counting_a_view() {
    let app = build_test_app();
    let (token, wishlist, item) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();
    let item_id = item["id"].as_i64().unwrap();

    app.post(&claim_uri(slug, item_id, "claim"), None, json!({ "name": "Chioma" }))
        .await;

    let response = app.get(&format!("/api/wishlists/{slug}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["view_count"], 0);
    let owner_item = &json["items"][0];
    assert_eq!(owner_item["claimed_by"], "Chioma");
    assert_eq!(owner_item["reservations"][0]["name"], "Chioma");
    assert!(owner_item["reservations"][0]["reserved_at"].is_string());
}

#[tokio::test]
async fn private_wishlist_is_hidden_from_visitors() {
    let app = build_test_app();
    let (_, token) = app.login("ife@example.com", "Ife").await;
    let wishlist = app.create_wishlist(&token, "Secret Santa", false).await;
    let slug = wishlist["slug"].as_str().unwrap();
    let item = app
        .add_item(&token, wishlist["id"].as_i64().unwrap(), "Scarf")
        .await;

    let anonymous = app.get(&format!("/api/wishlists/{slug}"), None).await;
    assert_eq!(anonymous.status(), StatusCode::NOT_FOUND);

    let (_, stranger) = app.login("stranger@example.com", "Stranger").await;
    let other_user = app
        .get(&format!("/api/wishlists/{slug}"), Some(&stranger))
        .await;
    assert_eq!(other_user.status(), StatusCode::NOT_FOUND);

    let claim = app
        .post(
            &claim_uri(slug, item["id"].as_i64().unwrap(), "claim"),
            None,
            json!({ "name": "Tunde" }),
        )
        .await;
    assert_eq!(claim.status(), StatusCode::NOT_FOUND);

    let owner = app.get(&format!("/api/wishlists/{slug}"), Some(&token)).await;
    assert_eq!(owner.status(), StatusCode::OK);
}

#[tokio::test]
async fn stale_token_reads_public_list_as_visitor() {
    let app = build_test_app();
    let (_, wishlist, item) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();
    let item_id = item["id"].as_i64().unwrap();
    app.post(&claim_uri(slug, item_id, "claim"), None, json!({ "name": "Chioma" }))
        .await;

    let response = app
        .get(&format!("/api/wishlists/{slug}"), Some("expired.or.garbage"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["view_count"], 1);
    assert_eq!(json["items"][0]["reserver_initials"], json!(["C"]));
    assert!(json["items"][0].get("reservations").is_none());

    let protected = app
        .post(
            "/api/wishlists",
            Some("expired.or.garbage"),
            json!({ "title": "Nope" }),
        )
        .await;
    assert_eq!(protected.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

#[tokio::test]
async fn claim_twice_then_unclaim_once() {
    let app = build_test_app();
    let (_, wishlist, item) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();
    let item_id = item["id"].as_i64().unwrap();

    let first = app
        .post(&claim_uri(slug, item_id, "claim"), None, json!({ "name": "Chioma" }))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = body_json(
        app.post(&claim_uri(slug, item_id, "claim"), None, json!({ "name": "Chioma" }))
            .await,
    )
    .await;
    assert_eq!(second["item_id"], item_id);
    assert_eq!(second["reservations_count"], 2);
    assert_eq!(second["is_claimed"], true);
    assert_eq!(second["reserver_initials"], json!(["C", "C"]));

    let unclaim = app
        .post(&claim_uri(slug, item_id, "unclaim"), None, json!({ "name": "Chioma" }))
        .await;
    assert_eq!(unclaim.status(), StatusCode::OK);
    let unclaim = body_json(unclaim).await;
    assert_eq!(unclaim["status"], "unclaimed");
    assert_eq!(unclaim["remaining"], 1);
    assert_eq!(unclaim["is_claimed"], true);
}

#[tokio::test]
async fn unclaim_with_wrong_name_is_404_and_keeps_reservation() {
    let app = build_test_app();
    let (_, wishlist, item) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();
    let item_id = item["id"].as_i64().unwrap();

    app.post(&claim_uri(slug, item_id, "claim"), None, json!({ "name": "Chioma" }))
        .await;

    let response = app
        .post(
            &claim_uri(slug, item_id, "unclaim"),
            None,
            json!({ "name": "Wrong Name" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MISMATCH");
    assert!(json["detail"].is_string());

    let detail = body_json(app.get(&format!("/api/wishlists/{slug}"), None).await).await;
    assert_eq!(detail["items"][0]["reservations_count"], 1);
}

#[tokio::test]
async fn blank_or_missing_name_is_rejected() {
    let app = build_test_app();
    let (_, wishlist, item) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();
    let item_id = item["id"].as_i64().unwrap();

    let blank = app
        .post(&claim_uri(slug, item_id, "claim"), None, json!({ "name": "   " }))
        .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(blank).await["code"], "VALIDATION_ERROR");

    let missing = app
        .post(&claim_uri(slug, item_id, "unclaim"), None, json!({}))
        .await;
    assert!(missing.status().is_client_error());
    assert!(body_json(missing).await["detail"].is_string());
}

#[tokio::test]
async fn claim_unknown_item_is_404() {
    let app = build_test_app();
    let (_, wishlist, _) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();

    let response = app
        .post(&claim_uri(slug, 424242, "claim"), None, json!({ "name": "Tunde" }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Item not found");
}

#[tokio::test]
async fn non_numeric_item_id_is_bad_request() {
    let app = build_test_app();
    let (_, wishlist, _) = shared_list(&app).await;
    let slug = wishlist["slug"].as_str().unwrap();

    let response = app
        .send(request(
            Method::POST,
            &format!("/api/wishlists/{slug}/items/abc/claim"),
            None,
            Some(json!({ "name": "Tunde" })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
