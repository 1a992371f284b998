mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use tower::ServiceExt;

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_user_without_subscription_is_free() {
    let (app, pool) = common::build_test_app().await;
    let user = common::seed_user(&pool, "free@example.com", false).await;
    common::seed_session(&pool, user.id, "tok-free").await;

    let resp = app.oneshot(get("/api/subscription", "tok-free")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["tier"], "free");
    assert_eq!(json["data"]["has_premium"], false);
    assert!(json["data"]["subscription"].is_null());
}

#[tokio::test]
async fn test_admin_grant_resolves_to_premium() {
    let (app, pool) = common::build_test_app().await;
    let admin = common::seed_user(&pool, "admin@example.com", true).await;
    let user = common::seed_user(&pool, "member@example.com", false).await;
    common::seed_session(&pool, admin.id, "tok-admin").await;
    common::seed_session(&pool, user.id, "tok-member").await;

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/admin/subscriptions/grant",
            "tok-admin",
            serde_json::json!({ "user_id": user.id, "plan_code": "premium_monthly" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["plan_code"], "premium_monthly");
    assert_eq!(json["data"]["status"], "active");
    assert!(!json["data"]["ends_at"].is_null());

    let resp = app.oneshot(get("/api/subscription", "tok-member")).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"]["tier"], "premium");
    assert_eq!(json["data"]["has_premium"], true);
}

#[tokio::test]
async fn test_grant_rejects_non_admin() {
    let (app, pool) = common::build_test_app().await;
    let user = common::seed_user(&pool, "plain@example.com", false).await;
    common::seed_session(&pool, user.id, "tok-plain").await;

    let resp = app
        .oneshot(post_json(
            "/api/admin/subscriptions/grant",
            "tok-plain",
            serde_json::json!({ "user_id": user.id, "plan_code": "lifetime" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_grant_rejects_unknown_plan() {
    let (app, pool) = common::build_test_app().await;
    let admin = common::seed_user(&pool, "admin2@example.com", true).await;
    common::seed_session(&pool, admin.id, "tok-admin2").await;

    let resp = app
        .oneshot(post_json(
            "/api/admin/subscriptions/grant",
            "tok-admin2",
            serde_json::json!({ "user_id": admin.id, "plan_code": "platinum" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_regrant_keeps_a_single_row() {
    let (app, pool) = common::build_test_app().await;
    let admin = common::seed_user(&pool, "admin3@example.com", true).await;
    let user = common::seed_user(&pool, "upgrader@example.com", false).await;
    common::seed_session(&pool, admin.id, "tok-admin3").await;

    for plan in ["trial", "lifetime"] {
        let resp = app
            .clone()
            .oneshot(post_json(
                "/api/admin/subscriptions/grant",
                "tok-admin3",
                serde_json::json!({ "user_id": user.id, "plan_code": plan }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);

    let (plan, ends_at): (Option<String>, Option<chrono::DateTime<Utc>>) =
        sqlx::query_as("SELECT plan_code, ends_at FROM subscriptions WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(plan.as_deref(), Some("lifetime"));
    assert!(ends_at.is_none());
}

#[tokio::test]
async fn test_cancel_preserves_expiry_but_drops_entitlement() {
    let (app, pool) = common::build_test_app().await;
    let user = common::seed_user(&pool, "canceler@example.com", false).await;
    common::seed_session(&pool, user.id, "tok-canceler").await;

    let future = Utc::now() + Duration::days(20);
    common::seed_subscription(&pool, user.id, "premium_monthly", "active", Some(future)).await;

    let resp = app
        .clone()
        .oneshot(post_json("/api/subscription/cancel", "tok-canceler", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "canceled");
    assert!(!json["data"]["ends_at"].is_null());

    // Canceled status overrides the future expiry in tier resolution
    let resp = app.oneshot(get("/api/subscription", "tok-canceler")).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"]["tier"], "free");
    assert_eq!(json["data"]["has_premium"], false);
}

#[tokio::test]
async fn test_expired_subscription_resolves_to_free() {
    let (app, pool) = common::build_test_app().await;
    let user = common::seed_user(&pool, "expired@example.com", false).await;
    common::seed_session(&pool, user.id, "tok-expired").await;

    let past = Utc::now() - Duration::hours(1);
    common::seed_subscription(&pool, user.id, "premium_monthly", "active", Some(past)).await;

    let resp = app.oneshot(get("/api/subscription", "tok-expired")).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"]["tier"], "free");
    assert_eq!(json["data"]["has_premium"], false);
}

#[tokio::test]
async fn test_analytics_gated_on_entitlement() {
    let (app, pool) = common::build_test_app().await;
    let free_user = common::seed_user(&pool, "gated@example.com", false).await;
    let premium_user = common::seed_user(&pool, "paying@example.com", false).await;
    common::seed_session(&pool, free_user.id, "tok-gated").await;
    common::seed_session(&pool, premium_user.id, "tok-paying").await;
    common::seed_subscription(
        &pool,
        premium_user.id,
        "lifetime",
        "active",
        None,
    )
    .await;

    let resp = app
        .clone()
        .oneshot(get("/api/analytics/pnl-history", "tok-gated"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .oneshot(get("/api/analytics/pnl-history", "tok-paying"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert!(json["data"].is_array());
}
