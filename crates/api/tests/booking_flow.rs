//! End-to-end booking flow tests: hold admission, expiry, purchase
//! finalization, and the idempotency/conflict behavior of both.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json};
use sqlx::PgPool;

async fn seed_seance(pool: &PgPool, capacity: i32) -> i64 {
    let app = common::build_test_app(pool.clone());
    let resp = post_json(
        app,
        "/api/v1/events",
        serde_json::json!({"name": "Flow Event"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let event_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let resp = post_json(
        app,
        &format!("/api/v1/events/{event_id}/seances"),
        serde_json::json!({"capacity": capacity}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await["data"]["id"].as_i64().unwrap()
}

async fn create_hold(
    pool: &PgPool,
    seance_id: i64,
    quantity: i32,
    key: &str,
) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let resp = post_json(
        app,
        "/api/v1/holds",
        serde_json::json!({
            "user_id": 1,
            "seance_id": seance_id,
            "quantity": quantity,
            "idempotency_key": key,
        }),
    )
    .await;
    let status = resp.status();
    (status, body_json(resp).await)
}

/// Authorize a payment through the mock endpoint; returns the generated ref.
async fn authorize(pool: &PgPool, amount: &str) -> String {
    let app = common::build_test_app(pool.clone());
    let resp = post_json(
        app,
        "/api/v1/payments/authorize",
        serde_json::json!({"amount": amount}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    json["data"]["payment_ref"].as_str().unwrap().to_string()
}

async fn create_purchase(
    pool: &PgPool,
    hold_id: i64,
    payment_ref: &str,
    key: &str,
) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let resp = post_json(
        app,
        "/api/v1/purchases",
        serde_json::json!({
            "hold_id": hold_id,
            "payment_ref": payment_ref,
            "idempotency_key": key,
        }),
    )
    .await;
    let status = resp.status();
    (status, body_json(resp).await)
}

async fn availability(pool: &PgPool, seance_id: i64) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let resp = get(app, &format!("/api/v1/seances/{seance_id}/availability")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["data"].clone()
}

/// Backdate a hold's expiry so the TTL has lapsed.
async fn force_expire(pool: &PgPool, hold_id: i64) {
    sqlx::query("UPDATE holds SET expires_at = NOW() - INTERVAL '1 second' WHERE id = $1")
        .bind(hold_id)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Hold admission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn hold_admission_rejects_beyond_availability(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;

    let (status, json) = create_hold(&pool, seance_id, 6, "adm-1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "HELD");

    let avail = availability(&pool, seance_id).await;
    assert_eq!(avail["capacity"], 10);
    assert_eq!(avail["held"], 6);
    assert_eq!(avail["available"], 4);

    // 5 > 4: rejected, no row written, availability unchanged.
    let (status, json) = create_hold(&pool, seance_id, 5, "adm-2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("available 4"));

    let avail = availability(&pool, seance_id).await;
    assert_eq!(avail["available"], 4);

    // A fitting request still goes through.
    let (status, _) = create_hold(&pool, seance_id, 4, "adm-3").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(availability(&pool, seance_id).await["available"], 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn hold_create_is_idempotent_by_key(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;

    let (status, first) = create_hold(&pool, seance_id, 3, "idem-1").await;
    assert_eq!(status, StatusCode::CREATED);

    // Replay: same row, 200, no second reservation.
    let (status, replay) = create_hold(&pool, seance_id, 3, "idem-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replay["data"]["id"], first["data"]["id"]);

    assert_eq!(availability(&pool, seance_id).await["held"], 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_same_key_creates_single_hold(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;

    // Neither request sees the other's row on pre-read; the loser hits the
    // unique index and recovers by re-reading the winner's hold.
    let a = create_hold(&pool, seance_id, 3, "race-same");
    let b = create_hold(&pool, seance_id, 3, "race-same");
    let ((status_a, json_a), (status_b, json_b)) = futures::future::join(a, b).await;

    let mut statuses = [status_a, status_b];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CREATED]);
    assert_eq!(json_a["data"]["id"], json_b["data"]["id"]);

    assert_eq!(availability(&pool, seance_id).await["held"], 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_holds_cannot_jointly_oversell(pool: PgPool) {
    let seance_id = seed_seance(&pool, 1).await;

    let a = create_hold(&pool, seance_id, 1, "race-a");
    let b = create_hold(&pool, seance_id, 1, "race-b");
    let ((status_a, _), (status_b, _)) = futures::future::join(a, b).await;

    let mut statuses = [status_a, status_b];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);

    assert_eq!(availability(&pool, seance_id).await["available"], 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn hold_for_missing_seance_is_404(pool: PgPool) {
    let (status, json) = create_hold(&pool, 424242, 1, "missing-seance").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../migrations")]
async fn hold_input_validation(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;

    let (status, _) = create_hold(&pool, seance_id, 0, "val-qty").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = create_hold(&pool, seance_id, 1, "  ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let long_key = "k".repeat(81);
    let (status, json) = create_hold(&pool, seance_id, 1, &long_key).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("80"));
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn stale_hold_expires_lazily_on_read(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let (_, json) = create_hold(&pool, seance_id, 4, "lazy-1").await;
    let hold_id = json["data"]["id"].as_i64().unwrap();

    force_expire(&pool, hold_id).await;

    // The stale hold no longer counts against capacity, swept or not.
    assert_eq!(availability(&pool, seance_id).await["available"], 10);

    // Reading it persists the transition.
    let app = common::build_test_app(pool.clone());
    let resp = get(app, &format!("/api/v1/holds/{hold_id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "EXPIRED");
    assert!(!json["data"]["released_at"].is_null());

    let (status_id,): (i16,) = sqlx::query_as("SELECT status_id FROM holds WHERE id = $1")
        .bind(hold_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status_id, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn purchase_of_expired_hold_fails_and_expires_it(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let (_, json) = create_hold(&pool, seance_id, 2, "exp-buy").await;
    let hold_id = json["data"]["id"].as_i64().unwrap();
    let payment_ref = authorize(&pool, "200.00").await;

    force_expire(&pool, hold_id).await;

    let (status, json) = create_purchase(&pool, hold_id, &payment_ref, "exp-buy-p").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("expired"));

    // The rejection itself committed the EXPIRED transition. Checked with a
    // raw read: going through GET /holds would expire the row lazily and
    // mask a rolled-back write.
    let (status_id,): (i16,) = sqlx::query_as("SELECT status_id FROM holds WHERE id = $1")
        .bind(hold_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status_id, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn sweeper_expires_stale_holds(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let (_, json) = create_hold(&pool, seance_id, 2, "sweep-me").await;
    let hold_id = json["data"]["id"].as_i64().unwrap();
    force_expire(&pool, hold_id).await;

    let cancel = tokio_util::sync::CancellationToken::new();
    let handle = tokio::spawn(kassa_api::background::hold_expiry::run(
        pool.clone(),
        std::time::Duration::from_millis(10),
        cancel.clone(),
    ));

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    cancel.cancel();
    handle.await.unwrap();

    let (status_id,): (i16,) = sqlx::query_as("SELECT status_id FROM holds WHERE id = $1")
        .bind(hold_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status_id, 2);
}

// ---------------------------------------------------------------------------
// Release
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn release_frees_capacity_and_is_idempotent(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let (_, json) = create_hold(&pool, seance_id, 5, "rel-1").await;
    let hold_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(availability(&pool, seance_id).await["available"], 5);

    let app = common::build_test_app(pool.clone());
    let resp = delete(app, &format!("/api/v1/holds/{hold_id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "RELEASED");
    let first_released_at = json["data"]["released_at"].clone();
    assert!(!first_released_at.is_null());

    assert_eq!(availability(&pool, seance_id).await["available"], 10);

    // Releasing again is a no-op on the already-terminal row.
    let app = common::build_test_app(pool.clone());
    let resp = delete(app, &format!("/api/v1/holds/{hold_id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "RELEASED");
    assert_eq!(json["data"]["released_at"], first_released_at);
}

// ---------------------------------------------------------------------------
// Purchase finalization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn purchase_consumes_hold_and_is_idempotent(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let (_, json) = create_hold(&pool, seance_id, 2, "buy-1").await;
    let hold_id = json["data"]["id"].as_i64().unwrap();
    let payment_ref = authorize(&pool, "200.00").await;

    let (status, json) = create_purchase(&pool, hold_id, &payment_ref, "buy-1-p").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["created"], true);
    assert_eq!(json["data"]["status"], "SOLD");
    assert_eq!(json["data"]["amount"], "200.00");
    assert_eq!(json["data"]["quantity"], 2);
    let purchase_id = json["data"]["id"].as_i64().unwrap();

    // Hold is consumed, quantity moved from held to sold.
    let app = common::build_test_app(pool.clone());
    let resp = get(app, &format!("/api/v1/holds/{hold_id}")).await;
    assert_eq!(body_json(resp).await["data"]["status"], "CONSUMED");

    let avail = availability(&pool, seance_id).await;
    assert_eq!(avail["sold"], 2);
    assert_eq!(avail["held"], 0);
    assert_eq!(avail["available"], 8);

    // Idempotent replay: 200, created=false, same purchase, no new state.
    let (status, json) = create_purchase(&pool, hold_id, &payment_ref, "buy-1-p").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["created"], false);
    assert_eq!(json["data"]["id"], purchase_id);
    assert_eq!(availability(&pool, seance_id).await["sold"], 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn purchase_rejects_amount_mismatch(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let (_, json) = create_hold(&pool, seance_id, 2, "mismatch").await;
    let hold_id = json["data"]["id"].as_i64().unwrap();

    // Authorized, but for the wrong total (expected 200.00).
    let payment_ref = authorize(&pool, "199.99").await;

    let (status, json) = create_purchase(&pool, hold_id, &payment_ref, "mismatch-p").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = json["error"].as_str().unwrap();
    assert!(msg.contains("200.00") && msg.contains("199.99"));

    // No state changed: the hold is still usable with a correct payment.
    let payment_ref = authorize(&pool, "200.00").await;
    let (status, _) = create_purchase(&pool, hold_id, &payment_ref, "mismatch-p2").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn purchase_rejects_declined_payment(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let (_, json) = create_hold(&pool, seance_id, 1, "declined").await;
    let hold_id = json["data"]["id"].as_i64().unwrap();

    // 0.07 triggers the mock decline rule.
    let app = common::build_test_app(pool.clone());
    let resp = post_json(
        app,
        "/api/v1/payments/authorize",
        serde_json::json!({"amount": "0.07"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "DECLINED");
    let payment_ref = json["data"]["payment_ref"].as_str().unwrap().to_string();

    let (status, json) = create_purchase(&pool, hold_id, &payment_ref, "declined-p").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("not authorized"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn purchase_rejects_released_hold(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let (_, json) = create_hold(&pool, seance_id, 1, "rel-buy").await;
    let hold_id = json["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    delete(app, &format!("/api/v1/holds/{hold_id}")).await;

    let payment_ref = authorize(&pool, "100.00").await;
    let (status, json) = create_purchase(&pool, hold_id, &payment_ref, "rel-buy-p").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("RELEASED"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn payment_ref_cannot_fund_two_purchases(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let payment_ref = authorize(&pool, "100.00").await;

    let (_, json) = create_hold(&pool, seance_id, 1, "ref-a").await;
    let hold_a = json["data"]["id"].as_i64().unwrap();
    let (status, json) = create_purchase(&pool, hold_a, &payment_ref, "ref-a-p").await;
    assert_eq!(status, StatusCode::CREATED);
    let purchase_a = json["data"]["id"].as_i64().unwrap();

    // Different hold, different idempotency key, same payment ref.
    let (_, json) = create_hold(&pool, seance_id, 1, "ref-b").await;
    let hold_b = json["data"]["id"].as_i64().unwrap();
    let (status, json) = create_purchase(&pool, hold_b, &payment_ref, "ref-b-p").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE_PAYMENT_REF");
    assert_eq!(json["existing_purchase_id"], purchase_a);

    // The losing hold is untouched and still HELD.
    let app = common::build_test_app(pool.clone());
    let resp = get(app, &format!("/api/v1/holds/{hold_b}")).await;
    assert_eq!(body_json(resp).await["data"]["status"], "HELD");
}

#[sqlx::test(migrations = "../../migrations")]
async fn purchase_with_unknown_payment_ref_is_404(pool: PgPool) {
    let seance_id = seed_seance(&pool, 10).await;
    let (_, json) = create_hold(&pool, seance_id, 1, "no-pay").await;
    let hold_id = json["data"]["id"].as_i64().unwrap();

    let (status, json) = create_purchase(&pool, hold_id, "no-such-ref", "no-pay-p").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
