//! End-to-end marketplace lifecycle tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database, migrated and seeded
//!   (`souq-cli migrate && souq-cli seed categories`)
//! - The API server running in development mode (`cargo run -p souq-api`)
//!
//! Run with: `cargo test -p souq-integration-tests -- --ignored`

use serde_json::{Value, json};

use souq_integration_tests::TestContext;

const TEST_PHONE: &str = "7886474987";
const TEST_NAME: &str = "Engineering Test User";

async fn json_body(resp: reqwest::Response) -> Value {
    resp.json().await.expect("invalid JSON body")
}

/// The full business lifecycle: OTP auth, seller setup, listing, social
/// interaction, and the deep product read.
#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_full_business_lifecycle() {
    let ctx = TestContext::new().await;
    ctx.delete_account(TEST_PHONE).await;

    // --- Phase 1: Authentication ---

    // 1. Request OTP - should persist a code row
    let resp = ctx
        .post_json(
            "/auth/request-otp",
            &json!({ "phoneNumber": TEST_PHONE }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 200);

    // 2. Verify with the actual persisted code, capture the bearer token
    let code = ctx.stored_otp_code(TEST_PHONE).await;
    let resp = ctx
        .post_json(
            "/auth/verify-otp",
            &json!({ "phoneNumber": TEST_PHONE, "code": code }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    let token = body["data"]["token"].as_str().expect("token").to_string();
    assert_eq!(body["data"]["user"]["phone_number"], TEST_PHONE);

    // --- Phase 2: User setup ---

    // 3. Update name and become a seller
    let resp = ctx
        .patch_json(
            "/users/me",
            &json!({
                "full_name": TEST_NAME,
                "bio": "Automated System Test",
                "is_seller": true,
            }),
            &token,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["is_seller"], true);

    // 4. Link a physical location to the account
    let resp = ctx
        .post_json(
            "/addresses",
            &json!({
                "governorate": "Babylon",
                "city_district": "Hillah",
                "street_address": "Engineer's District",
                "nearest_landmark": "University of Babylon",
                "is_default": true,
            }),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let body = json_body(resp).await;
    assert!(body["data"]["id"].is_string());

    // --- Phase 3: Marketplace flow ---

    // 5. Category discovery - the seeded set must be non-empty
    let resp = ctx.get("/categories", None).await;
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    let categories = body["data"].as_array().expect("category array");
    assert!(!categories.is_empty());
    let category_id = categories[0]["id"].as_str().expect("category id").to_string();

    // 6. Post a listing using the category and the token identity
    let resp = ctx
        .post_json(
            "/products",
            &json!({
                "category_id": category_id,
                "title": "E2E Test Engine Part",
                "description": "Testing system-wide integration for the marketplace.",
                "price_iqd": 125_000,
                "main_image": "https://ik.imagekit.io/souq/test-part.jpg",
            }),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let body = json_body(resp).await;
    let product_id = body["data"]["id"].as_str().expect("product id").to_string();

    // --- Phase 4: Social & retrieval ---

    // 7. Post a public comment on the product
    let resp = ctx
        .post_json(
            "/interactions",
            &json!({
                "product_id": product_id,
                "message": "Is this part compatible with 2024 Toyota models?",
            }),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["sender"]["full_name"], TEST_NAME);

    // 8. Deep read: product -> category -> seller -> seller's addresses
    let resp = ctx.get(&format!("/products/{product_id}"), None).await;
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["seller"]["full_name"], TEST_NAME);
    assert_eq!(body["data"]["seller"]["address"][0]["governorate"], "Babylon");

    // Cleanup: postgres cascades remove products, addresses, and comments
    ctx.delete_account(TEST_PHONE).await;
}

/// A repeat request before expiry must return the same code value and leave
/// exactly one row for the phone number.
#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_otp_request_is_idempotent_while_live() {
    let phone = "7886474901";
    let ctx = TestContext::new().await;
    ctx.delete_account(phone).await;

    let resp = ctx
        .post_json("/auth/request-otp", &json!({ "phoneNumber": phone }), None)
        .await;
    assert_eq!(resp.status(), 200);
    let first = ctx.stored_otp_code(phone).await;

    let resp = ctx
        .post_json("/auth/request-otp", &json!({ "phoneNumber": phone }), None)
        .await;
    assert_eq!(resp.status(), 200);
    let second = ctx.stored_otp_code(phone).await;

    assert_eq!(first, second, "a live code must be reused, not cycled");
    assert_eq!(ctx.otp_row_count(phone).await, 1);

    ctx.delete_account(phone).await;
}

/// Verification consumes the code: a second attempt with the same value
/// fails with `INVALID_OTP` and the row stays gone.
#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_verify_is_single_use() {
    let phone = "7886474902";
    let ctx = TestContext::new().await;
    ctx.delete_account(phone).await;

    ctx.post_json("/auth/request-otp", &json!({ "phoneNumber": phone }), None)
        .await;
    let code = ctx.stored_otp_code(phone).await;

    let resp = ctx
        .post_json(
            "/auth/verify-otp",
            &json!({ "phoneNumber": phone, "code": code }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(ctx.otp_row_count(phone).await, 0);

    let resp = ctx
        .post_json(
            "/auth/verify-otp",
            &json!({ "phoneNumber": phone, "code": code }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 401);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_OTP");

    ctx.delete_account(phone).await;
}

/// A mismatched code fails with 401 and must not create the account.
#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_verify_with_wrong_code_does_not_create_account() {
    let phone = "7886474903";
    let ctx = TestContext::new().await;
    ctx.delete_account(phone).await;

    ctx.post_json("/auth/request-otp", &json!({ "phoneNumber": phone }), None)
        .await;
    let stored = ctx.stored_otp_code(phone).await;
    let wrong = if stored == "123456" { "654321" } else { "123456" };

    let resp = ctx
        .post_json(
            "/auth/verify-otp",
            &json!({ "phoneNumber": phone, "code": wrong }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 401);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_OTP");

    // The stored code is untouched and no account was upserted
    assert_eq!(ctx.stored_otp_code(phone).await, stored);
    let accounts: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE phone_number = $1")
            .bind(phone)
            .fetch_one(&ctx.pool)
            .await
            .expect("count query failed");
    assert_eq!(accounts, 0);

    ctx.delete_account(phone).await;
}

/// Becoming a seller requires a completed profile.
#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_seller_transition_requires_display_name() {
    let phone = "7886474904";
    let ctx = TestContext::new().await;
    ctx.delete_account(phone).await;

    let token = ctx.obtain_token(phone).await;

    // Without a name: blocked
    let resp = ctx
        .patch_json("/users/me", &json!({ "is_seller": true }), &token)
        .await;
    assert_eq!(resp.status(), 400);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "PROFILE_INCOMPLETE");

    // Listing a product while not a seller: forbidden
    let resp = ctx
        .post_json(
            "/products",
            &json!({
                "category_id": "00000000-0000-0000-0000-000000000000",
                "title": "Never Listed",
                "description": "This listing must be rejected.",
                "price_iqd": 1000,
                "main_image": "https://ik.imagekit.io/souq/never.jpg",
            }),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status(), 403);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "NOT_A_SELLER");

    // With a valid name in the same request: allowed and persisted
    let resp = ctx
        .patch_json(
            "/users/me",
            &json!({ "full_name": "Seller Candidate", "is_seller": true }),
            &token,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["is_seller"], true);

    ctx.delete_account(phone).await;
}

/// A second default address clears the first; exact duplicates are rejected.
#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_default_address_exclusivity_and_duplicates() {
    let phone = "7886474905";
    let ctx = TestContext::new().await;
    ctx.delete_account(phone).await;

    let token = ctx.obtain_token(phone).await;

    let first = json!({
        "governorate": "Babylon",
        "city_district": "Hillah",
        "street_address": "Engineer's District",
        "nearest_landmark": "University of Babylon",
        "is_default": true,
    });
    let resp = ctx.post_json("/addresses", &first, Some(&token)).await;
    assert_eq!(resp.status(), 201);

    // Exact duplicate: rejected
    let resp = ctx.post_json("/addresses", &first, Some(&token)).await;
    assert_eq!(resp.status(), 400);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "ADDRESS_EXISTS");

    // A second default elsewhere: accepted, clears the first default
    let resp = ctx
        .post_json(
            "/addresses",
            &json!({
                "governorate": "Baghdad",
                "city_district": "Karrada",
                "street_address": "Inner Karrada Street",
                "nearest_landmark": "Al-Zawraa Park",
                "is_default": true,
            }),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status(), 201);

    let resp = ctx.get("/addresses", Some(&token)).await;
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    let addresses = body["data"].as_array().expect("address array");
    assert_eq!(addresses.len(), 2);
    let defaults = addresses
        .iter()
        .filter(|a| a["is_default"] == true)
        .count();
    assert_eq!(defaults, 1, "at most one default address may remain");
    assert_eq!(addresses[0]["governorate"], "Baghdad");

    ctx.delete_account(phone).await;
}

/// A missing product yields an enveloped 404 with `NOT_FOUND`.
#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_missing_product_is_enveloped_404() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .get("/products/00000000-0000-0000-0000-000000000000", None)
        .await;
    assert_eq!(resp.status(), 404);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Product not found");
}
