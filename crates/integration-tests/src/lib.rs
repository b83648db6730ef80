//! Integration test support for the Souq marketplace API.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and seed the database
//! cargo run -p souq-cli -- migrate
//! cargo run -p souq-cli -- seed categories
//!
//! # Start the API
//! cargo run -p souq-api
//!
//! # Run the ignored end-to-end tests
//! cargo test -p souq-integration-tests -- --ignored
//! ```
//!
//! Tests drive the HTTP surface with reqwest and reach into `PostgreSQL`
//! directly only where the flow demands it (reading the persisted OTP code,
//! cleaning up test accounts).

use reqwest::Client;
use serde_json::Value;
use sqlx::PgPool;

/// Shared context for driving the API under test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the configured server and database.
    ///
    /// # Panics
    ///
    /// Panics if the database URL is missing or the connection fails - these
    /// tests cannot run without both.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("SOUQ_TEST_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
        let database_url = std::env::var("SOUQ_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("SOUQ_DATABASE_URL must be set for integration tests");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        Self {
            client: Client::new(),
            base_url,
            pool,
        }
    }

    /// Full URL for a path under the versioned API base.
    #[must_use]
    pub fn api(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    /// POST a JSON body, optionally bearer-authenticated.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self.client.post(self.api(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    /// PATCH a JSON body, bearer-authenticated.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    pub async fn patch_json(&self, path: &str, body: &Value, token: &str) -> reqwest::Response {
        self.client
            .patch(self.api(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    /// GET a path, optionally bearer-authenticated.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.api(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    /// Read the persisted OTP code for a phone number.
    ///
    /// # Panics
    ///
    /// Panics if no code row exists.
    pub async fn stored_otp_code(&self, phone: &str) -> String {
        sqlx::query_scalar::<_, String>("SELECT code FROM otps WHERE identifier = $1")
            .bind(phone)
            .fetch_one(&self.pool)
            .await
            .expect("expected a persisted OTP code")
    }

    /// Number of OTP rows for a phone number.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn otp_row_count(&self, phone: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM otps WHERE identifier = $1")
            .bind(phone)
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }

    /// Drive request-otp + verify-otp and return a bearer token.
    ///
    /// # Panics
    ///
    /// Panics if any step of the flow fails.
    pub async fn obtain_token(&self, phone: &str) -> String {
        let resp = self
            .post_json(
                "/auth/request-otp",
                &serde_json::json!({ "phoneNumber": phone }),
                None,
            )
            .await;
        assert_eq!(resp.status(), 200, "request-otp failed");

        let code = self.stored_otp_code(phone).await;
        let resp = self
            .post_json(
                "/auth/verify-otp",
                &serde_json::json!({ "phoneNumber": phone, "code": code }),
                None,
            )
            .await;
        assert_eq!(resp.status(), 200, "verify-otp failed");

        let body: Value = resp.json().await.expect("invalid JSON");
        body["data"]["token"]
            .as_str()
            .expect("token missing")
            .to_string()
    }

    /// Delete the test account (cascades to addresses, products, comments)
    /// and any leftover OTP row.
    ///
    /// # Panics
    ///
    /// Panics if cleanup queries fail.
    pub async fn delete_account(&self, phone: &str) {
        sqlx::query("DELETE FROM accounts WHERE phone_number = $1")
            .bind(phone)
            .execute(&self.pool)
            .await
            .expect("account cleanup failed");
        sqlx::query("DELETE FROM otps WHERE identifier = $1")
            .bind(phone)
            .execute(&self.pool)
            .await
            .expect("otp cleanup failed");
    }
}
