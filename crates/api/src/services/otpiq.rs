//! OTPIQ gateway client for verification-code delivery.
//!
//! Sends one-time codes over WhatsApp with SMS fallback. The response body
//! is never inspected beyond its status - delivery is best-effort and the
//! caller decides whether a failure matters.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::json;
use thiserror::Error;

use souq_core::PhoneNumber;

use crate::config::SmsConfig;

/// OTPIQ API base URL.
const BASE_URL: &str = "https://api.otpiq.com/api";

/// Errors that can occur when dispatching a verification code.
#[derive(Debug, Error)]
pub enum SmsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build the client.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// OTPIQ API client.
#[derive(Clone)]
pub struct OtpiqClient {
    client: reqwest::Client,
    country_code: String,
}

impl OtpiqClient {
    /// Create a new OTPIQ client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &SmsConfig) -> Result<Self, SmsError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| SmsError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            country_code: config.country_code.clone(),
        })
    }

    /// Dispatch a verification code to a phone number.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the gateway rejects it.
    pub async fn send_verification_code(
        &self,
        phone: &PhoneNumber,
        code: &str,
    ) -> Result<(), SmsError> {
        let url = format!("{BASE_URL}/sms");
        let body = dispatch_payload(&self.country_code, phone, code);

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SmsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Build the dispatch request body: international number plus the
/// verification template selector.
fn dispatch_payload(country_code: &str, phone: &PhoneNumber, code: &str) -> serde_json::Value {
    json!({
        "phoneNumber": format!("{country_code}{}", phone.as_str()),
        "smsType": "verification",
        "provider": "whatsapp-sms",
        "verificationCode": code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_payload_prefixes_country_code() {
        let phone = PhoneNumber::parse("7886474987").expect("valid phone");
        let body = dispatch_payload("964", &phone, "123456");

        assert_eq!(body["phoneNumber"], "9647886474987");
        assert_eq!(body["smsType"], "verification");
        assert_eq!(body["provider"], "whatsapp-sms");
        assert_eq!(body["verificationCode"], "123456");
    }
}
