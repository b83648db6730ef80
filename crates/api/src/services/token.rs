//! Bearer token signing and verification.
//!
//! Tokens are compact JWS strings (HS256): three base64url segments over an
//! HMAC-SHA256 signature. Minted once after OTP verification and presented
//! on every protected request. Validity is purely cryptographic - claims are
//! not re-checked against the database, and no expiry claim is set.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use souq_core::AccountId;

type HmacSha256 = Hmac<Sha256>;

/// JOSE header for every token this service mints.
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Errors that can occur when signing or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is not three base64url segments.
    #[error("malformed token")]
    Malformed,

    /// The signature does not match the payload.
    #[error("invalid signature")]
    InvalidSignature,

    /// The header or claims segment is not valid JSON, or the algorithm is
    /// not HS256.
    #[error("invalid token contents: {0}")]
    InvalidContents(String),

    /// The signing key was rejected by the MAC implementation.
    #[error("invalid signing key")]
    InvalidKey,
}

/// Claims embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account id established at verification time
    pub id: AccountId,
    /// Phone number the account is keyed by
    pub phone: String,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
}

impl TokenClaims {
    /// Build claims for an account, stamped with the current time.
    #[must_use]
    pub fn new(id: AccountId, phone: impl Into<String>) -> Self {
        Self {
            id,
            phone: phone.into(),
            iat: Utc::now().timestamp(),
        }
    }
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
}

impl TokenSigner {
    /// Create a signer from the configured secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Mint a signed token embedding the claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the claims fail to serialize or the key is
    /// rejected.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let header = serde_json::to_vec(&Header {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        })
        .map_err(|e| TokenError::InvalidContents(e.to_string()))?;
        let payload =
            serde_json::to_vec(claims).map_err(|e| TokenError::InvalidContents(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify a token's signature and decode its claims.
    ///
    /// The signature check is constant-time.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the token is malformed, carries an unexpected
    /// algorithm, or fails the signature check.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| TokenError::Malformed)?;
        let header: Header = serde_json::from_slice(&header_bytes)
            .map_err(|e| TokenError::InvalidContents(e.to_string()))?;
        if header.alg != "HS256" {
            return Err(TokenError::InvalidContents(format!(
                "unexpected algorithm {}",
                header.alg
            )));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims = serde_json::from_slice(&payload_bytes)
            .map_err(|e| TokenError::InvalidContents(e.to_string()))?;

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| TokenError::InvalidKey)
    }
}
