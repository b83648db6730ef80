//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS
//! 4. Request ID (correlation id on every request)
//!
//! Extractors ([`RequireAuth`], [`ApiJson`], [`ApiQuery`], [`ApiPath`]) run
//! per-route and reject with enveloped errors.

pub mod auth;
pub mod request_id;
pub mod validate;

pub use auth::{CurrentAccount, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use validate::{ApiJson, ApiPath, ApiQuery};
