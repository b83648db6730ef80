//! External collaborators and credential services.
//!
//! - [`token`] - HMAC-signed bearer tokens minted after OTP verification
//! - [`otpiq`] - SMS/WhatsApp verification-code gateway client
//! - [`imagekit`] - Image host upload client

pub mod imagekit;
pub mod otpiq;
pub mod token;

pub use imagekit::{ImageHostError, ImageKitClient, UploadedImage};
pub use otpiq::{OtpiqClient, SmsError};
pub use token::{TokenClaims, TokenError, TokenSigner};
