//! Database-backed domain models.
//!
//! Rows are decoded with `sqlx::FromRow` and serialized directly into the
//! response envelope; request payloads live next to their route handlers.

pub mod account;
pub mod address;
pub mod category;
pub mod interaction;
pub mod otp;
pub mod product;

pub use account::{Account, ProfileUpdate, SellerWithAddresses};
pub use address::{Address, NewAddress};
pub use category::Category;
pub use interaction::{Interaction, InteractionWithSender, NewInteraction};
pub use otp::OtpCode;
pub use product::{NewProduct, Product, ProductDetail, ProductWithSeller};
