//! HTTP request handlers.

pub mod admin;
pub mod common;
pub mod health;
pub mod products;
pub mod reviews;

pub use admin::*;
pub use common::*;
pub use health::*;
pub use products::*;
pub use reviews::*;
