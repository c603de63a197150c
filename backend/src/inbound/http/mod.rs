//! HTTP inbound adapter exposing the redemption and admin endpoints.

pub mod admin_auth;
pub mod admin_inventory;
pub mod error;
pub mod health;
pub mod redeem;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
