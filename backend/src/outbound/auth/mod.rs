//! Operator authenticator adapters.

mod password_authenticator;

pub use password_authenticator::PasswordAuthenticator;
