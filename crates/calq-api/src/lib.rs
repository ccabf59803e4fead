//! reqwest transport for the Calculadora API.
//!
//! [`ApiClient`] implements the service traits from `calq-core`: one shared
//! HTTP client with a cookie jar for the session, CSRF propagation on
//! mutating requests, and uniform error mapping.

mod auth;
mod client;
mod cookies;
mod operations;

pub use client::ApiClient;
pub use cookies::cookie_value;
