//! Typed access to the Heroku Platform API (v3).
//!
//! Every call is a single authenticated JSON-over-HTTPS request with no retry.
//! Non-2xx responses become [`ApiError::Api`], network failures and timeouts
//! become [`ApiError::Transport`].

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use api::HerokuApi;
pub use client::HerokuClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use types::*;
