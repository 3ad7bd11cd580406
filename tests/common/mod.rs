//! Shared end-to-end test infrastructure.
//!
//! Each test binary compiles this module independently, so not every helper
//! is used everywhere.
#![allow(dead_code)]

pub mod client;
pub mod constants;
pub mod fixtures;
pub mod server;

pub use client::TestClient;
pub use constants::*;
pub use server::TestServer;

use reqwest::Response;
use serde_json::Value;

/// Reads the response body as the standard envelope.
pub async fn body_json(response: Response) -> Value {
    response.json().await.expect("Response body is not JSON")
}
