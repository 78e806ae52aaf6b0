//! HTTP plumbing shared by the remote data sources.
//!
//! Requests go through the [`HttpClient`] trait so credentials can be layered
//! on with wrappers such as [`auth::UrlParam`] and tests can swap the transport.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, anyhow};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Issues a GET for `url` and decodes the JSON body.
///
/// # Errors
///
/// Fails on transport errors, a non-success status (the body is included in
/// the message) or a body that does not decode into `T`.
pub async fn fetch_json<C, T>(client: &C, url: reqwest::Url) -> Result<T>
where
    C: HttpClient,
    T: DeserializeOwned,
{
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("API returned status {}: {}", status, body));
    }

    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), "Response received");
    Ok(serde_json::from_slice(&bytes)?)
}
