//! HTTP plumbing for the REST sources.

mod basic;
pub mod auth;

pub use basic::BasicClient;

use async_trait::async_trait;
use reqwest::{Request, Response};
use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// Executes prepared requests. Wrappers add credentials and delegate.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Issues a GET and decodes a JSON body.
///
/// # Errors
///
/// Transport failures, non-2xx statuses and undecodable bodies are reported
/// as distinct [`SourceError`] variants.
pub async fn get_json<C, T>(client: &C, url: reqwest::Url) -> Result<T, SourceError>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let req = Request::new(reqwest::Method::GET, url);
    let resp = client.execute(req).await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
