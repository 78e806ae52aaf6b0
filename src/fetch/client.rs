use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used by the remote data sources. Implementations may decorate
/// the request (credentials, headers) before sending it.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
