use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes feed requests. Implemented by [`BasicClient`](super::BasicClient)
/// and by wrappers that add credentials.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
