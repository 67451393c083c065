pub mod subgraph;

use async_trait::async_trait;
use thiserror::Error;
use crate::models::PoolRecord;

pub use subgraph::SubgraphClient;

/// Anything that can produce the current top-pools list in server order.
#[async_trait]
pub trait PoolSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, FetchError>;
}

/// Terminal outcome of a failed fetch attempt. None of these are retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("{0}")]
    Query(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Fetch aborted before completing")]
    Aborted,
}
