use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use crate::config::SubgraphConfig;
use crate::models::{NumericField, PoolRecord};
use super::{FetchError, PoolSource};

/// Top-pools query against a Uniswap V3 style subgraph.
pub struct SubgraphClient {
    client: Client,
    endpoint: String,
    query: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<PoolsData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PoolsData {
    #[serde(default)]
    pools: Option<Vec<SubgraphPool>>,
}

#[derive(Debug, Deserialize)]
struct SubgraphPool {
    id: String,
    #[serde(rename = "feeTier")]
    fee_tier: NumericField,
    token0: TokenRef,
    token1: TokenRef,
    #[serde(rename = "totalValueLockedUSD")]
    total_value_locked_usd: NumericField,
    #[serde(rename = "volumeUSD")]
    volume_usd: NumericField,
}

#[derive(Debug, Deserialize)]
struct TokenRef {
    symbol: String,
}

impl From<SubgraphPool> for PoolRecord {
    fn from(p: SubgraphPool) -> Self {
        PoolRecord {
            id: p.id,
            fee_tier: p.fee_tier,
            token0_symbol: p.token0.symbol,
            token1_symbol: p.token1.symbol,
            total_value_locked_usd: p.total_value_locked_usd,
            volume_usd: p.volume_usd,
        }
    }
}

/// GraphQL document for the `first` pools by locked value, largest first.
pub fn top_pools_query(first: u32) -> String {
    format!(
        "{{ pools(first: {}, orderBy: totalValueLockedUSD, orderDirection: desc) \
         {{ id feeTier token0 {{ symbol }} token1 {{ symbol }} totalValueLockedUSD volumeUSD }} }}",
        first
    )
}

impl SubgraphClient {
    pub fn new(config: &SubgraphConfig) -> Self {
        Self::with_endpoint(config.endpoint(), config.pool_count)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, pool_count: u32) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            query: top_pools_query(pool_count),
        }
    }

    fn decode(body: &str) -> Result<Vec<PoolRecord>, FetchError> {
        let parsed: GraphQlResponse = serde_json::from_str(body)
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        // partial data next to errors is discarded
        if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
            let joined = errors
                .into_iter()
                .map(|e| e.message.unwrap_or_else(|| "Unknown GraphQL error".to_string()))
                .collect::<Vec<_>>()
                .join(" | ");
            return Err(FetchError::Query(joined));
        }

        let pools = parsed
            .data
            .and_then(|d| d.pools)
            .unwrap_or_default()
            .into_iter()
            .map(PoolRecord::from)
            .collect();

        Ok(pools)
    }
}

#[async_trait]
impl PoolSource for SubgraphClient {
    fn name(&self) -> &'static str {
        "Subgraph"
    }

    async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, FetchError> {
        tracing::debug!("POST top pools query");

        let resp = self.client.post(&self.endpoint)
            .json(&serde_json::json!({ "query": self.query }))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp.text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!("Subgraph returned HTTP {}", status.as_u16());
            return Err(FetchError::Http { status: status.as_u16(), body });
        }

        let result = Self::decode(&body);
        match &result {
            Ok(pools) => tracing::debug!("Decoded {} pools", pools.len()),
            Err(e) => tracing::warn!("Subgraph response rejected: {}", e),
        }
        result
    }
}
