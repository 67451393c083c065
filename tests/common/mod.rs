#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration};

use pool_dashboard::config::SubgraphConfig;
use pool_dashboard::models::PoolRecord;
use pool_dashboard::sources::{FetchError, PoolSource};

pub const THREE_POOLS: &str = r#"{"data":{"pools":[
    {"id":"0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640","feeTier":"500","token0":{"symbol":"USDC"},"token1":{"symbol":"WETH"},"totalValueLockedUSD":"412345678.9","volumeUSD":"1500000000"},
    {"id":"0xcbcdf9626bc03e24f779434178a73a0b4bad62ed","feeTier":"3000","token0":{"symbol":"WBTC"},"token1":{"symbol":"WETH"},"totalValueLockedUSD":"301000000","volumeUSD":"98765432"},
    {"id":"0x4e68ccd3e89f51c3074ca5072bbac773960dfa36","feeTier":3000,"token0":{"symbol":"WETH"},"token1":{"symbol":"USDT"},"totalValueLockedUSD":"120000000.5","volumeUSD":"not-a-number"}
]}}"#;

pub const THREE_POOL_IDS: [&str; 3] = [
    "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640",
    "0xcbcdf9626bc03e24f779434178a73a0b4bad62ed",
    "0x4e68ccd3e89f51c3074ca5072bbac773960dfa36",
];

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

/// Local stand-in for the subgraph gateway that answers every query with a canned response.
#[derive(Clone)]
pub struct MockSubgraph {
    status: StatusCode,
    body: &'static str,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
    pub config: SubgraphConfig,
}

async fn handle_query(
    State(mock): State<MockSubgraph>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    mock.requests.lock().push(CapturedRequest {
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
    });
    (mock.status, mock.body.to_string())
}

impl MockSubgraph {
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mock = MockSubgraph {
            status,
            body,
            requests: Arc::new(Mutex::new(Vec::new())),
            config: SubgraphConfig {
                gateway: format!("http://{}/api", addr),
                api_key: "test-key".to_string(),
                subgraph_id: "test-subgraph".to_string(),
                pool_count: 5,
            },
        };

        let app = Router::new()
            .route("/api/:key/subgraphs/id/:id", post(handle_query))
            .with_state(mock.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        mock
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

pub fn pool(id: &str) -> PoolRecord {
    PoolRecord {
        id: id.to_string(),
        fee_tier: "3000".into(),
        token0_symbol: "USDC".to_string(),
        token1_symbol: "WETH".to_string(),
        total_value_locked_usd: "1000".into(),
        volume_usd: "10".into(),
    }
}

/// Fake source whose fetches block until the test opens the gate.
pub struct GatedSource {
    calls: AtomicUsize,
    gate: Semaphore,
    result: Mutex<Result<Vec<PoolRecord>, FetchError>>,
}

impl GatedSource {
    pub fn new(result: Result<Vec<PoolRecord>, FetchError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(0),
            result: Mutex::new(result),
        })
    }

    /// Lets `n` pending or future fetches complete.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn set_result(&self, result: Result<Vec<PoolRecord>, FetchError>) {
        *self.result.lock() = result;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..200 {
            if self.calls() >= n {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} fetch calls, saw {}", n, self.calls());
    }
}

#[async_trait]
impl PoolSource for GatedSource {
    fn name(&self) -> &'static str {
        "Gated"
    }

    async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.acquire().await.unwrap().forget();
        self.result.lock().clone()
    }
}
