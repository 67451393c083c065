use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub subgraph: SubgraphConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubgraphConfig {
    #[serde(default = "default_gateway")]
    pub gateway: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_subgraph_id")]
    pub subgraph_id: String,
    #[serde(default = "default_pool_count")]
    pub pool_count: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_gateway() -> String { "https://gateway.thegraph.com/api".to_string() }
fn default_api_key() -> String { "145bc964febd7e6d01967b593ea8340e".to_string() }
fn default_subgraph_id() -> String { "5zvR82QoaXYFyDEKLZ9t6v9adgnptxYpKpSbxtgVENFV".to_string() }
fn default_pool_count() -> u32 { 5 }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            gateway: default_gateway(),
            api_key: default_api_key(),
            subgraph_id: default_subgraph_id(),
            pool_count: default_pool_count(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl SubgraphConfig {
    /// Gateway URL with the access key embedded in the path.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/subgraphs/id/{}",
            self.gateway.trim_end_matches('/'),
            self.api_key,
            self.subgraph_id
        )
    }
}

impl Config {
    /// Loads `path`, falling back to the built-in defaults when the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!("{} not found, using built-in defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
