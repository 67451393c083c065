use serde::{Deserialize, Serialize};
use crate::format::Numeric;

/// A numeric field as the subgraph sends it: usually a decimal string, sometimes a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(serde_json::Number),
    Text(String),
}

impl Numeric for NumericField {
    fn to_number(&self) -> Option<f64> {
        match self {
            NumericField::Number(n) => n.as_f64(),
            NumericField::Text(s) => s.as_str().to_number(),
        }
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        NumericField::Text(value.to_string())
    }
}

impl From<u64> for NumericField {
    fn from(value: u64) -> Self {
        NumericField::Number(value.into())
    }
}

/// One pool as returned by the top-pools query. Ordering of a fetched batch is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub id: String,
    pub fee_tier: NumericField,
    pub token0_symbol: String,
    pub token1_symbol: String,
    pub total_value_locked_usd: NumericField,
    pub volume_usd: NumericField,
}

impl PoolRecord {
    pub fn pair(&self) -> String {
        format!("{} / {}", self.token0_symbol, self.token1_symbol)
    }

    /// `0x12345678…abcdef` style abbreviation of the pool address.
    pub fn short_id(&self) -> String {
        let chars: Vec<char> = self.id.chars().collect();
        let head: String = chars.iter().take(8).collect();
        let tail: String = chars[chars.len().saturating_sub(6)..].iter().collect();
        format!("{}…{}", head, tail)
    }
}
