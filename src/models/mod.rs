pub mod pool;

pub use pool::{NumericField, PoolRecord};
