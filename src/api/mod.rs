pub mod client;
pub mod endpoints;
pub mod normalize;
pub mod observer;
pub mod types;

pub use client::XueqiuClient;
pub use endpoints::{Endpoint, RankingCategory};
pub use observer::{RequestObserver, TracingObserver};
pub use types::{Holding, PortfolioSnapshot, RankingEntry, RankingValue, RebalancingRecord, TradeAction};
