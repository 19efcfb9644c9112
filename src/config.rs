use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TRANSFERS: u8 = 8;

/// Search parameters, passed explicitly to precomputation and queries.
/// There is no ambient global configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of transfers explored by a query.
    /// A query performs `max_transfers + 1` scan rounds.
    #[serde(default = "default_max_transfers")]
    pub max_transfers: u8,

    /// Wall-clock budget for a single query, in milliseconds.
    /// When exhausted, the query returns its best-effort partial result
    /// with [`SearchStatus::BoundReached`](crate::response::SearchStatus).
    #[serde(default)]
    pub search_budget_ms: Option<u64>,
}

fn default_max_transfers() -> u8 {
    DEFAULT_MAX_TRANSFERS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_transfers: DEFAULT_MAX_TRANSFERS,
            search_budget_ms: None,
        }
    }
}
