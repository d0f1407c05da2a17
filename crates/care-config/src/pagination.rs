//! Page-size limits.

use serde::{Deserialize, Serialize};

const fn default_limit() -> usize {
    50
}

const fn default_pending_max_limit() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    /// Page size used when the caller does not ask for one.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Upper bound on a pending-list page.
    #[serde(default = "default_pending_max_limit")]
    pub pending_max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            pending_max_limit: default_pending_max_limit(),
        }
    }
}
