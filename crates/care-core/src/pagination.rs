//! Stateless continuation tokens.
//!
//! A token names the partition where a scan stopped and how many matching
//! rows of that partition were already returned. Nothing is kept server-side
//! between pages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Opaque cursor encoded as `"<partition>:<match offset>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ContinuationToken {
    pub partition: String,
    pub offset: usize,
}

impl ContinuationToken {
    #[must_use]
    pub fn new(partition: impl Into<String>, offset: usize) -> Self {
        Self {
            partition: partition.into(),
            offset,
        }
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.partition, self.offset)
    }
}

impl FromStr for ContinuationToken {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (partition, offset) = s
            .rsplit_once(':')
            .ok_or_else(|| CoreError::Validation(format!("malformed continuation token '{s}'")))?;
        if partition.is_empty() {
            return Err(CoreError::Validation(format!(
                "continuation token '{s}' has no partition"
            )));
        }
        let offset = offset.parse::<usize>().map_err(|e| {
            CoreError::Validation(format!("continuation token '{s}' has a bad offset: {e}"))
        })?;
        Ok(Self::new(partition, offset))
    }
}

impl From<ContinuationToken> for String {
    fn from(token: ContinuationToken) -> Self {
        token.to_string()
    }
}

impl TryFrom<String> for ContinuationToken {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
