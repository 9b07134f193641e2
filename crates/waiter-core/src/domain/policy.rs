//! Worker configuration: failure policy and queue sizing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the queue worker does when publishing one item fails.
///
/// The failure is always reported first; the policy only decides whether the
/// loop keeps draining afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report and move on to the next item.
    #[default]
    Continue,
    /// Report and stop the loop. Remaining items stay queued.
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub failure_policy: FailurePolicy,

    /// `None` = unbounded queue. `Some(n)` = bounded, producers wait when full.
    pub queue_capacity: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid worker config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("queue_capacity must be greater than zero")]
    ZeroCapacity,
}

impl WorkerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}
