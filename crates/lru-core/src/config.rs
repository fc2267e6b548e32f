//! Cache configuration

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CoreError;

/// Configuration for a single LRU cache
///
/// `capacity` is signed so that a negative value written in a config file
/// reaches validation instead of failing deserialization with an opaque
/// type error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> i64 {
    1024
}

impl CacheConfig {
    /// Capacity as a usable entry count, rejecting anything below one
    pub fn validated_capacity(&self) -> Result<usize, CoreError> {
        match usize::try_from(self.capacity) {
            Ok(capacity) if capacity > 0 => Ok(capacity),
            _ => {
                warn!("Rejecting cache capacity {}", self.capacity);
                Err(CoreError::InvalidCapacity(self.capacity))
            }
        }
    }
}
