//! Runtime knobs for analysis contexts.
//!
//! Defaults are compiled in; `from_env` lets harnesses and benches resize the
//! scratch-board pool without recompiling.

use tracing::warn;

/// Environment variable read by [`EngineConfig::from_env`].
pub const SCRATCH_POOL_ENV: &str = "PLUM_SCRATCH_POOL";

/// Free-list size used when nothing else is configured.
pub const DEFAULT_SCRATCH_POOL_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of idle scratch boards kept for reuse.
    pub scratch_pool_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scratch_pool_capacity: DEFAULT_SCRATCH_POOL_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Read overrides from the process environment, keeping defaults for
    /// anything missing or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(SCRATCH_POOL_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) => config.scratch_pool_capacity = capacity,
                Err(_) => warn!(value = %raw, "ignoring unparsable {SCRATCH_POOL_ENV}"),
            }
        }
        config
    }

    pub fn with_scratch_pool_capacity(mut self, capacity: usize) -> Self {
        self.scratch_pool_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineConfig, DEFAULT_SCRATCH_POOL_CAPACITY};

    #[test]
    fn default_uses_compiled_pool_capacity() {
        assert_eq!(
            EngineConfig::default().scratch_pool_capacity,
            DEFAULT_SCRATCH_POOL_CAPACITY
        );
    }

    #[test]
    fn builder_overrides_capacity() {
        let config = EngineConfig::default().with_scratch_pool_capacity(2);
        assert_eq!(config.scratch_pool_capacity, 2);
    }
}
