//! Configuration for update application.

/// Sizing of the update buffer pool.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Slot capacity of a freshly created buffer.
    pub initial_capacity: usize,
    /// Maximum number of idle buffers kept for reuse; extra buffers are dropped on release.
    pub max_retained: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 8,
            max_retained: 64,
        }
    }
}

impl PoolConfig {
    /// Creates a configuration suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            initial_capacity: 2,
            max_retained: 4,
        }
    }
}
