//! Sizing parameters for [`HashMap`](crate::HashMap).

use crate::error::ConfigError;

/// Capacity a map starts with, and the step it grows by.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Unclaimed slots kept in reserve before growth is forced.
pub const DEFAULT_HEADROOM: usize = 4;

/// Validated sizing for a map.
///
/// Growth replaces the regions with `size() + initial_capacity` slots once
/// fewer than `headroom` unclaimed slots remain. `headroom < initial_capacity`
/// guarantees each growth yields at least one fresh slot.
///
/// Capacities are not bounded here because the cost of a slot depends on
/// the value type. Building a map with a capacity that cannot be allocated
/// panics in [`HashMap::with_config`](crate::HashMap::with_config); use
/// [`HashMap::try_with_config`](crate::HashMap::try_with_config) to get
/// [`MapError::OutOfMemory`](crate::MapError::OutOfMemory) instead.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MapConfig {
    initial_capacity: usize,
    headroom: usize,
}

impl MapConfig {
    pub const fn new(initial_capacity: usize, headroom: usize) -> Result<Self, ConfigError> {
        if initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if headroom >= initial_capacity {
            return Err(ConfigError::HeadroomTooLarge {
                headroom,
                initial_capacity,
            });
        }
        Ok(Self {
            initial_capacity,
            headroom,
        })
    }

    #[inline]
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    #[inline]
    pub const fn headroom(&self) -> usize {
        self.headroom
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            headroom: DEFAULT_HEADROOM,
        }
    }
}
