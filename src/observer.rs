//! Diagnostic side channel for slot bookkeeping.
//!
//! A map owns its observer and reports every structural change through it.
//! Observers carry no contract: the map behaves identically whether events
//! are logged, collected or dropped.

/// Structural change reported by a map.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MapEvent {
    /// A never-used slot at `index` was claimed by an insert.
    SlotClaimed { index: usize },
    /// A reclaimed slot at `index` was taken off the free list by an insert.
    SlotReused { index: usize },
    /// The slot at `index` matched a removal and joined the free list.
    SlotReclaimed { index: usize },
    /// Both regions were replaced with larger ones.
    Grew {
        old_capacity: usize,
        new_capacity: usize,
    },
    /// Replacement regions could not be allocated; the map is unchanged.
    GrowthFailed { requested: usize },
    /// All entries were dropped and capacity reset.
    Cleared { capacity: usize },
}

pub trait MapObserver {
    fn observe(&self, event: &MapEvent);
}

/// Forwards events to `tracing`.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingObserver;

impl MapObserver for TracingObserver {
    fn observe(&self, event: &MapEvent) {
        match *event {
            MapEvent::SlotClaimed { index } => {
                tracing::trace!(index, "no freed slots, using new slot");
            }
            MapEvent::SlotReused { index } => {
                tracing::trace!(index, "re-using freed slot");
            }
            MapEvent::SlotReclaimed { index } => {
                tracing::trace!(index, "slot is being cleaned up");
            }
            MapEvent::Grew {
                old_capacity,
                new_capacity,
            } => {
                tracing::debug!(old_capacity, new_capacity, "moved slot regions");
            }
            MapEvent::GrowthFailed { requested } => {
                tracing::warn!(requested, "failed to allocate memory for relocation");
            }
            MapEvent::Cleared { capacity } => {
                tracing::debug!(capacity, "map cleared");
            }
        }
    }
}

/// Discards every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl MapObserver for NoopObserver {
    #[inline]
    fn observe(&self, _event: &MapEvent) {}
}

impl<F> MapObserver for F
where
    F: Fn(&MapEvent),
{
    #[inline]
    fn observe(&self, event: &MapEvent) {
        self(event)
    }
}
