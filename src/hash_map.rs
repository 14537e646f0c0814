//! HashMap: digest-keyed slots in two parallel regions with FIFO slot reuse.
//!
//! Layout
//! - `slots[i]` records `(digest, index)` for slot `i`; `values[i]` holds its
//!   value. Both regions always have the same length, which is the capacity.
//! - Slots `[0, size())` have been claimed at least once. A claimed slot is
//!   either live (non-sentinel digest) or reclaimed (sentinel digest and
//!   queued on the free list). Slots past `size()` were never claimed.
//!
//! Identity
//! - Keys are never stored. A key is identified by its digest alone, so two
//!   keys with equal digests address the same entries: lookups return the
//!   lowest-indexed match and `remove` reclaims every match.
//!
//! Growth
//! - Before each insert, if fewer than `headroom` unclaimed slots remain
//!   (`size() - free >= capacity - headroom`), both regions are replaced by
//!   regions of `size() + initial_capacity` slots. The first `size()` slots are
//!   copied across unchanged, so slot indices and the free list stay valid.
//!   The new regions are fully built before the old ones are released; if
//!   allocation fails the map is untouched.

use crate::config::MapConfig;
use crate::digest::{Digestible, EMPTY_DIGEST};
use crate::error::{MapError, Result};
use crate::observer::{MapEvent, MapObserver, TracingObserver};
use core::borrow::Borrow;
use core::fmt;
use core::marker::PhantomData;
use std::collections::{TryReserveError, VecDeque};

/// Metadata record for one slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Slot {
    digest: u64,
    index: usize,
}

impl Slot {
    const EMPTY: Slot = Slot {
        digest: EMPTY_DIGEST,
        index: 0,
    };

    #[inline]
    pub fn digest(&self) -> u64 {
        self.digest
    }

    /// Position of this slot's value in the value region.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn is_free(&self) -> bool {
        self.digest == EMPTY_DIGEST
    }
}

pub struct HashMap<K: ?Sized, V, O = TracingObserver> {
    slots: Vec<Slot>,
    values: Vec<V>,
    count: usize,
    free: VecDeque<usize>,
    // Claimed slots holding the sentinel digest; unreachable until `clear`.
    stranded: usize,
    config: MapConfig,
    observer: O,
    _key: PhantomData<fn(&K)>,
}

impl<K, V> HashMap<K, V>
where
    K: Digestible + ?Sized,
    V: Default + Clone,
{
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    /// # Panics
    ///
    /// If the initial regions cannot be allocated; see
    /// [`try_with_config_and_observer`](Self::try_with_config_and_observer).
    pub fn with_config(config: MapConfig) -> Self {
        Self::with_config_and_observer(config, TracingObserver)
    }

    pub fn try_with_config(config: MapConfig) -> Result<Self> {
        Self::try_with_config_and_observer(config, TracingObserver)
    }
}

impl<K, V> Default for HashMap<K, V>
where
    K: Digestible + ?Sized,
    V: Default + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, O> HashMap<K, V, O>
where
    K: Digestible + ?Sized,
    V: Default + Clone,
    O: MapObserver,
{
    pub fn with_observer(observer: O) -> Self {
        Self::with_config_and_observer(MapConfig::default(), observer)
    }

    /// # Panics
    ///
    /// If the initial regions cannot be allocated, e.g. when
    /// `config.initial_capacity()` exceeds the address space.
    pub fn with_config_and_observer(config: MapConfig, observer: O) -> Self {
        let (slots, values) = fresh_regions(config.initial_capacity());
        Self::from_regions(slots, values, config, observer)
    }

    /// Like [`with_config_and_observer`](Self::with_config_and_observer), but
    /// reports an unallocatable initial capacity as [`MapError::OutOfMemory`].
    pub fn try_with_config_and_observer(config: MapConfig, observer: O) -> Result<Self> {
        let requested = config.initial_capacity();
        match relocate(&[], &[], requested) {
            Ok((slots, values)) => Ok(Self::from_regions(slots, values, config, observer)),
            Err(source) => Err(MapError::OutOfMemory { requested, source }),
        }
    }

    fn from_regions(slots: Vec<Slot>, values: Vec<V>, config: MapConfig, observer: O) -> Self {
        Self {
            slots,
            values,
            count: 0,
            free: VecDeque::new(),
            stranded: 0,
            config,
            observer,
            _key: PhantomData,
        }
    }

    /// Store `value` under the digest of `key` and return the slot index used.
    ///
    /// The oldest reclaimed slot is reused first; otherwise the next unclaimed
    /// slot is taken. Existing entries with the same digest are left in place,
    /// so the new entry is only visible to lookups if it lands at a lower index.
    ///
    /// A key whose digest equals [`EMPTY_DIGEST`] is not remapped: it claims a
    /// slot that is indistinguishable from a free one and can never be found
    /// or removed.
    ///
    /// Fails with [`MapError::OutOfMemory`] if growth is required and the
    /// replacement regions cannot be allocated.
    pub fn insert<Q>(&mut self, key: &Q, value: V) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: Digestible + ?Sized,
    {
        self.reserve_headroom()?;

        let digest = key.digest();
        let index = match self.free.pop_front() {
            Some(index) => {
                self.observer.observe(&MapEvent::SlotReused { index });
                index
            }
            None => {
                let index = self.count;
                self.count += 1;
                self.observer.observe(&MapEvent::SlotClaimed { index });
                index
            }
        };

        if digest == EMPTY_DIGEST {
            self.stranded += 1;
        }
        self.slots[index] = Slot { digest, index };
        self.values[index] = value;
        Ok(index)
    }

    /// Value of the lowest-indexed live slot whose digest matches `key`.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Digestible + ?Sized,
    {
        let digest = key.digest();
        match self.find(digest) {
            Some(index) => Ok(&self.values[index]),
            None => Err(MapError::KeyNotFound { digest }),
        }
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Digestible + ?Sized,
    {
        let digest = key.digest();
        match self.find(digest) {
            Some(index) => Ok(&mut self.values[index]),
            None => Err(MapError::KeyNotFound { digest }),
        }
    }

    pub fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Digestible + ?Sized,
    {
        self.find(key.digest()).is_some()
    }

    /// Index of the slot `get` would read for `key`.
    pub fn slot_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Digestible + ?Sized,
    {
        self.find(key.digest())
    }

    /// Reclaim every live slot whose digest matches `key`, in index order.
    ///
    /// Keys that merely collide with `key` are removed too. Returns the number
    /// of slots reclaimed.
    pub fn remove<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Digestible + ?Sized,
    {
        let digest = key.digest();
        if self.count == 0 || digest == EMPTY_DIGEST {
            return 0;
        }

        let mut reclaimed = 0;
        for slot in self.slots.iter_mut().filter(|s| s.digest == digest) {
            let index = slot.index;
            self.free.push_back(index);
            // Drop the old value now instead of when the slot is reused.
            self.values[index] = V::default();
            *slot = Slot::EMPTY;
            self.observer.observe(&MapEvent::SlotReclaimed { index });
            reclaimed += 1;
        }
        reclaimed
    }

    /// Drop every entry and the free list, and reset capacity to the
    /// configured initial capacity.
    pub fn clear(&mut self) {
        let capacity = self.config.initial_capacity();
        let (slots, values) = fresh_regions(capacity);
        self.slots = slots;
        self.values = values;
        self.count = 0;
        self.free.clear();
        self.stranded = 0;
        self.observer.observe(&MapEvent::Cleared { capacity });
    }

    /// Number of slots ever claimed, including reclaimed ones.
    ///
    /// This is a high-water mark, not the number of entries; see [`len`](Self::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.count
    }

    /// Number of reachable entries: claimed slots that are neither on the
    /// free list nor stranded under the sentinel digest.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied() - self.stranded
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        debug_assert_eq!(self.slots.len(), self.values.len());
        self.slots.len()
    }

    /// Reclaimed slot indices, oldest first.
    pub fn free_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.free.iter().copied()
    }

    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    #[inline]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots[..self.count].iter(),
            values: &self.values,
        }
    }

    /// Claimed slots not on the free list, reachable or not. Drives growth.
    #[inline]
    fn occupied(&self) -> usize {
        self.count - self.free.len()
    }

    fn find(&self, digest: u64) -> Option<usize> {
        if digest == EMPTY_DIGEST {
            return None;
        }
        self.slots
            .iter()
            .find(|s| s.digest == digest)
            .map(|s| s.index)
    }

    fn reserve_headroom(&mut self) -> Result<()> {
        let live = self.occupied();
        let threshold = self.capacity().saturating_sub(self.config.headroom());
        if live < threshold {
            return Ok(());
        }
        self.grow_to(self.count + self.config.initial_capacity())
    }

    fn grow_to(&mut self, new_capacity: usize) -> Result<()> {
        let old_capacity = self.capacity();
        let claimed = self.count;
        let (slots, values) =
            match relocate(&self.slots[..claimed], &self.values[..claimed], new_capacity) {
                Ok(regions) => regions,
                Err(source) => {
                    self.observer.observe(&MapEvent::GrowthFailed {
                        requested: new_capacity,
                    });
                    return Err(MapError::OutOfMemory {
                        requested: new_capacity,
                        source,
                    });
                }
            };

        // Old regions are released here, after the new ones are complete.
        self.slots = slots;
        self.values = values;
        self.observer.observe(&MapEvent::Grew {
            old_capacity,
            new_capacity,
        });
        Ok(())
    }
}

fn fresh_regions<V: Default>(capacity: usize) -> (Vec<Slot>, Vec<V>) {
    let slots = vec![Slot::EMPTY; capacity];
    let values = std::iter::repeat_with(V::default).take(capacity).collect();
    (slots, values)
}

/// Build `capacity`-sized regions whose prefix copies `slots`/`values`.
fn relocate<V: Default + Clone>(
    slots: &[Slot],
    values: &[V],
    capacity: usize,
) -> core::result::Result<(Vec<Slot>, Vec<V>), TryReserveError> {
    debug_assert_eq!(slots.len(), values.len());
    debug_assert!(capacity >= slots.len());

    let mut new_slots = Vec::new();
    new_slots.try_reserve_exact(capacity)?;
    let mut new_values = Vec::new();
    new_values.try_reserve_exact(capacity)?;

    new_slots.extend_from_slice(slots);
    new_slots.resize(capacity, Slot::EMPTY);
    new_values.extend_from_slice(values);
    new_values.resize_with(capacity, V::default);
    Ok((new_slots, new_values))
}

/// Iterator over live entries of a [`HashMap`].
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot>,
    values: &'a [V],
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Slot, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let values = self.values;
        let slot = self.slots.by_ref().find(|s| !s.is_free())?;
        Some((*slot, &values[slot.index]))
    }
}

impl<K, V, O> fmt::Debug for HashMap<K, V, O>
where
    K: ?Sized,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live = self.slots[..self.count]
            .iter()
            .filter(|s| !s.is_free())
            .map(|s| (s.digest, &self.values[s.index]));
        f.debug_struct("HashMap")
            .field("size", &self.count)
            .field("capacity", &self.slots.len())
            .field("free", &self.free)
            .field("entries", &DebugEntries(live))
            .finish()
    }
}

struct DebugEntries<I>(I);

impl<I, V> fmt::Debug for DebugEntries<I>
where
    I: Iterator<Item = (u64, V)> + Clone,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.clone()).finish()
    }
}
