//! digest-hashmap: a single-threaded map that identifies entries by key
//! digest alone, and a value wrapper gated by read/write permissions.
//!
//! Internal Design:
//!
//! Summary
//! - `HashMap<K, V, O>`: two parallel regions (slot metadata and values)
//!   of equal capacity, a claimed-slot count, and a FIFO free list of
//!   reclaimed slot indices. Lookups are linear scans.
//! - `Digestible`: the digest family. Only integer and text keys have one;
//!   any other key type fails to compile.
//! - `LockedItem<T>`: one owned value plus a `Permissions` set.
//!
//! Constraints
//! - Single-threaded, synchronous; every operation is O(capacity).
//! - Keys are never stored. Equal digests mean equal identity: lookups
//!   return the lowest matching slot and removal reclaims every match.
//! - `size()` is the count of slots ever claimed (a high-water mark);
//!   `len()` is the count of reachable entries. Slots stranded under the
//!   sentinel digest count toward `size()` and growth, never toward `len()`.
//! - Capacity only grows, except through `clear()`, which resets it.
//!
//! Failure boundaries
//! - `get` on an absent digest returns `MapError::KeyNotFound`.
//! - Growth allocates through `try_reserve_exact`; failure returns
//!   `MapError::OutOfMemory` and leaves the old regions in place.
//! - Nothing on `LockedItem` fails. Denied access degrades to a default
//!   value or `false` and raises a one-shot error flag.
//!
//! Diagnostics
//! - Each map owns a `MapObserver` chosen at construction. The default,
//!   `TracingObserver`, emits `tracing` events; `NoopObserver` drops them.
//!
//! Notes and non-goals
//! - No thread-safety, persistence, or iteration order beyond slot order.
//! - Digest `0` is the free-slot sentinel and is not remapped: a key that
//!   digests to `0` occupies a slot but is never found.

pub mod config;
pub mod digest;
pub mod error;
pub mod hash_map;
mod hash_map_proptest;
pub mod locked_item;
pub mod observer;

// Public surface
pub use config::MapConfig;
pub use digest::{Digestible, EMPTY_DIGEST};
pub use error::{ConfigError, MapError};
pub use hash_map::{HashMap, Slot};
pub use locked_item::{LockedItem, Permission, Permissions};
pub use observer::{MapEvent, MapObserver, NoopObserver, TracingObserver};
