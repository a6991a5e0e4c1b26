//! A single-threaded ordered map based on a skiplist.
//!
//! Nodes are owned by an arena inside the map and linked to each other by slot
//! index, so removing an entry never invalidates the position of any other one.
//! Every node gets a random height when it is inserted; balance is purely
//! statistical and no rebalancing ever happens.
//!
//! # Example
//!
//! ```rust
//! use uskl::SkipMap;
//!
//! let mut map = SkipMap::new();
//!
//! for k in [5, 3, 8, 1] {
//!   map.insert(k, k * 10);
//! }
//!
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 5, 8]);
//!
//! // duplicated keys are rejected, the old value stays.
//! let (value, inserted) = map.insert(5, 0);
//! assert!(!inserted);
//! assert_eq!(*value, 50);
//!
//! *map.get_or_insert_default(7) += 1;
//! assert_eq!(map.get(&7), Some(&1));
//!
//! assert_eq!(map.remove(&3), Some(30));
//! assert!(!map.contains_key(&3));
//! ```
//!
//! # Deterministic shape
//!
//! The tower heights are drawn from a per-map random source. Use
//! [`Builder::with_seed`] (or [`Builder::build_with_rng`]) to get the same
//! shape on every run.
//!
//! ```rust
//! use uskl::{Builder, Descend};
//!
//! let mut map = Builder::new()
//!   .with_comparator(Descend)
//!   .with_seed(42)
//!   .build::<u32, &str>();
//!
//! map.insert(1, "a");
//! map.insert(2, "b");
//! assert_eq!(map.first().unwrap().key(), &2);
//! ```
#![cfg_attr(not(all(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

#[cfg(feature = "std")]
extern crate std;

use core::cmp;

use rand::RngCore;

mod arena;
pub use arena::Handle;

mod node;

mod builder;
pub use builder::Builder;

mod options;
pub use options::Options;

/// A map implementation based on skiplist
pub mod map;
pub use map::{Entry, EntryRef, InsertError, OccupiedEntry, SkipMap, VacantEntry};

pub use rand;

/// The maximum height of a tower, also the number of links held by the head.
pub const MAX_HEIGHT: usize = 16;

/// The inverse of the probability that a tower grows by one more level.
pub const BRANCHING: u32 = 4;

/// Precompute the skiplist probabilities so that only a single random number
/// needs to be generated per insertion. `PROBABILITIES[h]` is the threshold a
/// draw must not exceed for a tower of height `h` to grow to `h + 1`.
const PROBABILITIES: [u32; MAX_HEIGHT] = {
  const P: f64 = 1.0 / BRANCHING as f64;

  let mut probabilities = [0; MAX_HEIGHT];
  let mut p = 1f64;

  let mut i = 0;
  while i < MAX_HEIGHT {
    probabilities[i] = ((u32::MAX as f64) * p) as u32;
    p *= P;
    i += 1;
  }

  probabilities
};

/// Draws a tower height in `1..=MAX_HEIGHT`, the expected number of towers
/// reaching level `i` is `n / BRANCHING^i`.
#[inline]
fn random_height<R: RngCore + ?Sized>(rng: &mut R) -> usize {
  let rnd = rng.next_u32();
  let mut h = 1;

  while h < MAX_HEIGHT && rnd <= PROBABILITIES[h] {
    h += 1;
  }
  h
}

/// Comparator defines the total order of the keys in a [`SkipMap`].
///
/// Two keys are considered equal when `compare` returns [`Ordering::Equal`](cmp::Ordering::Equal).
///
/// Any `Fn(&K, &K) -> Ordering` closure is a comparator.
pub trait Comparator<K: ?Sized> {
  /// Compares two keys.
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering;
}

impl<K, F> Comparator<K> for F
where
  K: ?Sized,
  F: Fn(&K, &K) -> cmp::Ordering,
{
  #[inline]
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering {
    self(a, b)
  }
}

/// Ascend is a comparator that orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ascend;

impl<K: ?Sized + Ord> Comparator<K> for Ascend {
  #[inline]
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering {
    a.cmp(b)
  }
}

/// Descend is a comparator that orders keys in the reverse of their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Descend;

impl<K: ?Sized + Ord> Comparator<K> for Descend {
  #[inline]
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering {
    b.cmp(a)
  }
}
