use core::fmt;

use rand::RngCore;

use super::{super::arena::Arena, random_height, Handle, SkipMap, Splice};

/// A reference to an entry of the skipmap.
///
/// This is the cursor of the map: [`next`](EntryRef::next) moves to the
/// following entry in key order. Two entry refs are equal when they point at
/// the same entry of the same map.
pub struct EntryRef<'a, K, V> {
  arena: &'a Arena<K, V>,
  idx: u32,
}

impl<K, V> Clone for EntryRef<'_, K, V> {
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<K, V> Copy for EntryRef<'_, K, V> {}

impl<K, V> PartialEq for EntryRef<'_, K, V> {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    core::ptr::eq(self.arena, other.arena) && self.idx == other.idx
  }
}

impl<K, V> Eq for EntryRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for EntryRef<'_, K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EntryRef")
      .field("key", self.key())
      .field("value", self.value())
      .finish()
  }
}

impl<'a, K, V> EntryRef<'a, K, V> {
  #[inline]
  pub(super) const fn new(arena: &'a Arena<K, V>, idx: u32) -> Self {
    Self { arena, idx }
  }

  /// Returns the reference to the key
  #[inline]
  pub fn key(&self) -> &'a K {
    &self.arena.node(self.idx).key
  }

  /// Returns the reference to the value
  #[inline]
  pub fn value(&self) -> &'a V {
    &self.arena.node(self.idx).value
  }

  /// Returns the key-value pair
  #[inline]
  pub fn key_value(&self) -> (&'a K, &'a V) {
    let node = self.arena.node(self.idx);
    (&node.key, &node.value)
  }

  /// Returns the height of the tower of this entry.
  #[inline]
  pub fn height(&self) -> usize {
    self.arena.node(self.idx).height()
  }

  /// Returns a handle to this entry, which outlives the borrow of the map.
  #[inline]
  pub fn handle(&self) -> Handle {
    self.arena.handle(self.idx)
  }

  /// Returns the entry following this one, or `None` if this is the last entry.
  #[inline]
  #[allow(clippy::should_implement_trait)]
  pub fn next(&self) -> Option<Self> {
    self
      .arena
      .node(self.idx)
      .next(0)
      .map(|idx| Self::new(self.arena, idx))
  }
}

/// A view into a single entry of the skipmap, which may be vacant or occupied.
///
/// Created by [`SkipMap::entry`].
pub enum Entry<'a, K, V, C, R> {
  /// An occupied entry.
  Occupied(OccupiedEntry<'a, K, V, C, R>),
  /// A vacant entry.
  Vacant(VacantEntry<'a, K, V, C, R>),
}

impl<K: fmt::Debug, V: fmt::Debug, C, R> fmt::Debug for Entry<'_, K, V, C, R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
      Self::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
    }
  }
}

impl<K, V, C, R> Entry<'_, K, V, C, R> {
  /// Returns the key of this entry.
  #[inline]
  pub fn key(&self) -> &K {
    match self {
      Self::Occupied(o) => o.key(),
      Self::Vacant(v) => v.key(),
    }
  }

  /// Calls `f` on the value if the entry is occupied.
  #[inline]
  pub fn and_modify<F: FnOnce(&mut V)>(self, f: F) -> Self {
    match self {
      Self::Occupied(mut o) => {
        f(o.get_mut());
        Self::Occupied(o)
      }
      Self::Vacant(v) => Self::Vacant(v),
    }
  }
}

impl<'a, K, V, C, R: RngCore> Entry<'a, K, V, C, R> {
  /// Inserts `default` if the entry is vacant, and returns the value.
  #[inline]
  pub fn or_insert(self, default: V) -> &'a mut V {
    match self {
      Self::Occupied(o) => o.into_mut(),
      Self::Vacant(v) => v.insert(default),
    }
  }

  /// Inserts the result of `default` if the entry is vacant, and returns the value.
  #[inline]
  pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
    match self {
      Self::Occupied(o) => o.into_mut(),
      Self::Vacant(v) => v.insert(default()),
    }
  }

  /// Inserts the result of `default` called with the key if the entry is
  /// vacant, and returns the value.
  #[inline]
  pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
    match self {
      Self::Occupied(o) => o.into_mut(),
      Self::Vacant(v) => {
        let value = default(v.key());
        v.insert(value)
      }
    }
  }

  /// Inserts `V::default()` if the entry is vacant, and returns the value.
  #[inline]
  pub fn or_default(self) -> &'a mut V
  where
    V: Default,
  {
    self.or_insert_with(V::default)
  }
}

/// A view into an occupied entry of the skipmap.
pub struct OccupiedEntry<'a, K, V, C, R> {
  map: &'a mut SkipMap<K, V, C, R>,
  idx: u32,
  splice: Splice,
}

impl<K: fmt::Debug, V: fmt::Debug, C, R> fmt::Debug for OccupiedEntry<'_, K, V, C, R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OccupiedEntry")
      .field("key", self.key())
      .field("value", self.get())
      .finish()
  }
}

impl<'a, K, V, C, R> OccupiedEntry<'a, K, V, C, R> {
  #[inline]
  pub(super) fn new(map: &'a mut SkipMap<K, V, C, R>, idx: u32, splice: Splice) -> Self {
    Self { map, idx, splice }
  }

  /// Returns the key of this entry.
  #[inline]
  pub fn key(&self) -> &K {
    &self.map.arena.node(self.idx).key
  }

  /// Returns the value of this entry.
  #[inline]
  pub fn get(&self) -> &V {
    &self.map.arena.node(self.idx).value
  }

  /// Returns the value of this entry mutably.
  #[inline]
  pub fn get_mut(&mut self) -> &mut V {
    &mut self.map.arena.node_mut(self.idx).value
  }

  /// Converts the entry into a mutable reference to its value, bound to the map borrow.
  #[inline]
  pub fn into_mut(self) -> &'a mut V {
    &mut self.map.arena.node_mut(self.idx).value
  }

  /// Returns a handle to this entry.
  #[inline]
  pub fn handle(&self) -> Handle {
    self.map.arena.handle(self.idx)
  }

  /// Replaces the value of this entry, returning the old one.
  #[inline]
  pub fn insert(&mut self, value: V) -> V {
    core::mem::replace(self.get_mut(), value)
  }

  /// Removes this entry from the map, returning its value.
  #[inline]
  pub fn remove(self) -> V {
    self.remove_entry().1
  }

  /// Removes this entry from the map, returning its key and value.
  #[inline]
  pub fn remove_entry(self) -> (K, V) {
    self.map.unlink(&self.splice, self.idx)
  }
}

/// A view into a vacant entry of the skipmap.
pub struct VacantEntry<'a, K, V, C, R> {
  map: &'a mut SkipMap<K, V, C, R>,
  key: K,
  splice: Splice,
}

impl<K: fmt::Debug, V, C, R> fmt::Debug for VacantEntry<'_, K, V, C, R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("VacantEntry").field(self.key()).finish()
  }
}

impl<'a, K, V, C, R> VacantEntry<'a, K, V, C, R> {
  #[inline]
  pub(super) fn new(map: &'a mut SkipMap<K, V, C, R>, key: K, splice: Splice) -> Self {
    Self { map, key, splice }
  }

  /// Returns the key that would be used when inserting.
  #[inline]
  pub fn key(&self) -> &K {
    &self.key
  }

  /// Takes back the key.
  #[inline]
  pub fn into_key(self) -> K {
    self.key
  }

  /// Inserts the value with a tower of the given height, and returns it.
  ///
  /// # Panics
  ///
  /// - If `height` is not in `1..=MAX_HEIGHT`.
  pub fn insert_at_height(self, height: usize, value: V) -> &'a mut V {
    assert!(
      (1..=crate::MAX_HEIGHT).contains(&height),
      "height {height} is out of range 1..={}",
      crate::MAX_HEIGHT
    );

    let Self { map, key, splice } = self;
    let idx = map.link(&splice, height, key, value);
    &mut map.arena.node_mut(idx).value
  }
}

impl<'a, K, V, C, R: RngCore> VacantEntry<'a, K, V, C, R> {
  /// Inserts the value with a random tower height, and returns it.
  #[inline]
  pub fn insert(self, value: V) -> &'a mut V {
    let height = random_height(&mut self.map.rng);
    self.insert_at_height(height, value)
  }
}
