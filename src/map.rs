use core::{borrow::Borrow, cmp, fmt, mem, ops::Index};

use rand::{rngs::SmallRng, RngCore};

use super::{
  arena::{Arena, Handle},
  node::{Link, Node},
  random_height, Ascend, Builder, Comparator, MAX_HEIGHT,
};

mod entry;
pub use entry::*;

mod error;
pub use error::InsertError;

mod iterator;
pub use iterator::*;

#[cfg(test)]
mod tests;

/// The predecessor of a key at every level. `None` stands for the head, so
/// the default splice is the right one for any level above the current height.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Splice {
  prev: [Link; MAX_HEIGHT],
}

/// An ordered map based on a skiplist.
///
/// Keys are kept sorted by the comparator `C` ([`Ascend`] by default), every
/// key appears at most once. Lookups, insertions and removals take expected
/// `O(log n)` comparisons. The tower height of each new entry is drawn from
/// the random source `R`; see [`Builder`] to inject a seed or a source.
///
/// Unlike [`BTreeMap`](std::collections::BTreeMap), inserting an existing key
/// does not replace its value, the map is left untouched and the insertion
/// reports failure.
pub struct SkipMap<K, V, C = Ascend, R = SmallRng> {
  arena: Arena<K, V>,
  head: [Link; MAX_HEIGHT],
  /// Highest level in use, `0 <= height <= MAX_HEIGHT`.
  height: usize,
  cmp: C,
  rng: R,
}

impl<K, V> SkipMap<K, V> {
  /// Creates an empty map ordered by [`Ascend`], seeded by the OS.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert("a", 1);
  /// ```
  #[inline]
  pub fn new() -> Self {
    Builder::new().build()
  }

  /// Creates an empty map with room for `capacity` entries.
  #[inline]
  pub fn with_capacity(capacity: usize) -> Self {
    Builder::new().with_capacity(capacity).build()
  }
}

impl<K, V, C: Default> Default for SkipMap<K, V, C> {
  #[inline]
  fn default() -> Self {
    Builder::new().with_comparator(C::default()).build()
  }
}

// --------------------------------Public Methods--------------------------------
impl<K, V, C, R> SkipMap<K, V, C, R> {
  #[inline]
  pub(crate) fn with_parts(capacity: usize, cmp: C, rng: R) -> Self {
    Self {
      arena: Arena::with_capacity(capacity),
      head: [None; MAX_HEIGHT],
      height: 0,
      cmp,
      rng,
    }
  }

  /// Returns the number of entries in the map.
  #[inline]
  pub const fn len(&self) -> usize {
    self.arena.allocated()
  }

  /// Returns `true` if the map contains no entries.
  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the height of the highest tower in the map, `0` when empty.
  #[inline]
  pub const fn height(&self) -> usize {
    self.height
  }

  /// Returns the number of entries the map can hold without reallocating.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.arena.capacity()
  }

  /// Reserves room for at least `additional` more entries.
  #[inline]
  pub fn reserve(&mut self, additional: usize) {
    self.arena.reserve(additional);
  }

  /// Returns the comparator of the map.
  #[inline]
  pub const fn comparator(&self) -> &C {
    &self.cmp
  }

  /// Removes every entry. The allocation is kept, handles to the removed
  /// entries stop resolving.
  pub fn clear(&mut self) {
    self.arena.clear();
    self.head = [None; MAX_HEIGHT];
    self.height = 0;
  }

  /// Exchanges the entries of two maps in constant time.
  ///
  /// Only the entries move, each map keeps its own comparator and random source.
  /// Handles follow their entries into the other map.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::SkipMap;
  ///
  /// let mut a = SkipMap::from([(1, "a")]);
  /// let mut b = SkipMap::new();
  /// a.swap(&mut b);
  /// assert!(a.is_empty());
  /// assert_eq!(b.get(&1), Some(&"a"));
  /// ```
  pub fn swap(&mut self, other: &mut Self) {
    mem::swap(&mut self.arena, &mut other.arena);
    mem::swap(&mut self.head, &mut other.head);
    mem::swap(&mut self.height, &mut other.height);
  }

  /// Returns the first entry of the map, or `None` if the map is empty.
  #[inline]
  pub fn first(&self) -> Option<EntryRef<'_, K, V>> {
    self.head[0].map(|idx| EntryRef::new(&self.arena, idx))
  }

  /// Returns the last entry of the map, or `None` if the map is empty.
  pub fn last(&self) -> Option<EntryRef<'_, K, V>> {
    let mut prev = None;
    for level in (0..self.height).rev() {
      while let Some(next) = self.next_of(prev, level) {
        prev = Some(next);
      }
    }
    prev.map(|idx| EntryRef::new(&self.arena, idx))
  }

  /// Removes the first entry of the map and returns it.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::SkipMap;
  ///
  /// let mut map = SkipMap::from([(2, "b"), (1, "a")]);
  /// assert_eq!(map.pop_first(), Some((1, "a")));
  /// assert_eq!(map.len(), 1);
  /// ```
  pub fn pop_first(&mut self) -> Option<(K, V)> {
    let first = self.head[0]?;
    // Nothing precedes the first node, the head is its predecessor on every level.
    Some(self.unlink(&Splice::default(), first))
  }

  /// Returns the entry a handle refers to, or `None` if that entry has been
  /// removed or the handle was taken from another map.
  #[inline]
  pub fn get_by_handle(&self, handle: Handle) -> Option<EntryRef<'_, K, V>> {
    self
      .arena
      .resolve(handle)
      .map(|idx| EntryRef::new(&self.arena, idx))
  }

  /// Returns an iterator over the entries of the map, in key order.
  #[inline]
  pub fn iter(&self) -> Iter<'_, K, V> {
    Iter::new(&self.arena, self.head[0], self.len())
  }

  /// Returns an iterator over the entries of the map with mutable values, in key order.
  #[inline]
  pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
    let len = self.len();
    IterMut::new(&mut self.arena, self.head[0], len)
  }

  /// Returns an iterator over the keys of the map, in order.
  #[inline]
  pub fn keys(&self) -> Keys<'_, K, V> {
    Keys(self.iter())
  }

  /// Returns an iterator over the values of the map, in key order.
  #[inline]
  pub fn values(&self) -> Values<'_, K, V> {
    Values(self.iter())
  }

  /// Returns an iterator over mutable references to the values of the map, in key order.
  #[inline]
  pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
    ValuesMut(self.iter_mut())
  }
}

impl<K, V, C, R: RngCore> SkipMap<K, V, C, R> {
  /// Draws a tower height from the random source of the map.
  ///
  /// Combined with [`insert_at_height`](SkipMap::insert_at_height) this splits
  /// the drawing from the insertion.
  #[inline]
  pub fn random_height(&mut self) -> usize {
    random_height(&mut self.rng)
  }
}

impl<K, V, C, R> SkipMap<K, V, C, R>
where
  C: Comparator<K>,
{
  /// Inserts a key-value pair if the key is not in the map yet.
  ///
  /// Returns a reference to the value stored under `key` and whether the
  /// insertion happened. On a duplicated key the map is left untouched,
  /// the reference points to the existing value and the given pair is dropped.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// assert!(map.insert(5, "a").1);
  ///
  /// let (v, inserted) = map.insert(5, "b");
  /// assert!(!inserted);
  /// assert_eq!(*v, "a");
  /// assert_eq!(map.len(), 1);
  /// ```
  pub fn insert(&mut self, key: K, value: V) -> (&mut V, bool)
  where
    R: RngCore,
  {
    let mut splice = Splice::default();
    if let Some(idx) = self.find_splice(&key, Some(&mut splice)) {
      return (&mut self.arena.node_mut(idx).value, false);
    }

    let height = random_height(&mut self.rng);
    let idx = self.link(&splice, height, key, value);
    (&mut self.arena.node_mut(idx).value, true)
  }

  /// Inserts a key-value pair, or gives it back if the key is already in the map.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// assert_eq!(map.try_insert(1, "a").map(|v| *v), Ok("a"));
  ///
  /// let err = map.try_insert(1, "b").unwrap_err();
  /// assert_eq!(err.into_inner(), (1, "b"));
  /// ```
  pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, InsertError<K, V>>
  where
    R: RngCore,
  {
    let mut splice = Splice::default();
    if self.find_splice(&key, Some(&mut splice)).is_some() {
      return Err(InsertError::new(key, value));
    }

    let height = random_height(&mut self.rng);
    let idx = self.link(&splice, height, key, value);
    Ok(&mut self.arena.node_mut(idx).value)
  }

  /// Like [`insert`](SkipMap::insert), but the new entry gets a tower of the
  /// given height instead of a random one.
  ///
  /// # Panics
  ///
  /// - If `height` is not in `1..=MAX_HEIGHT`.
  pub fn insert_at_height(&mut self, height: usize, key: K, value: V) -> (&mut V, bool) {
    assert!(
      (1..=MAX_HEIGHT).contains(&height),
      "height {height} is out of range 1..={MAX_HEIGHT}"
    );

    let mut splice = Splice::default();
    if let Some(idx) = self.find_splice(&key, Some(&mut splice)) {
      return (&mut self.arena.node_mut(idx).value, false);
    }

    let idx = self.link(&splice, height, key, value);
    (&mut self.arena.node_mut(idx).value, true)
  }

  /// Gets the entry of `key` for in-place manipulation.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::SkipMap;
  ///
  /// let mut counts = SkipMap::new();
  /// for word in ["a", "b", "a"] {
  ///   *counts.entry(word).or_insert(0) += 1;
  /// }
  /// assert_eq!(counts.get("a"), Some(&2));
  /// ```
  pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C, R> {
    let mut splice = Splice::default();
    match self.find_splice(&key, Some(&mut splice)) {
      Some(idx) => Entry::Occupied(OccupiedEntry::new(self, idx, splice)),
      None => Entry::Vacant(VacantEntry::new(self, key, splice)),
    }
  }

  /// Returns a mutable reference to the value of `key`, inserting
  /// `V::default()` first if the key is absent.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::SkipMap;
  ///
  /// let mut map: SkipMap<u32, String> = SkipMap::new();
  /// *map.get_or_insert_default(7) = "x".to_string();
  /// assert_eq!(map.len(), 1);
  /// assert_eq!(map.get(&7).map(String::as_str), Some("x"));
  /// ```
  #[inline]
  pub fn get_or_insert_default(&mut self, key: K) -> &mut V
  where
    V: Default,
    R: RngCore,
  {
    self.entry(key).or_default()
  }

  /// Removes the entry a handle refers to and returns it, or `None` if that
  /// entry has already been removed or the handle was taken from another map.
  pub fn remove_handle(&mut self, handle: Handle) -> Option<(K, V)> {
    let target = self.arena.resolve(handle)?;
    let mut splice = Splice::default();
    let found = self.find_splice(&self.arena.node(target).key, Some(&mut splice))?;
    debug_assert_eq!(found, target, "skipmap: handle resolved to another node");
    Some(self.unlink(&splice, found))
  }
}

impl<K, V, C, R> SkipMap<K, V, C, R> {
  /// Returns the entry of `key`, or `None` if the key is absent.
  ///
  /// The returned [`EntryRef`] is a cursor, [`EntryRef::next`] walks the
  /// following entries in order.
  #[inline]
  pub fn find<Q>(&self, key: &Q) -> Option<EntryRef<'_, K, V>>
  where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
  {
    self
      .find_splice(key, None)
      .map(|idx| EntryRef::new(&self.arena, idx))
  }

  /// Returns `true` if the map contains `key`.
  #[inline]
  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
  {
    self.find_splice(key, None).is_some()
  }

  /// Returns a reference to the value of `key`.
  #[inline]
  pub fn get<Q>(&self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
  {
    self
      .find_splice(key, None)
      .map(|idx| &self.arena.node(idx).value)
  }

  /// Returns the key-value pair stored under `key`.
  #[inline]
  pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
  where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
  {
    self.find_splice(key, None).map(|idx| {
      let node = self.arena.node(idx);
      (&node.key, &node.value)
    })
  }

  /// Returns a mutable reference to the value of `key`.
  #[inline]
  pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
  where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
  {
    let idx = self.find_splice(key, None)?;
    Some(&mut self.arena.node_mut(idx).value)
  }

  /// Removes `key` from the map, returning its value.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::SkipMap;
  ///
  /// let mut map = SkipMap::<u32, u32>::new();
  /// assert_eq!(map.remove(&99), None);
  /// assert_eq!(map.len(), 0);
  /// ```
  #[inline]
  pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
  {
    self.remove_entry(key).map(|(_, v)| v)
  }

  /// Removes `key` from the map, returning the stored key and value.
  pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
  where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
  {
    let mut splice = Splice::default();
    let target = self.find_splice(key, Some(&mut splice))?;
    Some(self.unlink(&splice, target))
  }
}

// --------------------------------Private Methods--------------------------------
impl<K, V, C, R> SkipMap<K, V, C, R> {
  #[inline]
  fn next_of(&self, prev: Link, level: usize) -> Link {
    match prev {
      None => self.head[level],
      Some(idx) => self.arena.node(idx).next(level),
    }
  }

  #[inline]
  fn set_next(&mut self, prev: Link, level: usize, next: Link) {
    match prev {
      None => self.head[level] = next,
      Some(idx) => self.arena.node_mut(idx).set_next(level, next),
    }
  }

  /// Walks down from the highest level, on each level advancing while the next
  /// key is less than `key`. Records the last node visited on every level in
  /// `splice` when one is given, and returns the node holding `key` if any.
  fn find_splice<Q>(&self, key: &Q, mut splice: Option<&mut Splice>) -> Option<u32>
  where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
  {
    let mut prev = None;
    for level in (0..self.height).rev() {
      while let Some(next) = self.next_of(prev, level) {
        let next_key: &Q = self.arena.node(next).key.borrow();
        if self.cmp.compare(next_key, key) != cmp::Ordering::Less {
          break;
        }
        prev = Some(next);
      }

      if let Some(spl) = splice.as_deref_mut() {
        spl.prev[level] = prev;
      }
    }

    let next = self.next_of(prev, 0)?;
    let next_key: &Q = self.arena.node(next).key.borrow();
    match self.cmp.compare(next_key, key) {
      cmp::Ordering::Equal => Some(next),
      _ => None,
    }
  }

  /// Links a new node right after the predecessors recorded in `splice`.
  ///
  /// The splice must come from a search for `key` on the current state of the map.
  fn link(&mut self, splice: &Splice, height: usize, key: K, value: V) -> u32 {
    let mut node = Node::new(key, value, height);
    // Above the current height the splice holds the head, whose links are all empty.
    for level in 0..height {
      node.set_next(level, self.next_of(splice.prev[level], level));
    }

    let idx = self.arena.alloc(node);
    for level in 0..height {
      self.set_next(splice.prev[level], level, Some(idx));
    }

    if height > self.height {
      #[cfg(feature = "tracing")]
      tracing::trace!(from = self.height, to = height, "skipmap height raised");

      self.height = height;
    }

    idx
  }

  /// Unlinks `target` from every level it occupies, frees it and lowers the
  /// height while the top level is empty.
  fn unlink(&mut self, splice: &Splice, target: u32) -> (K, V) {
    let height = self.arena.node(target).height();

    let mut level = 0;
    while level < height && self.next_of(splice.prev[level], level) == Some(target) {
      let next = self.arena.node(target).next(level);
      self.set_next(splice.prev[level], level, next);
      level += 1;
    }
    debug_assert_eq!(
      level, height,
      "skipmap: node unlinked from {level} of its {height} levels"
    );

    let Node { key, value, .. } = self.arena.dealloc(target);

    while self.height > 0 && self.head[self.height - 1].is_none() {
      self.height -= 1;

      #[cfg(feature = "tracing")]
      tracing::trace!(height = self.height, "skipmap height lowered");
    }

    (key, value)
  }
}

impl<K, V, C, R> Clone for SkipMap<K, V, C, R>
where
  K: Clone,
  V: Clone,
  C: Clone,
  R: Clone,
{
  fn clone(&self) -> Self {
    Self {
      arena: self.arena.clone(),
      head: self.head,
      height: self.height,
      cmp: self.cmp.clone(),
      rng: self.rng.clone(),
    }
  }
}

impl<K: fmt::Debug, V: fmt::Debug, C, R> fmt::Debug for SkipMap<K, V, C, R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}

impl<K: PartialEq, V: PartialEq, C, R> PartialEq for SkipMap<K, V, C, R> {
  fn eq(&self, other: &Self) -> bool {
    self.len() == other.len() && self.iter().eq(other.iter())
  }
}

impl<K: Eq, V: Eq, C, R> Eq for SkipMap<K, V, C, R> {}

impl<K, V, C, R, Q> Index<&Q> for SkipMap<K, V, C, R>
where
  K: Borrow<Q>,
  Q: ?Sized,
  C: Comparator<Q>,
{
  type Output = V;

  /// Returns a reference to the value of `key`.
  ///
  /// # Panics
  ///
  /// - If the key is not in the map.
  #[inline]
  fn index(&self, key: &Q) -> &V {
    match self.get(key) {
      Some(v) => v,
      None => panic!("no entry found for key"),
    }
  }
}

/// Pairs with an already present key are dropped, the first occurrence wins.
impl<K, V, C, R> Extend<(K, V)> for SkipMap<K, V, C, R>
where
  C: Comparator<K>,
  R: RngCore,
{
  fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
    for (k, v) in iter {
      self.insert(k, v);
    }
  }
}

impl<K, V, C> FromIterator<(K, V)> for SkipMap<K, V, C>
where
  C: Comparator<K> + Default,
{
  fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
    let mut map = Self::default();
    map.extend(iter);
    map
  }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for SkipMap<K, V> {
  fn from(arr: [(K, V); N]) -> Self {
    let mut map = Self::with_capacity(N);
    map.extend(arr);
    map
  }
}

impl<K, V, C, R> IntoIterator for SkipMap<K, V, C, R> {
  type Item = (K, V);
  type IntoIter = IntoIter<K, V, C, R>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    IntoIter::new(self)
  }
}

impl<'a, K, V, C, R> IntoIterator for &'a SkipMap<K, V, C, R> {
  type Item = (&'a K, &'a V);
  type IntoIter = Iter<'a, K, V>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a, K, V, C, R> IntoIterator for &'a mut SkipMap<K, V, C, R> {
  type Item = (&'a K, &'a mut V);
  type IntoIter = IterMut<'a, K, V>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter_mut()
  }
}

#[cfg(test)]
impl<K, V, C, R> SkipMap<K, V, C, R>
where
  C: Comparator<K>,
{
  /// The slot indices of the nodes on `level`, in order.
  pub(crate) fn level(&self, level: usize) -> std::vec::Vec<u32> {
    let mut out = std::vec::Vec::new();
    let mut next = self.head[level];
    while let Some(idx) = next {
      out.push(idx);
      next = self.arena.node(idx).next(level);
    }
    out
  }

  /// The tower heights of the nodes, in key order.
  pub(crate) fn tower_heights(&self) -> std::vec::Vec<usize> {
    self
      .level(0)
      .into_iter()
      .map(|idx| self.arena.node(idx).height())
      .collect()
  }

  /// Panics if any structural invariant of the skiplist does not hold.
  pub(crate) fn check_invariants(&self) {
    let base = self.level(0);
    assert_eq!(base.len(), self.len(), "len does not match level 0");

    for level in 0..MAX_HEIGHT {
      let chain = self.level(level);

      for pair in chain.windows(2) {
        let (a, b) = (self.arena.node(pair[0]), self.arena.node(pair[1]));
        assert_eq!(
          self.cmp.compare(&a.key, &b.key),
          cmp::Ordering::Less,
          "level {level} is not strictly increasing"
        );
      }

      // a level is exactly the level-0 nodes whose tower reaches it.
      let expected: std::vec::Vec<u32> = base
        .iter()
        .copied()
        .filter(|&idx| self.arena.node(idx).height() > level)
        .collect();
      assert_eq!(chain, expected, "level {level} is not nested in level 0");

      if level >= self.height {
        assert!(self.head[level].is_none(), "level {level} above height is not empty");
      }
    }

    let heights = self.tower_heights();
    assert!(heights.iter().all(|h| (1..=MAX_HEIGHT).contains(h)));
    assert_eq!(heights.iter().copied().max().unwrap_or(0), self.height);
  }
}
