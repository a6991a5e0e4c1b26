use core::{fmt, iter::FusedIterator, marker::PhantomData};

use super::{
  super::{
    arena::{Arena, Slot},
    node::{Link, Node},
  },
  SkipMap,
};

/// An iterator over the entries of a skipmap, in key order.
pub struct Iter<'a, K, V> {
  arena: &'a Arena<K, V>,
  next: Link,
  remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      arena: self.arena,
      next: self.next,
      remaining: self.remaining,
    }
  }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.clone()).finish()
  }
}

impl<'a, K, V> Iter<'a, K, V> {
  #[inline]
  pub(super) const fn new(arena: &'a Arena<K, V>, first: Link, len: usize) -> Self {
    Self {
      arena,
      next: first,
      remaining: len,
    }
  }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
  type Item = (&'a K, &'a V);

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    let idx = self.next?;
    let node = self.arena.node(idx);
    self.next = node.next(0);
    self.remaining -= 1;
    Some((&node.key, &node.value))
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a skipmap, in key order.
pub struct IterMut<'a, K, V> {
  slots: *mut Slot<K, V>,
  next: Link,
  remaining: usize,
  _marker: PhantomData<&'a mut Node<K, V>>,
}

// Safety: IterMut hands out `&K` and `&mut V`, the same as `&'a mut Arena<K, V>` would.
unsafe impl<K: Sync, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

impl<'a, K, V> IterMut<'a, K, V> {
  #[inline]
  pub(super) fn new(arena: &'a mut Arena<K, V>, first: Link, len: usize) -> Self {
    Self {
      slots: arena.as_mut_ptr(),
      next: first,
      remaining: len,
      _marker: PhantomData,
    }
  }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
  type Item = (&'a K, &'a mut V);

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    let idx = self.next?;

    // Safety: `idx` comes from a level-0 link, so it is an occupied slot of the
    // arena this iterator mutably borrows for `'a`. Level 0 is acyclic and every
    // node is visited once, so the returned borrows never alias.
    let slot: &'a mut Slot<K, V> = unsafe { &mut *self.slots.add(idx as usize) };
    let Node { key, value, tower } = slot.node_mut();
    self.next = tower[0];
    self.remaining -= 1;
    Some((&*key, value))
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a skipmap, in order.
pub struct Keys<'a, K, V>(pub(super) Iter<'a, K, V>);

impl<K, V> Clone for Keys<'_, K, V> {
  #[inline]
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
  type Item = &'a K;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.0.next().map(|(k, _)| k)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.0.size_hint()
  }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a skipmap, in key order.
pub struct Values<'a, K, V>(pub(super) Iter<'a, K, V>);

impl<K, V> Clone for Values<'_, K, V> {
  #[inline]
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
  type Item = &'a V;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.0.next().map(|(_, v)| v)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.0.size_hint()
  }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a skipmap, in key order.
pub struct ValuesMut<'a, K, V>(pub(super) IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
  type Item = &'a mut V;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.0.next().map(|(_, v)| v)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.0.size_hint()
  }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// An owning iterator over the entries of a skipmap, in key order.
pub struct IntoIter<K, V, C, R> {
  map: SkipMap<K, V, C, R>,
}

impl<K, V, C, R> IntoIter<K, V, C, R> {
  #[inline]
  pub(super) fn new(map: SkipMap<K, V, C, R>) -> Self {
    Self { map }
  }
}

impl<K, V, C, R> Iterator for IntoIter<K, V, C, R> {
  type Item = (K, V);

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.map.pop_first()
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.map.len(), Some(self.map.len()))
  }
}

impl<K, V, C, R> ExactSizeIterator for IntoIter<K, V, C, R> {}

impl<K, V, C, R> FusedIterator for IntoIter<K, V, C, R> {}
