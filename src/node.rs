use std::{boxed::Box, vec};

/// The index of the next node at some level, `None` means the end of that level.
pub(crate) type Link = Option<u32>;

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
  pub(crate) key: K,
  pub(crate) value: V,
  // sized to the height of the node
  pub(crate) tower: Box<[Link]>,
}

impl<K, V> Node<K, V> {
  #[inline]
  pub(crate) fn new(key: K, value: V, height: usize) -> Self {
    debug_assert!(
      (1..=crate::MAX_HEIGHT).contains(&height),
      "tower height {height} out of range"
    );

    Self {
      key,
      value,
      tower: vec![None; height].into_boxed_slice(),
    }
  }

  #[inline]
  pub(crate) fn height(&self) -> usize {
    self.tower.len()
  }

  #[inline]
  pub(crate) fn next(&self, level: usize) -> Link {
    self.tower[level]
  }

  #[inline]
  pub(crate) fn set_next(&mut self, level: usize, next: Link) {
    self.tower[level] = next;
  }
}
