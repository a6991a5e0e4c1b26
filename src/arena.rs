use core::sync::atomic::{AtomicU64, Ordering};
use std::vec::Vec;

use super::node::Node;

/// Source of arena ids, every arena (and so every map) gets its own.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

#[inline]
fn next_id() -> u64 {
  NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A detached position of an entry in a [`SkipMap`](crate::SkipMap).
///
/// A handle stays valid until its entry is removed. After that it never
/// resolves again, even when the slot is reused by a later insertion,
/// because every reuse bumps the slot generation. A handle only resolves in
/// the map it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
  arena: u64,
  index: u32,
  generation: u64,
}

impl Handle {
  #[inline]
  pub(crate) const fn new(arena: u64, index: u32, generation: u64) -> Self {
    Self {
      arena,
      index,
      generation,
    }
  }

  #[inline]
  pub(crate) const fn index(&self) -> u32 {
    self.index
  }
}

#[derive(Debug, Clone)]
enum State<K, V> {
  Occupied(Node<K, V>),
  Vacant { next_free: Option<u32> },
}

#[derive(Debug, Clone)]
pub(crate) struct Slot<K, V> {
  // bumped on every free, 64 bits do not wrap in practice
  generation: u64,
  state: State<K, V>,
}

impl<K, V> Slot<K, V> {
  #[inline]
  pub(crate) fn node_mut(&mut self) -> &mut Node<K, V> {
    match &mut self.state {
      State::Occupied(node) => node,
      State::Vacant { .. } => unreachable!("skipmap: link points to a vacant slot"),
    }
  }
}

/// The owner of every node of a skipmap.
///
/// Nodes never move between slots, so a slot index is a stable reference for
/// as long as the node lives. Freed slots are chained in a freelist and handed
/// out again before the backing vector grows.
#[derive(Debug)]
pub(crate) struct Arena<K, V> {
  id: u64,
  slots: Vec<Slot<K, V>>,
  free: Option<u32>,
  allocated: usize,
}

impl<K, V> Default for Arena<K, V> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

/// The copy gets a fresh id, handles of the source do not resolve in it.
impl<K: Clone, V: Clone> Clone for Arena<K, V> {
  fn clone(&self) -> Self {
    Self {
      id: next_id(),
      slots: self.slots.clone(),
      free: self.free,
      allocated: self.allocated,
    }
  }
}

impl<K, V> Arena<K, V> {
  #[inline]
  pub(crate) fn new() -> Self {
    Self::with_capacity(0)
  }

  #[inline]
  pub(crate) fn with_capacity(cap: usize) -> Self {
    Self {
      id: next_id(),
      slots: Vec::with_capacity(cap),
      free: None,
      allocated: 0,
    }
  }

  /// Returns the number of nodes the arena can hold without reallocating.
  #[inline]
  pub(crate) fn capacity(&self) -> usize {
    self.slots.capacity() - self.allocated
  }

  #[inline]
  pub(crate) fn reserve(&mut self, additional: usize) {
    let free = self.slots.len() - self.allocated;
    if additional > free {
      self.slots.reserve(additional - free);
    }
  }

  /// Returns the number of live nodes.
  #[inline]
  pub(crate) const fn allocated(&self) -> usize {
    self.allocated
  }

  pub(crate) fn alloc(&mut self, node: Node<K, V>) -> u32 {
    self.allocated += 1;

    match self.free {
      Some(idx) => {
        let slot = &mut self.slots[idx as usize];
        match slot.state {
          State::Vacant { next_free } => self.free = next_free,
          State::Occupied(_) => unreachable!("skipmap: freelist points to an occupied slot"),
        }
        slot.state = State::Occupied(node);
        idx
      }
      None => {
        let idx = u32::try_from(self.slots.len()).unwrap_or_else(|_| {
          panic!("skipmap: cannot hold more than {} entries", u32::MAX)
        });
        self.slots.push(Slot {
          generation: 0,
          state: State::Occupied(node),
        });
        idx
      }
    }
  }

  pub(crate) fn dealloc(&mut self, idx: u32) -> Node<K, V> {
    let slot = &mut self.slots[idx as usize];
    let old = core::mem::replace(
      &mut slot.state,
      State::Vacant {
        next_free: self.free,
      },
    );

    match old {
      State::Occupied(node) => {
        slot.generation += 1;
        self.free = Some(idx);
        self.allocated -= 1;
        node
      }
      State::Vacant { .. } => unreachable!("skipmap: double free of slot {idx}"),
    }
  }

  /// Drops every node but keeps the slots, so outstanding handles stay stale.
  pub(crate) fn clear(&mut self) {
    let mut free = None;
    for (idx, slot) in self.slots.iter_mut().enumerate().rev() {
      if let State::Occupied(_) = slot.state {
        slot.generation += 1;
      }
      slot.state = State::Vacant { next_free: free };
      free = Some(idx as u32);
    }
    self.free = free;
    self.allocated = 0;
  }

  #[inline]
  pub(crate) fn node(&self, idx: u32) -> &Node<K, V> {
    match &self.slots[idx as usize].state {
      State::Occupied(node) => node,
      State::Vacant { .. } => unreachable!("skipmap: link points to a vacant slot"),
    }
  }

  #[inline]
  pub(crate) fn node_mut(&mut self, idx: u32) -> &mut Node<K, V> {
    self.slots[idx as usize].node_mut()
  }

  #[inline]
  pub(crate) fn handle(&self, idx: u32) -> Handle {
    Handle::new(self.id, idx, self.slots[idx as usize].generation)
  }

  /// Returns the slot index if the handle still refers to a live node of this arena.
  #[inline]
  pub(crate) fn resolve(&self, handle: Handle) -> Option<u32> {
    if handle.arena != self.id {
      return None;
    }
    let slot = self.slots.get(handle.index() as usize)?;
    match slot.state {
      State::Occupied(_) if slot.generation == handle.generation => Some(handle.index()),
      _ => None,
    }
  }

  /// Returns the base pointer of the slots, used by the mutable iterators
  /// to hand out disjoint borrows of different nodes.
  #[inline]
  pub(crate) fn as_mut_ptr(&mut self) -> *mut Slot<K, V> {
    self.slots.as_mut_ptr()
  }
}
