use rand::{rngs::SmallRng, RngCore, SeedableRng};

use super::{Ascend, Options, SkipMap};

/// The builder to build [`SkipMap`]
#[derive(Debug, Clone, Copy)]
pub struct Builder<C = Ascend> {
  opts: Options,
  cmp: C,
}

impl Default for Builder {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Builder {
  /// Create a new `Builder` with default values.
  #[inline]
  pub const fn new() -> Self {
    Self {
      opts: Options::new(),
      cmp: Ascend,
    }
  }
}

impl<C> Builder<C> {
  /// Returns a new map builder with the new [`Comparator`](super::Comparator).
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::{Builder, Descend};
  ///
  /// let builder = Builder::new().with_comparator(Descend);
  /// ```
  #[inline]
  pub fn with_comparator<NC>(self, cmp: NC) -> Builder<NC> {
    Builder {
      cmp,
      opts: self.opts,
    }
  }

  /// Returns a new map builder with the new [`Options`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::{Builder, Options};
  ///
  /// let builder = Builder::new().with_options(Options::new().with_capacity(1024));
  /// ```
  #[inline]
  pub fn with_options(mut self, opts: Options) -> Self {
    self.opts = opts;
    self
  }

  /// Sets the number of entries the map can hold before its arena has to grow.
  ///
  /// The default value is `0`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::Builder;
  ///
  /// let builder = Builder::new().with_capacity(1024);
  /// ```
  #[inline]
  pub fn with_capacity(mut self, capacity: usize) -> Self {
    self.opts.capacity = capacity;
    self
  }

  /// Sets the seed of the random source used to draw tower heights.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::Builder;
  ///
  /// let builder = Builder::new().with_seed(42);
  /// ```
  #[inline]
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.opts.seed = Some(seed);
    self
  }

  /// Returns the options of the builder.
  #[inline]
  pub const fn options(&self) -> &Options {
    &self.opts
  }

  /// Returns the comparator of the builder.
  #[inline]
  pub const fn comparator(&self) -> &C {
    &self.cmp
  }

  /// Builds a [`SkipMap`] whose tower heights come from a [`SmallRng`].
  ///
  /// The random source is seeded with [`Options::seed`] when set, otherwise by the OS.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::Builder;
  ///
  /// let mut map = Builder::new().with_capacity(16).with_seed(1).build::<u64, u64>();
  /// map.insert(1, 1);
  /// assert_eq!(map.len(), 1);
  /// ```
  pub fn build<K, V>(self) -> SkipMap<K, V, C> {
    let rng = match self.opts.seed {
      Some(seed) => SmallRng::seed_from_u64(seed),
      None => SmallRng::from_os_rng(),
    };
    self.build_with_rng(rng)
  }

  /// Builds a [`SkipMap`] that draws tower heights from the given random source.
  ///
  /// [`Options::seed`] is ignored, seed `rng` yourself if you need a reproducible shape.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use uskl::{Builder, rand::{rngs::StdRng, SeedableRng}};
  ///
  /// let mut map = Builder::new().build_with_rng::<u64, u64, _>(StdRng::seed_from_u64(3));
  /// map.insert(1, 1);
  /// assert_eq!(map.get(&1), Some(&1));
  /// ```
  pub fn build_with_rng<K, V, R: RngCore>(self, rng: R) -> SkipMap<K, V, C, R> {
    #[cfg(feature = "tracing")]
    tracing::debug!(
      capacity = self.opts.capacity,
      seeded = self.opts.seed.is_some(),
      "building skipmap"
    );

    SkipMap::with_parts(self.opts.capacity, self.cmp, rng)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Descend;

  #[test]
  fn test_builder_options() {
    let builder = Builder::new().with_capacity(64).with_seed(9);
    assert_eq!(builder.options().capacity(), 64);
    assert_eq!(builder.options().seed(), Some(9));

    let builder = builder.with_options(Options::new());
    assert_eq!(*builder.options(), Options::default());
  }

  #[test]
  fn test_builder_capacity() {
    let map = Builder::new().with_capacity(128).build::<u32, u32>();
    assert!(map.capacity() >= 128);
    assert!(map.is_empty());
  }

  #[test]
  fn test_builder_comparator() {
    let mut map = Builder::new().with_comparator(Descend).build::<u32, ()>();
    for i in 0..10 {
      map.insert(i, ());
    }
    assert_eq!(
      map.keys().copied().collect::<std::vec::Vec<_>>(),
      (0..10).rev().collect::<std::vec::Vec<_>>()
    );
  }

  #[test]
  fn test_same_seed_same_shape() {
    let mut a = Builder::new().with_seed(1234).build::<u32, u32>();
    let mut b = Builder::new().with_seed(1234).build::<u32, u32>();
    for i in 0..500 {
      a.insert(i, i);
      b.insert(i, i);
    }
    assert_eq!(a.height(), b.height());
    assert_eq!(a.tower_heights(), b.tower_heights());
  }
}
