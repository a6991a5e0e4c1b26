/// Options for [`SkipMap`](crate::SkipMap).
#[viewit::viewit(vis_all = "pub(super)", getters(skip), setters(skip))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Options {
  capacity: usize,
  seed: Option<u64>,
}

impl Options {
  /// Creates a new set of options with the default values.
  #[inline]
  pub const fn new() -> Self {
    Self {
      capacity: 0,
      seed: None,
    }
  }

  /// Sets the number of entries the map can hold before its arena has to grow.
  ///
  /// The default value is `0`.
  ///
  /// ## Example
  ///
  /// ```
  /// use uskl::Options;
  ///
  /// let opts = Options::new().with_capacity(1024);
  /// ```
  #[inline]
  pub const fn with_capacity(mut self, capacity: usize) -> Self {
    self.capacity = capacity;
    self
  }

  /// Sets the seed of the random source used to draw tower heights.
  ///
  /// Two maps built with the same seed and fed the same operations have the
  /// exact same shape. Without a seed the random source is seeded by the OS.
  ///
  /// ## Example
  ///
  /// ```
  /// use uskl::Options;
  ///
  /// let opts = Options::new().with_seed(42);
  /// ```
  #[inline]
  pub const fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// Returns the number of entries pre-allocated by the map.
  ///
  /// ## Example
  ///
  /// ```
  /// use uskl::Options;
  ///
  /// let opts = Options::new().with_capacity(1024);
  ///
  /// assert_eq!(opts.capacity(), 1024);
  /// ```
  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity
  }

  /// Returns the seed of the random source, if any.
  ///
  /// ## Example
  ///
  /// ```
  /// use uskl::Options;
  ///
  /// assert_eq!(Options::new().seed(), None);
  /// assert_eq!(Options::new().with_seed(7).seed(), Some(7));
  /// ```
  #[inline]
  pub const fn seed(&self) -> Option<u64> {
    self.seed
  }
}
