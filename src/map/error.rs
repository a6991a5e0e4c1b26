/// Error returned by [`SkipMap::try_insert`](super::SkipMap::try_insert) when
/// an entry with the same key already exists in the skipmap.
///
/// As a low-level crate, duplicate entries are not directly supported, the
/// rejected key and value are handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertError<K, V> {
  key: K,
  value: V,
}

impl<K, V> InsertError<K, V> {
  #[inline]
  pub(super) const fn new(key: K, value: V) -> Self {
    Self { key, value }
  }

  /// Returns the rejected key.
  #[inline]
  pub const fn key(&self) -> &K {
    &self.key
  }

  /// Returns the rejected value.
  #[inline]
  pub const fn value(&self) -> &V {
    &self.value
  }

  /// Returns the rejected key and value.
  #[inline]
  pub fn into_inner(self) -> (K, V) {
    (self.key, self.value)
  }
}

impl<K, V> core::fmt::Display for InsertError<K, V> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "key already exists in the skipmap")
  }
}

#[cfg(feature = "std")]
impl<K: core::fmt::Debug, V: core::fmt::Debug> std::error::Error for InsertError<K, V> {}
