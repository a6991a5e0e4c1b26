use integration::{big_value, key, new_value};
use uskl::*;

fn main() {
  {
    const N: usize = 100_000;
    let mut l = SkipMap::with_capacity(N);
    for i in 0..N {
      assert!(l.insert(key(i), new_value(i)).1, "broken: {i}");
    }
    assert_eq!(N, l.len());
    for i in 0..N {
      let k = key(i);
      assert_eq!(l.get(k.as_str()), Some(&new_value(i)), "broken: {i}");
    }
    for (i, (k, v)) in l.iter().enumerate() {
      assert_eq!(k, &key(i));
      assert_eq!(v, &new_value(i));
    }
  }

  {
    const N2: usize = 100;
    let mut l = SkipMap::new();
    for i in (0..N2).rev() {
      l.insert(key(i), big_value(i));
    }
    assert_eq!(N2, l.len());
    for i in 0..N2 {
      let k = key(i);
      assert_eq!(l.remove(k.as_str()), Some(big_value(i)), "broken: {i}");
    }
    assert!(l.is_empty());
    assert_eq!(l.height(), 0);
  }
}
