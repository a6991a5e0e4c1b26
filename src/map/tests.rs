use super::*;
use crate::{Descend, Handle};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::{
  collections::BTreeMap,
  format,
  string::{String, ToString},
  vec,
  vec::Vec,
};

/// Only used for testing
fn key(i: usize) -> String {
  format!("{:05}", i)
}

/// Only used for testing
fn new_value(i: usize) -> String {
  format!("v{:05}", i)
}

fn seeded<K, V>(seed: u64) -> SkipMap<K, V> {
  Builder::new().with_seed(seed).build()
}

fn empty_in(l: SkipMap<String, String>) {
  assert!(l.is_empty());
  assert_eq!(l.len(), 0);
  assert_eq!(l.height(), 0);
  assert!(l.first().is_none());
  assert!(l.last().is_none());
  assert!(l.get("aaa").is_none());
  assert!(l.find("aaa").is_none());
  assert!(!l.contains_key("aaa"));
  assert_eq!(l.iter().next(), None);
  l.check_invariants();
}

#[test]
fn test_empty() {
  empty_in(SkipMap::new());
}

#[test]
fn test_empty_with_capacity() {
  empty_in(SkipMap::with_capacity(1000));
}

#[test]
fn test_basic() {
  let mut l = seeded(0);
  assert!(l.insert(5, "five").1);
  assert!(l.insert(3, "three").1);
  assert!(l.insert(8, "eight").1);
  assert!(l.insert(1, "one").1);
  l.check_invariants();

  assert_eq!(l.len(), 4);
  assert_eq!(l.keys().copied().collect::<Vec<_>>(), [1, 3, 5, 8]);
  assert_eq!(l.get(&3), Some(&"three"));
  assert_eq!(l.get(&4), None);
  assert_eq!(l.get_key_value(&8), Some((&8, &"eight")));
  assert_eq!(l.first().map(|e| *e.key()), Some(1));
  assert_eq!(l.last().map(|e| *e.key()), Some(8));
}

#[test]
fn test_duplicated() {
  let mut l = seeded(1);
  let (v, inserted) = l.insert(5, 1);
  assert!(inserted);
  assert_eq!(*v, 1);

  let (v, inserted) = l.insert(5, 2);
  assert!(!inserted);
  assert_eq!(*v, 1);
  assert_eq!(l.len(), 1);
  l.check_invariants();
}

#[test]
fn test_duplicated_leaves_value_untouched_at_height() {
  let mut l = seeded(1);
  l.insert_at_height(4, 10, "a");
  let (v, inserted) = l.insert_at_height(1, 10, "b");
  assert!(!inserted);
  assert_eq!(*v, "a");
  assert_eq!(l.find(&10).unwrap().height(), 4);
}

#[test]
fn test_try_insert() {
  let mut l = seeded(2);
  *l.try_insert(1, 10).unwrap() += 1;
  assert_eq!(l.get(&1), Some(&11));

  let err = l.try_insert(1, 20).unwrap_err();
  assert_eq!(err.key(), &1);
  assert_eq!(err.value(), &20);
  assert_eq!(err.to_string(), "key already exists in the skipmap");
  assert_eq!(err.into_inner(), (1, 20));
  assert_eq!(l.get(&1), Some(&11));
}

#[test]
fn test_remove_absent() {
  let mut l = seeded::<u32, u32>(3);
  assert_eq!(l.remove(&99), None);
  assert_eq!(l.len(), 0);

  l.insert(1, 1);
  assert_eq!(l.remove(&99), None);
  assert_eq!(l.len(), 1);
  l.check_invariants();
}

#[test]
fn test_remove() {
  let mut l = seeded(4);
  for i in 0..100 {
    l.insert(key(i), new_value(i));
  }

  for i in (0..100).step_by(3) {
    assert_eq!(l.remove(key(i).as_str()), Some(new_value(i)));
    assert!(!l.contains_key(key(i).as_str()));
    l.check_invariants();
  }

  assert_eq!(l.len(), 100 - 34);
  for i in 0..100 {
    assert_eq!(l.contains_key(key(i).as_str()), i % 3 != 0);
  }

  assert_eq!(l.remove_entry("00001"), Some((key(1), new_value(1))));
}

#[test]
fn test_index_insert() {
  let mut l = seeded::<u32, String>(5);
  *l.get_or_insert_default(7) = "x".to_string();
  assert_eq!(l.len(), 1);
  assert_eq!(l.get(&7).map(String::as_str), Some("x"));
  assert_eq!(l[&7], "x");

  // a second access does not insert again
  l.get_or_insert_default(7).push('y');
  assert_eq!(l.len(), 1);
  assert_eq!(l[&7], "xy");
  l.check_invariants();
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn test_index_absent() {
  let l = seeded::<u32, u32>(5);
  let _v = l[&1];
}

#[test]
fn test_multi_level_unlink() {
  let mut l = seeded(6);
  let heights = [1, 3, 2, 5, 1, 4, 2];
  for (k, h) in heights.iter().enumerate() {
    l.insert_at_height(*h, k, k);
  }
  l.check_invariants();
  assert_eq!(l.height(), 5);
  assert_eq!(l.tower_heights(), heights);
  assert_eq!(l.level(4).len(), 1);
  assert_eq!(l.level(2).len(), 3);

  // the tallest tower goes away, every level it was on must be relinked.
  assert_eq!(l.remove(&3), Some(3));
  l.check_invariants();
  assert_eq!(l.height(), 4);
  assert!(l.level(4).is_empty());
  assert_eq!(l.level(2).len(), 2);

  assert_eq!(l.remove(&5), Some(5));
  l.check_invariants();
  assert_eq!(l.height(), 3);

  assert_eq!(l.remove(&1), Some(1));
  l.check_invariants();
  assert_eq!(l.height(), 2);

  for k in [0, 2, 4, 6] {
    assert_eq!(l.remove(&k), Some(k));
    l.check_invariants();
  }
  assert!(l.is_empty());
  assert_eq!(l.height(), 0);
}

#[test]
fn test_unlink_between_tall_towers() {
  let mut l = seeded(7);
  l.insert_at_height(MAX_HEIGHT, 0, ());
  l.insert_at_height(MAX_HEIGHT, 2, ());
  l.insert_at_height(MAX_HEIGHT, 1, ());
  l.check_invariants();
  assert_eq!(l.height(), MAX_HEIGHT);

  l.remove(&1);
  l.check_invariants();
  for level in 0..MAX_HEIGHT {
    assert_eq!(l.level(level).len(), 2);
  }

  l.remove(&0);
  l.remove(&2);
  l.check_invariants();
  assert_eq!(l.height(), 0);
}

#[test]
#[should_panic]
fn test_insert_at_height_zero() {
  seeded::<u32, u32>(0).insert_at_height(0, 1, 1);
}

#[test]
#[should_panic]
fn test_insert_at_height_too_high() {
  seeded::<u32, u32>(0).insert_at_height(MAX_HEIGHT + 1, 1, 1);
}

#[test]
fn test_random_height() {
  let mut l = seeded::<u32, u32>(8);
  for i in 0..100 {
    let h = l.random_height();
    assert!((1..=MAX_HEIGHT).contains(&h));
    l.insert_at_height(h, i, i);
  }
  l.check_invariants();
}

#[test]
fn test_model() {
  let mut rng = SmallRng::seed_from_u64(0xdead_beef);
  let mut l = seeded(9);
  let mut model = BTreeMap::new();

  for round in 0..5000 {
    let k: u16 = rng.random_range(0..512);
    match rng.random_range(0..4) {
      0 | 1 => {
        let inserted = l.insert(k, round).1;
        assert_eq!(inserted, !model.contains_key(&k));
        model.entry(k).or_insert(round);
      }
      2 => assert_eq!(l.remove(&k), model.remove(&k)),
      _ => assert_eq!(l.get(&k), model.get(&k)),
    }

    assert_eq!(l.len(), model.len());
    if round % 250 == 0 {
      l.check_invariants();
    }
  }

  l.check_invariants();
  assert!(l.iter().eq(model.iter()));
}

#[test]
fn test_basic_large_testcases() {
  let n = 1000;
  let mut l = seeded(10);

  for i in 0..n {
    l.insert(key(i), new_value(i));
  }

  for i in 0..n {
    let k = key(i);
    let ent = l.find(k.as_str()).unwrap();
    assert_eq!(ent.key(), &k);
    assert_eq!(ent.value(), &new_value(i));
  }

  assert_eq!(n, l.len());
  l.check_invariants();
}

#[test]
fn test_move() {
  let mut a = seeded(11);
  a.insert(32, vec![2, 3, 4, 5]);
  a.insert(35, vec![23, 432, 543, 2]);
  let before: Vec<_> = a.iter().map(|(k, v)| (*k, v.clone())).collect();

  let b = core::mem::take(&mut a);
  assert_eq!(a.len(), 0);
  assert!(a.first().is_none());
  assert_eq!(a.iter().count(), 0);
  a.check_invariants();

  assert_eq!(b.len(), 2);
  let after: Vec<_> = b.iter().map(|(k, v)| (*k, v.clone())).collect();
  assert_eq!(before, after);
  b.check_invariants();

  // the moved-from map is still usable
  a.insert(1, vec![]);
  assert_eq!(a.len(), 1);
}

#[test]
fn test_swap() {
  let mut a = seeded(12);
  let mut b = seeded(13);
  for i in 0..10 {
    a.insert(i, i);
  }
  b.insert(100, 100);

  let ha = a.find(&3).unwrap().handle();
  a.swap(&mut b);

  assert_eq!(a.len(), 1);
  assert_eq!(b.len(), 10);
  assert_eq!(a.keys().copied().collect::<Vec<_>>(), [100]);
  assert_eq!(b.get_by_handle(ha).map(|e| *e.key()), Some(3));
  a.check_invariants();
  b.check_invariants();
}

#[test]
fn test_cursor() {
  let mut l = seeded(14);
  for i in [10, 20, 30] {
    l.insert(i, i * 2);
  }

  let first = l.first().unwrap();
  assert_eq!(first, l.find(&10).unwrap());
  assert_ne!(first, l.find(&20).unwrap());

  let second = first.next().unwrap();
  assert_eq!(second.key_value(), (&20, &40));
  let third = second.next().unwrap();
  assert_eq!(*third.key(), 30);
  assert!(third.next().is_none());
  assert_eq!(Some(third), l.last());
}

#[test]
fn test_cursor_other_map_not_equal() {
  let mut a = seeded(15);
  let mut b = seeded(15);
  a.insert(1, 1);
  b.insert(1, 1);
  assert_ne!(a.first().unwrap(), b.first().unwrap());
}

#[test]
fn test_handle() {
  let mut l = seeded(16);
  for i in 0..10 {
    l.insert(i, i);
  }

  let h: Handle = l.find(&4).unwrap().handle();
  assert_eq!(l.get_by_handle(h).map(|e| *e.value()), Some(4));

  // unrelated updates keep the handle valid
  l.remove(&5);
  l.insert(42, 42);
  assert_eq!(l.get_by_handle(h).map(|e| *e.key()), Some(4));

  assert_eq!(l.remove_handle(h), Some((4, 4)));
  assert!(l.get_by_handle(h).is_none());
  assert_eq!(l.remove_handle(h), None);
  l.check_invariants();

  // the freed slot is reused, the old handle still does not resolve
  l.insert(100, 100);
  assert!(l.get_by_handle(h).is_none());
  assert_eq!(l.len(), 10);
}

#[test]
fn test_handle_from_other_map() {
  let mut a = seeded(27);
  let mut b = seeded(28);
  a.insert(1, "a1");
  b.insert(99, "b99");

  let ha = a.find(&1).unwrap().handle();
  assert!(b.get_by_handle(ha).is_none());
  assert_eq!(b.remove_handle(ha), None);
  assert_eq!(b.len(), 1);
  assert_eq!(b.get(&99), Some(&"b99"));
  b.check_invariants();

  // a clone is another map too
  let c = a.clone();
  assert!(c.get_by_handle(ha).is_none());
  assert_eq!(a.remove_handle(ha), Some((1, "a1")));
}

#[test]
fn test_erase_while_walking() {
  let mut l = seeded(17);
  for i in 0..100u32 {
    l.insert(i, i);
  }

  let doomed: Vec<Handle> = l
    .iter()
    .filter(|(k, _)| (300..500).contains(&(**k * 5)))
    .map(|(k, _)| l.find(k).unwrap().handle())
    .collect();
  for h in doomed {
    assert!(l.remove_handle(h).is_some());
  }

  assert_eq!(l.len(), 60);
  assert!(l.keys().all(|k| !(60..100).contains(k)));
  l.check_invariants();
}

#[test]
fn test_clear() {
  let mut l = seeded(18);
  for i in 0..50 {
    l.insert(i, i);
  }
  let h = l.find(&0).unwrap().handle();

  l.clear();
  assert!(l.is_empty());
  assert_eq!(l.height(), 0);
  assert!(l.get_by_handle(h).is_none());
  l.check_invariants();

  l.insert(0, 0);
  assert!(l.get_by_handle(h).is_none());
  l.check_invariants();
}

#[test]
fn test_pop_first() {
  let mut l = seeded(19);
  l.insert_at_height(3, 2, "b");
  l.insert_at_height(1, 3, "c");
  l.insert_at_height(4, 1, "a");

  assert_eq!(l.pop_first(), Some((1, "a")));
  l.check_invariants();
  assert_eq!(l.height(), 3);
  assert_eq!(l.pop_first(), Some((2, "b")));
  assert_eq!(l.pop_first(), Some((3, "c")));
  assert_eq!(l.pop_first(), None);
  l.check_invariants();
}

#[test]
fn test_entry() {
  let mut l = seeded(20);

  match l.entry("a") {
    Entry::Vacant(v) => {
      assert_eq!(*v.key(), "a");
      *v.insert(1) += 1;
    }
    Entry::Occupied(_) => unreachable!(),
  }
  assert_eq!(l.get("a"), Some(&2));

  match l.entry("a") {
    Entry::Occupied(mut o) => {
      assert_eq!(*o.key(), "a");
      assert_eq!(o.insert(10), 2);
      assert_eq!(*o.get(), 10);
    }
    Entry::Vacant(_) => unreachable!(),
  }

  l.entry("a").and_modify(|v| *v += 1).or_insert(0);
  l.entry("b").and_modify(|v| *v += 1).or_insert(0);
  assert_eq!(l.get("a"), Some(&11));
  assert_eq!(l.get("b"), Some(&0));

  assert_eq!(*l.entry("c").or_insert_with_key(|k| k.len() as i32), 1);
  assert_eq!(*l.entry("d").or_default(), 0);
  assert_eq!(l.entry("e").key(), &"e");
  assert_eq!(l.len(), 4);

  match l.entry("b") {
    Entry::Occupied(o) => assert_eq!(o.remove_entry(), ("b", 0)),
    Entry::Vacant(_) => unreachable!(),
  }
  assert!(!l.contains_key("b"));
  l.check_invariants();
}

#[test]
fn test_vacant_entry_at_height() {
  let mut l = seeded(21);
  if let Entry::Vacant(v) = l.entry(1) {
    v.insert_at_height(7, "x");
  }
  assert_eq!(l.height(), 7);
  assert_eq!(l.find(&1).unwrap().height(), 7);
  l.check_invariants();
}

#[test]
fn test_iter_mut() {
  let mut l = seeded(22);
  for i in 0..20 {
    l.insert(i, i);
  }

  for (k, v) in l.iter_mut() {
    *v += k * 10;
  }
  for v in l.values_mut() {
    *v += 1;
  }
  for (k, v) in &mut l {
    assert_eq!(*v, k * 11 + 1);
  }

  let it = l.iter_mut();
  assert_eq!(it.len(), 20);
}

#[test]
fn test_into_iter() {
  let mut l = seeded(23);
  for i in (0..30).rev() {
    l.insert(i, key(i));
  }

  let it = l.clone().into_iter();
  assert_eq!(it.len(), 30);
  let all: Vec<_> = it.collect();
  assert_eq!(all, (0..30).map(|i| (i, key(i))).collect::<Vec<_>>());

  let borrowed: Vec<_> = (&l).into_iter().map(|(k, _)| *k).collect();
  assert_eq!(borrowed, (0..30).collect::<Vec<_>>());
  assert_eq!(l.values().next(), Some(&key(0)));
}

#[test]
fn test_clone_is_independent() {
  let mut a = seeded(24);
  for i in 0..10 {
    a.insert(i, i);
  }

  let mut b = a.clone();
  assert_eq!(a, b);
  let h = a.find(&0).unwrap().handle();
  assert!(b.get_by_handle(h).is_none());
  b.remove(&0);
  b.insert(99, 99);
  assert_ne!(a, b);
  assert_eq!(a.len(), 10);
  assert!(a.contains_key(&0));
  a.check_invariants();
  b.check_invariants();
}

#[test]
fn test_descend() {
  let mut l = Builder::new()
    .with_comparator(Descend)
    .with_seed(25)
    .build::<u32, ()>();
  for i in [5, 3, 8, 1] {
    l.insert(i, ());
  }
  assert_eq!(l.keys().copied().collect::<Vec<_>>(), [8, 5, 3, 1]);
  assert!(l.contains_key(&3));
  l.check_invariants();
}

#[test]
fn test_closure_comparator() {
  let mut l = Builder::new()
    .with_comparator(|a: &String, b: &String| a.to_lowercase().cmp(&b.to_lowercase()))
    .with_seed(26)
    .build::<String, u32>();

  assert!(l.insert("Apple".to_string(), 1).1);
  assert!(!l.insert("apple".to_string(), 2).1);
  assert!(l.insert("banana".to_string(), 3).1);
  assert_eq!(l.get(&"APPLE".to_string()), Some(&1));
  assert_eq!(l.keys().cloned().collect::<Vec<_>>(), ["Apple", "banana"]);
  l.check_invariants();
}

#[test]
fn test_extend_first_wins() {
  let mut l: SkipMap<u32, &str> = [(1, "a"), (2, "b"), (1, "c")].into_iter().collect();
  assert_eq!(l.len(), 2);
  assert_eq!(l.get(&1), Some(&"a"));

  l.extend([(3, "c"), (2, "x")]);
  assert_eq!(l.len(), 3);
  assert_eq!(l.get(&2), Some(&"b"));
}

#[test]
fn test_debug() {
  let l = SkipMap::from([(2, "b"), (1, "a")]);
  assert_eq!(format!("{l:?}"), r#"{1: "a", 2: "b"}"#);
  assert_eq!(format!("{:?}", l.iter()), r#"[(1, "a"), (2, "b")]"#);
}

#[test]
fn test_capacity() {
  let mut l = SkipMap::<u32, u32>::with_capacity(8);
  assert!(l.capacity() >= 8);
  l.reserve(100);
  assert!(l.capacity() >= 100);
  for i in 0..100 {
    l.insert(i, i);
  }
  assert_eq!(l.len(), 100);

  l.remove(&0);
  l.remove(&1);
  // freed slots count as room
  assert!(l.capacity() >= 2);
}
