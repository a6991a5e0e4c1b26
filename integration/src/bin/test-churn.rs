use std::collections::BTreeMap;

use integration::{new_value, random_key};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use uskl::*;

fn main() {
  const ROUNDS: usize = 1_000_000;
  const KEYS: usize = 4096;

  let mut rng = SmallRng::seed_from_u64(0xc0ffee);
  let mut l = Builder::new().with_seed(0xc0ffee).build();
  let mut model = BTreeMap::new();

  for round in 0..ROUNDS {
    let k = random_key(&mut rng, KEYS);
    match rng.random_range(0..3) {
      0 => {
        let inserted = l.insert(k.clone(), new_value(round)).1;
        assert_eq!(inserted, !model.contains_key(&k), "broken: {round}");
        model.entry(k).or_insert_with(|| new_value(round));
      }
      1 => assert_eq!(l.remove(k.as_str()), model.remove(&k), "broken: {round}"),
      _ => {
        let handle = l.find(k.as_str()).map(|e| e.handle());
        if let Some(h) = handle {
          let (rk, _) = l.remove_handle(h).unwrap();
          model.remove(&rk);
          assert!(l.get_by_handle(h).is_none(), "broken: {round}");
        }
      }
    }
    assert_eq!(l.len(), model.len(), "broken: {round}");
  }

  assert!(l.iter().eq(model.iter()));
  assert!(l.height() <= MAX_HEIGHT);
}
