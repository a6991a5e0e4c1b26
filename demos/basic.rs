use rand::Rng;
use uskl::*;

fn insert(rng: &mut impl Rng) {
  let mut l = SkipMap::new();

  for _ in 0..100 {
    l.insert(rng.random_range(1..=1000), "hello".to_string());
  }
  for _ in 0..100 {
    let tmp = String::from("world");
    l.entry(rng.random_range(1..=1000)).or_insert(tmp);
  }
  println!("current skipmap size: {}", l.len());
}

fn remove(rng: &mut impl Rng) {
  let mut l = SkipMap::new();

  for _ in 0..100 {
    l.insert(rng.random_range(1..=1000), "women");
  }
  println!("skipmap size before remove: {}", l.len());
  for i in 300..500 {
    if let Some(h) = l.find(&i).map(|ent| ent.handle()) {
      l.remove_handle(h);
    }
  }
  println!("skipmap size after remove: {}", l.len());
}

fn take() {
  let mut l = SkipMap::new();

  *l.get_or_insert_default(32) = vec![2, 3, 4, 5];
  *l.get_or_insert_default(35) = vec![23, 432, 543, 2];
  println!("skipmap size before taking: {}", l.len());
  let taken = std::mem::take(&mut l);
  println!("old skipmap size after taking: {}", l.len());
  println!("new skipmap size after taking: {}", taken.len());
}

fn main() {
  let mut rng = rand::rng();

  insert(&mut rng);
  println!("=================================");
  remove(&mut rng);
  println!("=================================");
  take();
}
