use chrono::{DateTime, Utc};
use std::{collections::HashMap, hash::Hash, ops::Deref};

pub struct Counter<T: Hash + Eq> {
  inner: HashMap<T, usize>,
}

impl<T: Hash + Eq> Counter<T> {
  pub fn new() -> Self {
    Self {
      inner: HashMap::new(),
    }
  }

  pub fn inc(&mut self, key: T) {
    let value = self.inner.entry(key).or_insert(0);
    *value += 1;
  }

  pub fn count(&self, key: &T) -> usize {
    self.inner.get(key).copied().unwrap_or(0)
  }

  pub fn total(&self) -> usize {
    self.inner.values().sum()
  }
}

impl<T: Hash + Eq> Deref for Counter<T> {
  type Target = HashMap<T, usize>;

  fn deref(&self) -> &Self::Target {
    &self.inner
  }
}

impl<T: Hash + Eq> Default for Counter<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Hash + Eq> FromIterator<T> for Counter<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut counter = Self::new();
    for key in iter {
      counter.inc(key);
    }
    counter
  }
}

pub fn seconds_since(t: DateTime<Utc>) -> f32 {
  let t2 = Utc::now();
  let d = (t2 - t).to_std();
  if let Ok(d) = d {
    d.as_secs_f32()
  } else {
    0.0
  }
}
