//! Insertion-ordered grouping.
//!
//! Violations are reported in the order their keys first appear in the
//! timetable, so grouping never iterates a hash map directly.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug)]
pub(crate) struct OrderedGroups<K, V> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Vec<V>)>,
}

impl<K: Eq + Hash + Clone, V> OrderedGroups<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&i) => self.groups[i].1.push(value),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![value]));
            }
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for OrderedGroups<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut groups = Self::new();
        for (k, v) in iter {
            groups.push(k, v);
        }
        groups
    }
}
