//! Partition a sequence by a key function, then reduce each partition.
//!
//! Groups come back in order of first appearance, so sorting the result with
//! a stable sort breaks ties by transcript order.

use std::collections::HashMap;
use std::hash::Hash;

/// Partition `items` by `key` and fold each partition with `reduce`.
pub fn partition<I, K, A, KF, IF, RF>(items: I, mut key: KF, mut init: IF, mut reduce: RF) -> Vec<(K, A)>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    KF: FnMut(&I::Item) -> K,
    IF: FnMut() -> A,
    RF: FnMut(&mut A, I::Item),
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, A)> = Vec::new();

    for item in items {
        let k = key(&item);
        let slot = match index.get(&k) {
            Some(&slot) => slot,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, init()));
                groups.len() - 1
            }
        };
        reduce(&mut groups[slot].1, item);
    }

    groups
}

/// Collect the items of each key, in their original order.
pub fn group_by<I, K, KF>(items: I, key: KF) -> Vec<(K, Vec<I::Item>)>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    KF: FnMut(&I::Item) -> K,
{
    partition(items, key, Vec::new, |group, item| group.push(item))
}

/// Number of items per key.
pub fn count_by<I, K, KF>(items: I, key: KF) -> Vec<(K, u64)>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    KF: FnMut(&I::Item) -> K,
{
    partition(items, key, || 0u64, |count, _| *count += 1)
}

/// Arithmetic mean of `value` per key.
pub fn mean_by<I, K, KF, VF>(items: I, key: KF, mut value: VF) -> Vec<(K, f64)>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    KF: FnMut(&I::Item) -> K,
    VF: FnMut(&I::Item) -> f64,
{
    partition(
        items,
        key,
        || (0.0f64, 0u64),
        |acc, item| {
            acc.0 += value(&item);
            acc.1 += 1;
        },
    )
    .into_iter()
    .map(|(k, (sum, n))| (k, if n == 0 { 0.0 } else { sum / n as f64 }))
    .collect()
}

/// Sort counts descending; equal counts keep their incoming order.
pub fn rank_descending<K>(mut counts: Vec<(K, u64)>) -> Vec<(K, u64)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
