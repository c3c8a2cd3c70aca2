use super::*;

use proptest::prelude::*;
use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
};

// Check the roots of a coalesced forest mirror the bits of its count
fn assert_forest_canonical<T>(roots: HeapRoots<'_, T>, count: usize) {
    let mut seen = 0usize;
    for root in roots {
        let slot = root.slot();
        assert_eq!(seen & (1 << slot), 0, "two roots share slot {slot}");
        assert_eq!(root.degree(), 1 << slot, "root degree is not a power of two");
        assert!(root.sibling().is_none(), "root has a sibling");
        seen |= 1 << slot;
    }
    assert_eq!(seen, count);
}

#[derive(Debug, Clone)]
enum TrieOp {
    Insert(String, u32),
    Remove(String),
    Get(String),
}

// A small alphabet, so that keys often share prefixes or are prefixes of one another
fn short_key() -> impl Strategy<Value = String> {
    "[abc]{0,5}"
}

fn trie_op() -> impl Strategy<Value = TrieOp> {
    prop_oneof![
        3 => (short_key(), any::<u32>()).prop_map(|(k, v)| TrieOp::Insert(k, v)),
        2 => short_key().prop_map(TrieOp::Remove),
        1 => short_key().prop_map(TrieOp::Get),
    ]
}

#[derive(Debug, Clone)]
enum HeapOp {
    Insert(u16),
    Extract,
    Coalesce,
}

fn heap_op() -> impl Strategy<Value = HeapOp> {
    prop_oneof![
        4 => any::<u16>().prop_map(HeapOp::Insert),
        2 => Just(HeapOp::Extract),
        1 => Just(HeapOp::Coalesce),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn trie_matches_btreemap(ops in prop::collection::vec(trie_op(), 0..200)) {
        let mut trie = Trie::new();
        let mut model: BTreeMap<String, u32> = BTreeMap::new();

        for op in ops {
            match op {
                TrieOp::Insert(key, value) => {
                    let fresh = !key.is_empty() && !model.contains_key(&key);
                    prop_assert_eq!(trie.insert(&key, value), fresh);
                    if fresh {
                        model.insert(key, value);
                    }
                }
                TrieOp::Remove(key) => {
                    prop_assert_eq!(trie.remove(&key), model.remove(&key).is_some());
                    prop_assert!(!trie.contains(&key));
                }
                TrieOp::Get(key) => {
                    prop_assert_eq!(trie.get(&key), model.get(&key));
                }
            }
            prop_assert_eq!(trie.count(), model.len());
        }
        trie.check();

        let pairs: Vec<(String, u32)> = trie.iter().map(|(k, v)| (k.into(), *v)).collect();
        let expected: Vec<(String, u32)> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(pairs, expected);

        // Taking every key away must leave no nodes behind
        for key in model.keys() {
            prop_assert!(trie.remove(key));
            prop_assert!(!trie.remove(key));
        }
        prop_assert!(trie.is_empty());
        prop_assert_eq!(trie.node_count(), 0);
        prop_assert_eq!(trie.iter().count(), 0);
    }

    #[test]
    fn trie_round_trip(
        entries in prop::collection::btree_map("\\PC{1,8}", any::<u32>(), 0..100),
        absent in "\\PC{0,8}",
    ) {
        let trie: Trie<u32> = entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        trie.check();

        prop_assert_eq!(trie.count(), entries.len());
        for (key, value) in &entries {
            prop_assert_eq!(trie.get(key), Some(value));
        }
        if !entries.contains_key(&absent) {
            prop_assert_eq!(trie.get(&absent), None);
        }
    }

    #[test]
    fn heap_matches_binary_heap(ops in prop::collection::vec(heap_op(), 0..300)) {
        let mut heap = Heap::new();
        let mut model = BinaryHeap::new();

        for op in ops {
            match op {
                HeapOp::Insert(item) => {
                    heap.insert(item);
                    model.push(Reverse(item));
                }
                HeapOp::Extract => {
                    prop_assert_eq!(heap.extract_min(), model.pop().map(|r| r.0));
                    assert_forest_canonical(heap.roots(), heap.count());
                }
                HeapOp::Coalesce => {
                    heap.coalesce();
                    assert_forest_canonical(heap.roots(), heap.count());
                }
            }
            prop_assert_eq!(heap.peek_front(), model.peek().map(|r| &r.0));
            prop_assert_eq!(heap.count(), model.len());
        }
        heap.check();

        let mut last = None;
        while let Some(item) = heap.extract_min() {
            prop_assert!(last <= Some(item));
            last = Some(item);
        }
        prop_assert!(heap.is_empty());
        prop_assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn heap_append_drains_sorted(
        a in prop::collection::vec(any::<i32>(), 0..100),
        b in prop::collection::vec(any::<i32>(), 0..100),
    ) {
        let mut left = Heap::from_vec(a.clone());
        let mut right: Heap<i32> = b.iter().copied().collect();
        assert_forest_canonical(left.roots(), left.count());

        left.append(&mut right);
        left.check();
        prop_assert!(right.is_empty());
        assert_forest_canonical(left.roots(), a.len() + b.len());

        let mut expected: Vec<i32> = a.into_iter().chain(b).collect();
        expected.sort();
        let drained: Vec<i32> = std::iter::from_fn(|| left.extract_min()).collect();
        prop_assert_eq!(drained, expected);
    }
}
