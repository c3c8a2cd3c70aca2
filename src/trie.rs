//! Implementation of a string keyed map, backed by a ternary search trie
#![warn(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;
use compact_str::CompactString;
use core::{cmp::Ordering, fmt::Display, iter::FusedIterator, str::Chars};

use crate::util::Pool;

//-----------------------------------------------------------------------------------------------//

// A node in a ternary search trie
//
// `low` and `high` lead to sibling symbols at the same depth, `middle` to the next symbol of keys
// passing through this node.
#[derive(Clone)]
struct Node<V> {
    ch: char,
    value: Option<V>,
    low: usize,
    middle: usize,
    high: usize,
}

impl<V> Node<V> {
    fn new(ch: char) -> Node<V> {
        Node {
            ch,
            value: None,
            low: !0,
            middle: !0,
            high: !0,
        }
    }

    // A node with no value and no children has no reason to exist
    #[inline]
    fn is_empty(&self) -> bool {
        self.value.is_none() && !self.low == 0 && !self.middle == 0 && !self.high == 0
    }
}

// The link that leads to a node
#[derive(Clone, Copy)]
enum Link {
    Root,
    Low(usize),
    Middle(usize),
    High(usize),
}

//-----------------------------------------------------------------------------------------------//

/// A map between strings and values, implemented using a ternary search trie.
///
/// Each level of the trie is a binary search tree over the symbols that can appear at that
/// position of a key, and the `middle` link of a node advances to the next symbol. Keys share the
/// nodes of their common prefixes, and nodes that no longer lead to a value are pruned as soon as
/// a key is removed.
///
/// A value is stored on the node of the last symbol of its key, so the empty string cannot be used
/// as a key: `insert("", ..)` is rejected and `FromIterator` skips any such pair, just as it skips
/// repeats of a key it has already stored.
#[derive(Clone)]
pub struct Trie<V> {
    node: Pool<Node<V>>,
    root: usize,
    count: usize,
}

impl<V> Trie<V> {
    /// Constructor
    pub fn new() -> Trie<V> {
        Trie {
            node: Pool::new(),
            root: !0,
            count: 0,
        }
    }

    /// Constructor, pre-allocating room for a given number of nodes
    pub fn with_capacity(capacity: usize) -> Trie<V> {
        Trie {
            node: Pool::with_capacity(capacity),
            root: !0,
            count: 0,
        }
    }

    /// Get the number of keys in the `Trie`
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check if there are any keys in the `Trie`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the number of nodes currently making up the `Trie`
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node.count()
    }

    /// Remove all keys from the `Trie`
    pub fn clear(&mut self) {
        self.node.clear();
        self.root = !0;
        self.count = 0;
    }

    /// Reserves capacity for at least `additional` more nodes
    ///
    /// A key needs at most one node per symbol, fewer where it shares a prefix with stored keys.
    pub fn reserve(&mut self, additional: usize) {
        debug_assert!(self.count <= self.node.allocated_count());

        self.node.reserve(additional);
    }

    /// Insert a value by key.
    ///
    /// Returns `false`, leaving the `Trie` untouched, if the key already holds a value or the key
    /// is empty. Nodes are only created along the part of the path that does not yet exist.
    pub fn insert(&mut self, key: &str, value: V) -> bool {
        let mut chars = key.chars();
        let Some(mut ch) = chars.next() else {
            return false;
        };

        let mut link = Link::Root;
        loop {
            let mut x = self.follow(link);
            if !x == 0 {
                x = self.node.alloc(Node::new(ch));
                self.attach(link, x);
            }

            match ch.cmp(&self.node[x].ch) {
                Ordering::Less => link = Link::Low(x),
                Ordering::Greater => link = Link::High(x),
                Ordering::Equal => match chars.next() {
                    Some(next) => {
                        ch = next;
                        link = Link::Middle(x);
                    }
                    None => {
                        let node = &mut self.node[x];
                        if node.value.is_some() {
                            return false;
                        }
                        node.value = Some(value);
                        self.count += 1;
                        return true;
                    }
                },
            }
        }
    }

    /// Get a value by key.
    ///
    /// If the key is not in the `Trie` then `None` is returned.
    pub fn get(&self, key: &str) -> Option<&V> {
        let x = locate(&self.node, self.root, key);
        if !x == 0 {
            return None;
        }
        self.node[x].value.as_ref()
    }

    /// Get a mutable reference by key.
    ///
    /// If the key is not in the `Trie` then `None` is returned - this function will not create a
    /// key if it does not exist. In this case use `insert` instead.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let x = locate(&self.node, self.root, key);
        if !x == 0 {
            return None;
        }
        self.node[x].value.as_mut()
    }

    /// Check if a key holds a value
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a key.
    ///
    /// Returns `false` if the key does not hold a value, including when the key is only a prefix
    /// of keys in the `Trie`.
    pub fn remove(&mut self, key: &str) -> bool {
        self.take(key).is_some()
    }

    /// Remove a key, returning its value.
    ///
    /// Nodes left with neither a value nor children are pruned on the way back up to the root.
    pub fn take(&mut self, key: &str) -> Option<V> {
        let mut chars = key.chars();
        let ch = chars.next()?;

        let (value, root) = remove(&mut self.node, self.root, ch, &mut chars);
        self.root = root;
        if value.is_some() {
            self.count -= 1;
        }
        value
    }

    /// Iterate over the keys and values of the `Trie` in ascending key order
    pub fn iter(&self) -> TrieIterator<'_, V> {
        let mut stack = Vec::new();
        if !self.root != 0 {
            stack.push(Step::Node(self.root, 0));
        }
        TrieIterator {
            trie: self,
            stack,
            key: CompactString::default(),
            count: self.count,
        }
    }

    /// Get a read-only view of the root node, or `None` if the `Trie` is empty
    pub fn root(&self) -> Option<TrieNode<'_, V>> {
        TrieNode::at(self, self.root)
    }

    #[inline]
    fn follow(&self, link: Link) -> usize {
        match link {
            Link::Root => self.root,
            Link::Low(x) => self.node[x].low,
            Link::Middle(x) => self.node[x].middle,
            Link::High(x) => self.node[x].high,
        }
    }

    #[inline]
    fn attach(&mut self, link: Link, y: usize) {
        match link {
            Link::Root => self.root = y,
            Link::Low(x) => self.node[x].low = y,
            Link::Middle(x) => self.node[x].middle = y,
            Link::High(x) => self.node[x].high = y,
        }
    }

    // Debug tests
    #[cfg(any(test, debug_assertions))]
    #[allow(dead_code)]
    pub(crate) fn check(&self) {
        let (nodes, values) = check_level(&self.node, self.root, None, None);
        debug_assert_eq!(nodes, self.node.count());
        debug_assert_eq!(values, self.count);
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V> IntoIterator for &'a Trie<V> {
    type Item = (CompactString, &'a V);
    type IntoIter = TrieIterator<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> FromIterator<(&'a str, V)> for Trie<V> {
    fn from_iter<I: IntoIterator<Item = (&'a str, V)>>(iter: I) -> Self {
        let mut trie = Self::new();
        for (key, value) in iter {
            trie.insert(key, value);
        }
        trie
    }
}

impl<V> Display for Trie<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        for (key, _) in self.iter() {
            write!(f, "{key} ")?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

//-----------------------------------------------------------------------------------------------//

// Pending work for an in-order walk. The `usize` is the byte length of the key prefix above the
// node.
enum Step {
    Node(usize, usize),
    Value(usize, usize),
}

/// Iterator over a `Trie`, yielding keys in ascending order
pub struct TrieIterator<'a, V> {
    trie: &'a Trie<V>,
    stack: Vec<Step>,
    key: CompactString,
    count: usize,
}

impl<'a, V> Iterator for TrieIterator<'a, V> {
    type Item = (CompactString, &'a V);

    fn next(&mut self) -> Option<(CompactString, &'a V)> {
        let trie: &'a Trie<V> = self.trie;
        let node = &trie.node;

        while let Some(step) = self.stack.pop() {
            match step {
                Step::Node(x, len) => {
                    let n = &node[x];
                    if !n.high != 0 {
                        self.stack.push(Step::Node(n.high, len));
                    }
                    if !n.middle != 0 {
                        self.stack.push(Step::Node(n.middle, len + n.ch.len_utf8()));
                    }
                    self.stack.push(Step::Value(x, len));
                    if !n.low != 0 {
                        self.stack.push(Step::Node(n.low, len));
                    }
                }
                Step::Value(x, len) => {
                    // The middle subtree relies on the key buffer holding this prefix
                    let n = &node[x];
                    self.key.truncate(len);
                    self.key.push(n.ch);

                    if let Some(value) = &n.value {
                        self.count -= 1;
                        return Some((self.key.clone(), value));
                    }
                }
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl<V> ExactSizeIterator for TrieIterator<'_, V> {}

impl<V> FusedIterator for TrieIterator<'_, V> {}

//-----------------------------------------------------------------------------------------------//

/// A read-only view of one node of a `Trie`
///
/// This exposes the raw ternary structure, for example to draw the tree.
pub struct TrieNode<'a, V> {
    trie: &'a Trie<V>,
    index: usize,
}

impl<'a, V> TrieNode<'a, V> {
    fn at(trie: &'a Trie<V>, index: usize) -> Option<TrieNode<'a, V>> {
        if !index == 0 {
            None
        } else {
            Some(TrieNode { trie, index })
        }
    }

    /// The symbol held by this node
    #[inline]
    pub fn symbol(&self) -> char {
        self.trie.node[self.index].ch
    }

    /// The value of the key ending at this node, if any
    #[inline]
    pub fn value(&self) -> Option<&'a V> {
        self.trie.node[self.index].value.as_ref()
    }

    /// The subtree of sibling symbols less than this one
    pub fn low(&self) -> Option<TrieNode<'a, V>> {
        TrieNode::at(self.trie, self.trie.node[self.index].low)
    }

    /// The subtree holding the next symbol of keys through this node
    pub fn middle(&self) -> Option<TrieNode<'a, V>> {
        TrieNode::at(self.trie, self.trie.node[self.index].middle)
    }

    /// The subtree of sibling symbols greater than this one
    pub fn high(&self) -> Option<TrieNode<'a, V>> {
        TrieNode::at(self.trie, self.trie.node[self.index].high)
    }
}

impl<V> Clone for TrieNode<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for TrieNode<'_, V> {}

//-----------------------------------------------------------------------------------------------//

// Find the node that terminates a key
fn locate<V>(node: &Pool<Node<V>>, mut x: usize, key: &str) -> usize {
    let mut chars = key.chars();
    let Some(mut ch) = chars.next() else {
        return !0;
    };

    loop {
        if !x == 0 {
            return !0;
        }

        let n = &node[x];
        match ch.cmp(&n.ch) {
            Ordering::Less => x = n.low,
            Ordering::Greater => x = n.high,
            Ordering::Equal => match chars.next() {
                Some(next) => {
                    ch = next;
                    x = n.middle;
                }
                None => return x,
            },
        }
    }
}

// Remove the key `ch` + `rest` from the subtree at `x`, returning the removed value and the root
// of the subtree afterwards. Pruning only happens when a value was actually removed.
fn remove<V>(
    node: &mut Pool<Node<V>>,
    x: usize,
    ch: char,
    rest: &mut Chars<'_>,
) -> (Option<V>, usize) {
    if !x == 0 {
        return (None, !0);
    }

    let value = match ch.cmp(&node[x].ch) {
        Ordering::Less => {
            let low = node[x].low;
            let (value, y) = remove(node, low, ch, rest);
            node[x].low = y;
            value
        }
        Ordering::Greater => {
            let high = node[x].high;
            let (value, y) = remove(node, high, ch, rest);
            node[x].high = y;
            value
        }
        Ordering::Equal => match rest.next() {
            Some(next) => {
                let middle = node[x].middle;
                let (value, y) = remove(node, middle, next, rest);
                node[x].middle = y;
                value
            }
            None => node[x].value.take(),
        },
    };

    if value.is_some() && node[x].is_empty() {
        node.free(x);
        return (value, !0);
    }

    (value, x)
}

// DEBUG : Check one level of the trie is ordered and holds no dead nodes, returning the number of
// nodes and values found beneath it
#[cfg(any(test, debug_assertions))]
#[allow(dead_code)]
fn check_level<V>(
    node: &Pool<Node<V>>,
    x: usize,
    above: Option<char>,
    below: Option<char>,
) -> (usize, usize) {
    if !x == 0 {
        return (0, 0);
    }

    let n = &node[x];
    debug_assert!(!n.is_empty());
    debug_assert!(above.map_or(true, |c| n.ch > c));
    debug_assert!(below.map_or(true, |c| n.ch < c));

    let low = check_level(node, n.low, above, Some(n.ch));
    let middle = check_level(node, n.middle, None, None);
    let high = check_level(node, n.high, Some(n.ch), below);

    (
        1 + low.0 + middle.0 + high.0,
        n.value.is_some() as usize + low.1 + middle.1 + high.1,
    )
}

//-----------------------------------------------------------------------------------------------//

#[test]
// A very simple test of inserting into a trie
fn test_trie_0() {
    let mut trie = Trie::new();

    assert!(trie.insert("cat", 1));
    assert!(trie.insert("car", 2));
    assert!(trie.insert("dog", 3));
    trie.check();

    assert_eq!(trie.get("cat"), Some(&1));
    assert_eq!(trie.get("ca"), None);
    assert_eq!(trie.get("dog"), Some(&3));
    assert_eq!(trie.get("cart"), None);
    assert_eq!(trie.count(), 3);

    assert!(trie.remove("cat"));
    trie.check();
    assert_eq!(trie.get("cat"), None);
    assert_eq!(trie.get("car"), Some(&2));
    assert!(!trie.remove("cat"));
    assert_eq!(trie.count(), 2);
}

#[test]
// Duplicate keys are rejected and keep the first value
fn test_trie_1() {
    let mut trie = Trie::new();

    assert!(trie.insert("Spongebob", 'a'));
    let nodes = trie.node_count();
    assert!(!trie.insert("Spongebob", 'b'));
    assert!(!trie.insert("", 'c'));

    assert_eq!(trie.get("Spongebob"), Some(&'a'));
    assert_eq!(trie.node_count(), nodes);
    assert_eq!(trie.count(), 1);
}

#[test]
// Removing a prefix that was never inserted leaves the longer key alone
fn test_trie_2() {
    let mut trie = Trie::new();
    trie.insert("Spongebob", ());
    let nodes = trie.node_count();

    assert!(!trie.remove("Sponge"));
    assert!(!trie.remove("Spongebobs"));
    assert!(!trie.remove(""));
    assert!(trie.contains("Spongebob"));
    assert_eq!(trie.node_count(), nodes);

    // Now add the prefix and take it away again
    assert!(trie.insert("Sponge", ()));
    assert_eq!(trie.node_count(), nodes);
    assert!(trie.remove("Sponge"));
    assert_eq!(trie.node_count(), nodes);
    assert!(trie.contains("Spongebob"));

    assert!(trie.remove("Spongebob"));
    assert_eq!(trie.node_count(), 0);
    assert!(trie.root().is_none());
}

#[test]
// Keys are iterated in ascending order, and iteration can be restarted
fn test_trie_3() {
    use alloc::{string::String, vec};

    let trie: Trie<i32> = [("she", 1), ("sells", 2), ("sea", 3), ("shells", 4), ("by", 5), ("s", 6)]
        .into_iter()
        .collect();

    let expected = vec!["by", "s", "sea", "sells", "she", "shells"];
    for _ in 0..2 {
        let keys: Vec<String> = trie.iter().map(|(key, _)| key.into()).collect();
        assert_eq!(keys, expected);
    }

    let mut iter = trie.iter();
    assert_eq!(iter.len(), 6);
    iter.next();
    assert_eq!(iter.len(), 5);

    assert_eq!(alloc::format!("{trie}"), "[ by s sea sells she shells ]");
}

#[test]
// The structural view follows the ternary links
fn test_trie_4() {
    let mut trie = Trie::new();
    trie.insert("m", 0);
    trie.insert("a", 1);
    trie.insert("z", 2);
    trie.insert("mo", 3);

    let root = trie.root().unwrap();
    assert_eq!(root.symbol(), 'm');
    assert_eq!(root.value(), Some(&0));
    assert_eq!(root.low().unwrap().symbol(), 'a');
    assert_eq!(root.high().unwrap().symbol(), 'z');

    let middle = root.middle().unwrap();
    assert_eq!(middle.symbol(), 'o');
    assert_eq!(middle.value(), Some(&3));
    assert!(middle.low().is_none() && middle.middle().is_none() && middle.high().is_none());
}

#[test]
// Values can be updated in place and taken out
fn test_trie_5() {
    let mut trie = Trie::new();
    trie.insert("héllo", 10);
    trie.insert("hello", 20);

    *trie.get_mut("héllo").unwrap() += 1;
    assert_eq!(trie.get("héllo"), Some(&11));
    assert_eq!(trie.get_mut("hell"), None);

    assert_eq!(trie.take("héllo"), Some(11));
    assert_eq!(trie.take("héllo"), None);
    trie.check();

    trie.clear();
    assert!(trie.is_empty());
    assert_eq!(trie.node_count(), 0);
    assert_eq!(trie.get("hello"), None);
}

#[test]
// Nodes pruned by removal are reused before the trie grows
fn test_trie_6() {
    let mut trie = Trie::with_capacity(4);
    trie.reserve(16);
    trie.insert("tea", 1);
    trie.insert("ten", 2);
    trie.insert("to", 3);
    assert_eq!(trie.node.allocated_count(), 5);

    // "ten" owns only its 'n', "to" owns its 'o'
    trie.remove("ten");
    trie.remove("to");
    assert_eq!(trie.node_count(), 3);
    assert_eq!(trie.node.recycle_count(), 2);

    trie.reserve(2);
    trie.insert("tee", 4);
    trie.insert("ti", 5);
    assert_eq!(trie.node.allocated_count(), 5);
    assert_eq!(trie.node.recycle_count(), 0);
    trie.check();

    // The empty key is never stored
    let trie: Trie<i32> = [("", 0), ("a", 1), ("a", 2)].into_iter().collect();
    assert_eq!(trie.count(), 1);
    assert_eq!(trie.get("a"), Some(&1));
    assert_eq!(trie.get(""), None);
}

#[test]
// A stress test with inserting and getting
fn test_trie_7() {
    use alloc::string::ToString;
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut trie = Trie::new();
    let mut inserted = 0;
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        if trie.insert(&key.to_string(), key) {
            inserted += 1;
        }
    }

    assert_eq!(trie.count(), inserted);
    trie.check();

    let mut rng = SmallRng::seed_from_u64(1234567890);

    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        assert_eq!(trie.get(&key.to_string()), Some(&key));
    }

    let keys: Vec<CompactString> = trie.iter().map(|(key, _)| key).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
// A stress test with inserting and removing, which must leave no nodes behind
fn test_trie_8() {
    use alloc::string::ToString;
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(5678901234);

    let mut trie = Trie::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..1000000usize);
        trie.insert(&key.to_string(), ());
    }

    let mut rng = SmallRng::seed_from_u64(5678901234);

    for i in 0..COUNT {
        let key = rng.random_range(0..1000000usize);
        trie.remove(&key.to_string());
        assert!(!trie.contains(&key.to_string()));
        if i % 10000 == 0 {
            trie.check();
        }
    }

    assert_eq!(trie.count(), 0);
    assert_eq!(trie.node_count(), 0);
    assert_eq!(trie.iter().next(), None);
}
