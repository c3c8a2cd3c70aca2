//! Implementation of mergeable priority queues, backed by a binomial forest
#![warn(missing_docs)]

extern crate alloc;

use alloc::{vec, vec::Vec};
use core::{cmp::Ordering, fmt::Display, iter::FusedIterator, mem, slice};

use crate::util::Pool;

//-----------------------------------------------------------------------------------------------//

// A node in a binomial tree, using a leftmost-child/right-sibling encoding. `degree` is the number
// of items in the subtree rooted here.
#[derive(Clone)]
struct Node<T> {
    item: T,
    degree: usize,
    child: usize,
    sibling: usize,
}

impl<T> Node<T> {
    fn new(item: T) -> Node<T> {
        Node {
            item,
            degree: 1,
            child: !0,
            sibling: !0,
        }
    }
}

// The slot a tree of a given degree occupies once the forest is coalesced
#[inline]
fn slot_of(degree: usize) -> usize {
    debug_assert!(degree > 0);
    degree.ilog2() as usize
}

//-----------------------------------------------------------------------------------------------//

// The forest shared by `Heap` and `HeapBy`. The comparison is supplied by the caller on every
// operation that needs one.
#[derive(Clone)]
struct Forest<T> {
    node: Pool<Node<T>>,
    roots: Vec<usize>,
    front: usize,
}

impl<T> Forest<T> {
    fn new() -> Forest<T> {
        Forest {
            node: Pool::new(),
            roots: Vec::new(),
            front: !0,
        }
    }

    fn with_capacity(capacity: usize) -> Forest<T> {
        Forest {
            node: Pool::with_capacity(capacity),
            roots: Vec::new(),
            front: !0,
        }
    }

    #[inline]
    fn count(&self) -> usize {
        self.node.count()
    }

    fn clear(&mut self) {
        self.node.clear();
        self.roots.clear();
        self.front = !0;
    }

    fn insert<F>(&mut self, item: T, compare: &F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let x = self.node.alloc(Node::new(item));
        self.roots.push(x);
        if order(&self.node, x, self.front, compare) != Ordering::Greater {
            self.front = x;
        }
    }

    fn peek_front(&self) -> Option<&T> {
        self.node.get(self.front).map(|n| &n.item)
    }

    fn extract_min<F>(&mut self, compare: &F) -> Option<T>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let x = self.front;
        if !x == 0 {
            return None;
        }

        // Promote the children of the front to roots
        let mut promoted = 0;
        let mut c = self.node[x].child;
        while !c != 0 {
            let next = mem::replace(&mut self.node[c].sibling, !0);
            self.roots.push(c);
            promoted += 1;
            c = next;
        }
        debug_assert_eq!(promoted, slot_of(self.node[x].degree));

        self.roots.retain(|&r| r != x);
        self.front = !0;
        let item = self.node.free(x).item;

        self.coalesce(compare);
        Some(item)
    }

    fn coalesce<F>(&mut self, compare: &F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.front = !0;
        if self.node.is_empty() {
            self.roots.clear();
            return;
        }

        let mut slot = vec![!0; slot_of(self.node.count()) + 1];
        let mut roots = mem::take(&mut self.roots);
        for &x in &roots {
            debug_assert!(!self.node[x].sibling == 0, "root {x} has a sibling");
            place(&mut self.node, &mut slot, x, compare);
        }

        roots.clear();
        for x in slot {
            if !x == 0 {
                continue;
            }
            if order(&self.node, x, self.front, compare) == Ordering::Less {
                self.front = x;
            }
            roots.push(x);
        }
        self.roots = roots;
    }

    fn append<F>(&mut self, other: &mut Forest<T>, compare: &F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        for x in mem::take(&mut other.roots) {
            let y = transplant(&mut self.node, &mut other.node, x);
            self.roots.push(y);
        }
        debug_assert!(other.node.is_empty());
        other.clear();

        self.coalesce(compare);
    }

    // Move the items of `other` across one at a time, so that they end up ordered by `compare`
    // alone whatever order `other` kept them in
    fn absorb<F>(&mut self, other: &mut Forest<T>, compare: &F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let mut pending = mem::take(&mut other.roots);
        while let Some(x) = pending.pop() {
            let node = other.node.free(x);
            if !node.child != 0 {
                pending.push(node.child);
            }
            if !node.sibling != 0 {
                pending.push(node.sibling);
            }
            self.insert(node.item, compare);
        }
        debug_assert!(other.node.is_empty());
        other.clear();

        self.coalesce(compare);
    }

    fn reserve(&mut self, additional: usize) {
        debug_assert!(self.roots.len() <= self.node.allocated_count());

        self.node.reserve(additional);
        self.roots.reserve(additional);
    }

    fn roots(&self) -> HeapRoots<'_, T> {
        HeapRoots {
            node: &self.node,
            front: self.front,
            iter: self.roots.iter(),
        }
    }

    // Debug tests
    #[cfg(any(test, debug_assertions))]
    #[allow(dead_code)]
    fn check<F>(&self, compare: &F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let mut count = 0;
        for &x in &self.roots {
            debug_assert!(!self.node[x].sibling == 0);
            debug_assert_ne!(order(&self.node, x, self.front, compare), Ordering::Less);
            count += check_tree(&self.node, x, compare);
        }
        debug_assert_eq!(count, self.node.count());
        debug_assert!(!self.front == 0 || self.roots.contains(&self.front));
        debug_assert_eq!(!self.front == 0, self.node.is_empty());
    }
}

impl<T: Display> Display for Forest<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        for root in self.roots() {
            write!(f, "{}({}) ", root.item(), root.degree())?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

//-----------------------------------------------------------------------------------------------//

/// A mergeable priority queue, implemented using a binomial forest.
///
/// The item that compares least is at the front. Insertion is O(1) and defers all restructuring
/// to the next `extract_min`, which coalesces the forest so that at most one tree remains for
/// each power of two in the number of items.
#[derive(Clone)]
pub struct Heap<T>
where
    T: Ord,
{
    forest: Forest<T>,
}

impl<T> Heap<T>
where
    T: Ord,
{
    /// Constructor
    pub fn new() -> Heap<T> {
        Heap {
            forest: Forest::new(),
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> Heap<T> {
        Heap {
            forest: Forest::with_capacity(capacity),
        }
    }

    /// Build a `Heap` from a collection of items, coalescing once after they are all inserted
    pub fn from_vec(items: Vec<T>) -> Heap<T> {
        let mut heap = Self::with_capacity(items.len());
        for item in items {
            heap.forest.insert(item, &T::cmp);
        }
        heap.coalesce();
        heap
    }

    /// Get the number of items in the `Heap`
    #[inline]
    pub fn count(&self) -> usize {
        self.forest.count()
    }

    /// Check if there are any items in the `Heap`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forest.count() == 0
    }

    /// Remove all items from the `Heap`
    pub fn clear(&mut self) {
        self.forest.clear();
    }

    /// Insert an item
    pub fn insert(&mut self, item: T) {
        self.forest.insert(item, &T::cmp);
    }

    /// Get the least item, or `None` if the `Heap` is empty
    pub fn peek_front(&self) -> Option<&T> {
        self.forest.peek_front()
    }

    /// Remove and return the least item, or `None` if the `Heap` is empty
    pub fn extract_min(&mut self) -> Option<T> {
        self.forest.extract_min(&T::cmp)
    }

    /// Merge trees of the same size until at most one tree of each size remains
    pub fn coalesce(&mut self) {
        self.forest.coalesce(&T::cmp);
    }

    /// Move all items of `other` into this `Heap`, leaving `other` empty
    pub fn append(&mut self, other: &mut Heap<T>) {
        self.forest.append(&mut other.forest, &T::cmp);
    }

    /// Reserves capacity for at least `additional` more items
    pub fn reserve(&mut self, additional: usize) {
        self.forest.reserve(additional);
    }

    /// Iterate over the roots of the forest
    pub fn roots(&self) -> HeapRoots<'_, T> {
        self.forest.roots()
    }

    #[cfg(any(test, debug_assertions))]
    #[allow(dead_code)]
    pub(crate) fn check(&self) {
        self.forest.check(&T::cmp);
    }
}

impl<T> Default for Heap<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Heap<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> Display for Heap<T>
where
    T: Ord + Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.forest.fmt(f)
    }
}

//-----------------------------------------------------------------------------------------------//

/// A mergeable priority queue, implemented using a binomial forest.
///
/// This version allows a custom ordering function to be used.
#[derive(Clone)]
pub struct HeapBy<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    forest: Forest<T>,
    compare: F,
}

impl<T, F> HeapBy<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Constructor
    pub fn new(compare: F) -> HeapBy<T, F> {
        HeapBy {
            forest: Forest::new(),
            compare,
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize, compare: F) -> HeapBy<T, F> {
        HeapBy {
            forest: Forest::with_capacity(capacity),
            compare,
        }
    }

    /// Build a `HeapBy` from a collection of items, coalescing once after they are all inserted
    pub fn from_vec(items: Vec<T>, compare: F) -> HeapBy<T, F> {
        let mut heap = Self::with_capacity(items.len(), compare);
        for item in items {
            heap.forest.insert(item, &heap.compare);
        }
        heap.coalesce();
        heap
    }

    /// Get the number of items in the `HeapBy`
    #[inline]
    pub fn count(&self) -> usize {
        self.forest.count()
    }

    /// Check if there are any items in the `HeapBy`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forest.count() == 0
    }

    /// Remove all items from the `HeapBy`
    pub fn clear(&mut self) {
        self.forest.clear();
    }

    /// Insert an item
    pub fn insert(&mut self, item: T) {
        self.forest.insert(item, &self.compare);
    }

    /// Get the least item, or `None` if the `HeapBy` is empty
    pub fn peek_front(&self) -> Option<&T> {
        self.forest.peek_front()
    }

    /// Remove and return the least item, or `None` if the `HeapBy` is empty
    pub fn extract_min(&mut self) -> Option<T> {
        self.forest.extract_min(&self.compare)
    }

    /// Merge trees of the same size until at most one tree of each size remains
    pub fn coalesce(&mut self) {
        self.forest.coalesce(&self.compare);
    }

    /// Move all items of `other` into this `HeapBy`, leaving `other` empty
    ///
    /// The items are ordered by this heap's function from then on. As `other` may have ordered
    /// them differently, each item is inserted afresh rather than moving whole trees across.
    pub fn append(&mut self, other: &mut HeapBy<T, F>) {
        self.forest.absorb(&mut other.forest, &self.compare);
    }

    /// Reserves capacity for at least `additional` more items
    pub fn reserve(&mut self, additional: usize) {
        self.forest.reserve(additional);
    }

    /// Iterate over the roots of the forest
    pub fn roots(&self) -> HeapRoots<'_, T> {
        self.forest.roots()
    }

    #[cfg(any(test, debug_assertions))]
    #[allow(dead_code)]
    pub(crate) fn check(&self) {
        self.forest.check(&self.compare);
    }
}

impl<T, F> Display for HeapBy<T, F>
where
    T: Display,
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.forest.fmt(f)
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over the roots of a `Heap` or `HeapBy`, in slot order once coalesced
pub struct HeapRoots<'a, T> {
    node: &'a Pool<Node<T>>,
    front: usize,
    iter: slice::Iter<'a, usize>,
}

impl<'a, T> Iterator for HeapRoots<'a, T> {
    type Item = HeapNode<'a, T>;

    fn next(&mut self) -> Option<HeapNode<'a, T>> {
        let &index = self.iter.next()?;
        Some(HeapNode {
            node: self.node,
            front: self.front,
            index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for HeapRoots<'_, T> {}

impl<T> FusedIterator for HeapRoots<'_, T> {}

/// A read-only view of one node of a binomial forest
pub struct HeapNode<'a, T> {
    node: &'a Pool<Node<T>>,
    front: usize,
    index: usize,
}

impl<'a, T> HeapNode<'a, T> {
    fn at(&self, index: usize) -> Option<HeapNode<'a, T>> {
        if !index == 0 {
            None
        } else {
            Some(HeapNode {
                node: self.node,
                front: self.front,
                index,
            })
        }
    }

    /// The item held by this node
    #[inline]
    pub fn item(&self) -> &'a T {
        &self.node[self.index].item
    }

    /// The number of items in the subtree rooted at this node
    #[inline]
    pub fn degree(&self) -> usize {
        self.node[self.index].degree
    }

    /// The slot this subtree occupies as a root, `floor(log2(degree))`
    #[inline]
    pub fn slot(&self) -> usize {
        slot_of(self.degree())
    }

    /// Check if this node holds the front of the heap
    #[inline]
    pub fn is_front(&self) -> bool {
        self.index == self.front
    }

    /// The leftmost child of this node
    pub fn child(&self) -> Option<HeapNode<'a, T>> {
        self.at(self.node[self.index].child)
    }

    /// The next sibling to the right of this node
    pub fn sibling(&self) -> Option<HeapNode<'a, T>> {
        self.at(self.node[self.index].sibling)
    }

    /// Iterate over the children of this node, from left to right
    pub fn children(&self) -> HeapChildren<'a, T> {
        HeapChildren { next: self.child() }
    }
}

impl<T> Clone for HeapNode<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for HeapNode<'_, T> {}

/// Iterator over the children of a `HeapNode`
pub struct HeapChildren<'a, T> {
    next: Option<HeapNode<'a, T>>,
}

impl<'a, T> Iterator for HeapChildren<'a, T> {
    type Item = HeapNode<'a, T>;

    fn next(&mut self) -> Option<HeapNode<'a, T>> {
        let node = self.next?;
        self.next = node.sibling();
        Some(node)
    }
}

impl<T> FusedIterator for HeapChildren<'_, T> {}

//-----------------------------------------------------------------------------------------------//

// Compare the items of two nodes. A missing node compares greater than any present one.
fn order<T, F>(node: &Pool<Node<T>>, x: usize, y: usize, compare: &F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (!x == 0, !y == 0) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare(&node[x].item, &node[y].item),
    }
}

// Put a root into its slot, merging with any occupant and carrying the result upwards
fn place<T, F>(node: &mut Pool<Node<T>>, slot: &mut [usize], x: usize, compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    let s = slot_of(node[x].degree);
    debug_assert!(s < slot.len(), "slot {s} out of range for {}", slot.len());

    let y = slot[s];
    if !y == 0 {
        slot[s] = x;
        return;
    }

    slot[s] = !0;
    let z = link(node, x, y, compare);
    place(node, slot, z, compare);
}

// Make one root the leftmost child of the other, returning the new root. The occupant `y` stays
// on top unless `x` is strictly less.
fn link<T, F>(node: &mut Pool<Node<T>>, x: usize, y: usize, compare: &F) -> usize
where
    F: Fn(&T, &T) -> Ordering,
{
    let (parent, child) = match order(node, x, y, compare) {
        Ordering::Less => (x, y),
        _ => (y, x),
    };
    debug_assert!(!node[parent].sibling == 0 && !node[child].sibling == 0);

    node[child].sibling = node[parent].child;
    node[parent].child = child;
    node[parent].degree += node[child].degree;

    parent
}

// Move a subtree, along with its right siblings, from one pool to another
fn transplant<T>(to: &mut Pool<Node<T>>, from: &mut Pool<Node<T>>, x: usize) -> usize {
    if !x == 0 {
        return !0;
    }

    let node = from.free(x);
    let child = transplant(to, from, node.child);
    let sibling = transplant(to, from, node.sibling);
    to.alloc(Node {
        child,
        sibling,
        ..node
    })
}

// DEBUG : Check a tree is heap ordered and its degrees add up, returning its size
#[cfg(any(test, debug_assertions))]
#[allow(dead_code)]
fn check_tree<T, F>(node: &Pool<Node<T>>, x: usize, compare: &F) -> usize
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut degree = 1;
    let mut c = node[x].child;
    while !c != 0 {
        debug_assert_ne!(compare(&node[x].item, &node[c].item), Ordering::Greater);
        degree += check_tree(node, c, compare);
        c = node[c].sibling;
    }
    debug_assert_eq!(degree, node[x].degree);
    degree
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
// Check the roots occupy distinct slots, one for each set bit of the count
fn assert_canonical<T>(roots: HeapRoots<'_, T>, count: usize) {
    let slots: Vec<usize> = roots.map(|root| root.slot()).collect();
    assert_eq!(slots.len(), count.count_ones() as usize);
    assert!(slots.windows(2).all(|w| w[0] < w[1]));
    for s in slots {
        assert_ne!(count & (1 << s), 0);
    }
}

#[test]
// A very simple test of building a heap and draining it
fn test_heap_0() {
    let mut heap = Heap::from_vec(vec![3, 1, 2]);
    heap.check();

    assert_eq!(heap.peek_front(), Some(&1));
    assert_eq!(heap.extract_min(), Some(1));
    assert_eq!(heap.peek_front(), Some(&2));
    assert_eq!(heap.extract_min(), Some(2));
    assert_eq!(heap.peek_front(), Some(&3));
    assert_eq!(heap.extract_min(), Some(3));
    assert!(heap.is_empty());

    assert_eq!(heap.peek_front(), None);
    assert_eq!(heap.extract_min(), None);
    assert_eq!(heap.count(), 0);
}

#[test]
// Inserting does not coalesce, extracting does
fn test_heap_1() {
    let mut heap = Heap::new();
    for item in [5, 8, 2, 9, 7, 1, 6] {
        heap.insert(item);
        assert_eq!(heap.roots().len(), heap.count());
    }
    assert_eq!(heap.peek_front(), Some(&1));
    heap.check();

    heap.coalesce();
    heap.check();
    assert_canonical(heap.roots(), 7);
    assert_eq!(heap.peek_front(), Some(&1));

    heap.insert(4);
    heap.insert(3);
    assert_eq!(heap.roots().len(), 5);

    assert_eq!(heap.extract_min(), Some(1));
    heap.check();
    assert_canonical(heap.roots(), 8);
    assert_eq!(heap.roots().len(), 1);

    let mut drained = Vec::new();
    while let Some(item) = heap.extract_min() {
        heap.check();
        assert_canonical(heap.roots(), heap.count());
        drained.push(item);
    }
    assert_eq!(drained, vec![2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
// The structural view shows the coalesced forest
fn test_heap_2() {
    let heap = Heap::from_vec(vec![3, 1, 2]);

    let roots: Vec<HeapNode<'_, i32>> = heap.roots().collect();
    assert_eq!(roots.len(), 2);

    assert_eq!(*roots[0].item(), 2);
    assert_eq!(roots[0].degree(), 1);
    assert!(!roots[0].is_front());
    assert!(roots[0].child().is_none());

    assert_eq!(*roots[1].item(), 1);
    assert_eq!(roots[1].degree(), 2);
    assert_eq!(roots[1].slot(), 1);
    assert!(roots[1].is_front());

    let children: Vec<i32> = roots[1].children().map(|c| *c.item()).collect();
    assert_eq!(children, vec![3]);
    assert!(roots[1].child().unwrap().sibling().is_none());

    assert_eq!(alloc::format!("{heap}"), "[ 2(1) 1(2) ]");
}

#[test]
// Custom ordering, with ties kept in the order they were first seen
fn test_heap_3() {
    let by_priority = |a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0);
    let mut heap = HeapBy::from_vec(vec![(1, 'a'), (1, 'b'), (0, 'c')], by_priority);
    heap.check();

    assert_eq!(heap.extract_min(), Some((0, 'c')));
    assert_eq!(heap.extract_min(), Some((1, 'a')));
    assert_eq!(heap.extract_min(), Some((1, 'b')));
    assert_eq!(heap.extract_min(), None);

    // A max heap
    let mut heap = HeapBy::new(|a: &i32, b: &i32| b.cmp(a));
    for item in [4, 9, 1, 7] {
        heap.insert(item);
    }
    assert_eq!(heap.peek_front(), Some(&9));
    assert_eq!(heap.extract_min(), Some(9));
    assert_eq!(heap.extract_min(), Some(7));
    assert_eq!(heap.count(), 2);
}

#[test]
// Appending moves every item across and empties the other heap
fn test_heap_4() {
    let mut a: Heap<u32> = (0..10).map(|i| i * 2).collect();
    let mut b: Heap<u32> = Heap::new();
    for i in 0..7 {
        b.insert(i * 2 + 1);
    }
    a.extract_min();

    a.append(&mut b);
    a.check();
    b.check();
    assert!(b.is_empty());
    assert_eq!(b.peek_front(), None);
    assert_eq!(a.count(), 16);
    assert_canonical(a.roots(), 16);

    let drained: Vec<u32> = core::iter::from_fn(|| a.extract_min()).collect();
    let mut expected: Vec<u32> = (1..14).chain([14, 16, 18]).collect();
    expected.sort();
    assert_eq!(drained, expected);

    a.insert(5);
    a.clear();
    assert!(a.is_empty());
    assert_eq!(a.extract_min(), None);
}

#[test]
// A stress test with inserting and extracting, checked against a sorted model
fn test_heap_5() {
    use alloc::collections::BinaryHeap;
    use core::cmp::Reverse;
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut heap = Heap::new();
    let mut model = BinaryHeap::new();
    for i in 0..COUNT {
        let item = rng.random_range(0..1000u32);
        heap.insert(item);
        model.push(Reverse(item));

        if rng.random_range(0..3) == 0 {
            assert_eq!(heap.extract_min(), model.pop().map(|r| r.0));
        }
        assert_eq!(heap.peek_front(), model.peek().map(|r| &r.0));

        if i % 10000 == 0 {
            heap.check();
        }
    }

    assert_eq!(heap.count(), model.len());

    let mut last = 0;
    while let Some(item) = heap.extract_min() {
        assert!(item >= last);
        last = item;
    }
    assert!(heap.is_empty());
    assert_eq!(heap.extract_min(), None);
}

#[test]
// Appending a heap with a different ordering function reorders its items
fn test_heap_6() {
    fn ascending(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }
    fn descending(a: &i32, b: &i32) -> Ordering {
        b.cmp(a)
    }
    type Compare = fn(&i32, &i32) -> Ordering;

    let mut a = HeapBy::from_vec(vec![100, 7], ascending as Compare);
    let mut b = HeapBy::from_vec(vec![1, 2, 3, 4, 5], descending as Compare);
    assert_eq!(b.peek_front(), Some(&5));

    a.append(&mut b);
    a.check();
    b.check();
    assert!(b.is_empty());
    assert_eq!(a.count(), 7);
    assert_canonical(a.roots(), 7);

    let drained: Vec<i32> = core::iter::from_fn(|| a.extract_min()).collect();
    assert_eq!(drained, vec![1, 2, 3, 4, 5, 7, 100]);
}

#[test]
// Reserved room is taken from released nodes first
fn test_heap_7() {
    let mut heap = Heap::with_capacity(4);
    heap.reserve(8);
    for item in 0..8 {
        heap.insert(item);
    }
    assert_eq!(heap.forest.node.allocated_count(), 8);

    for _ in 0..3 {
        heap.extract_min();
    }
    assert_eq!(heap.forest.node.recycle_count(), 3);

    // Released nodes are reused before the heap grows
    heap.reserve(3);
    for item in 10..13 {
        heap.insert(item);
    }
    assert_eq!(heap.forest.node.allocated_count(), 8);
    assert_eq!(heap.forest.node.recycle_count(), 0);
    heap.check();

    let mut by = HeapBy::new(|a: &u8, b: &u8| a.cmp(b));
    by.reserve(2);
    by.insert(2);
    by.insert(1);
    assert_eq!(by.extract_min(), Some(1));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "has a sibling")]
// A root carrying a sibling link is a broken forest
fn test_heap_8() {
    let mut heap = Heap::from_vec(vec![1, 2, 3, 4]);
    heap.insert(5);
    heap.insert(6);

    let (a, b) = (heap.forest.roots[1], heap.forest.roots[2]);
    heap.forest.node[a].sibling = b;
    heap.coalesce();
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
// A root too large for the number of items is a broken forest
fn test_heap_9() {
    let mut heap = Heap::from_vec(vec![1, 2, 3]);
    heap.insert(4);

    let a = heap.forest.roots[0];
    heap.forest.node[a].degree = 64;
    heap.coalesce();
}
