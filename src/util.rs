//! Utility types to support arena backed trees

#![warn(missing_docs)]

extern crate alloc;
use alloc::vec::Vec;

use core::{
    mem,
    ops::{Index, IndexMut},
};

//-----------------------------------------------------------------------------------------------//

// A slot in the pool, either holding a value or linking to the next recycled slot
#[derive(Clone)]
enum Slot<T> {
    Used(T),
    Free(usize),
}

//-----------------------------------------------------------------------------------------------//

/// A pool of values addressed by `usize` indices
///
/// Trees built on a `Pool` refer to their nodes by index rather than by reference, with `!0`
/// (i.e. `usize::MAX`) standing in for 'no node'. Indices released with `free` are recycled by
/// later calls to `alloc`, so an index is only meaningful while the value it was issued for is
/// still live.
#[derive(Clone)]
pub struct Pool<T> {
    slot: Vec<Slot<T>>,
    recycle: usize,
    count: usize,
}

impl<T> Pool<T> {
    /// Construct an empty pool
    pub fn new() -> Pool<T> {
        Pool {
            slot: Vec::new(),
            recycle: !0,
            count: 0,
        }
    }

    /// Construct an empty pool, pre-allocating a given capacity
    pub fn with_capacity(capacity: usize) -> Pool<T> {
        Pool {
            slot: Vec::with_capacity(capacity),
            recycle: !0,
            count: 0,
        }
    }

    /// Get the number of live values in the pool
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check if there are any live values in the pool
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the number of recycled slots in the pool
    #[inline]
    pub fn recycle_count(&self) -> usize {
        self.slot.len() - self.count
    }

    /// Get the current allocated size of the pool. This is the current `count` plus the
    /// `recycle_count`. Note that this is not necessarily the same as the allocated capacity.
    #[inline]
    pub fn allocated_count(&self) -> usize {
        self.slot.len()
    }

    /// Remove all values from the pool
    pub fn clear(&mut self) {
        self.slot.truncate(0);
        self.recycle = !0;
        self.count = 0;
    }

    /// Reserves capacity for at least `additional` more values
    ///
    /// Slots that have been recycled are subtracted from the `additional` requested. This function
    /// returns the amount of additional storage that was required (if any).
    pub fn reserve(&mut self, additional: usize) -> usize {
        let recycle_count = self.recycle_count();
        if additional > recycle_count {
            let required = additional - recycle_count;
            self.slot.reserve(required);
            required
        } else {
            0
        }
    }

    /// Store a value, returning its index
    ///
    /// A recycled slot is reused if one is available, otherwise the index is the next in the
    /// ascending sequence that has not been used before.
    pub fn alloc(&mut self, value: T) -> usize {
        // Increase the live count
        self.count += 1;

        // Recycle an old slot
        let index = self.recycle;
        if !index != 0 {
            match mem::replace(&mut self.slot[index], Slot::Used(value)) {
                Slot::Free(next) => self.recycle = next,
                Slot::Used(_) => unreachable!("recycled slot {index} is in use"),
            }
            return index;
        }

        // Inititialise a new one
        self.slot.push(Slot::Used(value));
        self.slot.len() - 1
    }

    /// Release a value, returning it and adding its slot to the recycle queue
    ///
    /// Releasing an index that does not hold a live value is a defect in the calling tree and
    /// panics.
    pub fn free(&mut self, index: usize) -> T {
        match mem::replace(&mut self.slot[index], Slot::Free(self.recycle)) {
            Slot::Used(value) => {
                self.count -= 1;
                self.recycle = index;
                value
            }
            Slot::Free(_) => panic!("double free of pool slot {index}"),
        }
    }

    /// Get a value by index, or `None` if the index is not live
    pub fn get(&self, index: usize) -> Option<&T> {
        match self.slot.get(index) {
            Some(Slot::Used(value)) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool::new()
    }
}

impl<T> Index<usize> for Pool<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        match &self.slot[index] {
            Slot::Used(value) => value,
            Slot::Free(_) => panic!("pool slot {index} is not in use"),
        }
    }
}

impl<T> IndexMut<usize> for Pool<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match &mut self.slot[index] {
            Slot::Used(value) => value,
            Slot::Free(_) => panic!("pool slot {index} is not in use"),
        }
    }
}

//-----------------------------------------------------------------------------------------------//

#[test]
// Recycled slots are handed out again before the pool grows
fn test_pool_0() {
    let mut pool = Pool::new();

    let a = pool.alloc('a');
    let b = pool.alloc('b');
    let c = pool.alloc('c');
    assert_eq!((a, b, c), (0, 1, 2));
    assert_eq!(pool.count(), 3);

    assert_eq!(pool.free(b), 'b');
    assert_eq!(pool.free(a), 'a');
    assert_eq!(pool.count(), 1);
    assert_eq!(pool.recycle_count(), 2);
    assert_eq!(pool.get(a), None);

    // Last freed, first reused
    assert_eq!(pool.alloc('x'), a);
    assert_eq!(pool.alloc('y'), b);
    assert_eq!(pool.alloc('z'), 3);
    assert_eq!(pool.allocated_count(), 4);
    assert_eq!(pool[b], 'y');

    pool[c] = 'w';
    assert_eq!(pool.get(c), Some(&'w'));

    pool.clear();
    assert!(pool.is_empty());
    assert_eq!(pool.allocated_count(), 0);
}

#[test]
// Reserving takes recycled slots into account
fn test_pool_1() {
    let mut pool = Pool::with_capacity(4);
    for i in 0..4 {
        pool.alloc(i);
    }
    pool.free(1);
    pool.free(2);

    assert_eq!(pool.reserve(1), 0);
    assert_eq!(pool.reserve(5), 3);
}

#[test]
#[should_panic]
// Releasing a slot twice is a defect
fn test_pool_2() {
    let mut pool = Pool::new();
    let a = pool.alloc(1);
    pool.free(a);
    pool.free(a);
}
