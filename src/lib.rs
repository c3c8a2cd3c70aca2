//! ## Introduction
//!
//! This crate implements two collections built from arena backed trees: a map keyed by strings,
//! backed by a ternary search trie, and a mergeable priority queue, backed by a binomial forest.
//!
//! A ternary search trie stores keys one symbol per node. Each level of the trie is a binary search
//! tree over the symbols that can follow a given prefix, and a third 'middle' link advances to the
//! next symbol of the key. Keys that share a prefix share its nodes, and the keys come out of the
//! trie in ascending order.
//!
//! A binomial heap keeps its items in a forest of heap ordered trees whose sizes are powers of two.
//! Inserting only adds a single item tree to the forest. When the least item is removed the forest
//! is coalesced, pairing up trees of the same size like the carries of a binary addition, so that
//! afterwards the trees mirror the binary representation of the number of items.
//!
//! ## Benefits
//!
//! - Trie keys do not need to be hashable, and lookups never compare whole keys, only symbols.
//! - Nodes of both collections live in a single array and refer to each other by index. Nodes that
//!   are removed are recycled for future use rather than returned to the allocator.
//! - Trie nodes that no longer lead to any value are pruned as soon as a key is removed.
//! - Heap items that support `Ord` can use `Heap`, otherwise a custom function can be supplied to
//!   compare items using `HeapBy`.
//! - Both collections expose a read-only view of their internal trees, for example to draw them.
//! - The crate is small and `#![no_std]`.
//!
//! ## Contents
//!
//! <center>
//!
//! | Type          | Stores       | Sorts By  | Iterator       | View       |
//! |:--------------|:-------------|:----------|:---------------|:-----------|
//! | `Trie`        | String/Value | Symbol    | `TrieIterator` | `TrieNode` |
//! | `Heap`        | Item         | Ord       | `HeapRoots`    | `HeapNode` |
//! | `HeapBy`      | Item         | Function  | `HeapRoots`    | `HeapNode` |
//!
//! </center>
//!
//! The crate exposes an additional type `util::Pool` that provides the node storage of the other
//! types. It hands out `usize` indices for stored values and recycles them when the values are
//! released. It is provided to support development of additional collection types.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

mod heap;
mod trie;
pub mod util;

pub use heap::*;
pub use trie::*;

#[cfg(test)]
mod proptests;
