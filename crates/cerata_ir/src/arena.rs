//! Dense, id-indexed storage for graph objects.
//!
//! Types, nodes, edges, graphs and clock domains each live in an [`Arena`].
//! Objects are only ever appended, so an id stays valid for the lifetime of
//! the arena and of every clone made of it.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Opaque id types usable as arena keys.
pub trait ArenaId: Copy {
    /// Creates an id from a raw index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw index.
    fn as_raw(self) -> u32;
}

/// An append-only vector addressed by typed ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Stores `item` and returns its id.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// The id the next [`alloc`](Self::alloc) will return.
    pub fn next_id(&self) -> I {
        I::from_raw(self.items.len() as u32)
    }

    /// Returns the item with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id was not minted by this arena (or one it was cloned from).
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns the item with the given id mutably.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of bounds.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }

    /// Returns the item with the given id, or `None` if it is out of bounds.
    pub fn try_get(&self, id: I) -> Option<&T> {
        self.items.get(id.as_raw() as usize)
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing was stored yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over `(id, &item)` in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Iterates over all ids in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = I> {
        (0..self.items.len() as u32).map(I::from_raw)
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{EdgeId, NodeId};

    #[test]
    fn alloc_returns_sequential_ids() {
        let mut arena: Arena<NodeId, &str> = Arena::new();
        assert_eq!(arena.next_id(), NodeId::from_raw(0));
        let a = arena.alloc("clk");
        let b = arena.alloc("reset");
        assert_eq!(a.as_raw(), 0);
        assert_eq!(b.as_raw(), 1);
        assert_eq!(arena[b], "reset");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn index_mut_modifies() {
        let mut arena: Arena<EdgeId, String> = Arena::new();
        let id = arena.alloc("a_to_b".to_string());
        arena[id].push_str("_1");
        assert_eq!(arena.get(id), "a_to_b_1");
    }

    #[test]
    fn try_get_out_of_bounds() {
        let arena: Arena<NodeId, u8> = Arena::default();
        assert!(arena.is_empty());
        assert!(arena.try_get(NodeId::from_raw(3)).is_none());
    }

    #[test]
    fn clones_keep_ids_valid() {
        let mut arena: Arena<NodeId, u32> = Arena::new();
        let id = arena.alloc(4);
        let mut copy = arena.clone();
        copy[id] = 12;
        assert_eq!(arena[id], 4);
        assert_eq!(copy[id], 12);
    }

    #[test]
    fn iter_and_ids_agree() {
        let mut arena: Arena<NodeId, char> = Arena::new();
        arena.alloc('a');
        arena.alloc('b');
        let from_iter: Vec<NodeId> = arena.iter().map(|(id, _)| id).collect();
        let from_ids: Vec<NodeId> = arena.ids().collect();
        assert_eq!(from_iter, from_ids);
    }

    #[test]
    fn serde_roundtrip() {
        let mut arena: Arena<NodeId, String> = Arena::new();
        arena.alloc("probe".to_string());
        let json = serde_json::to_string(&arena).unwrap();
        let back: Arena<NodeId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[NodeId::from_raw(0)], "probe");
    }
}
