// Copyright 2021 Tristam MacDonald
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::error::Result;
use std::{cmp::Eq, collections::HashMap, hash::Hash};

/// Identity of a grid edge: the linear indices of its two end nodes, lowest
/// first. Every tetrahedron touching the same pair of nodes produces the
/// same key, whichever direction it walks the edge.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct EdgeKey(usize, usize);

/// Tracks vertex indices to avoid emitting duplicate vertices for edges
/// shared between tetrahedra and cells
pub struct IndexCache<K: Eq + Hash, I: Clone> {
    indices: HashMap<K, I>,
}

impl<K: Eq + Hash, I: Clone> IndexCache<K, I> {
    /// Create a new IndexCache
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
        }
    }

    /// Put an index in the cache under the given key
    pub fn put(&mut self, key: K, index: I) -> Result<()> {
        self.indices.try_reserve(1)?;
        self.indices.insert(key, index);
        Ok(())
    }

    /// Retrieve an index from the cache for the given key
    pub fn get(&self, key: K) -> Option<I> {
        self.indices.get(&key).cloned()
    }
}

impl EdgeKey {
    pub fn new(a: usize, b: usize) -> Self {
        if a > b {
            Self(b, a)
        } else {
            Self(a, b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_key_is_order_independent() {
        assert_eq!(EdgeKey::new(7, 3), EdgeKey::new(3, 7));
        assert_eq!(EdgeKey::new(7, 3), EdgeKey(3, 7));
        assert!(EdgeKey::new(9, 2) < EdgeKey::new(3, 7));
        assert_ne!(EdgeKey::new(3, 7), EdgeKey::new(3, 8));
    }

    #[test]
    fn test_cache_round_trip() {
        let mut cache = IndexCache::new();
        assert_eq!(cache.get(EdgeKey::new(0, 1)), None);

        cache.put(EdgeKey::new(1, 0), 5u32).unwrap();
        assert_eq!(cache.get(EdgeKey::new(0, 1)), Some(5));
        assert_eq!(cache.get(EdgeKey::new(0, 2)), None);
    }
}
