//! Consistent Hash Ring
//!
//! Maps keys to an owning node among a changing set of nodes.

use std::collections::{BTreeSet, HashMap};

/// Hash function used to place nodes and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Virtual positions per node when none is configured.
pub const DEFAULT_REPLICAS: usize = 50;

// == Hash Ring ==
/// Consistent hash ring with virtual nodes.
///
/// Each node occupies `replicas` positions, hashed from the replica index
/// followed by the node id. A key belongs to the first position at or after
/// its own hash, wrapping around to the start of the ring.
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual node positions
    positions: Vec<u32>,
    /// position -> node id
    owners: HashMap<u32, String>,
    nodes: BTreeSet<String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring hashing with CRC-32 (IEEE).
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32fast::hash)
    }

    /// Creates an empty ring with a custom hash function.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
            nodes: BTreeSet::new(),
        }
    }

    // == Add ==
    /// Adds nodes to the ring. Nodes already present are skipped.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            if !self.nodes.insert(node.to_string()) {
                continue;
            }
            self.place(node);
        }
        self.positions.sort_unstable();
    }

    /// Hashes the node's replicas onto the ring. A position shared by two
    /// nodes belongs to the smaller node id, whatever the insertion order.
    fn place(&mut self, node: &str) {
        for i in 0..self.replicas {
            let position = (self.hash)(format!("{}{}", i, node).as_bytes());
            self.positions.push(position);
            self.owners
                .entry(position)
                .and_modify(|owner| {
                    if node < owner.as_str() {
                        *owner = node.to_string();
                    }
                })
                .or_insert_with(|| node.to_string());
        }
    }

    // == Remove ==
    /// Removes a node and all of its virtual positions.
    ///
    /// Returns false if the node was not on the ring.
    pub fn remove(&mut self, node: &str) -> bool {
        if !self.nodes.remove(node) {
            return false;
        }
        // Rebuild so a position shared with the removed node goes back to
        // the node that still holds it
        self.positions.clear();
        self.owners.clear();
        let nodes: Vec<String> = self.nodes.iter().cloned().collect();
        for node in &nodes {
            self.place(node);
        }
        self.positions.sort_unstable();
        true
    }

    // == Get ==
    /// Returns the node owning `key`, or None if the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&position| position < hash);
        let position = self.positions[idx % self.positions.len()];
        self.owners.get(&position).map(String::as_str)
    }

    /// Returns the number of real nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    /// Node ids in sorted order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }
}
