//! A single partition: a key-sorted singly-linked list of `(key, value)`
//! pairs guarded by its own mutex.
//!
//! Concurrent `emit`s to *different* partitions proceed fully in
//! parallel; `emit` and `get_next` on the *same* partition serialize on
//! `inner`.

use std::cmp::Ordering;

use crate::sync::Mutex;

struct PairNode {
    key: Vec<u8>,
    value: Vec<u8>,
    next: Option<Box<PairNode>>,
}

fn footprint(key: &[u8], value: &[u8]) -> usize {
    key.len() + value.len() + 2
}

/// Inserts `new_node` preserving ascending-key order (I1), appending
/// after any existing pairs with an equal key (stable append within a
/// key group).
fn insert_sorted(mut link: &mut Option<Box<PairNode>>, new_node: Box<PairNode>) {
    let mut new_node = new_node;
    loop {
        let descend = match link.as_deref() {
            None => false,
            Some(node) => node.key <= new_node.key,
        };
        if descend {
            link = match link {
                Some(node) => &mut node.next,
                None => unreachable!("checked Some above"),
            };
        } else {
            new_node.next = link.take();
            *link = Some(new_node);
            return;
        }
    }
}

/// Removes and returns the first node whose key equals `key`, or `None`
/// if the walk runs off the end or passes a strictly greater key first
/// (B4: `compare(key, head) < 0` stops the walk without mutation).
fn remove_match(mut link: &mut Option<Box<PairNode>>, key: &[u8]) -> Option<Box<PairNode>> {
    loop {
        let ordering = match link.as_deref() {
            None => return None,
            Some(node) => key.cmp(node.key.as_slice()),
        };
        match ordering {
            Ordering::Less => return None,
            Ordering::Equal => {
                let mut boxed = link.take().expect("checked Some above");
                *link = boxed.next.take();
                return Some(boxed);
            }
            Ordering::Greater => {
                link = match link {
                    Some(node) => &mut node.next,
                    None => unreachable!("checked Some above"),
                };
            }
        }
    }
}

struct PartitionInner {
    head: Option<Box<PairNode>>,
    /// Cumulative byte-footprint of all resident pairs (I2).
    size: usize,
}

pub(crate) struct Partition {
    inner: Mutex<PartitionInner>,
}

impl Partition {
    pub(crate) fn new() -> Self {
        Partition {
            inner: Mutex::new(PartitionInner {
                head: None,
                size: 0,
            }),
        }
    }

    pub(crate) fn emit(&self, key: &[u8], value: &[u8]) {
        let added = footprint(key, value);
        let node = Box::new(PairNode {
            key: key.to_vec(),
            value: value.to_vec(),
            next: None,
        });
        let mut inner = self.inner.lock().unwrap();
        insert_sorted(&mut inner.head, node);
        inner.size += added;
    }

    pub(crate) fn get_next(&self, key: &[u8]) -> Option<Vec<u8>> {
        let mut inner = self.inner.lock().unwrap();
        let removed = remove_match(&mut inner.head, key)?;
        inner.size -= footprint(&removed.key, &removed.value);
        Some(removed.value)
    }

    /// The key currently at the head of the list, if any. Used by the
    /// driver to know which key to hand the reducer next.
    pub(crate) fn head_key(&self) -> Option<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        inner.head.as_ref().map(|node| node.key.clone())
    }

    pub(crate) fn footprint_bytes(&self) -> usize {
        self.inner.lock().unwrap().size
    }

    #[cfg(test)]
    fn keys_in_order(&self) -> Vec<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        let mut out = Vec::new();
        let mut cur = inner.head.as_deref();
        while let Some(node) = cur {
            out.push(node.key.clone());
            cur = node.next.as_deref();
        }
        out
    }
}

/// The fixed-length array of `P` partitions a single [`crate::run`]
/// invocation allocates, plus the partitioner used to route every
/// `emit`.
pub(crate) struct PartitionStore {
    partitions: Vec<Partition>,
}

impl PartitionStore {
    pub(crate) fn new(num_partitions: usize) -> Self {
        PartitionStore {
            partitions: (0..num_partitions).map(|_| Partition::new()).collect(),
        }
    }

    pub(crate) fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Routes `(key, value)` to `partition_of(key, P)` and emits there.
    pub(crate) fn emit(&self, key: &[u8], value: &[u8]) {
        let idx = crate::partitioner::partition_of(key, self.partitions.len());
        self.partitions[idx].emit(key, value);
    }

    pub(crate) fn get_next(&self, partition_index: usize, key: &[u8]) -> Option<Vec<u8>> {
        self.partitions[partition_index].get_next(key)
    }

    pub(crate) fn head_key(&self, partition_index: usize) -> Option<Vec<u8>> {
        self.partitions[partition_index].head_key()
    }

    pub(crate) fn footprint_bytes(&self, partition_index: usize) -> usize {
        self.partitions[partition_index].footprint_bytes()
    }
}
