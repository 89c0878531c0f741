//! Recency-ordered doubly-linked list
//!
//! Arena-backed: nodes live in a `Vec` and are addressed by stable indices,
//! so there are no interlinked references to reason about. Head is the
//! most-recently-used end, tail the least-recently-used.

use std::mem;

/// Node in the recency list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly-linked list of cache entries ordered by recency of touch
pub(crate) struct RecencyList<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list with room for `capacity` nodes
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Handle of the most-recently-used node
    pub(crate) fn front(&self) -> Option<usize> {
        self.head
    }

    /// Handle of the least-recently-used node
    pub(crate) fn back(&self) -> Option<usize> {
        self.tail
    }

    /// Value stored at `idx`
    pub(crate) fn value(&self, idx: usize) -> Option<&V> {
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Swap in a new value at `idx`, returning the old one
    pub(crate) fn set_value(&mut self, idx: usize, value: V) -> Option<V> {
        self.nodes[idx]
            .as_mut()
            .map(|node| mem::replace(&mut node.value, value))
    }

    /// Insert a new most-recently-used node and return its handle
    pub(crate) fn push_front(&mut self, key: K, value: V) -> usize {
        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key,
            value,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.len += 1;
        idx
    }

    /// Promote the node at `idx` to the most-recently-used position
    pub(crate) fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return; // Already at front
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    /// Remove the node at `idx` from the list, returning its entry
    pub(crate) fn detach(&mut self, idx: usize) -> Option<(K, V)> {
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_node(idx);
        self.len -= 1;
        Some((node.key, node.value))
    }

    /// Iterate entries from least-recently-used to most-recently-used
    pub(crate) fn iter_oldest_first(&self) -> OldestFirst<'_, K, V> {
        OldestFirst {
            list: self,
            cursor: self.tail,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.nodes[idx] {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }
}

/// Iterator over list entries, oldest to newest
pub(crate) struct OldestFirst<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
}

impl<'a, K, V> Iterator for OldestFirst<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.nodes[idx].as_ref()?;
        self.cursor = node.prev;
        Some((&node.key, &node.value))
    }
}
