//! Recency List Module
//!
//! Doubly-linked recency ordering backed by a slab of nodes, giving O(1)
//! push, touch, remove and eviction.

/// Stable handle to a node inside a [`RecencyList`].
pub type NodeIndex = usize;

#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: Option<NodeIndex>,
    next: Option<NodeIndex>,
}

// == Recency List ==
/// Items ordered from most recently used (front) to least recently used
/// (back).
///
/// Removed slots are recycled through a free list, so a [`NodeIndex`] stays
/// valid until its node is removed.
#[derive(Debug)]
pub struct RecencyList<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<NodeIndex>,
    head: Option<NodeIndex>,
    tail: Option<NodeIndex>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item as the most recently used and returns its handle.
    pub fn push_front(&mut self, item: T) -> NodeIndex {
        let node = Node {
            item,
            prev: None,
            next: self.head,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };

        match self.head {
            Some(old_head) => self.node_mut(old_head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        idx
    }

    // == Touch ==
    /// Moves the node to the front (most recent). Unknown handles are ignored.
    pub fn move_to_front(&mut self, idx: NodeIndex) {
        if self.head == Some(idx) || !self.contains(idx) {
            return;
        }
        self.unlink(idx);

        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }
        if let Some(old_head) = old_head {
            self.node_mut(old_head).prev = Some(idx);
        }
        self.head = Some(idx);
    }

    // == Remove ==
    /// Removes the node and returns its item.
    pub fn remove(&mut self, idx: NodeIndex) -> Option<T> {
        if !self.contains(idx) {
            return None;
        }
        self.unlink(idx);
        self.len -= 1;
        self.free.push(idx);
        self.nodes[idx].take().map(|node| node.item)
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used item.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek Oldest ==
    /// Returns the least recently used item without removing it.
    #[cfg(test)]
    pub(crate) fn peek_back(&self) -> Option<&T> {
        self.tail.and_then(|idx| self.get(idx))
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&T> {
        self.nodes
            .get(idx)
            .and_then(Option::as_ref)
            .map(|node| &node.item)
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut T> {
        self.nodes
            .get_mut(idx)
            .and_then(Option::as_mut)
            .map(|node| &mut node.item)
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        matches!(self.nodes.get(idx), Some(Some(_)))
    }

    /// Drops every node and releases the slab.
    pub fn clear(&mut self) {
        self.nodes = Vec::new();
        self.free = Vec::new();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn unlink(&mut self, idx: NodeIndex) {
        let (prev, next) = {
            let node = self.node_mut(idx);
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    // Callers only pass indices that are linked into the list.
    fn node_mut(&mut self, idx: NodeIndex) -> &mut Node<T> {
        match self.nodes[idx].as_mut() {
            Some(node) => node,
            None => unreachable!("recency list index {idx} points at a free slot"),
        }
    }
}

/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<NodeIndex>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.nodes.get(idx)?.as_ref()?;
        self.cursor = node.next;
        Some((idx, &node.item))
    }
}
