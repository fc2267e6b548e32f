//! Recency list backed by a slot arena
//!
//! Entries live in a `Vec` of slots and link to each other through slot
//! indices, so relinking never touches the allocator and no node can
//! outlive the list that owns it.

/// A single occupied slot
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list ordered from most recently used (front) to least
/// recently used (back)
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Slot of the least recently used entry
    pub(crate) fn back(&self) -> Option<usize> {
        self.tail
    }

    pub(crate) fn value(&self, slot: usize) -> Option<&V> {
        self.node(slot).map(|n| &n.value)
    }

    pub(crate) fn value_mut(&mut self, slot: usize) -> Option<&mut V> {
        self.node_mut(slot).map(|n| &mut n.value)
    }

    /// Insert a new entry at the front and return its slot
    pub(crate) fn push_front(&mut self, key: K, value: V) -> usize {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.link_front(slot);
        self.len += 1;
        slot
    }

    /// Mark the entry in `slot` as most recently used
    pub(crate) fn move_to_front(&mut self, slot: usize) {
        if self.head == Some(slot) || self.node(slot).is_none() {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    /// Unlink the entry in `slot` and hand it back
    pub(crate) fn remove(&mut self, slot: usize) -> Option<(K, V)> {
        self.node(slot)?;
        self.unlink(slot);

        let node = self.slots[slot].take()?;
        self.free.push(slot);
        self.len -= 1;
        Some((node.key, node.value))
    }

    /// Remove the least recently used entry
    pub(crate) fn pop_back(&mut self) -> Option<(K, V)> {
        let back = self.back()?;
        self.remove(back)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate from front (most recent) to back (least recent)
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn node(&self, slot: usize) -> Option<&Node<K, V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Detach `slot` from its neighbours, patching head and tail
    fn unlink(&mut self, slot: usize) {
        let Some((prev, next)) = self.node(slot).map(|n| (n.prev, n.next)) else {
            return;
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = None;
        }
    }

    /// Attach a detached `slot` in front of the current head
    fn link_front(&mut self, slot: usize) {
        let old_head = self.head;

        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(h) => {
                if let Some(node) = self.node_mut(h) {
                    node.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }

        self.head = Some(slot);
    }
}

/// Front-to-back iterator over a [`RecencyList`]
pub(crate) struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
