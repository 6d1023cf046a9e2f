//! Doubly linked list of page-table slots.
//!
//! The list does not own any entry: its nodes are stored in a vector indexed
//! by [`SlotId`], with `prev`/`next` holding slot ids instead of pointers. A
//! slot is in the list exactly when its node is `Some`, which makes
//! membership checks and unlinking from the middle O(1).
//!
//! The head is the most recently inserted (or touched) slot, the tail is the
//! next eviction candidate.

use crate::address::SlotId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Link {
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug, Clone)]
pub struct EvictionList {
    links: Vec<Option<Link>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl EvictionList {
    /// A list able to hold slots `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        EvictionList {
            links: vec![None; capacity],
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        self.links.get(slot).map_or(false, Option::is_some)
    }

    /// The least recently added slot.
    pub fn back(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn push_front(&mut self, slot: SlotId) {
        assert!(!self.contains(slot), "slot {slot} is already linked");

        self.links[slot] = Some(Link {
            prev: None,
            next: self.head,
        });

        match self.head {
            Some(old_head) => self.link_mut(old_head).prev = Some(slot),
            None => self.tail = Some(slot),
        }

        self.head = Some(slot);
        self.len += 1;
    }

    /// Unlinks `slot`. Returns whether it was in the list.
    pub fn remove(&mut self, slot: SlotId) -> bool {
        let Some(link) = self.links.get_mut(slot).and_then(Option::take) else {
            return false;
        };

        match link.prev {
            Some(prev) => self.link_mut(prev).next = link.next,
            None => self.head = link.next,
        }

        match link.next {
            Some(next) => self.link_mut(next).prev = link.prev,
            None => self.tail = link.prev,
        }

        self.len -= 1;
        true
    }

    pub fn pop_back(&mut self) -> Option<SlotId> {
        let tail = self.tail?;
        self.remove(tail);
        Some(tail)
    }

    /// Moves `slot` to the head, linking it first if needed.
    pub fn move_to_front(&mut self, slot: SlotId) {
        if self.head == Some(slot) {
            return;
        }

        self.remove(slot);
        self.push_front(slot);
    }

    /// Slots from head (most recent) to tail (next victim).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn link_mut(&mut self, slot: SlotId) -> &mut Link {
        self.links[slot]
            .as_mut()
            .expect("eviction list neighbours are always linked")
    }
}

pub struct Iter<'a> {
    list: &'a EvictionList,
    cursor: Option<SlotId>,
}

impl Iterator for Iter<'_> {
    type Item = SlotId;

    fn next(&mut self) -> Option<SlotId> {
        let slot = self.cursor?;
        self.cursor = self.list.links[slot].and_then(|link| link.next);
        Some(slot)
    }
}
