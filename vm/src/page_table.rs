use std::{collections::HashMap, fmt};

use crate::address::{PageNumber, SlotId};

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct PageTableEntry {
    /// `None` while the slot has never been filled.
    pub page_number: Option<PageNumber>,
    pub dirty: bool,
}

/// Fixed number of physical slots, filled in order and then only reused.
///
/// Slot indices never move, so eviction structures can refer to entries by
/// [`SlotId`] for the whole run.
#[derive(Debug)]
pub struct PageTable {
    table: Vec<PageTableEntry>,
    index: HashMap<PageNumber, SlotId>,
    filled: usize,
    is_full: bool,
}

impl PageTable {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "page table needs at least one frame");

        PageTable {
            table: vec![PageTableEntry::default(); capacity],
            index: HashMap::with_capacity(capacity),
            filled: 0,
            is_full: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Once set, stays set for the rest of the run.
    pub fn is_full(&self) -> bool {
        self.is_full
    }

    pub fn find(&self, page_number: PageNumber) -> Option<SlotId> {
        self.index.get(&page_number).copied()
    }

    pub fn get(&self, slot: SlotId) -> PageTableEntry {
        self.table[slot]
    }

    pub fn is_dirty(&self, slot: SlotId) -> bool {
        self.table[slot].dirty
    }

    /// Fills the next unused slot. Must not be called once the table is full.
    pub fn admit(&mut self, page_number: PageNumber, dirty: bool) -> SlotId {
        assert!(!self.is_full, "admit on a full page table");
        debug_assert!(self.find(page_number).is_none());

        let slot = self.filled;

        self.table[slot] = PageTableEntry {
            page_number: Some(page_number),
            dirty,
        };
        self.index.insert(page_number, slot);

        self.filled += 1;
        if self.filled == self.table.len() {
            self.is_full = true;
        }

        slot
    }

    /// Puts a different page in an already populated slot.
    pub fn reuse(&mut self, slot: SlotId, page_number: PageNumber, dirty: bool) {
        assert!(slot < self.filled, "reuse of unpopulated slot {slot}");
        debug_assert!(self.find(page_number).is_none());

        let entry = &mut self.table[slot];

        if let Some(old) = entry.page_number.replace(page_number) {
            self.index.remove(&old);
        }
        entry.dirty = dirty;

        self.index.insert(page_number, slot);
    }

    pub fn mark_dirty(&mut self, slot: SlotId) {
        self.table[slot].dirty = true;
    }

    /// Every slot, populated or not, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &PageTableEntry)> + '_ {
        self.table.iter().enumerate()
    }

    pub fn resident_pages(&self) -> impl Iterator<Item = PageNumber> + '_ {
        self.table.iter().filter_map(|entry| entry.page_number)
    }
}

impl fmt::Display for PageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PAGE TABLE")?;
        writeln!(f, "numEntries: {:<6} isFull: {}", self.filled, self.is_full as u8)?;
        writeln!(f, "============================")?;
        writeln!(f, "Entry: PageNumber: Dirty:")?;

        for (slot, entry) in self.iter() {
            match entry.page_number {
                Some(page_number) => {
                    writeln!(f, "{:<6} {:#010x}  {}", slot, page_number, entry.dirty as u8)?
                }
                None => writeln!(f, "{:<6} {:<10}  {}", slot, "-", entry.dirty as u8)?,
            }
        }

        Ok(())
    }
}
