//! Page-replacement policies.
//!
//! The [`Mmu`](crate::mmu::Mmu) owns the page table and the counters; a
//! replacer only keeps whatever ordering it needs, hears about hits and
//! admissions through [`PageReplacer::page_event`], and names the slot to
//! repurpose when a fault hits a full table.

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    address::{Process, SlotId},
    eviction_list::EvictionList,
    page_table::PageTable,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    /// The page in `slot` was already resident. Its dirty bit is up to date.
    Touched { slot: SlotId, process: Process },
    /// A free slot was filled on a fault.
    Loaded { slot: SlotId, process: Process },
    /// The slot returned by `pick_replacement_page` now holds the new page.
    Replaced { slot: SlotId, process: Process },
}

pub trait PageReplacer {
    fn name(&self) -> &'static str;

    fn page_event(&mut self, _table: &PageTable, _event: PageEvent) {}

    /// Chooses the slot whose page gets replaced. Only called on a full table.
    fn pick_replacement_page(&mut self, table: &PageTable, process: Process) -> SlotId;

    /// Named slot lists, head first, for debug dumps.
    fn eviction_state(&self) -> Vec<(&'static str, Vec<SlotId>)> {
        Vec::new()
    }
}

impl<R: PageReplacer + ?Sized> PageReplacer for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn page_event(&mut self, table: &PageTable, event: PageEvent) {
        (**self).page_event(table, event)
    }

    fn pick_replacement_page(&mut self, table: &PageTable, process: Process) -> SlotId {
        (**self).pick_replacement_page(table, process)
    }

    fn eviction_state(&self) -> Vec<(&'static str, Vec<SlotId>)> {
        (**self).eviction_state()
    }
}

/// Evicts a uniformly random slot on every fault.
pub struct RandomPageReplacer {
    rng: StdRng,
}

impl RandomPageReplacer {
    pub fn new() -> Self {
        RandomPageReplacer {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomPageReplacer {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPageReplacer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageReplacer for RandomPageReplacer {
    fn name(&self) -> &'static str {
        "rdm"
    }

    fn pick_replacement_page(&mut self, table: &PageTable, _process: Process) -> SlotId {
        self.rng.random_range(0..table.capacity())
    }
}

/// Evicts the least recently used page.
pub struct LruPageReplacer {
    recency: EvictionList,
}

impl LruPageReplacer {
    pub fn new(frames: usize) -> Self {
        LruPageReplacer {
            recency: EvictionList::new(frames),
        }
    }
}

impl PageReplacer for LruPageReplacer {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn page_event(&mut self, _table: &PageTable, event: PageEvent) {
        match event {
            PageEvent::Loaded { slot, .. } => self.recency.push_front(slot),
            PageEvent::Touched { slot, .. } | PageEvent::Replaced { slot, .. } => {
                self.recency.move_to_front(slot)
            }
        }
    }

    fn pick_replacement_page(&mut self, _table: &PageTable, _process: Process) -> SlotId {
        self.recency
            .back()
            .expect("a full page table always has a least recently used page")
    }

    fn eviction_state(&self) -> Vec<(&'static str, Vec<SlotId>)> {
        vec![("recency", self.recency.iter().collect())]
    }
}

/// Evicts pages in the order they were brought in.
///
/// Slots are filled `0..frames` in order and each eviction reuses the slot
/// it evicted, so a single cursor walking the slots cyclically visits pages
/// in arrival order.
pub struct FIFOPageReplacer {
    next_victim: SlotId,
    frames: usize,
}

impl FIFOPageReplacer {
    pub fn new(frames: usize) -> Self {
        FIFOPageReplacer {
            next_victim: 0,
            frames,
        }
    }
}

impl PageReplacer for FIFOPageReplacer {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn pick_replacement_page(&mut self, _table: &PageTable, _process: Process) -> SlotId {
        let victim = self.next_victim;
        self.next_victim = (self.next_victim + 1) % self.frames;
        victim
    }

    fn eviction_state(&self) -> Vec<(&'static str, Vec<SlotId>)> {
        vec![("next_victim", vec![self.next_victim])]
    }
}

/// VMS-style segmented FIFO with second chance.
///
/// Each process has a FIFO of at most `rss = frames / 2` slots. A slot pushed
/// out of its FIFO is not freed right away: it joins the global `clean` or
/// `dirty` list and stays resident until a fault reclaims it. Touching it in
/// the meantime brings it back into its owner's FIFO without a fault.
pub struct VmsPageReplacer {
    rss: usize,
    a_fifo: EvictionList,
    b_fifo: EvictionList,
    clean: EvictionList,
    dirty: EvictionList,
}

impl VmsPageReplacer {
    pub fn new(frames: usize) -> Self {
        VmsPageReplacer {
            rss: frames / 2,
            a_fifo: EvictionList::new(frames),
            b_fifo: EvictionList::new(frames),
            clean: EvictionList::new(frames),
            dirty: EvictionList::new(frames),
        }
    }

    pub fn rss(&self) -> usize {
        self.rss
    }

    pub fn fifo(&self, process: Process) -> &EvictionList {
        match process {
            Process::A => &self.a_fifo,
            Process::B => &self.b_fifo,
        }
    }

    pub fn clean(&self) -> &EvictionList {
        &self.clean
    }

    pub fn dirty(&self) -> &EvictionList {
        &self.dirty
    }

    fn fifo_mut(&mut self, process: Process) -> &mut EvictionList {
        match process {
            Process::A => &mut self.a_fifo,
            Process::B => &mut self.b_fifo,
        }
    }

    fn other(process: Process) -> Process {
        match process {
            Process::A => Process::B,
            Process::B => Process::A,
        }
    }

    /// Pushes `slot` at the head of the owner's FIFO. If that overflows the
    /// quota, the FIFO's tail moves to `clean` or `dirty` and is returned.
    fn push_hot(&mut self, table: &PageTable, slot: SlotId, process: Process) -> Option<SlotId> {
        let rss = self.rss;
        let fifo = self.fifo_mut(process);

        fifo.push_front(slot);
        if fifo.len() <= rss {
            return None;
        }

        let demoted = fifo.pop_back()?;

        if table.is_dirty(demoted) {
            self.dirty.push_front(demoted);
        } else {
            self.clean.push_front(demoted);
        }

        debug!(
            "vms: slot {} leaves the {:?} window for the {} list",
            demoted,
            process,
            if table.is_dirty(demoted) { "dirty" } else { "clean" }
        );

        Some(demoted)
    }
}

impl PageReplacer for VmsPageReplacer {
    fn name(&self) -> &'static str {
        "vms"
    }

    fn page_event(&mut self, table: &PageTable, event: PageEvent) {
        match event {
            PageEvent::Touched { slot, process } => {
                if self.fifo(process).contains(slot) {
                    return;
                }

                // Reclaimed from the second-chance lists, or sitting in the
                // other process's window.
                let reclaimed = self.clean.remove(slot)
                    || self.dirty.remove(slot)
                    || self.fifo_mut(Self::other(process)).remove(slot);

                if reclaimed {
                    debug!("vms: slot {} reclaimed into the {:?} window", slot, process);
                }

                self.push_hot(table, slot, process);
            }
            PageEvent::Loaded { slot, process } => {
                self.push_hot(table, slot, process);
            }
            PageEvent::Replaced { .. } => {}
        }
    }

    fn pick_replacement_page(&mut self, table: &PageTable, process: Process) -> SlotId {
        let victim = self
            .clean
            .pop_back()
            .or_else(|| self.dirty.pop_back())
            .or_else(|| self.fifo_mut(process).pop_back())
            .expect("a full page table always has a slot outside the other process's window");

        // The victim keeps its frame in the owner's window; if that overflows,
        // the page pushed out is the one whose frame gets reused.
        self.push_hot(table, victim, process).unwrap_or(victim)
    }

    fn eviction_state(&self) -> Vec<(&'static str, Vec<SlotId>)> {
        vec![
            ("a_fifo", self.a_fifo.iter().collect()),
            ("b_fifo", self.b_fifo.iter().collect()),
            ("clean", self.clean.iter().collect()),
            ("dirty", self.dirty.iter().collect()),
        ]
    }
}
