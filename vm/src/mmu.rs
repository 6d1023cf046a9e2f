use std::fmt;

use log::{debug, info, trace};

use crate::{
    address::{PageNumber, Process, SlotId},
    page_replacer::{PageEvent, PageReplacer},
    page_table::PageTable,
    trace::AddressEvent,
};

/// Counters of one simulation run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub frames: usize,
    pub events: u64,
    pub faults: u64,
    /// Pages brought in from the backing store, one per fault.
    pub reads: u64,
    /// Dirty pages written back when their frame was reused.
    pub writes: u64,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total memory frames:  {}", self.frames)?;
        writeln!(f, "events in trace:      {}", self.events)?;
        writeln!(f, "total disk reads:     {}", self.reads)?;
        write!(f, "total disk writes:    {}", self.writes)
    }
}

/// Outcome of a single access.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Hit(SlotId),
    Fault {
        slot: SlotId,
        /// Page that previously lived in `slot`, if it was reused.
        evicted: Option<PageNumber>,
    },
}

impl Access {
    pub fn is_fault(&self) -> bool {
        matches!(self, Access::Fault { .. })
    }
}

/// One simulation run: the page table, the policy and the counters.
pub struct Mmu<R: PageReplacer> {
    page_table: PageTable,
    replacer: R,
    stats: Stats,
}

impl<R: PageReplacer> Mmu<R> {
    pub fn new(frames: usize, replacer: R) -> Self {
        Mmu {
            page_table: PageTable::new(frames),
            replacer,
            stats: Stats {
                frames,
                ..Stats::default()
            },
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn replacer(&self) -> &R {
        &self.replacer
    }

    /// Replays every event and returns the final counters.
    pub fn run<I>(&mut self, events: I) -> Stats
    where
        I: IntoIterator<Item = AddressEvent>,
    {
        for event in events {
            self.access(event);
        }

        info!(
            "mmu: {} finished: {} events, {} reads, {} writes",
            self.replacer.name(),
            self.stats.events,
            self.stats.reads,
            self.stats.writes
        );

        self.stats
    }

    pub fn access(&mut self, event: AddressEvent) -> Access {
        let page_number = event.page_number();
        let process = Process::of(event.address);
        let write = event.op.is_write();

        self.stats.events += 1;

        match self.page_table.find(page_number) {
            Some(slot) => {
                trace!("mmu: page hit {:#07x} in slot {}", page_number, slot);

                if write {
                    self.page_table.mark_dirty(slot);
                }

                self.replacer
                    .page_event(&self.page_table, PageEvent::Touched { slot, process });

                Access::Hit(slot)
            }
            None => {
                debug!("mmu: page fault on {:#07x} ({:?})", page_number, process);
                self.handle_page_fault(page_number, process, write)
            }
        }
    }

    fn handle_page_fault(
        &mut self,
        page_number: PageNumber,
        process: Process,
        dirty: bool,
    ) -> Access {
        self.stats.faults += 1;

        if !self.page_table.is_full() {
            let slot = self.page_table.admit(page_number, dirty);
            self.load_page(page_number);

            self.replacer
                .page_event(&self.page_table, PageEvent::Loaded { slot, process });

            return Access::Fault {
                slot,
                evicted: None,
            };
        }

        let slot = self.replacer.pick_replacement_page(&self.page_table, process);
        let evicted = self.page_table.get(slot);

        if evicted.dirty {
            if let Some(evicted_page) = evicted.page_number {
                debug!("mmu: page {:#07x} is dirty, saving before overwriting", evicted_page);
            }
            self.stats.writes += 1;
        }

        self.load_page(page_number);
        self.page_table.reuse(slot, page_number, dirty);

        self.replacer
            .page_event(&self.page_table, PageEvent::Replaced { slot, process });

        Access::Fault {
            slot,
            evicted: evicted.page_number,
        }
    }

    fn load_page(&mut self, page_number: PageNumber) {
        trace!("mmu: reading page {:#07x} from backing store", page_number);
        self.stats.reads += 1;
    }

    /// Snapshot of the counters, the page table and the policy's lists.
    pub fn dump(&self) -> Dump<'_, R> {
        Dump { mmu: self }
    }
}

pub struct Dump<'a, R: PageReplacer> {
    mmu: &'a Mmu<R>,
}

impl<R: PageReplacer> fmt::Display for Dump<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Mmu {
            page_table,
            replacer,
            stats,
        } = self.mmu;

        writeln!(f, "NumReads: {:<8} NumWrites: {:<8}", stats.reads, stats.writes)?;
        writeln!(f)?;
        write!(f, "{}", page_table)?;

        for (name, slots) in replacer.eviction_state() {
            write!(f, "{:<12}", name)?;
            for slot in slots {
                match page_table.get(slot).page_number {
                    Some(page_number) => write!(f, " {:#07x}", page_number)?,
                    None => write!(f, " [{}]", slot)?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
