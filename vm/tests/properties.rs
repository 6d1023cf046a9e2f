use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use vm::{
    mmu::{Mmu, Stats},
    page_replacer::{PageReplacer, VmsPageReplacer},
    policy::Policy,
    trace::AddressEvent,
};

/// Small page space so traces hit and miss often. Page numbers with a top
/// nibble of 3 belong to process B.
fn event() -> impl Strategy<Value = AddressEvent> {
    (any::<bool>(), 0u32..6, 0u32..0x1000, any::<bool>()).prop_map(|(b, page, offset, write)| {
        let base = if b { 0x3000_0000 } else { 0x0040_0000 };
        let address = base + (page << 12) + offset;
        if write {
            AddressEvent::write(address)
        } else {
            AddressEvent::read(address)
        }
    })
}

fn policy() -> impl Strategy<Value = Policy> {
    prop::sample::select(Policy::ALL.to_vec())
}

/// Straightforward FIFO: a queue of resident pages, oldest at the front.
fn reference_fifo(frames: usize, events: &[AddressEvent]) -> (u64, u64) {
    let mut queue: VecDeque<(u32, bool)> = VecDeque::new();
    let (mut reads, mut writes) = (0, 0);

    for event in events {
        let page = event.page_number();
        if let Some(entry) = queue.iter_mut().find(|(p, _)| *p == page) {
            entry.1 |= event.op.is_write();
            continue;
        }

        reads += 1;
        if queue.len() == frames {
            let (_, dirty) = queue.pop_front().unwrap();
            writes += dirty as u64;
        }
        queue.push_back((page, event.op.is_write()));
    }

    (reads, writes)
}

/// Straightforward LRU: a vector ordered from least to most recently used.
fn reference_lru(frames: usize, events: &[AddressEvent]) -> (u64, u64) {
    let mut order: Vec<(u32, bool)> = Vec::new();
    let (mut reads, mut writes) = (0, 0);

    for event in events {
        let page = event.page_number();
        let write = event.op.is_write();

        if let Some(pos) = order.iter().position(|(p, _)| *p == page) {
            let (_, dirty) = order.remove(pos);
            order.push((page, dirty || write));
            continue;
        }

        reads += 1;
        if order.len() == frames {
            let (_, dirty) = order.remove(0);
            writes += dirty as u64;
        }
        order.push((page, write));
    }

    (reads, writes)
}

fn check_vms_lists(mmu: &Mmu<VmsPageReplacer>) -> Result<(), TestCaseError> {
    let table = mmu.page_table();
    let vms = mmu.replacer();

    let mut seen = HashSet::new();
    for (name, slots) in vms.eviction_state() {
        for slot in slots {
            prop_assert!(seen.insert(slot), "slot {} appears twice (again in {})", slot, name);
            prop_assert!(slot < table.filled());
        }
    }

    // Every populated slot is tracked somewhere.
    prop_assert_eq!(seen.len(), table.filled());

    for process in [vm::address::Process::A, vm::address::Process::B] {
        prop_assert!(vms.fifo(process).len() <= vms.rss());
    }

    Ok(())
}

proptest! {
    #[test]
    fn one_read_per_fault(
        frames in 1usize..8,
        policy in policy(),
        seed in any::<u64>(),
        events in prop::collection::vec(event(), 0..200),
    ) {
        let mut mmu = Mmu::new(frames, policy.replacer(frames, Some(seed)));
        let mut was_full = false;

        for event in &events {
            let before = mmu.stats();
            let access = mmu.access(*event);
            let after = mmu.stats();

            let table = mmu.page_table();
            prop_assert!(table.filled() <= frames);
            prop_assert!(!was_full || table.is_full());
            was_full = table.is_full();

            if access.is_fault() {
                prop_assert_eq!(after.reads, before.reads + 1);
                prop_assert!(after.writes - before.writes <= 1);
            } else {
                prop_assert_eq!(Stats { events: before.events + 1, ..before }, after);
            }
        }

        let stats = mmu.stats();
        prop_assert_eq!(stats.events, events.len() as u64);
        prop_assert_eq!(stats.reads, stats.faults);
        prop_assert!(stats.writes <= stats.faults - mmu.page_table().filled() as u64);
    }

    #[test]
    fn fifo_matches_queue_model(
        frames in 1usize..8,
        events in prop::collection::vec(event(), 0..200),
    ) {
        let stats = Mmu::new(frames, Policy::Fifo.replacer(frames, None)).run(events.iter().copied());

        prop_assert_eq!((stats.reads, stats.writes), reference_fifo(frames, &events));
    }

    #[test]
    fn lru_matches_ordered_model(
        frames in 1usize..8,
        events in prop::collection::vec(event(), 0..200),
    ) {
        let stats = Mmu::new(frames, Policy::Lru.replacer(frames, None)).run(events.iter().copied());

        prop_assert_eq!((stats.reads, stats.writes), reference_lru(frames, &events));
    }

    #[test]
    fn vms_lists_stay_disjoint(
        frames in 1usize..10,
        events in prop::collection::vec(event(), 0..300),
    ) {
        let mut mmu = Mmu::new(frames, VmsPageReplacer::new(frames));

        for event in events {
            mmu.access(event);
            check_vms_lists(&mmu)?;
        }
    }

    #[test]
    fn repeated_read_hits_are_idempotent(
        frames in 1usize..8,
        policy in policy(),
        events in prop::collection::vec(event(), 1..100),
        repeats in 1usize..10,
    ) {
        let mut mmu = Mmu::new(frames, policy.replacer(frames, Some(0)));
        mmu.run(events.iter().copied());

        let last = *events.last().unwrap();
        let probe = AddressEvent::read(last.address);
        let slot = mmu.page_table().find(last.page_number()).unwrap();
        let dirty = mmu.page_table().is_dirty(slot);
        let before = mmu.stats();

        for _ in 0..repeats {
            prop_assert!(!mmu.access(probe).is_fault());
        }

        let after = mmu.stats();
        prop_assert_eq!((after.reads, after.writes, after.faults), (before.reads, before.writes, before.faults));
        prop_assert_eq!(mmu.page_table().is_dirty(slot), dirty);
    }
}

#[test]
fn boxed_replacer_forwards_state() {
    let boxed: Box<dyn PageReplacer> = Policy::Vms.replacer(4, None);
    let names: Vec<_> = boxed.eviction_state().into_iter().map(|(name, _)| name).collect();

    assert_eq!(names, vec!["a_fifo", "b_fifo", "clean", "dirty"]);
}
