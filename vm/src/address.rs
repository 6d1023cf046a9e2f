//! Decoding of 32-bit virtual addresses.

/// Number of the 4 KiB page an address falls in (its top 20 bits).
pub type PageNumber = u32;

/// Index of a physical slot in the page table.
pub type SlotId = usize;

pub const PAGE_SHIFT: u32 = 12;

/// Top nibble reserved for the second process under the VMS policy.
pub const PROCESS_B_TAG: u32 = 0x3;

pub fn page_number(address: u32) -> PageNumber {
    address >> PAGE_SHIFT
}

/// Owner of an address, as seen by the VMS policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Process {
    A,
    B,
}

impl Process {
    pub fn of(address: u32) -> Self {
        if address >> 28 == PROCESS_B_TAG {
            Process::B
        } else {
            Process::A
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_number_drops_offset() {
        assert_eq!(page_number(0x0000_0fff), 0);
        assert_eq!(page_number(0x0000_1000), 1);
        assert_eq!(page_number(0x0041_f7a0), 0x41f);
        assert_eq!(page_number(0xffff_ffff), 0xfffff);
    }

    #[test]
    fn only_tag_three_is_process_b() {
        assert_eq!(Process::of(0x3000_0000), Process::B);
        assert_eq!(Process::of(0x3fff_ffff), Process::B);
        assert_eq!(Process::of(0x2fff_ffff), Process::A);
        assert_eq!(Process::of(0x4000_0000), Process::A);
        assert_eq!(Process::of(0x0000_1000), Process::A);
    }
}
