use std::{fmt, str::FromStr};

use crate::{
    page_replacer::{
        FIFOPageReplacer, LruPageReplacer, PageReplacer, RandomPageReplacer, VmsPageReplacer,
    },
    Error, Result,
};

/// The replacement policies a run can be configured with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Policy {
    Random,
    Lru,
    Fifo,
    Vms,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Policy::Random, Policy::Lru, Policy::Fifo, Policy::Vms];

    pub fn name(self) -> &'static str {
        match self {
            Policy::Random => "rdm",
            Policy::Lru => "lru",
            Policy::Fifo => "fifo",
            Policy::Vms => "vms",
        }
    }

    /// Builds the replacer for a table of `frames` slots. `seed` only affects
    /// [`Policy::Random`]; without it the generator is seeded from the OS.
    pub fn replacer(self, frames: usize, seed: Option<u64>) -> Box<dyn PageReplacer> {
        match self {
            Policy::Random => Box::new(match seed {
                Some(seed) => RandomPageReplacer::with_seed(seed),
                None => RandomPageReplacer::new(),
            }),
            Policy::Lru => Box::new(LruPageReplacer::new(frames)),
            Policy::Fifo => Box::new(FIFOPageReplacer::new(frames)),
            Policy::Vms => Box::new(VmsPageReplacer::new(frames)),
        }
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Policy::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| Error::UnknownPolicy(s.to_owned()))
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
