use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Parser, ValueEnum};
use vm::policy::Policy;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Print every access and pause with a dump of the page table.
    Debug,
    /// Only print the final report.
    Quiet,
}

/// Replays a memory trace against a page-replacement policy.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Trace file, one `<hex-address> <R|W>` access per line.
    pub trace_file: PathBuf,

    /// Number of physical frames.
    pub frames: NonZeroUsize,

    /// Replacement policy.
    #[arg(value_name = "rdm|lru|fifo|vms")]
    pub policy: Policy,

    #[arg(value_enum, value_name = "debug|quiet")]
    pub mode: Mode,

    /// Seed for the random policy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Events between two dumps in debug mode.
    #[arg(long, default_value = "10")]
    pub dump_every: NonZeroUsize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_arguments() {
        let cli = Cli::try_parse_from(["memsim", "trace.txt", "64", "vms", "quiet"]).unwrap();

        assert_eq!(cli.trace_file, PathBuf::from("trace.txt"));
        assert_eq!(cli.frames.get(), 64);
        assert_eq!(cli.policy, Policy::Vms);
        assert_eq!(cli.mode, Mode::Quiet);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.dump_every.get(), 10);
    }

    #[test]
    fn parses_options() {
        let cli = Cli::try_parse_from([
            "memsim", "trace.txt", "4", "rdm", "debug", "--seed", "9", "--dump-every", "3",
        ])
        .unwrap();

        assert_eq!(cli.policy, Policy::Random);
        assert_eq!(cli.mode, Mode::Debug);
        assert_eq!(cli.seed, Some(9));
        assert_eq!(cli.dump_every.get(), 3);
    }

    #[test]
    fn rejects_bad_policy_and_zero_frames() {
        assert!(Cli::try_parse_from(["memsim", "t", "4", "opt", "quiet"]).is_err());
        assert!(Cli::try_parse_from(["memsim", "t", "0", "lru", "quiet"]).is_err());
        assert!(Cli::try_parse_from(["memsim", "t", "4", "lru"]).is_err());
    }
}
