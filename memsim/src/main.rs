mod cli;

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
};

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Mode};
use log::info;
use vm::{mmu::Mmu, page_replacer::PageReplacer, trace::TraceReader};

/// Asks whether to stop. Anything but `x`, including end of input, continues.
fn wants_exit(input: &mut impl BufRead) -> io::Result<bool> {
    print!("Enter x to exit. ");
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(matches!(answer.trim(), "x" | "X"))
}

fn simulate<R, T, I>(mmu: &mut Mmu<R>, trace: T, cli: &Cli, input: &mut I) -> anyhow::Result<()>
where
    R: PageReplacer,
    T: Iterator<Item = vm::Result<vm::trace::AddressEvent>>,
    I: BufRead,
{
    for event in trace {
        let event = event.context("failed to read trace")?;

        mmu.access(event);

        if cli.mode == Mode::Debug {
            println!("{}", event);

            if mmu.stats().events % cli.dump_every.get() as u64 == 0 {
                println!("{}", mmu.dump());

                if wants_exit(input)? {
                    info!("memsim: stopped by user after {} events", mmu.stats().events);
                    break;
                }
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let file = File::open(&cli.trace_file)
        .with_context(|| format!("failed to open {}", cli.trace_file.display()))?;
    let mut trace = TraceReader::new(BufReader::new(file));

    let frames = cli.frames.get();
    let mut mmu = Mmu::new(frames, cli.policy.replacer(frames, cli.seed));

    simulate(&mut mmu, trace.by_ref(), &cli, &mut io::stdin().lock())?;

    if trace.skipped() > 0 {
        info!("memsim: skipped {} malformed trace lines", trace.skipped());
    }

    println!("{}", mmu.stats());

    Ok(())
}
