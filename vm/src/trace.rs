//! Memory traces: one `<hex-address> <R|W>` access per line.

use std::{
    fmt,
    io::{BufRead, Split},
    str::FromStr,
};

use log::{debug, trace};

use crate::{address, Error, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    pub fn is_write(self) -> bool {
        self == Operation::Write
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => f.write_str("R"),
            Operation::Write => f.write_str("W"),
        }
    }
}

/// A single access of the trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AddressEvent {
    pub address: u32,
    pub op: Operation,
}

impl AddressEvent {
    pub fn read(address: u32) -> Self {
        AddressEvent { address, op: Operation::Read }
    }

    pub fn write(address: u32) -> Self {
        AddressEvent { address, op: Operation::Write }
    }

    pub fn page_number(&self) -> address::PageNumber {
        address::page_number(self.address)
    }
}

impl fmt::Display for AddressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Address: {:#010x} RW: {} PageNum: {:#010x}",
            self.address,
            self.op,
            self.page_number()
        )
    }
}

/// Parses up to eight hex digits, with or without a `0x` prefix.
fn parse_address(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if digits.is_empty() || digits.len() > 8 {
        return None;
    }

    // `hex` only decodes whole bytes, so pad to the full 32-bit width.
    let padded = format!("{digits:0>8}");
    let mut bytes = [0u8; 4];
    hex::decode_to_slice(padded, &mut bytes).ok()?;

    Some(u32::from_be_bytes(bytes))
}

fn parse_operation(token: &str) -> Option<Operation> {
    match token {
        "R" | "r" => Some(Operation::Read),
        "W" | "w" => Some(Operation::Write),
        _ => None,
    }
}

impl FromStr for AddressEvent {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let malformed = || Error::MalformedEvent(line.trim().to_owned());

        let address = tokens.next().and_then(parse_address).ok_or_else(malformed)?;
        let op = tokens.next().and_then(parse_operation).ok_or_else(malformed)?;

        if tokens.next().is_some() {
            return Err(malformed());
        }

        Ok(AddressEvent { address, op })
    }
}

/// Iterator over the events of a trace.
///
/// Lines that do not parse, including lines that are not valid UTF-8, are
/// skipped rather than reported, so the only errors this yields come from the
/// underlying reader.
pub struct TraceReader<R> {
    lines: Split<R>,
    skipped: usize,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        TraceReader {
            lines: reader.split(b'\n'),
            skipped: 0,
        }
    }

    /// Number of non-blank lines dropped so far because they did not parse.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<AddressEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let bytes = match self.lines.next()? {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(e.into())),
            };

            let line = match std::str::from_utf8(&bytes) {
                Ok(line) => line,
                Err(e) => {
                    debug!("trace: skipping line: {}", e);
                    self.skipped += 1;
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<AddressEvent>() {
                Ok(event) => {
                    trace!("trace: {}", event);
                    return Some(Ok(event));
                }
                Err(e) => {
                    debug!("trace: skipping line: {}", e);
                    self.skipped += 1;
                }
            }
        }
    }
}
