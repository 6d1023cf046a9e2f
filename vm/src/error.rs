use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The policy name is not one of `rdm`, `lru`, `fifo` or `vms`.
    #[error("unrecognized replacement policy `{0}` (options: rdm lru fifo vms)")]
    UnknownPolicy(String),
    /// A trace line that is not `<hex-address> <R|W>`.
    #[error("malformed trace line `{0}`")]
    MalformedEvent(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
