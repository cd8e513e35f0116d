use core::fmt;

/// Which of the two arena pools a request was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    /// Small, fast on-die memory.
    Fast,
    /// Large, slower external memory.
    Bulk,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Fast => f.write_str("fast"),
            PoolKind::Bulk => f.write_str("bulk"),
        }
    }
}

/// Errors raised while building the engine.
///
/// Nothing in the per-block path returns an error: once construction
/// succeeds, every block is pure arithmetic over pre-sized buffers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A pool did not have room for a request.
    #[error("{pool} pool exhausted: requested {requested} bytes, {available} available")]
    PoolExhausted {
        pool: PoolKind,
        requested: usize,
        available: usize,
    },

    /// The engine configuration cannot describe a working engine.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
