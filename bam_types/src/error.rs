use crate::version::BamVersion;
use derive_more::Display;
use std::error;

/// Failures of a write or read session.
///
/// Functions in this workspace return [`anyhow::Result`]; the leaf error is always one of these
/// variants, so callers that need to branch on the failure kind use
/// `err.downcast_ref::<BamError>()`.
#[derive(Display, Clone, PartialEq, Eq, Debug)]
pub enum BamError {
    /// A count or length does not fit the binary width declared for it.
    #[display(fmt = "{} is {}, which exceeds the field maximum {}", field, value, max)]
    Range {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// An object-level invariant is violated.
    #[display(fmt = "Structural error: {}", _0)]
    Structural(String),

    #[display(fmt = "Unknown type tag {}", _0)]
    UnknownTypeTag(u16),

    #[display(
        fmt = "Truncated stream: {} bytes needed at position {}, {} remaining",
        needed,
        position,
        remaining
    )]
    TruncatedStream {
        needed: usize,
        remaining: usize,
        position: usize,
    },

    /// The bytes are present but do not form a valid stream.
    #[display(fmt = "Malformed stream: {}", _0)]
    Malformed(String),

    #[display(fmt = "Unsupported bam version {}", _0)]
    UnsupportedVersion(BamVersion),
}

impl error::Error for BamError {}

impl BamError {
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
