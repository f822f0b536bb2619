//! Error types for the binary, Merkle and textual codecs
//!
//! Two tiers:
//! - structural errors (short buffers, malformed offset tables, text-tree shape
//!   mismatches) which say the input is not even shaped like the record;
//! - semantic errors (bad hex, wrong lengths, exceeded maxima) which name the
//!   offending field.
//!
//! Binary decode failures are separate variants so callers can treat
//! `ShortBuffer` as "need more bytes" and `BadOffset` as "corrupt data".

use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum CodecError {
    #[error("buffer too short: need at least {needed} bytes, got {actual}")]
    ShortBuffer { needed: usize, actual: usize },

    #[error("trailing bytes: fixed-size record is {expected} bytes, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },

    #[error("bad offset {offset} (previous {previous}, buffer length {len})")]
    BadOffset {
        offset: usize,
        previous: usize,
        len: usize,
    },

    #[error("invalid variable offset: expected {expected}, got {actual}")]
    InvalidVariableOffset { expected: usize, actual: usize },

    #[error("item too large: {len} bytes exceeds maximum {max}")]
    ItemTooLarge { len: usize, max: usize },

    #[error("list too long: {count} items exceeds maximum {max}")]
    ListTooLong { count: usize, max: usize },

    #[error("list region of {len} bytes is not a multiple of item size {item_size}")]
    MisalignedList { len: usize, item_size: usize },

    #[error("list size exceeded: {count} exceeds limit {limit}")]
    ListSizeExceeded { count: usize, limit: usize },

    #[error("nesting deeper than {max} levels")]
    NestingTooDeep { max: usize },

    #[error("record does not match schema: {0}")]
    SchemaMismatch(Cow<'static, str>),

    #[error("invalid configuration: {0}")]
    Config(Cow<'static, str>),

    #[error(transparent)]
    Text(#[from] TextError),
}

/// Textual codec failures.
///
/// The `Display` output of each variant is part of the public contract:
/// conformance suites compare these strings verbatim.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TextError {
    /// The raw text could not be parsed into a tree at all.
    #[error("{0}")]
    Parse(String),

    #[error("{0} missing")]
    Missing(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("incorrect length for {0}")]
    IncorrectLength(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Shorthand for a schema mismatch with a formatted message.
    pub(crate) fn mismatch(msg: impl Into<Cow<'static, str>>) -> Self {
        CodecError::SchemaMismatch(msg.into())
    }
}
