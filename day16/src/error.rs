use thiserror::Error;

use crate::packet::Operator;

/// Failures while turning the hex transmission into packets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid hex digit {character:?} at position {position}")]
    InvalidHexDigit { position: usize, character: char },

    #[error("exhausted bit stream: wanted {wanted} bits at offset {offset}, but only {available} remain")]
    TruncatedStream {
        offset: usize,
        wanted: usize,
        available: usize,
    },

    /// Sub-packets framed by a total bit length did not fill that length exactly.
    #[error("sub-packets starting at bit {offset} do not match their declared length of {declared} bits (decoded {consumed})")]
    MalformedPacket {
        offset: usize,
        declared: usize,
        consumed: usize,
    },

    #[error("literal starting at bit {offset} does not fit in 64 bits")]
    LiteralOverflow { offset: usize },

    /// Never produced for 3-bit type ids, which are all defined.
    #[error("invalid packet type: {0}")]
    InvalidType(#[from] EvalError),
}

/// Failures while evaluating a decoded packet tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("{operator} packet cannot take {actual} sub-packets")]
    ArityMismatch { operator: Operator, actual: usize },

    #[error("operator packet has unknown type id {type_id}")]
    UnknownOperator { type_id: u8 },

    #[error("{operator} packet overflowed 64 bits")]
    Overflow { operator: Operator },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("transmission contains no packets")]
    EmptyTransmission,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
