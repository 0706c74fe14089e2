use thiserror::Error;

/// Failure of an [`OffsetBuffer`](crate::OffsetBuffer) operation.
///
/// No operation has partial effects: when an error is returned, neither the
/// storage bytes nor any cursor has been touched by the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{op}: need {needed} bytes at offset {offset} but only {available} remain")]
    OutOfRange {
        op: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{op}: value {value} does not fit the target width")]
    ValueOutOfRange { op: &'static str, value: String },

    #[error("{op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    #[error("unsupported text encoding: {scheme:?}")]
    UnsupportedEncoding { scheme: String },

    #[error("{op}: cannot parse {input:?}")]
    ParseError { op: &'static str, input: String },
}

pub type Result<T> = core::result::Result<T, Error>;
