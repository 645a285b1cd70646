use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    BufferTooSmall,
    /// `end_container` was called with no container open.
    NoOpenContainer,
    /// `finish` was called while a container was still open.
    UnclosedContainer,
    NestingTooDeep,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("buffer too small"),
            Self::NoOpenContainer => f.write_str("no open container"),
            Self::UnclosedContainer => f.write_str("container left open"),
            Self::NestingTooDeep => f.write_str("container nesting too deep"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Malformed or unexpected TLV input.
///
/// Every variant describes the byte stream (or a request that does not match
/// the element under the cursor), never a caller's visitor decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// A tag, length field, or value runs past the end of the buffer.
    UnexpectedEof,
    /// Element type code in the reserved range.
    InvalidElementType,
    /// End-of-container marker carrying a non-anonymous tag.
    InvalidTag,
    /// Length field does not fit in `usize`.
    InvalidLength,
    /// Buffer ended inside a container.
    UnterminatedContainer,
    /// End-of-container marker at the top level.
    UnexpectedEndOfContainer,
    /// Containers nested deeper than [`crate::tlv::MAX_CONTAINER_DEPTH`].
    NestingTooDeep,
    /// Value accessor does not match the element's type.
    WrongType,
    /// Value does not fit the requested width.
    ValueOutOfRange,
    /// UTF-8 string element with invalid UTF-8 content.
    InvalidUtf8,
    /// The cursor is not positioned where the operation needs it.
    InvalidState,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => f.write_str("unexpected end of input"),
            Self::InvalidElementType => f.write_str("invalid element type"),
            Self::InvalidTag => f.write_str("invalid tag"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::UnterminatedContainer => f.write_str("unterminated container"),
            Self::UnexpectedEndOfContainer => f.write_str("unexpected end of container"),
            Self::NestingTooDeep => f.write_str("container nesting too deep"),
            Self::WrongType => f.write_str("wrong element type"),
            Self::ValueOutOfRange => f.write_str("value out of range"),
            Self::InvalidUtf8 => f.write_str("invalid utf-8 string"),
            Self::InvalidState => f.write_str("reader not positioned for operation"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
