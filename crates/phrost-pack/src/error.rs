use crate::kind::EventKind;

/// A single command could not be encoded. The command is dropped; the
/// encoder stays usable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// The code is not in the layout catalog.
    #[error("unknown event kind {0}")]
    UnknownKind(u32),

    /// Wrong number of arguments for the layout.
    #[error("{kind}: expected {expected} arguments, got {got}")]
    Arity {
        kind: EventKind,
        expected: usize,
        got: usize,
    },

    /// Argument variant does not fit the field type.
    #[error("{kind}.{field}: expected {expected}, got {got}")]
    Type {
        kind: EventKind,
        field: &'static str,
        expected: String,
        got: &'static str,
    },

    /// Numeric argument outside the field's range.
    #[error("{kind}.{field}: {value} out of range for {ty}")]
    OutOfRange {
        kind: EventKind,
        field: &'static str,
        value: String,
        ty: String,
    },

    /// A length field disagrees with the byte length of its segment.
    #[error("{kind}.{field}: declared length {declared}, segment is {actual} bytes")]
    LengthMismatch {
        kind: EventKind,
        field: &'static str,
        declared: u64,
        actual: usize,
    },

    /// Text longer than its fixed-size field.
    #[error("{kind}.{field}: {len} bytes exceed the {max}-byte field")]
    TooLong {
        kind: EventKind,
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Why decoding stopped early. Events decoded before the failure point are
/// still returned alongside it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// An event header named a code outside the catalog.
    #[error("unknown event kind {code} at offset {offset}")]
    UnknownKind { code: u32, offset: usize },

    /// The blob ended before a declared structure did.
    #[error("truncated at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A text segment or title is not valid UTF-8.
    ///
    /// Raw bytes are never passed through: decoding of the whole blob stops
    /// here, and events decoded before it are kept.
    #[error("{kind}.{field}: invalid UTF-8 at offset {offset}")]
    TextDecode {
        kind: EventKind,
        field: &'static str,
        offset: usize,
    },

    /// Channel index ids are not strictly ascending.
    #[error("channel index out of order: {id} follows {previous}")]
    ChannelOrder { previous: u32, id: u32 },

    /// Channel sizes do not add up to the data region.
    #[error("channel sizes sum to {declared} bytes, data region is {actual}")]
    ChannelSizes { declared: u64, actual: usize },
}

impl DecodeError {
    pub(crate) fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available,
        }
    }
}
