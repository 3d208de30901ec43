//! Error types for the codec.
//!
//! Every decode failure is classified at the point of first violation and
//! returned immediately; no partial host struct is exposed. The distinct
//! variants matter to higher layers: a [`CodecError::Crc`] calls for
//! discarding one frame, a [`CodecError::SyncWord`] for resynchronising the
//! byte stream, a [`CodecError::Length`] for dropping the stream entirely.

use thiserror::Error;

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised by frame encoding and decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The supplied buffer cannot hold the data being read or written.
    #[error("buffer too short: needed {needed} bytes, had {available}")]
    ShortBuffer {
        /// Bytes required to complete the operation
        needed: usize,
        /// Bytes actually available
        available: usize,
    },

    /// The frame does not begin with the protocol sync word.
    #[error("sync word {found:#06x} does not match expected {:#06x}", crate::header::SYNC_WORD)]
    SyncWord {
        /// Sync word found in the frame
        found: u16,
    },

    /// The header carries a protocol version outside the supported set.
    #[error("unsupported protocol version {0}")]
    Version(u8),

    /// A declared length does not match what the message type requires.
    #[error("content length {found} does not match expected {expected}")]
    Length {
        /// Length the message type requires
        expected: usize,
        /// Length declared on the wire
        found: usize,
    },

    /// A value ID is unknown to the message type, or a required one is absent.
    #[error("value ID {value_id:#06x} not valid here")]
    ValueId {
        /// Offending value ID
        value_id: u16,
    },

    /// A frame of one message type was passed to another type's decoder.
    #[error("message ID {found:#06x} is not the expected {expected:#06x}")]
    MessageType {
        /// Message ID the decoder handles
        expected: u16,
        /// Message ID found in the header
        found: u16,
    },

    /// The footer CRC does not match the frame contents.
    #[error("CRC mismatch: frame carries {declared:#06x}, computed {computed:#06x}")]
    Crc {
        /// CRC declared in the footer
        declared: u16,
        /// CRC computed over the frame
        computed: u16,
    },

    /// A field value lies outside the domain the wire format can carry.
    #[error("value out of range: {0}")]
    ContentOutOfRange(&'static str),

    /// A mandatory field is missing or the input is otherwise unusable.
    #[error("invalid input: {0}")]
    Invalid(&'static str),
}
