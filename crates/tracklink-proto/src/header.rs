//! Frame header and footer.
//!
//! Every frame is `header ‖ body ‖ footer`: an 18-byte packed little-endian
//! header, a body of value-ID/length/value fields, and a 2-byte
//! CRC-16/CCITT-FALSE footer computed over header and body.

use tracing::debug;

use crate::{
    crc::crc16,
    cursor::{Reader, Writer},
    error::{CodecError, Result},
    message_id::MessageId,
    Codec, FrameMeta,
};

/// Frame sync word. Every frame starts with these two bytes (little-endian).
pub const SYNC_WORD: u16 = 0x7E7F;

/// Size of the packed frame header in bytes.
pub const HEADER_SIZE: usize = 18;

/// Size of the frame footer (CRC) in bytes.
pub const FOOTER_SIZE: usize = 2;

/// Protocol version stamped into built headers.
pub const PROTOCOL_VERSION: u8 = 2;

/// Protocol versions this codec accepts on decode.
const SUPPORTED_PROTOCOL_VERSIONS: [u8; 1] = [PROTOCOL_VERSION];

const PROTOCOL_VERSION_MASK: u8 = 0x7F;

/// Decoded frame header.
///
/// `message_length` counts body bytes only, excluding this header and the
/// CRC footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Sync word, `0x7E7F` on every valid frame.
    pub sync_word: u16,
    /// Number of body bytes following the header.
    pub message_length: u32,
    /// Bit 7: acknowledgement request. Bits 0-6: protocol version.
    pub ack_req_prot_ver: u8,
    /// Sender identifier.
    pub transmitter_id: u32,
    /// Receiver identifier.
    pub receiver_id: u32,
    /// Per-sender message counter.
    pub message_counter: u8,
    /// Message type identifier, see [`MessageId`].
    pub message_id: u16,
}

impl Codec {
    /// Decode the 18-byte frame header.
    ///
    /// Validates the sync word and protocol version. The message ID is not
    /// validated here; type dispatch is a separate step
    /// ([`Codec::classify_frame`]).
    pub fn decode_header(&self, buf: &[u8]) -> Result<Header> {
        let mut r = Reader::new(buf);
        if buf.len() < HEADER_SIZE {
            return Err(CodecError::ShortBuffer { needed: HEADER_SIZE, available: buf.len() });
        }

        let sync_word = r.read_u16()?;
        if sync_word != SYNC_WORD {
            return Err(CodecError::SyncWord { found: sync_word });
        }

        let message_length = r.read_u32()?;
        let ack_req_prot_ver = r.read_u8()?;
        let version = ack_req_prot_ver & PROTOCOL_VERSION_MASK;
        if !SUPPORTED_PROTOCOL_VERSIONS.contains(&version) {
            return Err(CodecError::Version(version));
        }

        let header = Header {
            sync_word,
            message_length,
            ack_req_prot_ver,
            transmitter_id: r.read_u32()?,
            receiver_id: r.read_u32()?,
            message_counter: r.read_u8()?,
            message_id: r.read_u16()?,
        };

        if self.debug() {
            debug!(
                sync_word = format_args!("{:#06x}", header.sync_word),
                message_length = header.message_length,
                transmitter_id = header.transmitter_id,
                receiver_id = header.receiver_id,
                message_counter = header.message_counter,
                message_id = format_args!("{:#06x}", header.message_id),
                "decoded frame header"
            );
        }
        Ok(header)
    }

    /// Determine the message type of a raw frame.
    ///
    /// Accepts the core set, the recognised reserved IDs, and anything in
    /// the vendor-specific span; everything else fails `Invalid`.
    pub fn classify_frame(&self, buf: &[u8]) -> Result<MessageId> {
        let header = self.decode_header(buf)?;
        MessageId::from_u16(header.message_id)
            .ok_or(CodecError::Invalid("message ID outside the recognised set"))
    }

    /// Build a header for a frame of `total_frame_size` bytes including
    /// header and footer.
    pub(crate) fn build_header(
        &self,
        id: MessageId,
        meta: &FrameMeta,
        total_frame_size: usize,
    ) -> Result<Header> {
        if total_frame_size < HEADER_SIZE + FOOTER_SIZE {
            return Err(CodecError::Invalid("frame size cannot hold header and footer"));
        }
        let header = Header {
            sync_word: SYNC_WORD,
            message_length: (total_frame_size - HEADER_SIZE - FOOTER_SIZE) as u32,
            ack_req_prot_ver: PROTOCOL_VERSION,
            transmitter_id: self.transmitter_id(),
            receiver_id: meta.receiver_id,
            message_counter: meta.message_counter,
            message_id: id.to_u16(),
        };
        if self.debug() {
            debug!(
                message_id = format_args!("{:#06x}", header.message_id),
                message_length = header.message_length,
                "built frame header"
            );
        }
        Ok(header)
    }

    /// Verify a received frame against its declared CRC.
    ///
    /// A declared CRC of zero means the sender disabled checksums and always
    /// passes, as does any frame while verification is configured off.
    pub(crate) fn verify_frame_crc(&self, frame: &[u8], declared: u16) -> Result<()> {
        if !self.crc_verification() || declared == 0 {
            return Ok(());
        }
        let computed = crc16(&frame[..frame.len() - FOOTER_SIZE]);
        if computed == declared {
            Ok(())
        } else {
            Err(CodecError::Crc { declared, computed })
        }
    }
}

pub(crate) fn write_header(w: &mut Writer<'_>, header: &Header) -> Result<()> {
    w.write_u16(header.sync_word)?;
    w.write_u32(header.message_length)?;
    w.write_u8(header.ack_req_prot_ver)?;
    w.write_u32(header.transmitter_id)?;
    w.write_u32(header.receiver_id)?;
    w.write_u8(header.message_counter)?;
    w.write_u16(header.message_id)
}

/// Read the 2-byte little-endian CRC footer.
pub(crate) fn read_footer(buf: &[u8]) -> Result<u16> {
    Reader::new(buf).read_u16()
}
