//! Per-message encoders and decoders.
//!
//! Grouped by domain: scenario configuration, object command and start,
//! monitoring, trajectory transfer, remote and direct control, peer
//! injection, object properties, synchronisation, triggers and actions,
//! supervision, and general responses.
//!
//! Every encoder computes its exact frame size, builds the header, emits
//! its fields through the field engine and seals the frame with the CRC
//! footer. Every decoder validates the header, walks the tagged body,
//! verifies the footer and maps to the host representation through the
//! unit layer.

pub(crate) mod actions;
pub(crate) mod command;
pub(crate) mod monitor;
pub(crate) mod peer;
pub(crate) mod properties;
pub(crate) mod remote;
pub(crate) mod response;
pub(crate) mod settings;
pub(crate) mod supervision;
pub(crate) mod sync;
pub(crate) mod trajectory;

use crate::{
    crc::crc16,
    cursor::{Reader, Writer},
    error::{CodecError, Result},
    header::{read_footer, write_header, FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    Codec, FrameMeta, Header,
};

/// Decode and validate the header of a frame expected to carry `expected`,
/// returning a reader positioned over the body.
///
/// Fixed-layout messages pass their static maximum body size; a larger
/// declared length fails `Length` before any field is parsed.
pub(crate) fn open_frame<'a>(
    codec: &Codec,
    buf: &'a [u8],
    expected: MessageId,
    max_body: Option<usize>,
) -> Result<(Header, Reader<'a>)> {
    let header = codec.decode_header(buf)?;
    if header.message_id != expected.to_u16() {
        return Err(CodecError::MessageType {
            expected: expected.to_u16(),
            found: header.message_id,
        });
    }
    let body_len = header.message_length as usize;
    if let Some(max) = max_body {
        if body_len > max {
            return Err(CodecError::Length { expected: max, found: body_len });
        }
    }
    let total = HEADER_SIZE + body_len + FOOTER_SIZE;
    if buf.len() < total {
        return Err(CodecError::ShortBuffer { needed: total, available: buf.len() });
    }
    Ok((header, Reader::new(&buf[HEADER_SIZE..HEADER_SIZE + body_len])))
}

/// Read the footer and verify the frame CRC. Returns total bytes consumed.
pub(crate) fn close_frame(codec: &Codec, buf: &[u8], header: &Header) -> Result<usize> {
    let body_end = HEADER_SIZE + header.message_length as usize;
    let declared = read_footer(&buf[body_end..])?;
    codec.verify_frame_crc(&buf[..body_end + FOOTER_SIZE], declared)?;
    Ok(body_end + FOOTER_SIZE)
}

/// Build and write the header of a frame of `total` bytes, returning the
/// writer positioned at the body.
pub(crate) fn start_frame<'a>(
    codec: &Codec,
    id: MessageId,
    meta: &FrameMeta,
    total: usize,
    buf: &'a mut [u8],
) -> Result<Writer<'a>> {
    if buf.len() < total {
        return Err(CodecError::ShortBuffer { needed: total, available: buf.len() });
    }
    let header = codec.build_header(id, meta, total)?;
    let mut w = Writer::new(buf);
    write_header(&mut w, &header)?;
    Ok(w)
}

/// Compute the CRC over `buf[..body_end]` and append it as the footer.
/// Returns total frame size.
pub(crate) fn seal_frame(buf: &mut [u8], body_end: usize) -> Result<usize> {
    let crc = crc16(&buf[..body_end]);
    Writer::new(&mut buf[body_end..]).write_u16(crc)?;
    Ok(body_end + FOOTER_SIZE)
}
