//! The value-ID/length/value field primitive.
//!
//! Almost every body byte flows through this module: a field is
//! `valueID:u16 ‖ contentLength:u16 ‖ content`, all little-endian. Typed
//! emit helpers funnel into a single [`emit`] choke point; decoders read a
//! [`FieldHeader`] and dispatch on the value ID within the message type's
//! tag alphabet.

use crate::{
    cursor::{Reader, Writer},
    error::{CodecError, Result},
};

/// Bytes a field adds on top of its content: value ID plus content length.
pub(crate) const FIELD_OVERHEAD: usize = 4;

/// Value ID and declared content length of one body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldHeader {
    pub(crate) value_id: u16,
    pub(crate) content_length: u16,
}

impl FieldHeader {
    /// Fail with `Length` unless the declared content length matches.
    pub(crate) fn expect_length(&self, expected: usize) -> Result<()> {
        if usize::from(self.content_length) == expected {
            Ok(())
        } else {
            Err(CodecError::Length { expected, found: usize::from(self.content_length) })
        }
    }
}

/// Read the next field header from the body.
pub(crate) fn read_field(r: &mut Reader<'_>) -> Result<FieldHeader> {
    Ok(FieldHeader { value_id: r.read_u16()?, content_length: r.read_u16()? })
}

/// The single emit point: value ID, content length, then the content bytes.
fn emit(w: &mut Writer<'_>, value_id: u16, content: &[u8]) -> Result<()> {
    if w.remaining() < FIELD_OVERHEAD + content.len() {
        return Err(CodecError::ShortBuffer {
            needed: FIELD_OVERHEAD + content.len(),
            available: w.remaining(),
        });
    }
    w.write_u16(value_id)?;
    w.write_u16(content.len() as u16)?;
    w.write_bytes(content)
}

pub(crate) fn put_u8(w: &mut Writer<'_>, value_id: u16, v: u8) -> Result<()> {
    emit(w, value_id, &[v])
}

pub(crate) fn put_u16(w: &mut Writer<'_>, value_id: u16, v: u16) -> Result<()> {
    emit(w, value_id, &v.to_le_bytes())
}

pub(crate) fn put_i16(w: &mut Writer<'_>, value_id: u16, v: i16) -> Result<()> {
    emit(w, value_id, &v.to_le_bytes())
}

pub(crate) fn put_u32(w: &mut Writer<'_>, value_id: u16, v: u32) -> Result<()> {
    emit(w, value_id, &v.to_le_bytes())
}

pub(crate) fn put_i32(w: &mut Writer<'_>, value_id: u16, v: i32) -> Result<()> {
    emit(w, value_id, &v.to_le_bytes())
}

pub(crate) fn put_f32(w: &mut Writer<'_>, value_id: u16, v: f32) -> Result<()> {
    emit(w, value_id, &v.to_bits().to_le_bytes())
}

/// Strings and packed substructs are carried verbatim.
pub(crate) fn put_bytes(w: &mut Writer<'_>, value_id: u16, content: &[u8]) -> Result<()> {
    emit(w, value_id, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_layout_is_vid_len_content() {
        let mut buf = [0u8; 8];
        put_u32(&mut Writer::new(&mut buf), 0x0102, 0xDEAD_BEEF).unwrap();
        assert_eq!(buf, [0x02, 0x01, 0x04, 0x00, 0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn field_header_round_trips() {
        let mut buf = [0u8; 6];
        put_i16(&mut Writer::new(&mut buf), 0x0040, -2).unwrap();
        let mut r = Reader::new(&buf);
        let fh = read_field(&mut r).unwrap();
        assert_eq!(fh, FieldHeader { value_id: 0x0040, content_length: 2 });
        fh.expect_length(2).unwrap();
        assert_eq!(r.read_i16().unwrap(), -2);
    }

    #[test]
    fn length_mismatch_is_reported() {
        let fh = FieldHeader { value_id: 0x0010, content_length: 3 };
        assert_eq!(fh.expect_length(4), Err(CodecError::Length { expected: 4, found: 3 }));
    }

    #[test]
    fn emit_rejects_short_buffer() {
        let mut buf = [0u8; 7];
        let err = put_u32(&mut Writer::new(&mut buf), 0x0102, 1).unwrap_err();
        assert_eq!(err, CodecError::ShortBuffer { needed: 8, available: 7 });
    }
}
