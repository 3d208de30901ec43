//! OPRO and FOPR: object property announcements.
//!
//! FOPR is OPRO about someone else: the same field set prefixed with the
//! described object's transmitter ID. Unknown value IDs are skipped with a
//! debug trace in both, so property extensions stay forward compatible.

use tracing::debug;

use crate::{
    cursor::{Reader, Writer},
    error::{CodecError, Result},
    field::{put_i16, put_u32, put_u8, read_field, FIELD_OVERHEAD},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    types::{ForeignObjectProperties, ObjectProperties},
    units, Codec, FrameMeta,
};

const VALUE_ID_FOREIGN_TRANSMITTER_ID: u16 = 0x00FF;
const VALUE_ID_OBJECT_TYPE: u16 = 0x0100;
const VALUE_ID_ACTOR_TYPE: u16 = 0x0101;
const VALUE_ID_OPERATION_MODE: u16 = 0x0102;
const VALUE_ID_MASS: u16 = 0x0103;
const VALUE_ID_OBJECT_LENGTH_X: u16 = 0x0104;
const VALUE_ID_OBJECT_LENGTH_Y: u16 = 0x0105;
const VALUE_ID_OBJECT_LENGTH_Z: u16 = 0x0106;
const VALUE_ID_POSITION_DISPLACEMENT_X: u16 = 0x0107;
const VALUE_ID_POSITION_DISPLACEMENT_Y: u16 = 0x0108;
const VALUE_ID_POSITION_DISPLACEMENT_Z: u16 = 0x0109;

const PROPERTIES_BODY_LENGTH: usize =
    (FIELD_OVERHEAD + 1) * 3 + (FIELD_OVERHEAD + 4) * 4 + (FIELD_OVERHEAD + 2) * 3;
const FOPR_BODY_LENGTH: usize = PROPERTIES_BODY_LENGTH + FIELD_OVERHEAD + 4;

fn put_properties(w: &mut Writer<'_>, properties: &ObjectProperties) -> Result<()> {
    put_u8(w, VALUE_ID_OBJECT_TYPE, properties.object_type)?;
    put_u8(w, VALUE_ID_ACTOR_TYPE, properties.actor_type)?;
    put_u8(w, VALUE_ID_OPERATION_MODE, properties.operation_mode)?;
    put_u32(w, VALUE_ID_MASS, units::mass_to_wire(properties.mass_kg))?;
    put_u32(w, VALUE_ID_OBJECT_LENGTH_X, units::length_to_wire(properties.length_x_m))?;
    put_u32(w, VALUE_ID_OBJECT_LENGTH_Y, units::length_to_wire(properties.length_y_m))?;
    put_u32(w, VALUE_ID_OBJECT_LENGTH_Z, units::length_to_wire(properties.length_z_m))?;
    put_i16(
        w,
        VALUE_ID_POSITION_DISPLACEMENT_X,
        units::displacement_to_wire(properties.displacement_x_m),
    )?;
    put_i16(
        w,
        VALUE_ID_POSITION_DISPLACEMENT_Y,
        units::displacement_to_wire(properties.displacement_y_m),
    )?;
    put_i16(
        w,
        VALUE_ID_POSITION_DISPLACEMENT_Z,
        units::displacement_to_wire(properties.displacement_z_m),
    )
}

/// Shared tagged-field loop for OPRO and FOPR bodies. Returns the foreign
/// transmitter ID when one was present.
fn read_properties(
    codec: &Codec,
    r: &mut Reader<'_>,
    properties: &mut ObjectProperties,
) -> Result<Option<u32>> {
    let mut foreign_transmitter_id = None;
    while r.remaining() > 0 {
        let field = read_field(r)?;
        match field.value_id {
            VALUE_ID_FOREIGN_TRANSMITTER_ID => {
                field.expect_length(4)?;
                foreign_transmitter_id = Some(r.read_u32()?);
            }
            VALUE_ID_OBJECT_TYPE => {
                field.expect_length(1)?;
                properties.object_type = r.read_u8()?;
            }
            VALUE_ID_ACTOR_TYPE => {
                field.expect_length(1)?;
                properties.actor_type = r.read_u8()?;
            }
            VALUE_ID_OPERATION_MODE => {
                field.expect_length(1)?;
                properties.operation_mode = r.read_u8()?;
            }
            VALUE_ID_MASS => {
                field.expect_length(4)?;
                properties.mass_kg = units::mass_from_wire(r.read_u32()?);
            }
            VALUE_ID_OBJECT_LENGTH_X => {
                field.expect_length(4)?;
                properties.length_x_m = units::length_from_wire(r.read_u32()?);
            }
            VALUE_ID_OBJECT_LENGTH_Y => {
                field.expect_length(4)?;
                properties.length_y_m = units::length_from_wire(r.read_u32()?);
            }
            VALUE_ID_OBJECT_LENGTH_Z => {
                field.expect_length(4)?;
                properties.length_z_m = units::length_from_wire(r.read_u32()?);
            }
            VALUE_ID_POSITION_DISPLACEMENT_X => {
                field.expect_length(2)?;
                properties.displacement_x_m = units::displacement_from_wire(r.read_i16()?);
            }
            VALUE_ID_POSITION_DISPLACEMENT_Y => {
                field.expect_length(2)?;
                properties.displacement_y_m = units::displacement_from_wire(r.read_i16()?);
            }
            VALUE_ID_POSITION_DISPLACEMENT_Z => {
                field.expect_length(2)?;
                properties.displacement_z_m = units::displacement_from_wire(r.read_i16()?);
            }
            unknown => {
                if codec.debug() {
                    debug!(
                        value_id = format_args!("{unknown:#06x}"),
                        length = field.content_length,
                        "skipping unknown object property value ID"
                    );
                }
                r.skip(usize::from(field.content_length))?;
            }
        }
    }
    Ok(foreign_transmitter_id)
}

impl Codec {
    /// Encode an OPRO frame announcing this object's properties.
    pub fn encode_opro(
        &self,
        meta: &FrameMeta,
        properties: &ObjectProperties,
        buf: &mut [u8],
    ) -> Result<usize> {
        let total = HEADER_SIZE + PROPERTIES_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Opro, meta, total, buf)?;
        put_properties(&mut w, properties)?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode an OPRO frame.
    pub fn decode_opro(&self, buf: &[u8]) -> Result<(ObjectProperties, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Opro, None)?;
        let mut properties = ObjectProperties::default();
        read_properties(self, &mut r, &mut properties)?;
        let consumed = close_frame(self, buf, &header)?;
        Ok((properties, consumed))
    }

    /// Encode a FOPR frame announcing another object's properties.
    pub fn encode_fopr(
        &self,
        meta: &FrameMeta,
        foreign: &ForeignObjectProperties,
        buf: &mut [u8],
    ) -> Result<usize> {
        let total = HEADER_SIZE + FOPR_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Fopr, meta, total, buf)?;
        put_u32(&mut w, VALUE_ID_FOREIGN_TRANSMITTER_ID, foreign.foreign_transmitter_id)?;
        put_properties(&mut w, &foreign.properties)?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a FOPR frame. The foreign transmitter ID is required.
    pub fn decode_fopr(&self, buf: &[u8]) -> Result<(ForeignObjectProperties, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Fopr, None)?;
        let mut properties = ObjectProperties::default();
        let foreign_transmitter_id = read_properties(self, &mut r, &mut properties)?
            .ok_or(CodecError::ValueId { value_id: VALUE_ID_FOREIGN_TRANSMITTER_ID })?;
        let consumed = close_frame(self, buf, &header)?;
        Ok((ForeignObjectProperties { foreign_transmitter_id, properties }, consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_properties() -> ObjectProperties {
        ObjectProperties {
            object_type: 1,
            actor_type: 2,
            operation_mode: 3,
            mass_kg: Some(1450.5),
            length_x_m: Some(4.2),
            length_y_m: Some(1.8),
            length_z_m: None,
            displacement_x_m: Some(1.1),
            displacement_y_m: Some(-0.2),
            displacement_z_m: None,
        }
    }

    #[test]
    fn opro_round_trip() {
        let codec = Codec::new();
        let mut buf = [0u8; 128];
        let written = codec
            .encode_opro(&FrameMeta::default(), &reference_properties(), &mut buf)
            .unwrap();
        assert_eq!(written, 18 + PROPERTIES_BODY_LENGTH + 2);
        let (decoded, consumed) = codec.decode_opro(&buf[..written]).unwrap();
        assert_eq!(consumed, written);
        assert_eq!(decoded.object_type, 1);
        assert!((decoded.mass_kg.unwrap() - 1450.5).abs() < 1e-9);
        assert!((decoded.length_x_m.unwrap() - 4.2).abs() < 1e-9);
        assert_eq!(decoded.length_z_m, None);
        assert!((decoded.displacement_y_m.unwrap() + 0.2).abs() < 1e-9);
        assert_eq!(decoded.displacement_z_m, None);
    }

    #[test]
    fn opro_skips_unknown_value_ids() {
        let codec = Codec::new();
        let mut buf = [0u8; 128];
        let written = codec
            .encode_opro(&FrameMeta::default(), &reference_properties(), &mut buf)
            .unwrap();
        let mut frame = buf[..written - 2].to_vec();
        frame.extend_from_slice(&[0x7F, 0x01, 0x01, 0x00, 0x55]);
        let body_len = (frame.len() - 18) as u32;
        frame[2..6].copy_from_slice(&body_len.to_le_bytes());
        let crc = crate::crc::crc16(&frame);
        frame.extend_from_slice(&crc.to_le_bytes());

        let (decoded, _) = codec.decode_opro(&frame).unwrap();
        assert_eq!(decoded.actor_type, 2);
    }

    #[test]
    fn fopr_round_trip() {
        let codec = Codec::new();
        let foreign = ForeignObjectProperties {
            foreign_transmitter_id: 0xAA55,
            properties: reference_properties(),
        };
        let mut buf = [0u8; 128];
        let written = codec.encode_fopr(&FrameMeta::default(), &foreign, &mut buf).unwrap();
        let (decoded, _) = codec.decode_fopr(&buf[..written]).unwrap();
        assert_eq!(decoded.foreign_transmitter_id, 0xAA55);
        assert_eq!(decoded.properties.operation_mode, 3);
    }

    #[test]
    fn fopr_requires_foreign_transmitter() {
        let codec = Codec::new();
        let mut buf = [0u8; 128];
        // An OPRO body under the FOPR message ID lacks the transmitter field
        let written = codec
            .encode_opro(&FrameMeta::default(), &reference_properties(), &mut buf)
            .unwrap();
        buf[16..18].copy_from_slice(&MessageId::Fopr.to_u16().to_le_bytes());
        let crc = crate::crc::crc16(&buf[..written - 2]);
        buf[written - 2..written].copy_from_slice(&crc.to_le_bytes());

        let err = codec.decode_fopr(&buf[..written]).unwrap_err();
        assert_eq!(err, CodecError::ValueId { value_id: VALUE_ID_FOREIGN_TRANSMITTER_ID });
    }

    #[test]
    fn sentinel_fields_decode_as_none() {
        let codec = Codec::new();
        let mut buf = [0u8; 128];
        let written = codec
            .encode_opro(&FrameMeta::default(), &ObjectProperties::default(), &mut buf)
            .unwrap();
        let (decoded, _) = codec.decode_opro(&buf[..written]).unwrap();
        assert_eq!(decoded.mass_kg, None);
        assert_eq!(decoded.length_x_m, None);
        assert_eq!(decoded.displacement_x_m, None);
    }
}
