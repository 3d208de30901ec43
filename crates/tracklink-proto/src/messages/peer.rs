//! PODI: peer object data injection.
//!
//! The control centre forwards one object's state to another. Transmitter
//! ID, timestamp and position are required; pitch and roll are optional
//! attitude extensions with their own sentinels.

use std::time::SystemTime;

use crate::{
    error::{CodecError, Result},
    field::{put_i16, put_i32, put_u16, put_u32, put_u8, read_field, FIELD_OVERHEAD},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    time,
    types::{CartesianPosition, PeerObjectInjection, ObjectState, Speed},
    units, Codec, FrameMeta,
};

const VALUE_ID_FOREIGN_TRANSMITTER_ID: u16 = 0x00FF;
const VALUE_ID_GPS_QMS_OF_WEEK: u16 = 0x010A;
const VALUE_ID_OBJECT_STATE: u16 = 0x010C;
const VALUE_ID_X_POSITION: u16 = 0x010D;
const VALUE_ID_Y_POSITION: u16 = 0x010E;
const VALUE_ID_Z_POSITION: u16 = 0x010F;
const VALUE_ID_HEADING: u16 = 0x0110;
const VALUE_ID_PITCH: u16 = 0x0111;
const VALUE_ID_ROLL: u16 = 0x0112;
const VALUE_ID_LONGITUDINAL_SPEED: u16 = 0x0113;
const VALUE_ID_LATERAL_SPEED: u16 = 0x0114;

const PODI_BODY_LENGTH: usize = (FIELD_OVERHEAD + 4) * 2
    + (FIELD_OVERHEAD + 1)
    + (FIELD_OVERHEAD + 4) * 3
    + (FIELD_OVERHEAD + 2) * 3
    + (FIELD_OVERHEAD + 2) * 2;

impl Codec {
    /// Encode a PODI frame describing a peer object.
    ///
    /// Position is required; heading, pitch, roll and the speed components
    /// fall back to their sentinels when absent.
    pub fn encode_podi(
        &self,
        meta: &FrameMeta,
        peer: &PeerObjectInjection,
        buf: &mut [u8],
    ) -> Result<usize> {
        if !peer.position.is_position_valid {
            return Err(CodecError::Invalid("position is required in PODI"));
        }
        let qms = time::required_qms_of_week(peer.timestamp)?;

        let total = HEADER_SIZE + PODI_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Podi, meta, total, buf)?;

        put_u32(&mut w, VALUE_ID_FOREIGN_TRANSMITTER_ID, peer.foreign_transmitter_id)?;
        put_u32(&mut w, VALUE_ID_GPS_QMS_OF_WEEK, qms)?;
        put_u8(&mut w, VALUE_ID_OBJECT_STATE, peer.state.to_wire())?;
        put_i32(&mut w, VALUE_ID_X_POSITION, units::position_to_wire(peer.position.x_m))?;
        put_i32(&mut w, VALUE_ID_Y_POSITION, units::position_to_wire(peer.position.y_m))?;
        put_i32(&mut w, VALUE_ID_Z_POSITION, units::position_to_wire(peer.position.z_m))?;
        put_u16(
            &mut w,
            VALUE_ID_HEADING,
            units::heading_to_wire(peer.position.heading_rad, peer.position.is_heading_valid),
        )?;
        put_u16(
            &mut w,
            VALUE_ID_PITCH,
            units::angle_to_wire(peer.pitch_rad.unwrap_or_default(), peer.pitch_rad.is_some()),
        )?;
        put_u16(
            &mut w,
            VALUE_ID_ROLL,
            units::angle_to_wire(peer.roll_rad.unwrap_or_default(), peer.roll_rad.is_some()),
        )?;
        put_i16(
            &mut w,
            VALUE_ID_LONGITUDINAL_SPEED,
            units::speed_to_wire(peer.speed.longitudinal_m_s, peer.speed.is_longitudinal_valid),
        )?;
        put_i16(
            &mut w,
            VALUE_ID_LATERAL_SPEED,
            units::speed_to_wire(peer.speed.lateral_m_s, peer.speed.is_lateral_valid),
        )?;

        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a PODI frame.
    ///
    /// The foreign transmitter ID, a non-sentinel timestamp, the position
    /// components and the heading field are required; `current_time`
    /// supplies the GPS week the wire format omits.
    pub fn decode_podi(
        &self,
        buf: &[u8],
        current_time: SystemTime,
    ) -> Result<(PeerObjectInjection, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Podi, Some(PODI_BODY_LENGTH))?;

        let mut foreign_transmitter_id = None;
        let mut qms = None;
        let mut state = ObjectState::Unknown;
        let mut x_m = None;
        let mut y_m = None;
        let mut z_m = None;
        let mut heading = None;
        let mut pitch_raw = units::ANGLE_UNAVAILABLE;
        let mut roll_raw = units::ANGLE_UNAVAILABLE;
        let mut speed = Speed::default();

        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_FOREIGN_TRANSMITTER_ID => {
                    field.expect_length(4)?;
                    foreign_transmitter_id = Some(r.read_u32()?);
                }
                VALUE_ID_GPS_QMS_OF_WEEK => {
                    field.expect_length(4)?;
                    qms = Some(r.read_u32()?);
                }
                VALUE_ID_OBJECT_STATE => {
                    field.expect_length(1)?;
                    state = ObjectState::from_wire(r.read_u8()?);
                }
                VALUE_ID_X_POSITION => {
                    field.expect_length(4)?;
                    x_m = Some(units::position_from_wire(r.read_i32()?));
                }
                VALUE_ID_Y_POSITION => {
                    field.expect_length(4)?;
                    y_m = Some(units::position_from_wire(r.read_i32()?));
                }
                VALUE_ID_Z_POSITION => {
                    field.expect_length(4)?;
                    z_m = Some(units::position_from_wire(r.read_i32()?));
                }
                VALUE_ID_HEADING => {
                    field.expect_length(2)?;
                    heading = Some(units::heading_from_wire(r.read_u16()?));
                }
                VALUE_ID_PITCH => {
                    field.expect_length(2)?;
                    pitch_raw = r.read_u16()?;
                }
                VALUE_ID_ROLL => {
                    field.expect_length(2)?;
                    roll_raw = r.read_u16()?;
                }
                VALUE_ID_LONGITUDINAL_SPEED => {
                    field.expect_length(2)?;
                    let (m_s, valid) = units::speed_from_wire(r.read_i16()?);
                    speed.longitudinal_m_s = m_s;
                    speed.is_longitudinal_valid = valid;
                }
                VALUE_ID_LATERAL_SPEED => {
                    field.expect_length(2)?;
                    let (m_s, valid) = units::speed_from_wire(r.read_i16()?);
                    speed.lateral_m_s = m_s;
                    speed.is_lateral_valid = valid;
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let foreign_transmitter_id = foreign_transmitter_id
            .ok_or(CodecError::ValueId { value_id: VALUE_ID_FOREIGN_TRANSMITTER_ID })?;
        let qms = qms
            .filter(|&q| q != units::GPS_QMS_OF_WEEK_UNAVAILABLE)
            .ok_or(CodecError::ValueId { value_id: VALUE_ID_GPS_QMS_OF_WEEK })?;
        let timestamp = time::from_qms_with_inferred_week(current_time, qms)
            .ok_or(CodecError::ContentOutOfRange("timestamp before GPS epoch"))?;
        let (Some(x_m), Some(y_m), Some(z_m)) = (x_m, y_m, z_m) else {
            return Err(CodecError::ValueId { value_id: VALUE_ID_X_POSITION });
        };
        let (heading_rad, is_heading_valid) =
            heading.ok_or(CodecError::ValueId { value_id: VALUE_ID_HEADING })?;

        let (pitch_rad, pitch_valid) = units::angle_from_wire(pitch_raw);
        let (roll_rad, roll_valid) = units::angle_from_wire(roll_raw);

        let peer = PeerObjectInjection {
            foreign_transmitter_id,
            timestamp,
            state,
            position: CartesianPosition {
                x_m,
                y_m,
                z_m,
                heading_rad,
                is_position_valid: true,
                is_heading_valid,
            },
            pitch_rad: pitch_valid.then_some(pitch_rad),
            roll_rad: roll_valid.then_some(roll_rad),
            speed,
        };

        let consumed = close_frame(self, buf, &header)?;
        Ok((peer, consumed))
    }
}
