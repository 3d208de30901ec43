//! TRAJ: streamed trajectory transfer.
//!
//! A trajectory is one frame whose body may be kilobytes, so it is encoded
//! in three phases sharing a rolling CRC: header, points, footer. The
//! [`TrajectoryEncoder`] value owns the rolling CRC and is consumed by
//! [`TrajectoryEncoder::finish`], so the header → points → footer ordering
//! is enforced by the type system rather than by convention.
//!
//! Decoding is stateless per call: the header, each point and the footer
//! are consumed from wherever the caller's buffer currently points.

use std::time::Duration;

use crate::{
    crc::{crc_update, CRC_INIT},
    cursor::{Reader, Writer},
    error::{CodecError, Result},
    field::{put_bytes, put_f32, put_i16, put_i32, put_u16, put_u32, put_u8, read_field},
    header::{read_footer, write_header, FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    types::{TrajectoryHeader, TrajectoryInfo, TrajectoryPoint},
    units, Codec, FrameMeta,
};

const VALUE_ID_TRAJECTORY_IDENTIFIER: u16 = 0x0101;
const VALUE_ID_TRAJECTORY_NAME: u16 = 0x0102;
const VALUE_ID_TRAJECTORY_INFO: u16 = 0x0104;

const VALUE_ID_RELATIVE_TIME: u16 = 0x0001;
const VALUE_ID_X_POSITION: u16 = 0x0010;
const VALUE_ID_Y_POSITION: u16 = 0x0011;
const VALUE_ID_Z_POSITION: u16 = 0x0012;
const VALUE_ID_HEADING: u16 = 0x0030;
const VALUE_ID_LONGITUDINAL_SPEED: u16 = 0x0040;
const VALUE_ID_LATERAL_SPEED: u16 = 0x0041;
const VALUE_ID_LONGITUDINAL_ACCELERATION: u16 = 0x0050;
const VALUE_ID_LATERAL_ACCELERATION: u16 = 0x0051;
const VALUE_ID_CURVATURE: u16 = 0x0052;

/// Fixed wire size of the NUL-padded trajectory name.
const NAME_LENGTH: usize = 64;

/// Body bytes occupied by the three trajectory header fields.
const HEADER_FIELDS_LENGTH: usize = (4 + 2) + (4 + 1) + (4 + NAME_LENGTH);

/// Wire size of one trajectory point: ten fields with four bytes of tag
/// overhead each.
pub(crate) const POINT_LENGTH: usize = 10 * 4 + (4 + 4 + 4 + 4 + 2 + 2 + 2 + 2 + 2 + 4);

fn relative_time_to_wire(time: Duration) -> u32 {
    (time.as_secs_f64() * units::RELATIVE_TIME_ONE_SECOND) as u32
}

fn relative_time_from_wire(raw: u32) -> Duration {
    Duration::from_millis(u64::from(raw))
}

/// In-flight trajectory encode.
///
/// Created by [`Codec::begin_trajectory`], which writes the frame header
/// and trajectory header fields and primes the rolling CRC. Each
/// [`Self::encode_point`] call appends one point and folds it into the
/// CRC; [`Self::finish`] writes the CRC footer and consumes the encoder.
/// Only one trajectory can be produced per encoder value, and nothing else
/// may be interleaved into its frame.
#[derive(Debug)]
pub struct TrajectoryEncoder {
    crc: u16,
}

impl Codec {
    /// Start encoding a TRAJ frame for `header.point_count` points.
    ///
    /// Writes the frame header and the trajectory identifier, info and
    /// name fields into `buf`, and returns the encoder holding the rolling
    /// CRC together with the number of bytes written. The name must fit 63
    /// bytes; it is NUL-padded to 64 on the wire.
    pub fn begin_trajectory(
        &self,
        meta: &FrameMeta,
        header: &TrajectoryHeader,
        buf: &mut [u8],
    ) -> Result<(TrajectoryEncoder, usize)> {
        if header.name.len() >= NAME_LENGTH {
            return Err(CodecError::ContentOutOfRange("trajectory name"));
        }

        let total = HEADER_SIZE
            + HEADER_FIELDS_LENGTH
            + header.point_count as usize * POINT_LENGTH
            + FOOTER_SIZE;
        let iso_header = self.build_header(MessageId::Traj, meta, total)?;

        let written = {
            let mut w = Writer::new(buf);
            write_header(&mut w, &iso_header)?;
            put_u16(&mut w, VALUE_ID_TRAJECTORY_IDENTIFIER, header.trajectory_id)?;
            put_u8(&mut w, VALUE_ID_TRAJECTORY_INFO, header.info.to_wire())?;
            let mut name = [0u8; NAME_LENGTH];
            name[..header.name.len()].copy_from_slice(header.name.as_bytes());
            put_bytes(&mut w, VALUE_ID_TRAJECTORY_NAME, &name)?;
            w.written()
        };

        let crc = crc_update(CRC_INIT, &buf[..written]);
        Ok((TrajectoryEncoder { crc }, written))
    }

    /// Decode a TRAJ frame header and its trajectory header fields.
    ///
    /// Returns the trajectory header, with the point count derived from
    /// the declared message length, and the bytes consumed. The points and
    /// footer follow in the stream.
    pub fn decode_traj_header(&self, buf: &[u8]) -> Result<(TrajectoryHeader, usize)> {
        let header = self.decode_header(buf)?;
        if header.message_id != MessageId::Traj.to_u16() {
            return Err(CodecError::MessageType {
                expected: MessageId::Traj.to_u16(),
                found: header.message_id,
            });
        }
        let message_length = header.message_length as usize;
        if message_length < HEADER_FIELDS_LENGTH {
            return Err(CodecError::Length {
                expected: HEADER_FIELDS_LENGTH,
                found: message_length,
            });
        }

        let end = HEADER_SIZE + HEADER_FIELDS_LENGTH;
        let body = buf
            .get(HEADER_SIZE..end)
            .ok_or(CodecError::ShortBuffer { needed: end, available: buf.len() })?;
        let mut r = Reader::new(body);

        let mut trajectory_id = 0;
        let mut info = TrajectoryInfo::Unknown(0);
        let mut name = String::new();

        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_TRAJECTORY_IDENTIFIER => {
                    field.expect_length(2)?;
                    trajectory_id = r.read_u16()?;
                }
                VALUE_ID_TRAJECTORY_INFO => {
                    field.expect_length(1)?;
                    info = TrajectoryInfo::from_wire(r.read_u8()?);
                }
                VALUE_ID_TRAJECTORY_NAME => {
                    field.expect_length(NAME_LENGTH)?;
                    let raw = r.read_bytes(NAME_LENGTH)?;
                    let trimmed = raw.split(|&b| b == 0).next().unwrap_or_default();
                    name = String::from_utf8_lossy(trimmed).into_owned();
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let point_count = ((message_length - HEADER_FIELDS_LENGTH) / POINT_LENGTH) as u32;
        Ok((TrajectoryHeader { trajectory_id, name, info, point_count }, end))
    }

    /// Decode one trajectory point. Consumes exactly the fixed point size.
    ///
    /// Field order within the point block is not significant on decode;
    /// position and longitudinal speed are required.
    pub fn decode_traj_point(&self, buf: &[u8]) -> Result<(TrajectoryPoint, usize)> {
        let body = buf
            .get(..POINT_LENGTH)
            .ok_or(CodecError::ShortBuffer { needed: POINT_LENGTH, available: buf.len() })?;
        let mut r = Reader::new(body);

        let mut point = TrajectoryPoint::default();
        let mut seen_x = false;
        let mut seen_y = false;
        let mut seen_z = false;
        let mut seen_lon_speed = false;

        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_RELATIVE_TIME => {
                    field.expect_length(4)?;
                    point.time_from_start = relative_time_from_wire(r.read_u32()?);
                }
                VALUE_ID_X_POSITION => {
                    field.expect_length(4)?;
                    point.position.x_m = units::position_from_wire(r.read_i32()?);
                    seen_x = true;
                }
                VALUE_ID_Y_POSITION => {
                    field.expect_length(4)?;
                    point.position.y_m = units::position_from_wire(r.read_i32()?);
                    seen_y = true;
                }
                VALUE_ID_Z_POSITION => {
                    field.expect_length(4)?;
                    point.position.z_m = units::position_from_wire(r.read_i32()?);
                    seen_z = true;
                }
                VALUE_ID_HEADING => {
                    field.expect_length(2)?;
                    let (heading_rad, valid) = units::heading_from_wire(r.read_u16()?);
                    point.position.heading_rad = heading_rad;
                    point.position.is_heading_valid = valid;
                }
                VALUE_ID_LONGITUDINAL_SPEED => {
                    field.expect_length(2)?;
                    let (speed, valid) = units::speed_from_wire(r.read_i16()?);
                    point.speed.longitudinal_m_s = speed;
                    point.speed.is_longitudinal_valid = valid;
                    seen_lon_speed = true;
                }
                VALUE_ID_LATERAL_SPEED => {
                    field.expect_length(2)?;
                    let (speed, valid) = units::speed_from_wire(r.read_i16()?);
                    point.speed.lateral_m_s = speed;
                    point.speed.is_lateral_valid = valid;
                }
                VALUE_ID_LONGITUDINAL_ACCELERATION => {
                    field.expect_length(2)?;
                    let (acc, valid) = units::acceleration_from_wire(r.read_i16()?);
                    point.acceleration.longitudinal_m_s2 = acc;
                    point.acceleration.is_longitudinal_valid = valid;
                }
                VALUE_ID_LATERAL_ACCELERATION => {
                    field.expect_length(2)?;
                    let (acc, valid) = units::acceleration_from_wire(r.read_i16()?);
                    point.acceleration.lateral_m_s2 = acc;
                    point.acceleration.is_lateral_valid = valid;
                }
                VALUE_ID_CURVATURE => {
                    field.expect_length(4)?;
                    point.curvature = r.read_f32()?;
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        if !(seen_x && seen_y && seen_z) {
            return Err(CodecError::ValueId { value_id: VALUE_ID_X_POSITION });
        }
        if !seen_lon_speed {
            return Err(CodecError::ValueId { value_id: VALUE_ID_LONGITUDINAL_SPEED });
        }
        point.position.is_position_valid = true;

        Ok((point, POINT_LENGTH))
    }

    /// Verify the CRC footer of a fully received TRAJ frame.
    pub fn decode_traj_footer(&self, frame: &[u8]) -> Result<()> {
        if frame.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(CodecError::ShortBuffer {
                needed: HEADER_SIZE + FOOTER_SIZE,
                available: frame.len(),
            });
        }
        let declared = read_footer(&frame[frame.len() - FOOTER_SIZE..])?;
        self.verify_frame_crc(frame, declared)
    }
}

impl TrajectoryEncoder {
    /// Append one trajectory point to `buf` and fold it into the rolling
    /// CRC. Position and longitudinal speed are required.
    ///
    /// Field order within the emitted block is fixed; only decoding
    /// tolerates reordered fields.
    pub fn encode_point(&mut self, point: &TrajectoryPoint, buf: &mut [u8]) -> Result<usize> {
        if !point.position.is_position_valid {
            return Err(CodecError::Invalid("position is required in trajectory points"));
        }
        if !point.speed.is_longitudinal_valid {
            return Err(CodecError::Invalid(
                "longitudinal speed is required in trajectory points",
            ));
        }

        let written = {
            let mut w = Writer::new(buf);
            put_u32(&mut w, VALUE_ID_RELATIVE_TIME, relative_time_to_wire(point.time_from_start))?;
            put_i32(&mut w, VALUE_ID_X_POSITION, units::position_to_wire(point.position.x_m))?;
            put_i32(&mut w, VALUE_ID_Y_POSITION, units::position_to_wire(point.position.y_m))?;
            put_i32(&mut w, VALUE_ID_Z_POSITION, units::position_to_wire(point.position.z_m))?;
            put_u16(
                &mut w,
                VALUE_ID_HEADING,
                units::heading_to_wire(
                    point.position.heading_rad,
                    point.position.is_heading_valid,
                ),
            )?;
            put_i16(
                &mut w,
                VALUE_ID_LONGITUDINAL_SPEED,
                units::speed_to_wire(point.speed.longitudinal_m_s, true),
            )?;
            put_i16(
                &mut w,
                VALUE_ID_LATERAL_SPEED,
                units::speed_to_wire(point.speed.lateral_m_s, point.speed.is_lateral_valid),
            )?;
            put_i16(
                &mut w,
                VALUE_ID_LONGITUDINAL_ACCELERATION,
                units::acceleration_to_wire(
                    point.acceleration.longitudinal_m_s2,
                    point.acceleration.is_longitudinal_valid,
                ),
            )?;
            put_i16(
                &mut w,
                VALUE_ID_LATERAL_ACCELERATION,
                units::acceleration_to_wire(
                    point.acceleration.lateral_m_s2,
                    point.acceleration.is_lateral_valid,
                ),
            )?;
            put_f32(&mut w, VALUE_ID_CURVATURE, point.curvature)?;
            w.written()
        };

        debug_assert_eq!(written, POINT_LENGTH);
        self.crc = crc_update(self.crc, &buf[..written]);
        Ok(written)
    }

    /// Write the CRC footer, consuming the encoder.
    pub fn finish(self, buf: &mut [u8]) -> Result<usize> {
        let mut w = Writer::new(buf);
        w.write_u16(crate::crc::crc_finalize(self.crc))?;
        Ok(w.written())
    }
}
