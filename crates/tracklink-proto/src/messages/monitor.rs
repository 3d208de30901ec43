//! MONR and HEAB: object monitoring and the control-centre heartbeat.
//!
//! Both are "monolithic" messages: the body is a single value-ID/length/
//! value field whose content is a packed struct read positionally, not a
//! sequence of tagged fields.

use std::time::SystemTime;

use tracing::debug;

use crate::{
    cursor::Writer,
    error::{CodecError, Result},
    field::{put_bytes, read_field},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    time,
    types::{
        Acceleration, ArmReadiness, CartesianPosition, ControlCenterStatus, DriveDirection,
        HeabMessage, ObjectErrors, ObjectMonitor, ObjectState, Speed,
    },
    units, Codec, FrameMeta,
};

const VALUE_ID_MONR_STRUCT: u16 = 0x0080;
const MONR_STRUCT_LENGTH: usize = 32;
const MONR_BODY_LENGTH: usize = 4 + MONR_STRUCT_LENGTH;

const VALUE_ID_HEAB_STRUCT: u16 = 0x0090;
const HEAB_STRUCT_LENGTH: usize = 5;
const HEAB_BODY_LENGTH: usize = 4 + HEAB_STRUCT_LENGTH;

impl Codec {
    /// Encode a MONR frame from a monitor report.
    ///
    /// Position and longitudinal speed are required; their validity flags
    /// must be set or the encode fails `Invalid`.
    pub fn encode_monr(
        &self,
        meta: &FrameMeta,
        monitor: &ObjectMonitor,
        buf: &mut [u8],
    ) -> Result<usize> {
        if !monitor.position.is_position_valid {
            return Err(CodecError::Invalid("position is required in MONR"));
        }
        if !monitor.speed.is_longitudinal_valid {
            return Err(CodecError::Invalid("longitudinal speed is required in MONR"));
        }

        let qms = match monitor.timestamp {
            Some(t) => time::required_qms_of_week(t)?,
            None => units::GPS_QMS_OF_WEEK_UNAVAILABLE,
        };

        let total = HEADER_SIZE + MONR_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Monr, meta, total, buf)?;

        let mut inner = [0u8; MONR_STRUCT_LENGTH];
        {
            let mut sw = Writer::new(&mut inner);
            sw.write_u32(qms)?;
            sw.write_i32(units::position_to_wire(monitor.position.x_m))?;
            sw.write_i32(units::position_to_wire(monitor.position.y_m))?;
            sw.write_i32(units::position_to_wire(monitor.position.z_m))?;
            sw.write_u16(units::heading_to_wire(
                monitor.position.heading_rad,
                monitor.position.is_heading_valid,
            ))?;
            sw.write_i16(units::speed_to_wire(monitor.speed.longitudinal_m_s, true))?;
            sw.write_i16(units::speed_to_wire(
                monitor.speed.lateral_m_s,
                monitor.speed.is_lateral_valid,
            ))?;
            sw.write_i16(units::acceleration_to_wire(
                monitor.acceleration.longitudinal_m_s2,
                monitor.acceleration.is_longitudinal_valid,
            ))?;
            sw.write_i16(units::acceleration_to_wire(
                monitor.acceleration.lateral_m_s2,
                monitor.acceleration.is_lateral_valid,
            ))?;
            sw.write_u8(monitor.drive_direction.to_wire())?;
            sw.write_u8(monitor.state.to_wire())?;
            sw.write_u8(monitor.ready_to_arm.to_wire())?;
            sw.write_u8(monitor.error.to_wire())?;
            sw.write_u16(monitor.error_code)?;
        }
        put_bytes(&mut w, VALUE_ID_MONR_STRUCT, &inner)?;

        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a MONR frame.
    ///
    /// `current_time` supplies the GPS week the wire format omits.
    pub fn decode_monr(
        &self,
        buf: &[u8],
        current_time: SystemTime,
    ) -> Result<(ObjectMonitor, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Monr, Some(MONR_BODY_LENGTH))?;

        let field = read_field(&mut r)?;
        if field.value_id != VALUE_ID_MONR_STRUCT {
            return Err(CodecError::ValueId { value_id: field.value_id });
        }
        field.expect_length(MONR_STRUCT_LENGTH)?;

        let qms = r.read_u32()?;
        let x_m = units::position_from_wire(r.read_i32()?);
        let y_m = units::position_from_wire(r.read_i32()?);
        let z_m = units::position_from_wire(r.read_i32()?);
        let (heading_rad, heading_ok) = units::heading_from_wire(r.read_u16()?);
        let (longitudinal_m_s, lon_speed_ok) = units::speed_from_wire(r.read_i16()?);
        let (lateral_m_s, lat_speed_ok) = units::speed_from_wire(r.read_i16()?);
        let (longitudinal_m_s2, lon_acc_ok) = units::acceleration_from_wire(r.read_i16()?);
        let (lateral_m_s2, lat_acc_ok) = units::acceleration_from_wire(r.read_i16()?);
        let drive_direction = DriveDirection::from_wire(r.read_u8()?);
        let state = ObjectState::from_wire(r.read_u8()?);
        let ready_to_arm = ArmReadiness::from_wire(r.read_u8()?);
        let error = ObjectErrors::from_wire(r.read_u8()?);
        let error_code = r.read_u16()?;

        let timestamp = (qms != units::GPS_QMS_OF_WEEK_UNAVAILABLE)
            .then(|| time::from_qms_with_inferred_week(current_time, qms))
            .flatten();

        let monitor = ObjectMonitor {
            timestamp,
            position: CartesianPosition {
                x_m,
                y_m,
                z_m,
                heading_rad,
                is_position_valid: true,
                is_heading_valid: heading_ok,
            },
            speed: Speed {
                longitudinal_m_s,
                lateral_m_s,
                is_longitudinal_valid: lon_speed_ok,
                is_lateral_valid: lat_speed_ok,
            },
            acceleration: Acceleration {
                longitudinal_m_s2,
                lateral_m_s2,
                is_longitudinal_valid: lon_acc_ok,
                is_lateral_valid: lat_acc_ok,
            },
            drive_direction,
            state,
            ready_to_arm,
            error,
            error_code,
        };

        let consumed = close_frame(self, buf, &header)?;
        Ok((monitor, consumed))
    }

    /// Encode a HEAB frame.
    ///
    /// An unrecognised status is silently remapped to `Abort`, so a
    /// confused control centre always fails safe.
    pub fn encode_heab(
        &self,
        meta: &FrameMeta,
        timestamp: Option<SystemTime>,
        status: ControlCenterStatus,
        buf: &mut [u8],
    ) -> Result<usize> {
        let qms = match timestamp {
            Some(t) => time::required_qms_of_week(t)?,
            None => units::GPS_QMS_OF_WEEK_UNAVAILABLE,
        };
        let status_byte = status.to_wire().unwrap_or_else(|| {
            if self.debug() {
                debug!(?status, "unsupported control centre status, defaulting to abort");
            }
            ControlCenterStatus::Abort.to_wire().unwrap_or_default()
        });

        let total = HEADER_SIZE + HEAB_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Heab, meta, total, buf)?;

        let mut inner = [0u8; HEAB_STRUCT_LENGTH];
        {
            let mut sw = Writer::new(&mut inner);
            sw.write_u32(qms)?;
            sw.write_u8(status_byte)?;
        }
        put_bytes(&mut w, VALUE_ID_HEAB_STRUCT, &inner)?;

        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a HEAB frame.
    ///
    /// `current_time` supplies the GPS week the wire format omits.
    pub fn decode_heab(
        &self,
        buf: &[u8],
        current_time: SystemTime,
    ) -> Result<(HeabMessage, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Heab, Some(HEAB_BODY_LENGTH))?;

        let field = read_field(&mut r)?;
        if field.value_id != VALUE_ID_HEAB_STRUCT {
            return Err(CodecError::ValueId { value_id: field.value_id });
        }
        field.expect_length(HEAB_STRUCT_LENGTH)?;

        let qms = r.read_u32()?;
        let status = ControlCenterStatus::from_wire(r.read_u8()?);

        let timestamp = (qms != units::GPS_QMS_OF_WEEK_UNAVAILABLE)
            .then(|| time::from_qms_with_inferred_week(current_time, qms))
            .flatten();

        let heab = HeabMessage { transmitter_id: header.transmitter_id, timestamp, status };

        let consumed = close_frame(self, buf, &header)?;
        Ok((heab, consumed))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    // Friday, April 29, 2022 2:22:22 UTC
    fn reference_time() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_651_198_942)
    }

    fn reference_monitor() -> ObjectMonitor {
        ObjectMonitor {
            timestamp: Some(reference_time()),
            position: CartesianPosition {
                x_m: 1.0,
                y_m: -2.0,
                z_m: 3.0,
                heading_rad: 0.4,
                is_position_valid: true,
                is_heading_valid: true,
            },
            speed: Speed {
                longitudinal_m_s: 1.0,
                lateral_m_s: 2.0,
                is_longitudinal_valid: true,
                is_lateral_valid: true,
            },
            acceleration: Acceleration {
                longitudinal_m_s2: 1.0,
                lateral_m_s2: 2.0,
                is_longitudinal_valid: true,
                is_lateral_valid: true,
            },
            drive_direction: DriveDirection::Forward,
            state: ObjectState::Running,
            ready_to_arm: ArmReadiness::Ready,
            error: ObjectErrors::from_wire(0b0110_1011),
            error_code: 0xBEEF,
        }
    }

    fn encode_reference() -> Vec<u8> {
        let codec = Codec::new();
        let mut buf = [0u8; 64];
        let written = codec
            .encode_monr(&FrameMeta::default(), &reference_monitor(), &mut buf)
            .unwrap();
        buf[..written].to_vec()
    }

    #[test]
    fn monr_preamble() {
        let frame = encode_reference();
        assert_eq!(&frame[18..22], [0x80, 0x00, 0x20, 0x00]);
    }

    #[test]
    fn monr_inner_struct_bytes() {
        let frame = encode_reference();
        let inner = &frame[22..];
        // 1762240000 quarter-milliseconds of week
        assert_eq!(&inner[..4], [0x00, 0xA6, 0x09, 0x69]);
        // 1.0 m, -2.0 m, 3.0 m
        assert_eq!(&inner[4..8], [0xE8, 0x03, 0x00, 0x00]);
        assert_eq!(&inner[8..12], [0x30, 0xF8, 0xFF, 0xFF]);
        assert_eq!(&inner[12..16], [0xB8, 0x0B, 0x00, 0x00]);
        // speeds 100 cm/s and 200 cm/s
        assert_eq!(&inner[18..20], [0x64, 0x00]);
        assert_eq!(&inner[20..22], [0xC8, 0x00]);
        // accelerations 1000 mm/s² and 2000 mm/s²
        assert_eq!(&inner[22..24], [0xE8, 0x03]);
        assert_eq!(&inner[24..26], [0xD0, 0x07]);
        // forward, running, ready to arm
        assert_eq!(&inner[26..29], [0x00, 0x04, 0x01]);
        assert_eq!(inner[29], 0b0110_1011);
        assert_eq!(&inner[30..32], [0xEF, 0xBE]);
    }

    #[test]
    fn monr_heading_is_remapped_to_clockwise_from_north() {
        let frame = encode_reference();
        // 0.4 rad CCW-from-east maps to 67.08° clockwise from north
        let heading = u16::from_le_bytes([frame[22 + 16], frame[22 + 17]]);
        assert_eq!(heading, 6708);
    }

    #[test]
    fn monr_round_trip() {
        let codec = Codec::new();
        let frame = encode_reference();
        let (decoded, consumed) = codec.decode_monr(&frame, reference_time()).unwrap();
        assert_eq!(consumed, frame.len());

        let reference = reference_monitor();
        assert_eq!(decoded.timestamp, reference.timestamp);
        assert!((decoded.position.x_m - 1.0).abs() < 1e-9);
        assert!((decoded.position.y_m + 2.0).abs() < 1e-9);
        assert!((decoded.position.z_m - 3.0).abs() < 1e-9);
        assert!(decoded.position.is_heading_valid);
        assert!((decoded.position.heading_rad - 0.4).abs() < 0.01_f64.to_radians());
        assert!((decoded.speed.longitudinal_m_s - 1.0).abs() < 1e-9);
        assert!((decoded.speed.lateral_m_s - 2.0).abs() < 1e-9);
        assert_eq!(decoded.drive_direction, DriveDirection::Forward);
        assert_eq!(decoded.state, ObjectState::Running);
        assert_eq!(decoded.ready_to_arm, ArmReadiness::Ready);
        assert_eq!(decoded.error, reference.error);
        assert_eq!(decoded.error_code, 0xBEEF);
    }

    #[test]
    fn monr_error_bits_decompose() {
        let errors = ObjectErrors::from_wire(0b0110_1011);
        assert!(!errors.abort_request);
        assert!(errors.outside_geofence);
        assert!(errors.bad_positioning_accuracy);
        assert!(!errors.engine_fault);
        assert!(errors.battery_fault);
        assert!(errors.sync_point_ended);
        assert!(errors.vendor_specific);
        assert!(!errors.other);
        assert_eq!(errors.to_wire(), 0b0110_1011);
    }

    #[test]
    fn monr_requires_position() {
        let codec = Codec::new();
        let mut monitor = reference_monitor();
        monitor.position.is_position_valid = false;
        let mut buf = [0u8; 64];
        let err = codec.encode_monr(&FrameMeta::default(), &monitor, &mut buf).unwrap_err();
        assert!(matches!(err, CodecError::Invalid(_)));
    }

    #[test]
    fn monr_requires_longitudinal_speed() {
        let codec = Codec::new();
        let mut monitor = reference_monitor();
        monitor.speed.is_longitudinal_valid = false;
        let mut buf = [0u8; 64];
        let err = codec.encode_monr(&FrameMeta::default(), &monitor, &mut buf).unwrap_err();
        assert!(matches!(err, CodecError::Invalid(_)));
    }

    #[test]
    fn monr_rejects_wrong_message_type() {
        let codec = Codec::new();
        let mut buf = [0u8; 64];
        let written = codec
            .encode_heab(
                &FrameMeta::default(),
                Some(reference_time()),
                ControlCenterStatus::Running,
                &mut buf,
            )
            .unwrap();
        let err = codec.decode_monr(&buf[..written], reference_time()).unwrap_err();
        assert!(matches!(err, CodecError::MessageType { .. }));
    }

    #[test]
    fn monr_rejects_oversized_body() {
        let codec = Codec::new();
        let mut frame = encode_reference();
        frame[2..6].copy_from_slice(&100u32.to_le_bytes());
        let err = codec.decode_monr(&frame, reference_time()).unwrap_err();
        assert!(matches!(err, CodecError::Length { .. }));
    }

    #[test]
    fn monr_rejects_corrupted_crc() {
        let codec = Codec::new();
        let mut frame = encode_reference();
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;
        let err = codec.decode_monr(&frame, reference_time()).unwrap_err();
        assert!(matches!(err, CodecError::Crc { .. }));
    }

    #[test]
    fn heab_round_trip() {
        let mut codec = Codec::new();
        codec.set_transmitter_id(0x42);
        let mut buf = [0u8; 64];
        let written = codec
            .encode_heab(
                &FrameMeta::default(),
                Some(reference_time()),
                ControlCenterStatus::Running,
                &mut buf,
            )
            .unwrap();
        assert_eq!(written, 29);
        assert_eq!(&buf[18..22], [0x90, 0x00, 0x05, 0x00]);

        let (heab, consumed) = codec.decode_heab(&buf[..written], reference_time()).unwrap();
        assert_eq!(consumed, written);
        assert_eq!(heab.transmitter_id, 0x42);
        assert_eq!(heab.timestamp, Some(reference_time()));
        assert_eq!(heab.status, ControlCenterStatus::Running);
    }

    #[test]
    fn heab_unknown_status_defaults_to_abort() {
        let codec = Codec::new();
        let mut buf = [0u8; 64];
        let written = codec
            .encode_heab(
                &FrameMeta::default(),
                Some(reference_time()),
                ControlCenterStatus::Unknown(0x7F),
                &mut buf,
            )
            .unwrap();
        let (heab, _) = codec.decode_heab(&buf[..written], reference_time()).unwrap();
        assert_eq!(heab.status, ControlCenterStatus::Abort);
    }

    #[test]
    fn heab_missing_timestamp_is_sentinel() {
        let codec = Codec::new();
        let mut buf = [0u8; 64];
        let written = codec
            .encode_heab(&FrameMeta::default(), None, ControlCenterStatus::Init, &mut buf)
            .unwrap();
        let (heab, _) = codec.decode_heab(&buf[..written], reference_time()).unwrap();
        assert_eq!(heab.timestamp, None);
    }
}
