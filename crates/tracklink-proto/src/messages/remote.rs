//! RCMM, DCMM and RDCA: remote and direct control.
//!
//! RCMM and DCMM share one payload; DCMM is the same manoeuvre carried
//! under a vendor-specific message ID. Speed and steering each carry their
//! unit as the value ID itself (`m/s` vs `%`, angle vs `%`), so the host
//! representation is a tagged union and the wire tag picks the variant.
//! When both unit tags for one setpoint appear in a frame, the last one
//! wins; that is a documented protocol property, not a fault.

use std::time::SystemTime;

use crate::{
    error::{CodecError, Result},
    field::{put_i16, put_u32, put_u8, read_field, FIELD_OVERHEAD},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    time,
    types::{ManoeuvreCommand, RemoteControlManoeuvre, RequestControlAction, SpeedManoeuvre,
        SteeringManoeuvre},
    units, Codec, FrameMeta,
};

const VALUE_ID_RCMM_CONTROL_STATUS: u16 = 0x0001;
const VALUE_ID_RCMM_SPEED_METRE_PER_SECOND: u16 = 0x0011;
const VALUE_ID_RCMM_STEERING_ANGLE: u16 = 0x0012;
const VALUE_ID_RCMM_STEERING_PERCENTAGE: u16 = 0x0031;
const VALUE_ID_RCMM_SPEED_PERCENTAGE: u16 = 0x0032;
const VALUE_ID_RCMM_CONTROL: u16 = 0xA201;

const RCMM_MAX_BODY: usize = (FIELD_OVERHEAD + 1) * 2 + (FIELD_OVERHEAD + 2) * 2;

const VALUE_ID_RDCA_INTENDED_RECEIVER: u16 = 0x0100;
const VALUE_ID_RDCA_GPS_QMS_OF_WEEK: u16 = 0x010A;
const VALUE_ID_RDCA_STEERING_ANGLE: u16 = 0x0204;
const VALUE_ID_RDCA_STEERING_PERCENTAGE: u16 = 0x0205;
const VALUE_ID_RDCA_SPEED_METRE_PER_SECOND: u16 = 0x0206;
const VALUE_ID_RDCA_SPEED_PERCENTAGE: u16 = 0x0207;

const RDCA_MAX_BODY: usize = (FIELD_OVERHEAD + 4) * 2 + (FIELD_OVERHEAD + 2) * 2;

fn steering_field(steering: SteeringManoeuvre, angle_id: u16, pct_id: u16) -> Result<(u16, i16)> {
    match steering {
        SteeringManoeuvre::Radians(rad) => Ok((angle_id, units::steering_angle_to_wire(rad)?)),
        SteeringManoeuvre::Percent(pct) => Ok((pct_id, units::percent_to_wire(pct)?)),
    }
}

fn speed_field(speed: SpeedManoeuvre, m_s_id: u16, pct_id: u16) -> Result<(u16, i16)> {
    match speed {
        SpeedManoeuvre::MetresPerSecond(m_s) => Ok((m_s_id, units::speed_to_wire(m_s, true))),
        SpeedManoeuvre::Percent(pct) => Ok((pct_id, units::percent_to_wire(pct)?)),
    }
}

fn steering_angle_value(raw: i16) -> Result<Option<SteeringManoeuvre>> {
    Ok(units::steering_angle_from_wire(raw)?.map(SteeringManoeuvre::Radians))
}

fn speed_m_s_value(raw: i16) -> Option<SpeedManoeuvre> {
    let (m_s, valid) = units::speed_from_wire(raw);
    valid.then_some(SpeedManoeuvre::MetresPerSecond(m_s))
}

impl Codec {
    fn encode_manoeuvre(
        &self,
        id: MessageId,
        meta: &FrameMeta,
        manoeuvre: &RemoteControlManoeuvre,
        buf: &mut [u8],
    ) -> Result<usize> {
        let mut body = FIELD_OVERHEAD + 1;
        if manoeuvre.command != ManoeuvreCommand::None {
            body += FIELD_OVERHEAD + 1;
        }
        if manoeuvre.steering.is_some() {
            body += FIELD_OVERHEAD + 2;
        }
        if manoeuvre.speed.is_some() {
            body += FIELD_OVERHEAD + 2;
        }
        let total = HEADER_SIZE + body + FOOTER_SIZE;

        let mut w = start_frame(self, id, meta, total, buf)?;
        put_u8(&mut w, VALUE_ID_RCMM_CONTROL_STATUS, manoeuvre.status)?;
        if manoeuvre.command != ManoeuvreCommand::None {
            put_u8(&mut w, VALUE_ID_RCMM_CONTROL, manoeuvre.command.to_wire())?;
        }
        if let Some(steering) = manoeuvre.steering {
            let (value_id, raw) = steering_field(
                steering,
                VALUE_ID_RCMM_STEERING_ANGLE,
                VALUE_ID_RCMM_STEERING_PERCENTAGE,
            )?;
            put_i16(&mut w, value_id, raw)?;
        }
        if let Some(speed) = manoeuvre.speed {
            let (value_id, raw) = speed_field(
                speed,
                VALUE_ID_RCMM_SPEED_METRE_PER_SECOND,
                VALUE_ID_RCMM_SPEED_PERCENTAGE,
            )?;
            put_i16(&mut w, value_id, raw)?;
        }

        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    fn decode_manoeuvre(
        &self,
        id: MessageId,
        buf: &[u8],
    ) -> Result<(RemoteControlManoeuvre, usize)> {
        let (header, mut r) = open_frame(self, buf, id, Some(RCMM_MAX_BODY))?;

        let mut manoeuvre = RemoteControlManoeuvre::default();
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_RCMM_CONTROL_STATUS => {
                    field.expect_length(1)?;
                    manoeuvre.status = r.read_u8()?;
                }
                VALUE_ID_RCMM_CONTROL => {
                    field.expect_length(1)?;
                    manoeuvre.command = ManoeuvreCommand::from_wire(r.read_u8()?);
                }
                VALUE_ID_RCMM_STEERING_ANGLE => {
                    field.expect_length(2)?;
                    manoeuvre.steering = steering_angle_value(r.read_i16()?)?;
                }
                VALUE_ID_RCMM_STEERING_PERCENTAGE => {
                    field.expect_length(2)?;
                    manoeuvre.steering =
                        Some(SteeringManoeuvre::Percent(units::percent_from_wire(r.read_i16()?)?));
                }
                VALUE_ID_RCMM_SPEED_METRE_PER_SECOND => {
                    field.expect_length(2)?;
                    manoeuvre.speed = speed_m_s_value(r.read_i16()?);
                }
                VALUE_ID_RCMM_SPEED_PERCENTAGE => {
                    field.expect_length(2)?;
                    manoeuvre.speed =
                        Some(SpeedManoeuvre::Percent(units::percent_from_wire(r.read_i16()?)?));
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((manoeuvre, consumed))
    }

    /// Encode an RCMM frame.
    pub fn encode_rcmm(
        &self,
        meta: &FrameMeta,
        manoeuvre: &RemoteControlManoeuvre,
        buf: &mut [u8],
    ) -> Result<usize> {
        self.encode_manoeuvre(MessageId::Rcmm, meta, manoeuvre, buf)
    }

    /// Decode an RCMM frame.
    pub fn decode_rcmm(&self, buf: &[u8]) -> Result<(RemoteControlManoeuvre, usize)> {
        self.decode_manoeuvre(MessageId::Rcmm, buf)
    }

    /// Encode a DCMM frame: the RCMM payload under the vendor-specific
    /// direct-control message ID.
    pub fn encode_dcmm(
        &self,
        meta: &FrameMeta,
        manoeuvre: &RemoteControlManoeuvre,
        buf: &mut [u8],
    ) -> Result<usize> {
        self.encode_manoeuvre(MessageId::Dcmm, meta, manoeuvre, buf)
    }

    /// Decode a DCMM frame.
    pub fn decode_dcmm(&self, buf: &[u8]) -> Result<(RemoteControlManoeuvre, usize)> {
        self.decode_manoeuvre(MessageId::Dcmm, buf)
    }

    /// Encode an RDCA frame requesting a direct control action.
    ///
    /// Steering and speed setpoints are omitted from the frame when
    /// absent, shortening the body.
    pub fn encode_rdca(
        &self,
        meta: &FrameMeta,
        action: &RequestControlAction,
        buf: &mut [u8],
    ) -> Result<usize> {
        let qms = time::required_qms_of_week(action.timestamp)?;

        let mut body = (FIELD_OVERHEAD + 4) * 2;
        if action.steering.is_some() {
            body += FIELD_OVERHEAD + 2;
        }
        if action.speed.is_some() {
            body += FIELD_OVERHEAD + 2;
        }
        let total = HEADER_SIZE + body + FOOTER_SIZE;

        let mut w = start_frame(self, MessageId::Rdca, meta, total, buf)?;
        put_u32(&mut w, VALUE_ID_RDCA_INTENDED_RECEIVER, action.executing_id)?;
        put_u32(&mut w, VALUE_ID_RDCA_GPS_QMS_OF_WEEK, qms)?;
        if let Some(steering) = action.steering {
            let (value_id, raw) = steering_field(
                steering,
                VALUE_ID_RDCA_STEERING_ANGLE,
                VALUE_ID_RDCA_STEERING_PERCENTAGE,
            )?;
            put_i16(&mut w, value_id, raw)?;
        }
        if let Some(speed) = action.speed {
            let (value_id, raw) = speed_field(
                speed,
                VALUE_ID_RDCA_SPEED_METRE_PER_SECOND,
                VALUE_ID_RDCA_SPEED_PERCENTAGE,
            )?;
            put_i16(&mut w, value_id, raw)?;
        }

        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode an RDCA frame.
    ///
    /// The intended receiver and the timestamp are required;
    /// `current_time` supplies the GPS week the wire format omits.
    pub fn decode_rdca(
        &self,
        buf: &[u8],
        current_time: SystemTime,
    ) -> Result<(RequestControlAction, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Rdca, Some(RDCA_MAX_BODY))?;

        let mut executing_id = None;
        let mut qms = None;
        let mut steering = None;
        let mut speed = None;

        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_RDCA_INTENDED_RECEIVER => {
                    field.expect_length(4)?;
                    executing_id = Some(r.read_u32()?);
                }
                VALUE_ID_RDCA_GPS_QMS_OF_WEEK => {
                    field.expect_length(4)?;
                    qms = Some(r.read_u32()?);
                }
                VALUE_ID_RDCA_STEERING_ANGLE => {
                    field.expect_length(2)?;
                    steering = steering_angle_value(r.read_i16()?)?;
                }
                VALUE_ID_RDCA_STEERING_PERCENTAGE => {
                    field.expect_length(2)?;
                    steering =
                        Some(SteeringManoeuvre::Percent(units::percent_from_wire(r.read_i16()?)?));
                }
                VALUE_ID_RDCA_SPEED_METRE_PER_SECOND => {
                    field.expect_length(2)?;
                    speed = speed_m_s_value(r.read_i16()?);
                }
                VALUE_ID_RDCA_SPEED_PERCENTAGE => {
                    field.expect_length(2)?;
                    speed =
                        Some(SpeedManoeuvre::Percent(units::percent_from_wire(r.read_i16()?)?));
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let executing_id = executing_id
            .ok_or(CodecError::ValueId { value_id: VALUE_ID_RDCA_INTENDED_RECEIVER })?;
        let qms = qms
            .filter(|&q| q != units::GPS_QMS_OF_WEEK_UNAVAILABLE)
            .ok_or(CodecError::ValueId { value_id: VALUE_ID_RDCA_GPS_QMS_OF_WEEK })?;
        let timestamp = time::from_qms_with_inferred_week(current_time, qms)
            .ok_or(CodecError::ContentOutOfRange("timestamp before GPS epoch"))?;

        let action = RequestControlAction { executing_id, timestamp, steering, speed };
        let consumed = close_frame(self, buf, &header)?;
        Ok((action, consumed))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    fn reference_time() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_651_198_942)
    }

    #[test]
    fn rcmm_round_trip_angle_and_speed() {
        let codec = Codec::new();
        let manoeuvre = RemoteControlManoeuvre {
            status: 1,
            speed: Some(SpeedManoeuvre::MetresPerSecond(2.5)),
            steering: Some(SteeringManoeuvre::Radians(-0.75)),
            command: ManoeuvreCommand::None,
        };
        let mut buf = [0u8; 64];
        let written = codec.encode_rcmm(&FrameMeta::default(), &manoeuvre, &mut buf).unwrap();
        let (decoded, consumed) = codec.decode_rcmm(&buf[..written]).unwrap();
        assert_eq!(consumed, written);
        assert_eq!(decoded.status, 1);
        assert_eq!(decoded.command, ManoeuvreCommand::None);
        match decoded.steering {
            Some(SteeringManoeuvre::Radians(rad)) => {
                assert!((rad + 0.75).abs() < 0.01_f64.to_radians());
            }
            other => panic!("expected steering angle, got {other:?}"),
        }
        match decoded.speed {
            Some(SpeedManoeuvre::MetresPerSecond(m_s)) => assert!((m_s - 2.5).abs() < 1e-9),
            other => panic!("expected speed in m/s, got {other:?}"),
        }
    }

    #[test]
    fn rcmm_round_trip_percentages() {
        let codec = Codec::new();
        let manoeuvre = RemoteControlManoeuvre {
            status: 0,
            speed: Some(SpeedManoeuvre::Percent(-40)),
            steering: Some(SteeringManoeuvre::Percent(100)),
            command: ManoeuvreCommand::BackToStart,
        };
        let mut buf = [0u8; 64];
        let written = codec.encode_rcmm(&FrameMeta::default(), &manoeuvre, &mut buf).unwrap();
        let (decoded, _) = codec.decode_rcmm(&buf[..written]).unwrap();
        assert_eq!(decoded.speed, Some(SpeedManoeuvre::Percent(-40)));
        assert_eq!(decoded.steering, Some(SteeringManoeuvre::Percent(100)));
        assert_eq!(decoded.command, ManoeuvreCommand::BackToStart);
    }

    #[test]
    fn rcmm_omits_absent_setpoints() {
        let codec = Codec::new();
        let manoeuvre = RemoteControlManoeuvre::default();
        let mut buf = [0u8; 64];
        let written = codec.encode_rcmm(&FrameMeta::default(), &manoeuvre, &mut buf).unwrap();
        // Header, control status field, footer only
        assert_eq!(written, 18 + 5 + 2);
    }

    #[test]
    fn steering_angle_at_pi_encodes_to_limit() {
        let codec = Codec::new();
        let manoeuvre = RemoteControlManoeuvre {
            steering: Some(SteeringManoeuvre::Radians(PI)),
            ..Default::default()
        };
        let mut buf = [0u8; 64];
        let written = codec.encode_rcmm(&FrameMeta::default(), &manoeuvre, &mut buf).unwrap();
        let raw = i16::from_le_bytes([buf[written - 4], buf[written - 3]]);
        assert_eq!(raw, 18_000);
    }

    #[test]
    fn steering_angle_beyond_pi_is_rejected() {
        let codec = Codec::new();
        let manoeuvre = RemoteControlManoeuvre {
            steering: Some(SteeringManoeuvre::Radians(PI + 1e-3)),
            ..Default::default()
        };
        let mut buf = [0u8; 64];
        let err = codec.encode_rcmm(&FrameMeta::default(), &manoeuvre, &mut buf).unwrap_err();
        assert_eq!(err, CodecError::ContentOutOfRange("steering angle"));
    }

    #[test]
    fn percentage_beyond_bounds_is_rejected() {
        let codec = Codec::new();
        let manoeuvre = RemoteControlManoeuvre {
            speed: Some(SpeedManoeuvre::Percent(101)),
            ..Default::default()
        };
        let mut buf = [0u8; 64];
        let err = codec.encode_rcmm(&FrameMeta::default(), &manoeuvre, &mut buf).unwrap_err();
        assert_eq!(err, CodecError::ContentOutOfRange("percentage"));
    }

    #[test]
    fn dcmm_differs_from_rcmm_only_in_message_id() {
        let codec = Codec::new();
        let manoeuvre = RemoteControlManoeuvre {
            status: 2,
            speed: Some(SpeedManoeuvre::MetresPerSecond(1.0)),
            steering: Some(SteeringManoeuvre::Radians(0.1)),
            command: ManoeuvreCommand::None,
        };
        let mut rcmm = [0u8; 64];
        let mut dcmm = [0u8; 64];
        let n = codec.encode_rcmm(&FrameMeta::default(), &manoeuvre, &mut rcmm).unwrap();
        let m = codec.encode_dcmm(&FrameMeta::default(), &manoeuvre, &mut dcmm).unwrap();
        assert_eq!(n, m);
        // Bodies are identical; header message ID and the CRC differ
        assert_eq!(&rcmm[18..n - 2], &dcmm[18..m - 2]);
        assert_eq!(u16::from_le_bytes([dcmm[16], dcmm[17]]), MessageId::Dcmm.to_u16());

        let (decoded, _) = codec.decode_dcmm(&dcmm[..m]).unwrap();
        assert_eq!(decoded.status, 2);
    }

    #[test]
    fn dcmm_decoder_rejects_rcmm_frames() {
        let codec = Codec::new();
        let mut buf = [0u8; 64];
        let written = codec
            .encode_rcmm(&FrameMeta::default(), &RemoteControlManoeuvre::default(), &mut buf)
            .unwrap();
        let err = codec.decode_dcmm(&buf[..written]).unwrap_err();
        assert!(matches!(err, CodecError::MessageType { .. }));
    }

    #[test]
    fn duplicate_steering_unit_tags_last_wins() {
        // Both steering unit tags in one frame: the second overwrites the
        // first; this is a documented protocol property, not a fault.
        let codec = Codec::new();
        let mut frame = [0u8; 64];
        let header = codec
            .build_header(MessageId::Rcmm, &FrameMeta::default(), 18 + 17 + 2)
            .unwrap();
        let body_end = {
            let mut w = crate::cursor::Writer::new(&mut frame);
            crate::header::write_header(&mut w, &header).unwrap();
            put_u8(&mut w, VALUE_ID_RCMM_CONTROL_STATUS, 0).unwrap();
            put_i16(&mut w, VALUE_ID_RCMM_STEERING_ANGLE, 9000).unwrap();
            put_i16(&mut w, VALUE_ID_RCMM_STEERING_PERCENTAGE, 25).unwrap();
            w.written()
        };
        // Zero CRC: sender disabled checksums
        frame[body_end] = 0;
        frame[body_end + 1] = 0;

        let (decoded, _) = codec.decode_rcmm(&frame[..body_end + 2]).unwrap();
        assert_eq!(decoded.steering, Some(SteeringManoeuvre::Percent(25)));
    }

    #[test]
    fn rdca_round_trip() {
        let codec = Codec::new();
        let action = RequestControlAction {
            executing_id: 0xDEAD,
            timestamp: reference_time(),
            steering: Some(SteeringManoeuvre::Radians(0.5)),
            speed: Some(SpeedManoeuvre::Percent(55)),
        };
        let mut buf = [0u8; 64];
        let written = codec.encode_rdca(&FrameMeta::default(), &action, &mut buf).unwrap();
        let (decoded, consumed) = codec.decode_rdca(&buf[..written], reference_time()).unwrap();
        assert_eq!(consumed, written);
        assert_eq!(decoded.executing_id, 0xDEAD);
        assert_eq!(decoded.timestamp, reference_time());
        assert_eq!(decoded.speed, Some(SpeedManoeuvre::Percent(55)));
        match decoded.steering {
            Some(SteeringManoeuvre::Radians(rad)) => {
                assert!((rad - 0.5).abs() < 0.01_f64.to_radians());
            }
            other => panic!("expected steering angle, got {other:?}"),
        }
    }

    #[test]
    fn rdca_omits_absent_setpoints() {
        let codec = Codec::new();
        let action = RequestControlAction {
            executing_id: 1,
            timestamp: reference_time(),
            steering: None,
            speed: None,
        };
        let mut buf = [0u8; 64];
        let written = codec.encode_rdca(&FrameMeta::default(), &action, &mut buf).unwrap();
        assert_eq!(written, 18 + 16 + 2);
        let (decoded, _) = codec.decode_rdca(&buf[..written], reference_time()).unwrap();
        assert_eq!(decoded.steering, None);
        assert_eq!(decoded.speed, None);
    }

    #[test]
    fn rdca_requires_receiver() {
        let codec = Codec::new();
        // Hand-build a frame missing the intended receiver field
        let mut buf = [0u8; 64];
        let action = RequestControlAction {
            executing_id: 1,
            timestamp: reference_time(),
            steering: None,
            speed: None,
        };
        let written = codec.encode_rdca(&FrameMeta::default(), &action, &mut buf).unwrap();
        // Overwrite the receiver field's value ID with the timestamp's
        buf[18..20].copy_from_slice(&VALUE_ID_RDCA_GPS_QMS_OF_WEEK.to_le_bytes());
        let crc = crate::crc::crc16(&buf[..written - 2]);
        buf[written - 2..written].copy_from_slice(&crc.to_le_bytes());

        let err = codec.decode_rdca(&buf[..written], reference_time()).unwrap_err();
        assert_eq!(err, CodecError::ValueId { value_id: VALUE_ID_RDCA_INTENDED_RECEIVER });
    }
}
