//! SYPM and MTSP: trajectory synchronisation.

use std::time::{Duration, SystemTime};

use crate::{
    error::{CodecError, Result},
    field::{put_u32, read_field, FIELD_OVERHEAD},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    time,
    types::{SyncPoint, SyncPointEstimate},
    units, Codec, FrameMeta,
};

const VALUE_ID_SYNC_POINT_TIME: u16 = 0x0001;
const VALUE_ID_FREEZE_TIME: u16 = 0x0002;
const SYPM_BODY_LENGTH: usize = (FIELD_OVERHEAD + 4) * 2;

const VALUE_ID_EST_SYNC_POINT_TIME: u16 = 0x0001;
const MTSP_BODY_LENGTH: usize = FIELD_OVERHEAD + 4;

fn trajectory_time_to_wire(time: Duration) -> u32 {
    time.as_millis() as u32
}

impl Codec {
    /// Encode a SYPM frame configuring a synchronisation point.
    ///
    /// Both times are relative offsets along the trajectory, carried in
    /// milliseconds.
    pub fn encode_sypm(
        &self,
        meta: &FrameMeta,
        sync_point: &SyncPoint,
        buf: &mut [u8],
    ) -> Result<usize> {
        let total = HEADER_SIZE + SYPM_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Sypm, meta, total, buf)?;
        put_u32(&mut w, VALUE_ID_SYNC_POINT_TIME, trajectory_time_to_wire(sync_point.sync_point_time))?;
        put_u32(&mut w, VALUE_ID_FREEZE_TIME, trajectory_time_to_wire(sync_point.freeze_time))?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a SYPM frame.
    pub fn decode_sypm(&self, buf: &[u8]) -> Result<(SyncPoint, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Sypm, Some(SYPM_BODY_LENGTH))?;

        let mut sync_point = SyncPoint::default();
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_SYNC_POINT_TIME => {
                    field.expect_length(4)?;
                    sync_point.sync_point_time = Duration::from_millis(u64::from(r.read_u32()?));
                }
                VALUE_ID_FREEZE_TIME => {
                    field.expect_length(4)?;
                    sync_point.freeze_time = Duration::from_millis(u64::from(r.read_u32()?));
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((sync_point, consumed))
    }

    /// Encode an MTSP frame reporting the estimated arrival at the
    /// synchronisation point.
    pub fn encode_mtsp(
        &self,
        meta: &FrameMeta,
        estimated_arrival: Option<SystemTime>,
        buf: &mut [u8],
    ) -> Result<usize> {
        let qms = match estimated_arrival {
            Some(t) => time::required_qms_of_week(t)?,
            None => units::GPS_QMS_OF_WEEK_UNAVAILABLE,
        };

        let total = HEADER_SIZE + MTSP_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Mtsp, meta, total, buf)?;
        put_u32(&mut w, VALUE_ID_EST_SYNC_POINT_TIME, qms)?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode an MTSP frame.
    ///
    /// `current_time` supplies the GPS week the wire format omits.
    pub fn decode_mtsp(
        &self,
        buf: &[u8],
        current_time: SystemTime,
    ) -> Result<(SyncPointEstimate, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Mtsp, Some(MTSP_BODY_LENGTH))?;

        let mut estimated_arrival = None;
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_EST_SYNC_POINT_TIME => {
                    field.expect_length(4)?;
                    let qms = r.read_u32()?;
                    if qms != units::GPS_QMS_OF_WEEK_UNAVAILABLE {
                        estimated_arrival = time::from_qms_with_inferred_week(current_time, qms);
                    }
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((SyncPointEstimate { estimated_arrival }, consumed))
    }
}

#[cfg(test)]
mod tests {
    use std::time::UNIX_EPOCH;

    use super::*;

    fn reference_time() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_651_198_942)
    }

    #[test]
    fn sypm_round_trip() {
        let codec = Codec::new();
        let sync_point = SyncPoint {
            sync_point_time: Duration::from_millis(12_500),
            freeze_time: Duration::from_millis(11_000),
        };
        let mut buf = [0u8; 64];
        let written = codec.encode_sypm(&FrameMeta::default(), &sync_point, &mut buf).unwrap();
        assert_eq!(written, 18 + 16 + 2);
        let (decoded, consumed) = codec.decode_sypm(&buf[..written]).unwrap();
        assert_eq!(consumed, written);
        assert_eq!(decoded, sync_point);
    }

    #[test]
    fn sypm_times_are_little_endian_milliseconds() {
        let codec = Codec::new();
        let sync_point = SyncPoint {
            sync_point_time: Duration::from_millis(0x0102_0304),
            freeze_time: Duration::from_millis(0x0A0B_0C0D),
        };
        let mut buf = [0u8; 64];
        codec.encode_sypm(&FrameMeta::default(), &sync_point, &mut buf).unwrap();
        assert_eq!(&buf[22..26], [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&buf[30..34], [0x0D, 0x0C, 0x0B, 0x0A]);
    }

    #[test]
    fn mtsp_round_trip() {
        let codec = Codec::new();
        let mut buf = [0u8; 64];
        let written = codec
            .encode_mtsp(&FrameMeta::default(), Some(reference_time()), &mut buf)
            .unwrap();
        let (decoded, _) = codec.decode_mtsp(&buf[..written], reference_time()).unwrap();
        assert_eq!(decoded.estimated_arrival, Some(reference_time()));
    }

    #[test]
    fn mtsp_unknown_estimate_is_sentinel() {
        let codec = Codec::new();
        let mut buf = [0u8; 64];
        let written = codec.encode_mtsp(&FrameMeta::default(), None, &mut buf).unwrap();
        assert_eq!(&buf[22..26], units::GPS_QMS_OF_WEEK_UNAVAILABLE.to_le_bytes());
        let (decoded, _) = codec.decode_mtsp(&buf[..written], reference_time()).unwrap();
        assert_eq!(decoded.estimated_arrival, None);
    }
}
