//! OSTM and STRT: object state commands and scenario start.

use std::time::SystemTime;

use crate::{
    error::{CodecError, Result},
    field::{put_u16, put_u32, put_u8, read_field},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    time,
    types::{ObjectCommand, StartMessage},
    units, Codec, FrameMeta,
};

const VALUE_ID_STATE_CHANGE_REQUEST: u16 = 0x0064;
const OSTM_BODY_LENGTH: usize = 4 + 1;

const VALUE_ID_STRT_GPS_QMS_OF_WEEK: u16 = 0x0002;
const VALUE_ID_STRT_GPS_WEEK: u16 = 0x0003;
const STRT_BODY_LENGTH: usize = (4 + 4) + (4 + 2);

impl Codec {
    /// Encode an OSTM frame requesting a state change.
    ///
    /// Only `Arm`, `Disarm` and `RemoteControl` can be sent; anything else
    /// fails without emitting.
    pub fn encode_ostm(
        &self,
        meta: &FrameMeta,
        command: ObjectCommand,
        buf: &mut [u8],
    ) -> Result<usize> {
        let Some(state) = command.to_wire() else {
            return Err(CodecError::ContentOutOfRange("state change request"));
        };

        let total = HEADER_SIZE + OSTM_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Ostm, meta, total, buf)?;
        put_u8(&mut w, VALUE_ID_STATE_CHANGE_REQUEST, state)?;

        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode an OSTM frame.
    pub fn decode_ostm(&self, buf: &[u8]) -> Result<(ObjectCommand, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Ostm, Some(OSTM_BODY_LENGTH))?;

        let mut command = ObjectCommand::Unknown(0);
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_STATE_CHANGE_REQUEST => {
                    field.expect_length(1)?;
                    command = ObjectCommand::from_wire(r.read_u8()?);
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((command, consumed))
    }

    /// Encode a STRT frame.
    ///
    /// When `start_time` is absent both time fields carry their
    /// unavailable sentinels, meaning "start undetermined".
    pub fn encode_strt(
        &self,
        meta: &FrameMeta,
        start_time: Option<SystemTime>,
        buf: &mut [u8],
    ) -> Result<usize> {
        let (week, qms) = match start_time {
            Some(t) => (
                time::gps_week(t).unwrap_or(units::GPS_WEEK_UNAVAILABLE),
                time::required_qms_of_week(t)?,
            ),
            None => (units::GPS_WEEK_UNAVAILABLE, units::GPS_QMS_OF_WEEK_UNAVAILABLE),
        };

        let total = HEADER_SIZE + STRT_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Strt, meta, total, buf)?;
        put_u32(&mut w, VALUE_ID_STRT_GPS_QMS_OF_WEEK, qms)?;
        put_u16(&mut w, VALUE_ID_STRT_GPS_WEEK, week)?;

        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a STRT frame.
    pub fn decode_strt(&self, buf: &[u8]) -> Result<(StartMessage, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Strt, Some(STRT_BODY_LENGTH))?;

        let mut week = units::GPS_WEEK_UNAVAILABLE;
        let mut qms = units::GPS_QMS_OF_WEEK_UNAVAILABLE;
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_STRT_GPS_QMS_OF_WEEK => {
                    field.expect_length(4)?;
                    qms = r.read_u32()?;
                }
                VALUE_ID_STRT_GPS_WEEK => {
                    field.expect_length(2)?;
                    week = r.read_u16()?;
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let start_time = (week != units::GPS_WEEK_UNAVAILABLE
            && qms != units::GPS_QMS_OF_WEEK_UNAVAILABLE)
            .then(|| time::from_gps_time(week, qms));

        let consumed = close_frame(self, buf, &header)?;
        Ok((StartMessage { start_time }, consumed))
    }
}
