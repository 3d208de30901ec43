//! INSUP, GDRM and DCTI: supervision and direct-control bookkeeping.

use crate::{
    error::{CodecError, Result},
    field::{put_u16, put_u32, put_u8, read_field, FIELD_OVERHEAD},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    types::{GdrmMessage, SupervisorInstruction, TransmitterIdList},
    Codec, FrameMeta,
};

const VALUE_ID_INSUP_MODE: u16 = 0x0200;
const INSUP_BODY_LENGTH: usize = FIELD_OVERHEAD + 1;

const VALUE_ID_GDRM_DATA_CODE: u16 = 0x0205;
const GDRM_BODY_LENGTH: usize = FIELD_OVERHEAD + 2;

const VALUE_ID_DCTI_TOTAL_COUNT: u16 = 0x0202;
const VALUE_ID_DCTI_COUNTER: u16 = 0x0203;
const VALUE_ID_DCTI_TRANSMITTER_ID: u16 = 0x0010;
const DCTI_BODY_LENGTH: usize = (FIELD_OVERHEAD + 2) * 2 + (FIELD_OVERHEAD + 4);

impl Codec {
    /// Encode an INSUP frame commanding a supervisor mode.
    pub fn encode_insup(
        &self,
        meta: &FrameMeta,
        instruction: &SupervisorInstruction,
        buf: &mut [u8],
    ) -> Result<usize> {
        let total = HEADER_SIZE + INSUP_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Insup, meta, total, buf)?;
        put_u8(&mut w, VALUE_ID_INSUP_MODE, instruction.mode)?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode an INSUP frame.
    pub fn decode_insup(&self, buf: &[u8]) -> Result<(SupervisorInstruction, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Insup, Some(INSUP_BODY_LENGTH))?;

        let mut instruction = SupervisorInstruction::default();
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_INSUP_MODE => {
                    field.expect_length(1)?;
                    instruction.mode = r.read_u8()?;
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((instruction, consumed))
    }

    /// Encode a GDRM frame requesting data.
    pub fn encode_gdrm(
        &self,
        meta: &FrameMeta,
        request: &GdrmMessage,
        buf: &mut [u8],
    ) -> Result<usize> {
        let total = HEADER_SIZE + GDRM_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Gdrm, meta, total, buf)?;
        put_u16(&mut w, VALUE_ID_GDRM_DATA_CODE, request.data_code)?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a GDRM frame.
    pub fn decode_gdrm(&self, buf: &[u8]) -> Result<(GdrmMessage, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Gdrm, Some(GDRM_BODY_LENGTH))?;

        let mut request = GdrmMessage::default();
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_GDRM_DATA_CODE => {
                    field.expect_length(2)?;
                    request.data_code = r.read_u16()?;
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((request, consumed))
    }

    /// Encode a DCTI frame announcing a direct-control transmitter ID.
    pub fn encode_dcti(
        &self,
        meta: &FrameMeta,
        announcement: &TransmitterIdList,
        buf: &mut [u8],
    ) -> Result<usize> {
        let total = HEADER_SIZE + DCTI_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Dcti, meta, total, buf)?;
        put_u16(&mut w, VALUE_ID_DCTI_TOTAL_COUNT, announcement.total_count)?;
        put_u16(&mut w, VALUE_ID_DCTI_COUNTER, announcement.counter)?;
        put_u32(&mut w, VALUE_ID_DCTI_TRANSMITTER_ID, announcement.transmitter_id)?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a DCTI frame.
    pub fn decode_dcti(&self, buf: &[u8]) -> Result<(TransmitterIdList, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Dcti, Some(DCTI_BODY_LENGTH))?;

        let mut announcement = TransmitterIdList::default();
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_DCTI_TOTAL_COUNT => {
                    field.expect_length(2)?;
                    announcement.total_count = r.read_u16()?;
                }
                VALUE_ID_DCTI_COUNTER => {
                    field.expect_length(2)?;
                    announcement.counter = r.read_u16()?;
                }
                VALUE_ID_DCTI_TRANSMITTER_ID => {
                    field.expect_length(4)?;
                    announcement.transmitter_id = r.read_u32()?;
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((announcement, consumed))
    }
}
