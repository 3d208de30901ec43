//! GREM: general response message.
//!
//! A GREM answers some earlier message, so its payload references the
//! header of the message being responded to: transmitter ID, message
//! counter and message ID. On encode that header is supplied explicitly by
//! the caller; the codec never guesses what is being acknowledged.

use bytes::Bytes;

use crate::{
    error::{CodecError, Result},
    field::{put_bytes, put_u16, put_u32, put_u8, read_field, FIELD_OVERHEAD},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    types::{GeneralResponse, GeneralResponseMessage, ResponseCode},
    Codec, FrameMeta, Header,
};

const VALUE_ID_RECEIVED_TRANSMITTER_ID: u16 = 0x0200;
const VALUE_ID_RECEIVED_MESSAGE_COUNTER: u16 = 0x0201;
const VALUE_ID_RECEIVED_MESSAGE_ID: u16 = 0x0202;
const VALUE_ID_RESPONSE_CODE: u16 = 0x0203;
const VALUE_ID_PAYLOAD_LENGTH: u16 = 0x0204;
const VALUE_ID_PAYLOAD_DATA: u16 = 0x0205;

const GREM_FIXED_BODY_LENGTH: usize = (FIELD_OVERHEAD + 4)
    + (FIELD_OVERHEAD + 1)
    + (FIELD_OVERHEAD + 2)
    + (FIELD_OVERHEAD + 1)
    + (FIELD_OVERHEAD + 2)
    + FIELD_OVERHEAD;

impl Codec {
    /// Encode a GREM frame responding to the message whose header is
    /// `responding_to`.
    pub fn encode_grem(
        &self,
        meta: &FrameMeta,
        responding_to: &Header,
        response: &GeneralResponse,
        buf: &mut [u8],
    ) -> Result<usize> {
        let payload_len = u16::try_from(response.payload.len())
            .map_err(|_| CodecError::ContentOutOfRange("response payload"))?;

        let total =
            HEADER_SIZE + GREM_FIXED_BODY_LENGTH + response.payload.len() + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Grem, meta, total, buf)?;
        put_u32(&mut w, VALUE_ID_RECEIVED_TRANSMITTER_ID, responding_to.transmitter_id)?;
        put_u8(&mut w, VALUE_ID_RECEIVED_MESSAGE_COUNTER, responding_to.message_counter)?;
        put_u16(&mut w, VALUE_ID_RECEIVED_MESSAGE_ID, responding_to.message_id)?;
        put_u8(&mut w, VALUE_ID_RESPONSE_CODE, response.response_code.to_wire())?;
        put_u16(&mut w, VALUE_ID_PAYLOAD_LENGTH, payload_len)?;
        put_bytes(&mut w, VALUE_ID_PAYLOAD_DATA, &response.payload)?;

        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a GREM frame. The response code is required.
    pub fn decode_grem(&self, buf: &[u8]) -> Result<(GeneralResponseMessage, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Grem, None)?;

        let mut received_transmitter_id = 0;
        let mut received_message_counter = 0;
        let mut received_message_id = 0;
        let mut response_code = None;
        let mut payload = Bytes::new();

        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_RECEIVED_TRANSMITTER_ID => {
                    field.expect_length(4)?;
                    received_transmitter_id = r.read_u32()?;
                }
                VALUE_ID_RECEIVED_MESSAGE_COUNTER => {
                    field.expect_length(1)?;
                    received_message_counter = r.read_u8()?;
                }
                VALUE_ID_RECEIVED_MESSAGE_ID => {
                    field.expect_length(2)?;
                    received_message_id = r.read_u16()?;
                }
                VALUE_ID_RESPONSE_CODE => {
                    field.expect_length(1)?;
                    response_code = Some(ResponseCode::from_wire(r.read_u8()?));
                }
                VALUE_ID_PAYLOAD_LENGTH => {
                    field.expect_length(2)?;
                    let _declared_payload_length = r.read_u16()?;
                }
                VALUE_ID_PAYLOAD_DATA => {
                    payload =
                        Bytes::copy_from_slice(r.read_bytes(usize::from(field.content_length))?);
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let response_code =
            response_code.ok_or(CodecError::ValueId { value_id: VALUE_ID_RESPONSE_CODE })?;

        let message = GeneralResponseMessage {
            received_transmitter_id,
            received_message_counter,
            received_message_id,
            response_code,
            payload,
        };

        let consumed = close_frame(self, buf, &header)?;
        Ok((message, consumed))
    }
}
