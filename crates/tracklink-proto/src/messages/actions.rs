//! TRCM, ACCM and EXAC: trigger and action configuration and execution.
//!
//! Triggers and actions are configured with an ID, a type tag and three
//! type parameters; unconfigured inputs are carried as their unavailable
//! sentinels rather than omitted, keeping these frames fixed-size.

use std::time::SystemTime;

use crate::{
    error::{CodecError, Result},
    field::{put_u16, put_u32, read_field, FIELD_OVERHEAD},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    time,
    types::{ActionConfiguration, ExecuteAction, TriggerConfiguration},
    units, Codec, FrameMeta,
};

const VALUE_ID_TRCM_TRIGGER_ID: u16 = 0x0001;
const VALUE_ID_TRCM_TRIGGER_TYPE: u16 = 0x0002;
const VALUE_ID_TRCM_TRIGGER_TYPE_PARAM1: u16 = 0x0011;
const VALUE_ID_TRCM_TRIGGER_TYPE_PARAM2: u16 = 0x0012;
const VALUE_ID_TRCM_TRIGGER_TYPE_PARAM3: u16 = 0x0013;

const VALUE_ID_ACCM_ACTION_ID: u16 = 0x0002;
const VALUE_ID_ACCM_ACTION_TYPE: u16 = 0x0003;
const VALUE_ID_ACCM_ACTION_TYPE_PARAM1: u16 = 0x00A1;
const VALUE_ID_ACCM_ACTION_TYPE_PARAM2: u16 = 0x00A2;
const VALUE_ID_ACCM_ACTION_TYPE_PARAM3: u16 = 0x00A3;

const VALUE_ID_EXAC_ACTION_ID: u16 = 0x0002;
const VALUE_ID_EXAC_ACTION_EXECUTE_TIME: u16 = 0x0003;

const CONFIGURATION_BODY_LENGTH: usize =
    (FIELD_OVERHEAD + 2) * 2 + (FIELD_OVERHEAD + 4) * 3;
const EXAC_BODY_LENGTH: usize = (FIELD_OVERHEAD + 2) + (FIELD_OVERHEAD + 4);

fn id_to_wire(id: Option<u16>) -> u16 {
    id.unwrap_or(units::TRIGGER_ID_UNAVAILABLE)
}

fn id_from_wire(raw: u16) -> Option<u16> {
    (raw != units::TRIGGER_ID_UNAVAILABLE).then_some(raw)
}

fn parameter_to_wire(parameter: Option<u32>) -> u32 {
    parameter.unwrap_or(units::TYPE_PARAMETER_UNAVAILABLE)
}

fn parameter_from_wire(raw: u32) -> Option<u32> {
    (raw != units::TYPE_PARAMETER_UNAVAILABLE).then_some(raw)
}

impl Codec {
    /// Encode a TRCM frame configuring a trigger.
    pub fn encode_trcm(
        &self,
        meta: &FrameMeta,
        trigger: &TriggerConfiguration,
        buf: &mut [u8],
    ) -> Result<usize> {
        let total = HEADER_SIZE + CONFIGURATION_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Trcm, meta, total, buf)?;
        put_u16(&mut w, VALUE_ID_TRCM_TRIGGER_ID, id_to_wire(trigger.trigger_id))?;
        put_u16(&mut w, VALUE_ID_TRCM_TRIGGER_TYPE, id_to_wire(trigger.trigger_type))?;
        put_u32(&mut w, VALUE_ID_TRCM_TRIGGER_TYPE_PARAM1, parameter_to_wire(trigger.parameters[0]))?;
        put_u32(&mut w, VALUE_ID_TRCM_TRIGGER_TYPE_PARAM2, parameter_to_wire(trigger.parameters[1]))?;
        put_u32(&mut w, VALUE_ID_TRCM_TRIGGER_TYPE_PARAM3, parameter_to_wire(trigger.parameters[2]))?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode a TRCM frame.
    pub fn decode_trcm(&self, buf: &[u8]) -> Result<(TriggerConfiguration, usize)> {
        let (header, mut r) =
            open_frame(self, buf, MessageId::Trcm, Some(CONFIGURATION_BODY_LENGTH))?;

        let mut trigger = TriggerConfiguration::default();
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_TRCM_TRIGGER_ID => {
                    field.expect_length(2)?;
                    trigger.trigger_id = id_from_wire(r.read_u16()?);
                }
                VALUE_ID_TRCM_TRIGGER_TYPE => {
                    field.expect_length(2)?;
                    trigger.trigger_type = id_from_wire(r.read_u16()?);
                }
                VALUE_ID_TRCM_TRIGGER_TYPE_PARAM1 => {
                    field.expect_length(4)?;
                    trigger.parameters[0] = parameter_from_wire(r.read_u32()?);
                }
                VALUE_ID_TRCM_TRIGGER_TYPE_PARAM2 => {
                    field.expect_length(4)?;
                    trigger.parameters[1] = parameter_from_wire(r.read_u32()?);
                }
                VALUE_ID_TRCM_TRIGGER_TYPE_PARAM3 => {
                    field.expect_length(4)?;
                    trigger.parameters[2] = parameter_from_wire(r.read_u32()?);
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((trigger, consumed))
    }

    /// Encode an ACCM frame configuring an action.
    pub fn encode_accm(
        &self,
        meta: &FrameMeta,
        action: &ActionConfiguration,
        buf: &mut [u8],
    ) -> Result<usize> {
        let total = HEADER_SIZE + CONFIGURATION_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Accm, meta, total, buf)?;
        put_u16(&mut w, VALUE_ID_ACCM_ACTION_ID, id_to_wire(action.action_id))?;
        put_u16(&mut w, VALUE_ID_ACCM_ACTION_TYPE, id_to_wire(action.action_type))?;
        put_u32(&mut w, VALUE_ID_ACCM_ACTION_TYPE_PARAM1, parameter_to_wire(action.parameters[0]))?;
        put_u32(&mut w, VALUE_ID_ACCM_ACTION_TYPE_PARAM2, parameter_to_wire(action.parameters[1]))?;
        put_u32(&mut w, VALUE_ID_ACCM_ACTION_TYPE_PARAM3, parameter_to_wire(action.parameters[2]))?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode an ACCM frame.
    pub fn decode_accm(&self, buf: &[u8]) -> Result<(ActionConfiguration, usize)> {
        let (header, mut r) =
            open_frame(self, buf, MessageId::Accm, Some(CONFIGURATION_BODY_LENGTH))?;

        let mut action = ActionConfiguration::default();
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_ACCM_ACTION_ID => {
                    field.expect_length(2)?;
                    action.action_id = id_from_wire(r.read_u16()?);
                }
                VALUE_ID_ACCM_ACTION_TYPE => {
                    field.expect_length(2)?;
                    action.action_type = id_from_wire(r.read_u16()?);
                }
                VALUE_ID_ACCM_ACTION_TYPE_PARAM1 => {
                    field.expect_length(4)?;
                    action.parameters[0] = parameter_from_wire(r.read_u32()?);
                }
                VALUE_ID_ACCM_ACTION_TYPE_PARAM2 => {
                    field.expect_length(4)?;
                    action.parameters[1] = parameter_from_wire(r.read_u32()?);
                }
                VALUE_ID_ACCM_ACTION_TYPE_PARAM3 => {
                    field.expect_length(4)?;
                    action.parameters[2] = parameter_from_wire(r.read_u32()?);
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((action, consumed))
    }

    /// Encode an EXAC frame requesting an action execution.
    pub fn encode_exac(
        &self,
        meta: &FrameMeta,
        execute: &ExecuteAction,
        buf: &mut [u8],
    ) -> Result<usize> {
        let qms = match execute.execution_time {
            Some(t) => time::required_qms_of_week(t)?,
            None => units::GPS_QMS_OF_WEEK_UNAVAILABLE,
        };

        let total = HEADER_SIZE + EXAC_BODY_LENGTH + FOOTER_SIZE;
        let mut w = start_frame(self, MessageId::Exac, meta, total, buf)?;
        put_u16(&mut w, VALUE_ID_EXAC_ACTION_ID, id_to_wire(execute.action_id))?;
        put_u32(&mut w, VALUE_ID_EXAC_ACTION_EXECUTE_TIME, qms)?;
        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode an EXAC frame.
    ///
    /// `current_time` supplies the GPS week the wire format omits.
    pub fn decode_exac(
        &self,
        buf: &[u8],
        current_time: SystemTime,
    ) -> Result<(ExecuteAction, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Exac, Some(EXAC_BODY_LENGTH))?;

        let mut execute = ExecuteAction::default();
        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            match field.value_id {
                VALUE_ID_EXAC_ACTION_ID => {
                    field.expect_length(2)?;
                    execute.action_id = id_from_wire(r.read_u16()?);
                }
                VALUE_ID_EXAC_ACTION_EXECUTE_TIME => {
                    field.expect_length(4)?;
                    let qms = r.read_u32()?;
                    if qms != units::GPS_QMS_OF_WEEK_UNAVAILABLE {
                        execute.execution_time =
                            time::from_qms_with_inferred_week(current_time, qms);
                    }
                }
                unknown => return Err(CodecError::ValueId { value_id: unknown }),
            }
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((execute, consumed))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    fn reference_time() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_651_198_942)
    }

    #[test]
    fn trcm_round_trip() {
        let codec = Codec::new();
        let trigger = TriggerConfiguration {
            trigger_id: Some(7),
            trigger_type: Some(0x0010),
            parameters: [Some(1), None, Some(3)],
        };
        let mut buf = [0u8; 64];
        let written = codec.encode_trcm(&FrameMeta::default(), &trigger, &mut buf).unwrap();
        assert_eq!(written, 18 + CONFIGURATION_BODY_LENGTH + 2);
        let (decoded, consumed) = codec.decode_trcm(&buf[..written]).unwrap();
        assert_eq!(consumed, written);
        assert_eq!(decoded, trigger);
    }

    #[test]
    fn trcm_unconfigured_fields_are_sentinels() {
        let codec = Codec::new();
        let mut buf = [0u8; 64];
        let written = codec
            .encode_trcm(&FrameMeta::default(), &TriggerConfiguration::default(), &mut buf)
            .unwrap();
        // Trigger ID content
        assert_eq!(&buf[22..24], [0xFF, 0xFF]);
        let (decoded, _) = codec.decode_trcm(&buf[..written]).unwrap();
        assert_eq!(decoded, TriggerConfiguration::default());
    }

    #[test]
    fn accm_round_trip() {
        let codec = Codec::new();
        let action = ActionConfiguration {
            action_id: Some(2),
            action_type: Some(0x0020),
            parameters: [None, Some(0xAABB), None],
        };
        let mut buf = [0u8; 64];
        let written = codec.encode_accm(&FrameMeta::default(), &action, &mut buf).unwrap();
        let (decoded, _) = codec.decode_accm(&buf[..written]).unwrap();
        assert_eq!(decoded, action);
    }

    #[test]
    fn exac_round_trip() {
        let codec = Codec::new();
        let execute = ExecuteAction {
            action_id: Some(9),
            execution_time: Some(reference_time()),
        };
        let mut buf = [0u8; 64];
        let written = codec.encode_exac(&FrameMeta::default(), &execute, &mut buf).unwrap();
        let (decoded, _) = codec.decode_exac(&buf[..written], reference_time()).unwrap();
        assert_eq!(decoded, execute);
    }

    #[test]
    fn exac_without_time_round_trips_as_none() {
        let codec = Codec::new();
        let execute = ExecuteAction { action_id: None, execution_time: None };
        let mut buf = [0u8; 64];
        let written = codec.encode_exac(&FrameMeta::default(), &execute, &mut buf).unwrap();
        let (decoded, _) = codec.decode_exac(&buf[..written], reference_time()).unwrap();
        assert_eq!(decoded, execute);
    }
}
