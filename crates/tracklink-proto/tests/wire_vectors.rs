//! Byte-level wire vectors from the protocol's reference test suite.
//!
//! Frames here are spelled out byte by byte, independently of the
//! encoders, so a systematic encoding error cannot hide behind a matching
//! decoding error.

use tracklink_proto::{
    crc16, Codec, CodecError, MessageId, ObjectCommand, ResponseCode, HEADER_SIZE, SYNC_WORD,
};

#[test]
fn crc_check_value() {
    assert_eq!(crc16(b"123456789"), 0x29B1);
}

#[test]
fn header_reference_vector() {
    let bytes = hex::decode("7f7e785634120212f0debc9a785634bcf0de").unwrap();
    let header = Codec::new().decode_header(&bytes).unwrap();
    assert_eq!(header.sync_word, SYNC_WORD);
    assert_eq!(header.message_length, 0x1234_5678);
    assert_eq!(header.ack_req_prot_ver, 0x02);
    assert_eq!(header.transmitter_id, 0xBCDE_F012);
    assert_eq!(header.receiver_id, 0x3456_789A);
    assert_eq!(header.message_counter, 0xBC);
    assert_eq!(header.message_id, 0xDEF0);
}

/// The 54-byte GREM reference frame: a response to a message from
/// transmitter 0x3412, response code "general error", empty payload, CRC
/// zeroed (sender disabled checksums).
fn grem_reference_frame() -> Vec<u8> {
    let mut frame = Vec::new();
    // Header
    frame.extend_from_slice(&SYNC_WORD.to_le_bytes());
    frame.extend_from_slice(&34u32.to_le_bytes()); // body length
    frame.push(0x02); // protocol version 2, no ack request
    frame.extend_from_slice(&0x3412u32.to_le_bytes()); // transmitter
    frame.extend_from_slice(&0u32.to_le_bytes()); // receiver
    frame.push(0x00); // counter
    frame.extend_from_slice(&MessageId::Grem.to_u16().to_le_bytes());
    // Received header transmitter ID
    frame.extend_from_slice(&[0x00, 0x02, 0x04, 0x00, 0x12, 0x34, 0x00, 0x00]);
    // Received header message counter
    frame.extend_from_slice(&[0x01, 0x02, 0x01, 0x00, 0x00]);
    // Received header message ID
    let mut msg_id_field = vec![0x02, 0x02, 0x02, 0x00];
    msg_id_field.extend_from_slice(&MessageId::Grem.to_u16().to_le_bytes());
    frame.extend_from_slice(&msg_id_field);
    // Response code: general error
    frame.extend_from_slice(&[0x03, 0x02, 0x01, 0x00, 0x02]);
    // Payload length 0, payload data empty
    frame.extend_from_slice(&[0x04, 0x02, 0x02, 0x00, 0x00, 0x00]);
    frame.extend_from_slice(&[0x05, 0x02, 0x00, 0x00]);
    // Footer: zero CRC
    frame.extend_from_slice(&[0x00, 0x00]);
    frame
}

#[test]
fn grem_reference_frame_decodes() {
    let frame = grem_reference_frame();
    assert_eq!(frame.len(), 54);
    assert_eq!(frame[41], 0x02);

    let codec = Codec::new();
    let (grem, consumed) = codec.decode_grem(&frame).unwrap();
    assert_eq!(consumed, 54);
    assert_eq!(grem.received_transmitter_id, 0x3412);
    assert_eq!(grem.received_message_counter, 0);
    assert_eq!(grem.received_message_id, MessageId::Grem.to_u16());
    assert_eq!(grem.response_code, ResponseCode::GeneralError);
    assert!(grem.payload.is_empty());
}

#[test]
fn zero_crc_means_sender_disabled_checksums() {
    // The reference frame carries CRC 0x0000 and must pass even with
    // verification enabled
    let codec = Codec::new();
    assert!(codec.crc_verification());
    codec.decode_grem(&grem_reference_frame()).unwrap();
}

#[test]
fn nonzero_wrong_crc_is_rejected() {
    let mut frame = grem_reference_frame();
    let len = frame.len();
    frame[len - 2..].copy_from_slice(&0xBEEF_u16.to_le_bytes());
    let err = Codec::new().decode_grem(&frame).unwrap_err();
    assert!(matches!(err, CodecError::Crc { .. }));
}

#[test]
fn wrong_crc_passes_when_verification_disabled() {
    let mut frame = grem_reference_frame();
    let len = frame.len();
    frame[len - 2..].copy_from_slice(&0xBEEF_u16.to_le_bytes());
    let mut codec = Codec::new();
    codec.set_crc_verification(false);
    codec.decode_grem(&frame).unwrap();
}

#[test]
fn exact_size_buffer_succeeds_and_one_less_fails() {
    let codec = Codec::new();
    let mut exact = [0u8; 25];
    codec
        .encode_ostm(&tracklink_proto::FrameMeta::default(), ObjectCommand::Arm, &mut exact)
        .unwrap();

    let mut short = [0u8; 24];
    let err = codec
        .encode_ostm(&tracklink_proto::FrameMeta::default(), ObjectCommand::Arm, &mut short)
        .unwrap_err();
    assert_eq!(err, CodecError::ShortBuffer { needed: 25, available: 24 });
}

#[test]
fn classify_rejects_reserved_message_ids() {
    let codec = Codec::new();
    let mut frame = grem_reference_frame();
    frame[16..HEADER_SIZE].copy_from_slice(&0x0002u16.to_le_bytes());
    let err = codec.classify_frame(&frame).unwrap_err();
    assert!(matches!(err, CodecError::Invalid(_)));
}

#[test]
fn classify_accepts_vendor_span() {
    let codec = Codec::new();
    let mut frame = grem_reference_frame();
    frame[16..HEADER_SIZE].copy_from_slice(&0xA1F0u16.to_le_bytes());
    assert_eq!(codec.classify_frame(&frame).unwrap(), MessageId::VendorOther(0xA1F0));
}
