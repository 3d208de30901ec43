//! ISO 22133 wire-protocol codec.
//!
//! Transforms between densely packed, little-endian, length-prefixed byte
//! frames and host-native SI-unit structures, for coordinating automated
//! test-track scenarios between a control centre and physical test objects.
//!
//! The codec is pure and synchronous: no I/O, no clocks, no background
//! state. Timestamps are supplied by the caller, encoders write into
//! caller-owned buffers, and each call produces or consumes exactly one
//! self-delimited frame. The only multi-call sequence is the trajectory
//! streamer ([`TrajectoryEncoder`]), whose rolling CRC lives in a value
//! whose type enforces the header → points → footer ordering.
//!
//! # Example
//!
//! ```
//! use tracklink_proto::{Codec, FrameMeta, MessageId};
//!
//! let mut codec = Codec::new();
//! codec.set_transmitter_id(0x12);
//!
//! let mut buf = [0u8; 64];
//! let written = codec
//!     .encode_ostm(&FrameMeta::default(), tracklink_proto::ObjectCommand::Arm, &mut buf)
//!     .unwrap();
//! assert_eq!(codec.classify_frame(&buf[..written]).unwrap(), MessageId::Ostm);
//! ```

mod crc;
mod cursor;
mod error;
mod field;
mod header;
mod message_id;
mod messages;
mod time;
mod types;
mod units;

pub use crc::{crc16, crc_finalize, crc_update, CRC_INIT};
pub use error::{CodecError, Result};
pub use header::{Header, FOOTER_SIZE, HEADER_SIZE, PROTOCOL_VERSION, SYNC_WORD};
pub use message_id::{MessageId, VENDOR_SPECIFIC_HIGH, VENDOR_SPECIFIC_LOW};
pub use messages::trajectory::TrajectoryEncoder;
pub use types::{
    Acceleration, ActionConfiguration, ArmReadiness, CartesianPosition, ControlCenterStatus,
    CoordinateSystem, DeviationLimits, DriveDirection, ExecuteAction, ForeignObjectProperties,
    GdrmMessage, GeneralResponse, GeneralResponseMessage, GeodeticPosition, HeabMessage,
    ManoeuvreCommand,
    MessageRates, ObjectCommand, ObjectErrors, ObjectIds, ObjectMonitor, ObjectProperties,
    ObjectSettings, ObjectState, PeerObjectInjection, RemoteControlManoeuvre,
    RequestControlAction, ResponseCode, Speed, SpeedManoeuvre, StartMessage, SteeringManoeuvre,
    SupervisorInstruction, SyncPoint, SyncPointEstimate, TestMode, TimeServer,
    TrajectoryHeader, TrajectoryInfo, TrajectoryPoint, TransmitterIdList, TriggerConfiguration,
};
pub use units::{host_heading_from_iso, iso_heading_from_host};

/// Default transmitter ID used until the application configures one.
pub const DEFAULT_TRANSMITTER_ID: u32 = 0xFF;

/// Codec context.
///
/// Carries the configuration the original implementation kept in process
/// globals: the transmitter ID stamped into every built header, the CRC
/// verification switch, and the debug-emission flag. Cheap to clone; one
/// per logical sender is the expected usage.
#[derive(Debug, Clone)]
pub struct Codec {
    transmitter_id: u32,
    crc_verification: bool,
    debug: bool,
}

impl Default for Codec {
    fn default() -> Self {
        Self { transmitter_id: DEFAULT_TRANSMITTER_ID, crc_verification: true, debug: false }
    }
}

impl Codec {
    /// A codec with default configuration: transmitter ID `0xFF`, CRC
    /// verification enabled, debug emission off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transmitter ID stamped into every built header. Also used as
    /// the system control centre ID in OSEM messages.
    pub fn set_transmitter_id(&mut self, id: u32) {
        self.transmitter_id = id;
    }

    /// The configured transmitter ID.
    pub fn transmitter_id(&self) -> u32 {
        self.transmitter_id
    }

    /// Enable or disable CRC verification of received frames. A received
    /// CRC of zero always passes regardless of this setting.
    pub fn set_crc_verification(&mut self, enabled: bool) {
        self.crc_verification = enabled;
    }

    /// Whether received-frame CRC verification is enabled.
    pub fn crc_verification(&self) -> bool {
        self.crc_verification
    }

    /// Enable or disable debug emission. When enabled, codec paths emit
    /// `tracing` debug events; the installed subscriber is the sink.
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    pub(crate) fn debug(&self) -> bool {
        self.debug
    }
}

/// Per-frame header inputs supplied by the caller.
///
/// The transmitter ID comes from the [`Codec`] configuration instead; these
/// are the fields that vary per logical destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameMeta {
    /// Receiver ID stamped into the header.
    pub receiver_id: u32,
    /// Message counter stamped into the header.
    pub message_counter: u8,
}
