//! Host-side message representations.
//!
//! These structs mirror the wire messages but carry SI units and explicit
//! validity, so application logic never touches scaled integers or
//! sentinels. They serialize with `serde` for storage and logging.

use std::net::Ipv4Addr;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Position in the test-track coordinate frame, with heading measured
/// counter-clockwise from the x axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartesianPosition {
    /// X coordinate in metres.
    pub x_m: f64,
    /// Y coordinate in metres.
    pub y_m: f64,
    /// Z coordinate in metres.
    pub z_m: f64,
    /// Heading in radians, counter-clockwise from the x axis.
    pub heading_rad: f64,
    /// Whether the coordinates are valid.
    pub is_position_valid: bool,
    /// Whether the heading is valid.
    pub is_heading_valid: bool,
}

/// Longitudinal and lateral speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    /// Speed along the heading, in m/s.
    pub longitudinal_m_s: f64,
    /// Speed across the heading, in m/s.
    pub lateral_m_s: f64,
    /// Whether the longitudinal component is valid.
    pub is_longitudinal_valid: bool,
    /// Whether the lateral component is valid.
    pub is_lateral_valid: bool,
}

/// Longitudinal and lateral acceleration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Acceleration {
    /// Acceleration along the heading, in m/s².
    pub longitudinal_m_s2: f64,
    /// Acceleration across the heading, in m/s².
    pub lateral_m_s2: f64,
    /// Whether the longitudinal component is valid.
    pub is_longitudinal_valid: bool,
    /// Whether the lateral component is valid.
    pub is_lateral_valid: bool,
}

/// Geodetic origin of the test-track coordinate system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    /// Latitude in degrees.
    pub latitude_deg: f64,
    /// Longitude in degrees.
    pub longitude_deg: f64,
    /// Altitude above sea level in metres.
    pub altitude_m: f64,
    /// Whether the latitude is valid.
    pub is_latitude_valid: bool,
    /// Whether the longitude is valid.
    pub is_longitude_valid: bool,
    /// Whether the altitude is valid.
    pub is_altitude_valid: bool,
}

/// Direction of travel relative to the heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveDirection {
    /// Travelling along the heading.
    Forward,
    /// Travelling against the heading.
    Backward,
    /// Direction not reported.
    #[default]
    Unavailable,
}

impl DriveDirection {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
            Self::Unavailable => 2,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            0 => Self::Forward,
            1 => Self::Backward,
            _ => Self::Unavailable,
        }
    }
}

/// Operational state reported by a test object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectState {
    /// Powered off.
    Off,
    /// Initialising.
    Init,
    /// Armed and ready to run.
    Armed,
    /// Disarmed.
    Disarmed,
    /// Executing a scenario.
    Running,
    /// Scenario finished.
    PostRun,
    /// Under remote control.
    RemoteControlled,
    /// Aborting.
    Aborting,
    /// Value on the wire did not decode to a known state.
    #[default]
    Unknown,
}

impl ObjectState {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Init => 1,
            Self::Armed => 2,
            Self::Disarmed => 3,
            Self::Running => 4,
            Self::PostRun => 5,
            Self::RemoteControlled => 6,
            Self::Aborting => 7,
            Self::Unknown => u8::MAX,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            0 => Self::Off,
            1 => Self::Init,
            2 => Self::Armed,
            3 => Self::Disarmed,
            4 => Self::Running,
            5 => Self::PostRun,
            6 => Self::RemoteControlled,
            7 => Self::Aborting,
            _ => Self::Unknown,
        }
    }
}

/// Whether a test object reports itself ready to be armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmReadiness {
    /// Not ready to arm.
    NotReady,
    /// Ready to arm.
    Ready,
    /// Readiness not reported.
    #[default]
    Unavailable,
}

impl ArmReadiness {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            Self::NotReady => 0,
            Self::Ready => 1,
            Self::Unavailable => 2,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            0 => Self::NotReady,
            1 => Self::Ready,
            _ => Self::Unavailable,
        }
    }
}

/// Decomposed object error bitfield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectErrors {
    /// The object requests scenario abort.
    pub abort_request: bool,
    /// The object has left its geofence.
    pub outside_geofence: bool,
    /// Positioning accuracy is below the configured requirement.
    pub bad_positioning_accuracy: bool,
    /// Engine fault.
    pub engine_fault: bool,
    /// Battery fault.
    pub battery_fault: bool,
    /// A synchronisation point was passed without synchronising.
    pub sync_point_ended: bool,
    /// Vendor-specific error.
    pub vendor_specific: bool,
    /// Unclassified error.
    pub other: bool,
}

const ERROR_BIT_ABORT_REQUEST: u8 = 0x80;
const ERROR_BIT_OUTSIDE_GEOFENCE: u8 = 0x40;
const ERROR_BIT_BAD_POSITIONING_ACCURACY: u8 = 0x20;
const ERROR_BIT_ENGINE_FAULT: u8 = 0x10;
const ERROR_BIT_BATTERY_FAULT: u8 = 0x08;
const ERROR_BIT_OTHER: u8 = 0x04;
const ERROR_BIT_SYNC_POINT_ENDED: u8 = 0x02;
const ERROR_BIT_VENDOR_SPECIFIC: u8 = 0x01;

impl ObjectErrors {
    pub(crate) fn to_wire(self) -> u8 {
        let mut bits = 0;
        if self.abort_request {
            bits |= ERROR_BIT_ABORT_REQUEST;
        }
        if self.outside_geofence {
            bits |= ERROR_BIT_OUTSIDE_GEOFENCE;
        }
        if self.bad_positioning_accuracy {
            bits |= ERROR_BIT_BAD_POSITIONING_ACCURACY;
        }
        if self.engine_fault {
            bits |= ERROR_BIT_ENGINE_FAULT;
        }
        if self.battery_fault {
            bits |= ERROR_BIT_BATTERY_FAULT;
        }
        if self.sync_point_ended {
            bits |= ERROR_BIT_SYNC_POINT_ENDED;
        }
        if self.vendor_specific {
            bits |= ERROR_BIT_VENDOR_SPECIFIC;
        }
        if self.other {
            bits |= ERROR_BIT_OTHER;
        }
        bits
    }

    pub(crate) fn from_wire(bits: u8) -> Self {
        Self {
            abort_request: bits & ERROR_BIT_ABORT_REQUEST != 0,
            outside_geofence: bits & ERROR_BIT_OUTSIDE_GEOFENCE != 0,
            bad_positioning_accuracy: bits & ERROR_BIT_BAD_POSITIONING_ACCURACY != 0,
            engine_fault: bits & ERROR_BIT_ENGINE_FAULT != 0,
            battery_fault: bits & ERROR_BIT_BATTERY_FAULT != 0,
            sync_point_ended: bits & ERROR_BIT_SYNC_POINT_ENDED != 0,
            vendor_specific: bits & ERROR_BIT_VENDOR_SPECIFIC != 0,
            other: bits & ERROR_BIT_OTHER != 0,
        }
    }
}

/// Object monitor report (MONR payload).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMonitor {
    /// Sample timestamp, absent when the object reported none.
    pub timestamp: Option<SystemTime>,
    /// Position and heading.
    pub position: CartesianPosition,
    /// Speed.
    pub speed: Speed,
    /// Acceleration.
    pub acceleration: Acceleration,
    /// Direction of travel.
    pub drive_direction: DriveDirection,
    /// Operational state.
    pub state: ObjectState,
    /// Arm readiness.
    pub ready_to_arm: ArmReadiness,
    /// Decomposed error bits.
    pub error: ObjectErrors,
    /// Vendor-defined error code.
    pub error_code: u16,
}

/// Control-centre operating status carried in the heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlCenterStatus {
    /// Control centre initialising.
    Init,
    /// Ready to start a scenario.
    Ready,
    /// Scenario aborted.
    Abort,
    /// Scenario running.
    Running,
    /// Test completed.
    TestDone,
    /// Normal stop requested.
    NormalStop,
    /// Value on the wire did not decode to a known status.
    Unknown(u8),
}

impl ControlCenterStatus {
    pub(crate) fn to_wire(self) -> Option<u8> {
        match self {
            Self::Init => Some(0),
            Self::Ready => Some(1),
            Self::Abort => Some(2),
            Self::Running => Some(3),
            Self::TestDone => Some(4),
            Self::NormalStop => Some(5),
            Self::Unknown(_) => None,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            0 => Self::Init,
            1 => Self::Ready,
            2 => Self::Abort,
            3 => Self::Running,
            4 => Self::TestDone,
            5 => Self::NormalStop,
            other => Self::Unknown(other),
        }
    }
}

/// Decoded heartbeat (HEAB payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeabMessage {
    /// Transmitter ID from the frame header.
    pub transmitter_id: u32,
    /// Heartbeat timestamp, absent when the sender reported none.
    pub timestamp: Option<SystemTime>,
    /// Control-centre status.
    pub status: ControlCenterStatus,
}

/// State change requested of an object (OSTM payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectCommand {
    /// Arm the object.
    Arm,
    /// Disarm the object.
    Disarm,
    /// Hand the object to remote control.
    RemoteControl,
    /// Value on the wire did not decode to a known command.
    Unknown(u8),
}

impl ObjectCommand {
    pub(crate) fn to_wire(self) -> Option<u8> {
        match self {
            Self::Arm => Some(2),
            Self::Disarm => Some(3),
            Self::RemoteControl => Some(6),
            Self::Unknown(_) => None,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            2 => Self::Arm,
            3 => Self::Disarm,
            6 => Self::RemoteControl,
            other => Self::Unknown(other),
        }
    }
}

/// Scenario start message (STRT payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartMessage {
    /// Commanded start time; absent means "start undetermined".
    pub start_time: Option<SystemTime>,
}

/// Coordinate system of the test origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// Track-local coordinate system.
    Local,
    /// UTM projection.
    Utm,
    /// ETRS89.
    Etrs89,
    /// WGS84.
    Wgs84,
    /// Not reported.
    #[default]
    Unavailable,
}

impl CoordinateSystem {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            Self::Local => 0,
            Self::Utm => 1,
            Self::Etrs89 => 2,
            Self::Wgs84 => 3,
            Self::Unavailable => u8::MAX,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            0 => Self::Local,
            1 => Self::Utm,
            2 => Self::Etrs89,
            3 => Self::Wgs84,
            _ => Self::Unavailable,
        }
    }
}

/// How the scenario is being conducted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestMode {
    /// Fully preplanned trajectories.
    Preplanned,
    /// Trajectories planned online.
    OnlinePlanned,
    /// Scenario-controlled.
    Scenario,
    /// Not reported.
    #[default]
    Unavailable,
}

impl TestMode {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            Self::Preplanned => 0,
            Self::OnlinePlanned => 1,
            Self::Scenario => 2,
            Self::Unavailable => u8::MAX,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            0 => Self::Preplanned,
            1 => Self::OnlinePlanned,
            2 => Self::Scenario,
            _ => Self::Unavailable,
        }
    }
}

/// Device identifiers assigned through OSEM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectIds {
    /// Transmitter ID the object shall adopt.
    pub device_id: u32,
    /// Sub-device transmitter ID.
    pub sub_device_id: u32,
    /// System control centre ID. Filled from the codec configuration on
    /// encode.
    pub control_centre_id: u32,
}

/// Allowed deviations from the planned trajectory. `None` means the
/// deviation is not limited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviationLimits {
    /// Maximum deviation from the planned trajectory point, in metres.
    pub position_m: Option<f64>,
    /// Maximum lateral deviation, in metres.
    pub lateral_m: Option<f64>,
    /// Maximum yaw deviation, in radians.
    pub yaw_rad: Option<f64>,
}

/// Requested report rates in hertz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRates {
    /// Monitor report rate.
    pub monr_hz: u8,
    /// Extended monitor report rate.
    pub monr2_hz: u8,
    /// Heartbeat rate.
    pub heab_hz: u8,
}

/// Network time server the object shall synchronise against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeServer {
    /// Server address.
    pub ip: Ipv4Addr,
    /// Server port.
    pub port: u16,
}

/// Object settings (OSEM payload).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSettings {
    /// Assigned identifiers.
    pub ids: ObjectIds,
    /// Geodetic origin of the track coordinate system.
    pub origin: GeodeticPosition,
    /// Rotation of the track coordinate system, in radians. `None` when
    /// unavailable.
    pub origin_rotation_rad: Option<f64>,
    /// Coordinate system of the origin.
    pub coordinate_system: CoordinateSystem,
    /// Control-centre time at encoding; absent when unavailable.
    pub timestamp: Option<SystemTime>,
    /// Allowed trajectory deviations.
    pub max_deviation: DeviationLimits,
    /// Minimum required positioning accuracy in metres; `None` means not
    /// required.
    pub min_positioning_accuracy_m: Option<f64>,
    /// Time without heartbeat after which the object shall abort.
    pub heab_timeout: Duration,
    /// Scenario conduct mode.
    pub test_mode: TestMode,
    /// Requested report rates.
    pub rates: MessageRates,
    /// Maximum message length the object may transmit.
    pub max_message_length: u32,
    /// Time server, when one is assigned.
    pub time_server: Option<TimeServer>,
}

/// Trajectory classification carried in the TRAJ header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrajectoryInfo {
    /// Coordinates are relative to the object's current position.
    RelativeToObject,
    /// Coordinates are relative to the test origin.
    RelativeToOrigin,
    /// The named trajectory shall be deleted.
    Deletion,
    /// Value on the wire did not decode to a known classification.
    Unknown(u8),
}

impl TrajectoryInfo {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            Self::RelativeToObject => 1,
            Self::RelativeToOrigin => 2,
            Self::Deletion => 3,
            Self::Unknown(raw) => raw,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            1 => Self::RelativeToObject,
            2 => Self::RelativeToOrigin,
            3 => Self::Deletion,
            other => Self::Unknown(other),
        }
    }
}

/// TRAJ message header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryHeader {
    /// Trajectory identifier.
    pub trajectory_id: u16,
    /// Trajectory name, at most 63 bytes.
    pub name: String,
    /// Trajectory classification.
    pub info: TrajectoryInfo,
    /// Number of points that follow the header.
    pub point_count: u32,
}

/// One TRAJ trajectory point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Time offset from scenario start.
    pub time_from_start: Duration,
    /// Position and heading at the point. Position is required.
    pub position: CartesianPosition,
    /// Speed at the point. The longitudinal component is required.
    pub speed: Speed,
    /// Acceleration at the point.
    pub acceleration: Acceleration,
    /// Trajectory curvature in 1/m.
    pub curvature: f32,
}

/// Peer object state injected by the control centre (PODI payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerObjectInjection {
    /// Transmitter ID of the peer object being described.
    pub foreign_transmitter_id: u32,
    /// Sample timestamp.
    pub timestamp: SystemTime,
    /// Peer state.
    pub state: ObjectState,
    /// Peer position and heading.
    pub position: CartesianPosition,
    /// Peer pitch in radians, when reported.
    pub pitch_rad: Option<f64>,
    /// Peer roll in radians, when reported.
    pub roll_rad: Option<f64>,
    /// Peer speed.
    pub speed: Speed,
}

/// Physical properties of a test object (OPRO payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperties {
    /// Object category tag.
    pub object_type: u8,
    /// Actor category tag.
    pub actor_type: u8,
    /// Operation mode tag.
    pub operation_mode: u8,
    /// Mass in kilograms.
    pub mass_kg: Option<f64>,
    /// Object extent along x, in metres.
    pub length_x_m: Option<f64>,
    /// Object extent along y, in metres.
    pub length_y_m: Option<f64>,
    /// Object extent along z, in metres.
    pub length_z_m: Option<f64>,
    /// Position reference displacement along x, in metres.
    pub displacement_x_m: Option<f64>,
    /// Position reference displacement along y, in metres.
    pub displacement_y_m: Option<f64>,
    /// Position reference displacement along z, in metres.
    pub displacement_z_m: Option<f64>,
}

/// Properties of a foreign object (FOPR payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignObjectProperties {
    /// Transmitter ID of the object being described.
    pub foreign_transmitter_id: u32,
    /// The object's properties.
    pub properties: ObjectProperties,
}

/// Speed setpoint of a remote-control manoeuvre, unit-tagged on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeedManoeuvre {
    /// Absolute speed in m/s.
    MetresPerSecond(f64),
    /// Throttle percentage in ±100.
    Percent(i16),
}

/// Steering setpoint of a remote-control manoeuvre, unit-tagged on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SteeringManoeuvre {
    /// Steering angle in radians, within ±π.
    Radians(f64),
    /// Steering percentage in ±100.
    Percent(i16),
}

/// Predefined manoeuvre command (RCMM payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManoeuvreCommand {
    /// No predefined manoeuvre.
    #[default]
    None,
    /// Return to the scenario start position.
    BackToStart,
    /// Value on the wire did not decode to a known command.
    Unknown(u8),
}

impl ManoeuvreCommand {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            Self::None => 0,
            Self::BackToStart => 3,
            Self::Unknown(raw) => raw,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            3 => Self::BackToStart,
            other => Self::Unknown(other),
        }
    }
}

/// Remote control manoeuvre (RCMM and DCMM payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteControlManoeuvre {
    /// Control status tag.
    pub status: u8,
    /// Speed setpoint; omitted from the frame when `None`.
    pub speed: Option<SpeedManoeuvre>,
    /// Steering setpoint; omitted from the frame when `None`.
    pub steering: Option<SteeringManoeuvre>,
    /// Predefined manoeuvre; omitted from the frame when `None`.
    pub command: ManoeuvreCommand,
}

/// Direct control action request (RDCA payload).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestControlAction {
    /// Object the action is intended for.
    pub executing_id: u32,
    /// Action timestamp.
    pub timestamp: SystemTime,
    /// Steering setpoint; omitted from the frame when `None`.
    pub steering: Option<SteeringManoeuvre>,
    /// Speed setpoint; omitted from the frame when `None`.
    pub speed: Option<SpeedManoeuvre>,
}

/// Trajectory synchronisation point configuration (SYPM payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPoint {
    /// Time along the trajectory at which objects synchronise.
    pub sync_point_time: Duration,
    /// Time along the trajectory after which no adaptation is allowed.
    pub freeze_time: Duration,
}

/// Estimated arrival at the synchronisation point (MTSP payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPointEstimate {
    /// Estimated time of arrival, absent when unknown.
    pub estimated_arrival: Option<SystemTime>,
}

/// Trigger configuration (TRCM payload). `None` fields are carried as
/// unavailable sentinels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfiguration {
    /// Trigger being configured.
    pub trigger_id: Option<u16>,
    /// Trigger type tag.
    pub trigger_type: Option<u16>,
    /// Trigger type parameters.
    pub parameters: [Option<u32>; 3],
}

/// Action configuration (ACCM payload). `None` fields are carried as
/// unavailable sentinels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfiguration {
    /// Action being configured.
    pub action_id: Option<u16>,
    /// Action type tag.
    pub action_type: Option<u16>,
    /// Action type parameters.
    pub parameters: [Option<u32>; 3],
}

/// Action execution request (EXAC payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteAction {
    /// Action to execute.
    pub action_id: Option<u16>,
    /// When to execute it; absent means immediately.
    pub execution_time: Option<SystemTime>,
}

/// Supervisor mode instruction (INSUP payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorInstruction {
    /// Requested supervisor mode.
    pub mode: u8,
}

/// General data request (GDRM payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GdrmMessage {
    /// Code of the data being requested.
    pub data_code: u16,
}

/// Direct control transmitter ID announcement (DCTI payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmitterIdList {
    /// Total number of announcements in the sequence.
    pub total_count: u16,
    /// Index of this announcement.
    pub counter: u16,
    /// Announced transmitter ID.
    pub transmitter_id: u32,
}

/// Response code carried in GREM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCode {
    /// Request handled successfully.
    Ok,
    /// Request failed.
    GeneralError,
    /// Value on the wire did not decode to a known code.
    Unknown(u8),
}

impl ResponseCode {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            Self::Ok => 1,
            Self::GeneralError => 2,
            Self::Unknown(raw) => raw,
        }
    }

    pub(crate) fn from_wire(raw: u8) -> Self {
        match raw {
            1 => Self::Ok,
            2 => Self::GeneralError,
            other => Self::Unknown(other),
        }
    }
}

/// Response content supplied when encoding a GREM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralResponse {
    /// Outcome of the request being responded to.
    pub response_code: ResponseCode,
    /// Optional response payload.
    pub payload: Bytes,
}

/// Decoded general response message (GREM payload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralResponseMessage {
    /// Transmitter ID from the header of the message being responded to.
    pub received_transmitter_id: u32,
    /// Message counter from the header of the message being responded to.
    pub received_message_counter: u8,
    /// Message ID from the header of the message being responded to.
    pub received_message_id: u16,
    /// Outcome of the request.
    pub response_code: ResponseCode,
    /// Response payload.
    pub payload: Bytes,
}
