//! OSEM: object settings.
//!
//! The body is a sequence of packed substructs, each wrapped in its own
//! value-ID/length/value field: identifiers, geodetic origin, date and
//! time, accuracy requirements, and optionally a time server and an ID
//! association block. The origin carries the two 48-bit geodetic fields.
//!
//! Unknown value IDs are skipped with a debug trace so that newer protocol
//! revisions can add substructs without breaking older receivers.

use std::net::Ipv4Addr;
use std::time::Duration;

use tracing::debug;

use crate::{
    cursor::{Reader, Writer},
    error::Result,
    field::{put_bytes, read_field, FIELD_OVERHEAD},
    header::{FOOTER_SIZE, HEADER_SIZE},
    message_id::MessageId,
    messages::{close_frame, open_frame, seal_frame, start_frame},
    time,
    types::{
        CoordinateSystem, DeviationLimits, GeodeticPosition, MessageRates, ObjectIds,
        ObjectSettings, TestMode, TimeServer,
    },
    units, Codec, FrameMeta,
};

const VALUE_ID_ID_STRUCT: u16 = 0x0020;
const VALUE_ID_ORIGIN_STRUCT: u16 = 0x0021;
const VALUE_ID_DATE_TIME_STRUCT: u16 = 0x0022;
const VALUE_ID_ACCURACY_REQUIREMENTS_STRUCT: u16 = 0x0023;
const VALUE_ID_TIME_SERVER_STRUCT: u16 = 0x0024;
const VALUE_ID_ID_ASSOCIATION_STRUCT: u16 = 0x0025;

const ID_STRUCT_LENGTH: usize = 12;
const ORIGIN_STRUCT_LENGTH: usize = 19;
const DATE_TIME_STRUCT_LENGTH: usize = 11;
const ACCURACY_STRUCT_LENGTH: usize = 18;
const TIME_SERVER_STRUCT_LENGTH: usize = 6;

/// Yaw deviation in centidegrees; unlimited is carried as the deviation
/// sentinel.
fn yaw_deviation_to_wire(rad: Option<f64>) -> u16 {
    match rad {
        Some(rad) => (rad.to_degrees() * units::ANGLE_ONE_DEGREE) as u16,
        None => units::DEVIATION_UNAVAILABLE,
    }
}

fn yaw_deviation_from_wire(raw: u16) -> Option<f64> {
    (raw != units::DEVIATION_UNAVAILABLE)
        .then(|| (f64::from(raw) / units::ANGLE_ONE_DEGREE).to_radians())
}

fn min_accuracy_to_wire(metres: Option<f64>) -> u16 {
    match metres {
        Some(m) => (m * units::MIN_POS_ACCURACY_ONE_METRE) as u16,
        None => units::MIN_POS_ACCURACY_NOT_REQUIRED,
    }
}

fn min_accuracy_from_wire(raw: u16) -> Option<f64> {
    (raw != units::MIN_POS_ACCURACY_NOT_REQUIRED)
        .then(|| f64::from(raw) / units::MIN_POS_ACCURACY_ONE_METRE)
}

fn heab_timeout_to_wire(timeout: Duration) -> u16 {
    (timeout.as_secs_f64() * units::HEAB_TIMEOUT_ONE_SECOND) as u16
}

fn heab_timeout_from_wire(raw: u16) -> Duration {
    Duration::from_millis(u64::from(raw) * 10)
}

fn time_server_in_use(server: &TimeServer) -> bool {
    u32::from(server.ip) != 0 || server.port != 0
}

impl Codec {
    /// Encode an OSEM frame from object settings.
    ///
    /// The system control centre ID is taken from the codec's configured
    /// transmitter ID. The time server substruct is omitted when no server
    /// is assigned, shortening the frame.
    pub fn encode_osem(
        &self,
        meta: &FrameMeta,
        settings: &ObjectSettings,
        buf: &mut [u8],
    ) -> Result<usize> {
        let time_server = settings.time_server.filter(time_server_in_use);

        let mut body = (FIELD_OVERHEAD + ID_STRUCT_LENGTH)
            + (FIELD_OVERHEAD + ORIGIN_STRUCT_LENGTH)
            + (FIELD_OVERHEAD + DATE_TIME_STRUCT_LENGTH)
            + (FIELD_OVERHEAD + ACCURACY_STRUCT_LENGTH);
        if time_server.is_some() {
            body += FIELD_OVERHEAD + TIME_SERVER_STRUCT_LENGTH;
        }
        let total = HEADER_SIZE + body + FOOTER_SIZE;

        let (date, week, qms) = match settings.timestamp {
            Some(t) => (
                time::date_yyyymmdd(t),
                time::gps_week(t).unwrap_or(units::GPS_WEEK_UNAVAILABLE),
                time::required_qms_of_week(t)?,
            ),
            None => (
                units::DATE_UNAVAILABLE,
                units::GPS_WEEK_UNAVAILABLE,
                units::GPS_QMS_OF_WEEK_UNAVAILABLE,
            ),
        };

        let mut w = start_frame(self, MessageId::Osem, meta, total, buf)?;

        let mut ids = [0u8; ID_STRUCT_LENGTH];
        {
            let mut sw = Writer::new(&mut ids);
            sw.write_u32(settings.ids.device_id)?;
            sw.write_u32(settings.ids.sub_device_id)?;
            sw.write_u32(self.transmitter_id())?;
        }
        put_bytes(&mut w, VALUE_ID_ID_STRUCT, &ids)?;

        let mut origin = [0u8; ORIGIN_STRUCT_LENGTH];
        {
            let o = &settings.origin;
            let mut sw = Writer::new(&mut origin);
            sw.write_i48(units::latitude_to_wire(o.latitude_deg, o.is_latitude_valid))?;
            sw.write_i48(units::longitude_to_wire(o.longitude_deg, o.is_longitude_valid))?;
            sw.write_i32(units::altitude_to_wire(o.altitude_m, o.is_altitude_valid))?;
            sw.write_u16(units::angle_to_wire(
                settings.origin_rotation_rad.unwrap_or_default(),
                settings.origin_rotation_rad.is_some(),
            ))?;
            sw.write_u8(settings.coordinate_system.to_wire())?;
        }
        put_bytes(&mut w, VALUE_ID_ORIGIN_STRUCT, &origin)?;

        let mut date_time = [0u8; DATE_TIME_STRUCT_LENGTH];
        {
            let mut sw = Writer::new(&mut date_time);
            sw.write_u32(date)?;
            sw.write_u16(week)?;
            sw.write_u32(qms)?;
            sw.write_u8(time::LEAP_SECONDS)?;
        }
        put_bytes(&mut w, VALUE_ID_DATE_TIME_STRUCT, &date_time)?;

        let mut accuracy = [0u8; ACCURACY_STRUCT_LENGTH];
        {
            let mut sw = Writer::new(&mut accuracy);
            sw.write_u16(units::deviation_to_wire(settings.max_deviation.position_m))?;
            sw.write_u16(units::deviation_to_wire(settings.max_deviation.lateral_m))?;
            sw.write_u16(yaw_deviation_to_wire(settings.max_deviation.yaw_rad))?;
            sw.write_u16(min_accuracy_to_wire(settings.min_positioning_accuracy_m))?;
            sw.write_u16(heab_timeout_to_wire(settings.heab_timeout))?;
            sw.write_u8(settings.test_mode.to_wire())?;
            sw.write_u8(settings.rates.monr_hz)?;
            sw.write_u8(settings.rates.monr2_hz)?;
            sw.write_u8(settings.rates.heab_hz)?;
            sw.write_u32(settings.max_message_length)?;
        }
        put_bytes(&mut w, VALUE_ID_ACCURACY_REQUIREMENTS_STRUCT, &accuracy)?;

        if let Some(server) = time_server {
            let mut ts = [0u8; TIME_SERVER_STRUCT_LENGTH];
            {
                let mut sw = Writer::new(&mut ts);
                sw.write_u32(u32::from(server.ip))?;
                sw.write_u16(server.port)?;
            }
            put_bytes(&mut w, VALUE_ID_TIME_SERVER_STRUCT, &ts)?;
        }

        let body_end = w.written();
        seal_frame(buf, body_end)
    }

    /// Decode an OSEM frame into object settings.
    pub fn decode_osem(&self, buf: &[u8]) -> Result<(ObjectSettings, usize)> {
        let (header, mut r) = open_frame(self, buf, MessageId::Osem, None)?;

        let mut settings = ObjectSettings::default();
        let mut origin_seen = false;
        let mut date_time_seen = false;
        let mut rotation_raw = units::ANGLE_UNAVAILABLE;
        let mut week = units::GPS_WEEK_UNAVAILABLE;
        let mut qms = units::GPS_QMS_OF_WEEK_UNAVAILABLE;

        while r.remaining() > 0 {
            let field = read_field(&mut r)?;
            let content = r.read_bytes(usize::from(field.content_length))?;
            let mut sr = Reader::new(content);
            match field.value_id {
                VALUE_ID_ID_STRUCT => {
                    field.expect_length(ID_STRUCT_LENGTH)?;
                    settings.ids = ObjectIds {
                        device_id: sr.read_u32()?,
                        sub_device_id: sr.read_u32()?,
                        control_centre_id: sr.read_u32()?,
                    };
                }
                VALUE_ID_ORIGIN_STRUCT => {
                    field.expect_length(ORIGIN_STRUCT_LENGTH)?;
                    origin_seen = true;
                    let (latitude_deg, lat_ok) = units::latitude_from_wire(sr.read_i48()?);
                    let (longitude_deg, lon_ok) = units::longitude_from_wire(sr.read_i48()?);
                    let (altitude_m, alt_ok) = units::altitude_from_wire(sr.read_i32()?);
                    settings.origin = GeodeticPosition {
                        latitude_deg,
                        longitude_deg,
                        altitude_m,
                        is_latitude_valid: lat_ok,
                        is_longitude_valid: lon_ok,
                        is_altitude_valid: alt_ok,
                    };
                    rotation_raw = sr.read_u16()?;
                    settings.coordinate_system = CoordinateSystem::from_wire(sr.read_u8()?);
                }
                VALUE_ID_DATE_TIME_STRUCT => {
                    field.expect_length(DATE_TIME_STRUCT_LENGTH)?;
                    date_time_seen = true;
                    let _date = sr.read_u32()?;
                    week = sr.read_u16()?;
                    qms = sr.read_u32()?;
                    let _leap_seconds = sr.read_u8()?;
                }
                VALUE_ID_ACCURACY_REQUIREMENTS_STRUCT => {
                    field.expect_length(ACCURACY_STRUCT_LENGTH)?;
                    settings.max_deviation = DeviationLimits {
                        position_m: units::deviation_from_wire(sr.read_u16()?),
                        lateral_m: units::deviation_from_wire(sr.read_u16()?),
                        yaw_rad: yaw_deviation_from_wire(sr.read_u16()?),
                    };
                    settings.min_positioning_accuracy_m = min_accuracy_from_wire(sr.read_u16()?);
                    settings.heab_timeout = heab_timeout_from_wire(sr.read_u16()?);
                    settings.test_mode = TestMode::from_wire(sr.read_u8()?);
                    settings.rates = MessageRates {
                        monr_hz: sr.read_u8()?,
                        monr2_hz: sr.read_u8()?,
                        heab_hz: sr.read_u8()?,
                    };
                    settings.max_message_length = sr.read_u32()?;
                }
                VALUE_ID_TIME_SERVER_STRUCT => {
                    field.expect_length(TIME_SERVER_STRUCT_LENGTH)?;
                    settings.time_server = Some(TimeServer {
                        ip: Ipv4Addr::from(sr.read_u32()?),
                        port: sr.read_u16()?,
                    });
                }
                VALUE_ID_ID_ASSOCIATION_STRUCT => {
                    // Content undefined in this protocol revision
                    if self.debug() {
                        debug!(length = field.content_length, "skipping OSEM ID association");
                    }
                }
                unknown => {
                    if self.debug() {
                        debug!(
                            value_id = format_args!("{unknown:#06x}"),
                            length = field.content_length,
                            "skipping unknown OSEM value ID"
                        );
                    }
                }
            }
        }

        if origin_seen && rotation_raw != units::ANGLE_UNAVAILABLE {
            settings.origin_rotation_rad =
                Some((f64::from(rotation_raw) / units::ANGLE_ONE_DEGREE).to_radians());
        }
        if date_time_seen
            && week != units::GPS_WEEK_UNAVAILABLE
            && qms != units::GPS_QMS_OF_WEEK_UNAVAILABLE
        {
            settings.timestamp = Some(time::from_gps_time(week, qms));
        }

        let consumed = close_frame(self, buf, &header)?;
        Ok((settings, consumed))
    }
}
