//! Unit scaling, unavailable sentinels and the heading frame remap.
//!
//! Host values are SI doubles with validity flags; the wire carries scaled
//! integers with distinguished "unavailable" sentinels. Conversion toward
//! the wire truncates toward zero after clamping into the wire type's
//! range; conversion from the wire maps the sentinel to `(0, invalid)`.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::{CodecError, Result};

pub(crate) const LATITUDE_UNAVAILABLE: i64 = 900_000_000_001;
pub(crate) const LONGITUDE_UNAVAILABLE: i64 = 1_800_000_000_001;
pub(crate) const LATITUDE_ONE_DEGREE: f64 = 1e10;
pub(crate) const ALTITUDE_UNAVAILABLE: i32 = 800_001;
pub(crate) const ALTITUDE_ONE_METRE: f64 = 100.0;
pub(crate) const DATE_UNAVAILABLE: u32 = 0;
pub(crate) const GPS_WEEK_UNAVAILABLE: u16 = 10_001;
pub(crate) const GPS_QMS_OF_WEEK_UNAVAILABLE: u32 = 2_419_200_000;
pub(crate) const DEVIATION_UNAVAILABLE: u16 = u16::MAX;
pub(crate) const DEVIATION_ONE_METRE: f64 = 1000.0;
pub(crate) const MIN_POS_ACCURACY_NOT_REQUIRED: u16 = 0;
pub(crate) const MIN_POS_ACCURACY_ONE_METRE: f64 = 1000.0;
pub(crate) const POSITION_ONE_METRE: f64 = 1000.0;
pub(crate) const LENGTH_UNAVAILABLE: u32 = u32::MAX;
pub(crate) const LENGTH_ONE_METRE: f64 = 1000.0;
pub(crate) const MASS_UNAVAILABLE: u32 = u32::MAX;
pub(crate) const MASS_ONE_KILOGRAM: f64 = 1000.0;
pub(crate) const DISPLACEMENT_UNAVAILABLE: i16 = i16::MIN;
pub(crate) const ANGLE_UNAVAILABLE: u16 = 36_001;
pub(crate) const ANGLE_ONE_DEGREE: f64 = 100.0;
pub(crate) const SPEED_UNAVAILABLE: i16 = i16::MIN;
pub(crate) const SPEED_ONE_METRE_PER_SECOND: f64 = 100.0;
pub(crate) const ACCELERATION_UNAVAILABLE: i16 = 32_001;
pub(crate) const ACCELERATION_ONE_METRE_PER_SECOND_SQUARED: f64 = 1000.0;
pub(crate) const RELATIVE_TIME_ONE_SECOND: f64 = 1000.0;
pub(crate) const STEERING_ANGLE_UNAVAILABLE: i16 = 18_001;
pub(crate) const STEERING_ANGLE_MAX_CDEG: i16 = 18_000;
pub(crate) const PERCENTAGE_MAX: i16 = 100;
pub(crate) const HEAB_TIMEOUT_ONE_SECOND: f64 = 100.0;
pub(crate) const TRIGGER_ID_UNAVAILABLE: u16 = u16::MAX;
pub(crate) const TYPE_PARAMETER_UNAVAILABLE: u32 = u32::MAX;

fn normalize_angle(rad: f64) -> f64 {
    let r = rad % TAU;
    if r < 0.0 { r + TAU } else { r }
}

/// Map a host heading (counter-clockwise from the x axis) to the protocol
/// heading (clockwise from north). Result lies in `[0, 2π)`.
pub fn iso_heading_from_host(host_heading_rad: f64) -> f64 {
    normalize_angle(-host_heading_rad + FRAC_PI_2)
}

/// Map a protocol heading (clockwise from north) to the host convention
/// (counter-clockwise from the x axis). Result lies in `[0, 2π)`.
///
/// The mapping is its own inverse: applying it twice is the identity on
/// `[0, 2π)`.
pub fn host_heading_from_iso(iso_heading_rad: f64) -> f64 {
    normalize_angle(-iso_heading_rad + FRAC_PI_2)
}

/// Heading with frame remap, in centidegrees on the wire.
pub(crate) fn heading_to_wire(heading_rad: f64, valid: bool) -> u16 {
    if !valid {
        return ANGLE_UNAVAILABLE;
    }
    (iso_heading_from_host(heading_rad).to_degrees() * ANGLE_ONE_DEGREE) as u16
}

pub(crate) fn heading_from_wire(raw: u16) -> (f64, bool) {
    if raw == ANGLE_UNAVAILABLE {
        (0.0, false)
    } else {
        (host_heading_from_iso((f64::from(raw) / ANGLE_ONE_DEGREE).to_radians()), true)
    }
}

/// Plain angle (rotation, pitch, roll) in centidegrees, no frame remap.
/// Normalised into `[0, 2π)` before scaling.
pub(crate) fn angle_to_wire(rad: f64, valid: bool) -> u16 {
    if !valid {
        return ANGLE_UNAVAILABLE;
    }
    (normalize_angle(rad).to_degrees() * ANGLE_ONE_DEGREE) as u16
}

pub(crate) fn angle_from_wire(raw: u16) -> (f64, bool) {
    if raw == ANGLE_UNAVAILABLE {
        (0.0, false)
    } else {
        ((f64::from(raw) / ANGLE_ONE_DEGREE).to_radians(), true)
    }
}

pub(crate) fn speed_to_wire(speed_m_s: f64, valid: bool) -> i16 {
    if valid { (speed_m_s * SPEED_ONE_METRE_PER_SECOND) as i16 } else { SPEED_UNAVAILABLE }
}

pub(crate) fn speed_from_wire(raw: i16) -> (f64, bool) {
    if raw == SPEED_UNAVAILABLE {
        (0.0, false)
    } else {
        (f64::from(raw) / SPEED_ONE_METRE_PER_SECOND, true)
    }
}

pub(crate) fn acceleration_to_wire(acc_m_s2: f64, valid: bool) -> i16 {
    if valid {
        (acc_m_s2 * ACCELERATION_ONE_METRE_PER_SECOND_SQUARED) as i16
    } else {
        ACCELERATION_UNAVAILABLE
    }
}

pub(crate) fn acceleration_from_wire(raw: i16) -> (f64, bool) {
    if raw == ACCELERATION_UNAVAILABLE {
        (0.0, false)
    } else {
        (f64::from(raw) / ACCELERATION_ONE_METRE_PER_SECOND_SQUARED, true)
    }
}

/// Cartesian position component in millimetres. Position is a required
/// field wherever it appears; there is no sentinel.
pub(crate) fn position_to_wire(metres: f64) -> i32 {
    (metres * POSITION_ONE_METRE) as i32
}

pub(crate) fn position_from_wire(raw: i32) -> f64 {
    f64::from(raw) / POSITION_ONE_METRE
}

pub(crate) fn latitude_to_wire(degrees: f64, valid: bool) -> i64 {
    if valid { (degrees * LATITUDE_ONE_DEGREE) as i64 } else { LATITUDE_UNAVAILABLE }
}

pub(crate) fn latitude_from_wire(raw: i64) -> (f64, bool) {
    if raw == LATITUDE_UNAVAILABLE { (0.0, false) } else { (raw as f64 / LATITUDE_ONE_DEGREE, true) }
}

pub(crate) fn longitude_to_wire(degrees: f64, valid: bool) -> i64 {
    if valid { (degrees * LATITUDE_ONE_DEGREE) as i64 } else { LONGITUDE_UNAVAILABLE }
}

pub(crate) fn longitude_from_wire(raw: i64) -> (f64, bool) {
    if raw == LONGITUDE_UNAVAILABLE {
        (0.0, false)
    } else {
        (raw as f64 / LATITUDE_ONE_DEGREE, true)
    }
}

pub(crate) fn altitude_to_wire(metres: f64, valid: bool) -> i32 {
    if valid { (metres * ALTITUDE_ONE_METRE) as i32 } else { ALTITUDE_UNAVAILABLE }
}

pub(crate) fn altitude_from_wire(raw: i32) -> (f64, bool) {
    if raw == ALTITUDE_UNAVAILABLE { (0.0, false) } else { (f64::from(raw) / ALTITUDE_ONE_METRE, true) }
}

/// Deviation limits in millimetres, `None` encoded as the sentinel.
pub(crate) fn deviation_to_wire(metres: Option<f64>) -> u16 {
    match metres {
        Some(m) => (m * DEVIATION_ONE_METRE) as u16,
        None => DEVIATION_UNAVAILABLE,
    }
}

pub(crate) fn deviation_from_wire(raw: u16) -> Option<f64> {
    (raw != DEVIATION_UNAVAILABLE).then(|| f64::from(raw) / DEVIATION_ONE_METRE)
}

/// Steering angle in centidegrees, valid range ±π rad (±18000 cdeg).
pub(crate) fn steering_angle_to_wire(rad: f64) -> Result<i16> {
    if !(-PI..=PI).contains(&rad) {
        return Err(CodecError::ContentOutOfRange("steering angle"));
    }
    Ok((rad.to_degrees() * ANGLE_ONE_DEGREE) as i16)
}

pub(crate) fn steering_angle_from_wire(raw: i16) -> Result<Option<f64>> {
    if raw == STEERING_ANGLE_UNAVAILABLE {
        return Ok(None);
    }
    if raw > STEERING_ANGLE_MAX_CDEG || raw < -STEERING_ANGLE_MAX_CDEG {
        return Err(CodecError::ContentOutOfRange("steering angle"));
    }
    Ok(Some((f64::from(raw) / ANGLE_ONE_DEGREE).to_radians()))
}

/// Speed and steering percentages are carried unscaled in ±100.
pub(crate) fn percent_to_wire(pct: i16) -> Result<i16> {
    if pct > PERCENTAGE_MAX || pct < -PERCENTAGE_MAX {
        return Err(CodecError::ContentOutOfRange("percentage"));
    }
    Ok(pct)
}

pub(crate) fn percent_from_wire(raw: i16) -> Result<i16> {
    if raw > PERCENTAGE_MAX || raw < -PERCENTAGE_MAX {
        return Err(CodecError::ContentOutOfRange("percentage"));
    }
    Ok(raw)
}

pub(crate) fn mass_to_wire(kg: Option<f64>) -> u32 {
    match kg {
        Some(kg) => (kg * MASS_ONE_KILOGRAM) as u32,
        None => MASS_UNAVAILABLE,
    }
}

pub(crate) fn mass_from_wire(raw: u32) -> Option<f64> {
    (raw != MASS_UNAVAILABLE).then(|| f64::from(raw) / MASS_ONE_KILOGRAM)
}

pub(crate) fn length_to_wire(metres: Option<f64>) -> u32 {
    match metres {
        Some(m) => (m * LENGTH_ONE_METRE) as u32,
        None => LENGTH_UNAVAILABLE,
    }
}

pub(crate) fn length_from_wire(raw: u32) -> Option<f64> {
    (raw != LENGTH_UNAVAILABLE).then(|| f64::from(raw) / LENGTH_ONE_METRE)
}

pub(crate) fn displacement_to_wire(metres: Option<f64>) -> i16 {
    match metres {
        Some(m) => (m * LENGTH_ONE_METRE) as i16,
        None => DISPLACEMENT_UNAVAILABLE,
    }
}

pub(crate) fn displacement_from_wire(raw: i16) -> Option<f64> {
    (raw != DISPLACEMENT_UNAVAILABLE).then(|| f64::from(raw) / LENGTH_ONE_METRE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn heading_remap_is_self_inverse() {
        for i in 0..=100 {
            let theta = TAU * f64::from(i) / 100.0;
            let there_and_back = host_heading_from_iso(iso_heading_from_host(theta));
            assert!(
                close(there_and_back % TAU, theta % TAU, 1e-9)
                    || close((there_and_back - theta).abs(), TAU, 1e-9),
                "remap not self-inverse at {theta}"
            );
        }
    }

    #[test]
    fn heading_remap_quarter_turn() {
        // Host east (0 rad) is protocol 90° clockwise from north
        assert!(close(iso_heading_from_host(0.0), FRAC_PI_2, 1e-12));
        // Host north (π/2) is protocol north (0)
        assert!(close(iso_heading_from_host(FRAC_PI_2), 0.0, 1e-12));
    }

    #[test]
    fn heading_sentinel_round_trips() {
        assert_eq!(heading_to_wire(1.25, false), ANGLE_UNAVAILABLE);
        assert_eq!(heading_from_wire(ANGLE_UNAVAILABLE), (0.0, false));
    }

    #[test]
    fn speed_scaling_truncates_toward_zero() {
        assert_eq!(speed_to_wire(1.239, true), 123);
        assert_eq!(speed_to_wire(-1.239, true), -123);
        assert_eq!(speed_to_wire(0.0, false), SPEED_UNAVAILABLE);
    }

    #[test]
    fn acceleration_sentinel_round_trips() {
        assert_eq!(acceleration_to_wire(0.0, false), ACCELERATION_UNAVAILABLE);
        assert_eq!(acceleration_from_wire(ACCELERATION_UNAVAILABLE), (0.0, false));
        let (v, valid) = acceleration_from_wire(acceleration_to_wire(-3.5, true));
        assert!(valid && close(v, -3.5, 1e-9));
    }

    #[test]
    fn steering_angle_limits() {
        assert_eq!(steering_angle_to_wire(PI).unwrap(), 18_000);
        assert_eq!(steering_angle_to_wire(-PI).unwrap(), -18_000);
        assert!(steering_angle_to_wire(PI + 1e-3).is_err());
        assert!(steering_angle_to_wire(-PI - 1e-3).is_err());
        assert_eq!(steering_angle_from_wire(STEERING_ANGLE_UNAVAILABLE).unwrap(), None);
        assert!(steering_angle_from_wire(18_002).is_err());
    }

    #[test]
    fn percent_limits() {
        assert_eq!(percent_to_wire(100).unwrap(), 100);
        assert_eq!(percent_to_wire(-100).unwrap(), -100);
        assert!(percent_to_wire(101).is_err());
        assert!(percent_from_wire(-101).is_err());
    }

    #[test]
    fn latitude_scaling_matches_reference() {
        assert_eq!(latitude_to_wire(12.345_678_901_2, true), 123_456_789_012);
        assert_eq!(longitude_to_wire(23.456_789_012_3, true), 234_567_890_123);
        assert_eq!(altitude_to_wire(123.45, true), 12_345);
    }

    #[test]
    fn rotation_angle_matches_reference() {
        // 0.45678 rad = 2617 centidegrees, truncated
        assert_eq!(angle_to_wire(0.456_78, true), 2617);
        // 0.789 rad = 4520 centidegrees, truncated
        assert_eq!(angle_to_wire(0.789, true), 4520);
    }
}
