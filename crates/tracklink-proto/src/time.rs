//! GPS time arithmetic.
//!
//! The wire carries timestamps as GPS week plus quarter-milliseconds of
//! week. The codec never reads a clock; callers supply `SystemTime` values
//! and these helpers convert. GPS time leads UTC by the leap-second offset.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{Datelike, Utc};

use crate::error::{CodecError, Result};

/// Milliseconds between the Unix epoch and the GPS epoch (1980-01-06).
const MS_TIME_DIFF_UTC_GPS: u64 = 315_964_800_000;
/// Leap-second offset between UTC and GPS, in milliseconds.
const MS_LEAP_SEC_DIFF_UTC_GPS: u64 = 18_000;
/// One week in milliseconds.
const WEEK_TIME_MS: u64 = 604_800_000;
/// One week in quarter-milliseconds.
const WEEK_TIME_QMS: u64 = 2_419_200_000;

/// Leap seconds between UTC and GPS, as carried in OSEM.
pub(crate) const LEAP_SECONDS: u8 = (MS_LEAP_SEC_DIFF_UTC_GPS / 1000) as u8;

/// Milliseconds since the GPS epoch, or `None` before it.
fn gps_ms(time: SystemTime) -> Option<u64> {
    let unix_ms = time.duration_since(UNIX_EPOCH).ok()?.as_millis() as u64;
    (unix_ms + MS_LEAP_SEC_DIFF_UTC_GPS).checked_sub(MS_TIME_DIFF_UTC_GPS)
}

/// GPS week of a timestamp, or `None` before the GPS epoch.
pub(crate) fn gps_week(time: SystemTime) -> Option<u16> {
    Some((gps_ms(time)? / WEEK_TIME_MS) as u16)
}

/// Quarter-milliseconds into the GPS week, or `None` before the GPS epoch.
pub(crate) fn gps_qms_of_week(time: SystemTime) -> Option<u32> {
    Some(((gps_ms(time)? * 4) % WEEK_TIME_QMS) as u32)
}

/// Quarter-milliseconds of week for a timestamp the caller requires to be
/// encodable; times before the GPS epoch are a domain violation.
pub(crate) fn required_qms_of_week(time: SystemTime) -> Result<u32> {
    gps_qms_of_week(time).ok_or(CodecError::ContentOutOfRange("timestamp before GPS epoch"))
}

/// Reassemble a timestamp from GPS week and quarter-milliseconds of week.
pub(crate) fn from_gps_time(week: u16, qms_of_week: u32) -> SystemTime {
    let gps_qms = u64::from(week) * WEEK_TIME_QMS + u64::from(qms_of_week);
    let utc_qms = gps_qms + 4 * MS_TIME_DIFF_UTC_GPS - 4 * MS_LEAP_SEC_DIFF_UTC_GPS;
    UNIX_EPOCH + Duration::from_micros(utc_qms * 250)
}

/// Reassemble a timestamp from a received quarter-millisecond-of-week
/// value, inferring the GPS week from the caller's current time.
pub(crate) fn from_qms_with_inferred_week(
    current_time: SystemTime,
    qms_of_week: u32,
) -> Option<SystemTime> {
    Some(from_gps_time(gps_week(current_time)?, qms_of_week))
}

/// Calendar date as the packed decimal `yyyymmdd` the wire carries.
pub(crate) fn date_yyyymmdd(time: SystemTime) -> u32 {
    let utc: chrono::DateTime<Utc> = time.into();
    utc.year() as u32 * 10_000 + utc.month() * 100 + utc.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Friday, April 29, 2022 2:22:22 UTC
    fn reference_time() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_651_198_942)
    }

    #[test]
    fn reference_gps_week() {
        assert_eq!(gps_week(reference_time()), Some(2207));
    }

    #[test]
    fn reference_qms_of_week() {
        assert_eq!(gps_qms_of_week(reference_time()), Some(1_762_240_000));
    }

    #[test]
    fn reference_date() {
        assert_eq!(date_yyyymmdd(reference_time()), 20_220_429);
    }

    #[test]
    fn gps_round_trip() {
        let t = reference_time();
        let week = gps_week(t).unwrap();
        let qms = gps_qms_of_week(t).unwrap();
        assert_eq!(from_gps_time(week, qms), t);
    }

    #[test]
    fn pre_gps_epoch_has_no_week() {
        let t = UNIX_EPOCH + Duration::from_secs(86_400);
        assert_eq!(gps_week(t), None);
        assert!(required_qms_of_week(t).is_err());
    }

    #[test]
    fn inferred_week_reconstruction() {
        let t = reference_time();
        let qms = gps_qms_of_week(t).unwrap();
        assert_eq!(from_qms_with_inferred_week(t, qms), Some(t));
    }
}
