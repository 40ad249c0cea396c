//! Conversions between the XRP Ledger's 'Ripple Epoch' time and native
//! time data types.

use chrono::{DateTime, TimeZone, Utc};

use super::exceptions::XRPLTimeRangeException;

/// The "Ripple Epoch" of 2000-01-01T00:00:00 UTC.
pub const RIPPLE_EPOCH: i64 = 946684800;
/// The maximum time that can be expressed on the ledger.
pub const MAX_XRPL_TIME: i64 = i64::pow(2, 32);

fn ripple_check_max<T>(time: i64, ok: T) -> Result<T, XRPLTimeRangeException> {
    if !(0..=MAX_XRPL_TIME).contains(&time) {
        Err(XRPLTimeRangeException::InvalidTime { time })
    } else {
        Ok(ok)
    }
}

/// Convert from 'Ripple Epoch' time to a UTC datetime.
pub fn ripple_time_to_datetime(ripple_time: i64) -> Result<DateTime<Utc>, XRPLTimeRangeException> {
    ripple_check_max(
        ripple_time,
        Utc.timestamp_opt(ripple_time + RIPPLE_EPOCH, 0).unwrap(),
    )
}

/// Convert from a [`chrono::DateTime`] object to 'Ripple Epoch' time.
pub fn datetime_to_ripple_time(dt: DateTime<Utc>) -> Result<i64, XRPLTimeRangeException> {
    let ripple_time = dt.timestamp() - RIPPLE_EPOCH;
    ripple_check_max(ripple_time, ripple_time)
}

/// Convert from 'Ripple Epoch' time to a POSIX timestamp.
pub fn ripple_time_to_posix(ripple_time: i64) -> Result<i64, XRPLTimeRangeException> {
    ripple_check_max(ripple_time, ripple_time + RIPPLE_EPOCH)
}

/// Convert from a POSIX timestamp to 'Ripple Epoch' time.
pub fn posix_to_ripple_time(timestamp: i64) -> Result<i64, XRPLTimeRangeException> {
    let ripple_time = timestamp - RIPPLE_EPOCH;
    ripple_check_max(ripple_time, ripple_time)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ripple_time_round_trip() {
        assert_eq!(ripple_time_to_posix(946684801).unwrap(), 1893369601);
        assert_eq!(posix_to_ripple_time(1893369601).unwrap(), 946684801);
    }

    #[test]
    fn test_epoch_boundary() {
        assert_eq!(posix_to_ripple_time(RIPPLE_EPOCH).unwrap(), 0);
        assert!(posix_to_ripple_time(0).is_err());
    }
}
