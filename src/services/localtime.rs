//! Timezone projector.
//!
//! The bot records every epoch timestamp in UTC; dashboard views want them
//! at the deployment's fixed offset. The offset string is parsed exactly
//! once, at construction, so a bad setting fails at startup instead of
//! somewhere inside a rebuild.

use crate::constants::min_date;
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// A process-lifetime clock at the configured fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    offset: FixedOffset,
}

impl LocalClock {
    /// Parse a signed offset string like "+02:00", "-05:30" or "00:00".
    pub fn parse(offset: &str) -> Result<Self> {
        let trimmed = offset.trim();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let mut parts = rest.splitn(2, ':');
        let hours: i32 = parts
            .next()
            .and_then(|h| h.parse().ok())
            .ok_or_else(|| bad_offset(trimmed))?;
        let minutes: i32 = match parts.next() {
            Some(m) => m.parse().map_err(|_| bad_offset(trimmed))?,
            None => 0,
        };
        if hours > 23 || minutes > 59 || hours < 0 || minutes < 0 {
            return Err(bad_offset(trimmed));
        }

        let mut secs = hours * 3600 + minutes * 60;
        if negative {
            secs = -secs;
        }
        let offset = FixedOffset::east_opt(secs).ok_or_else(|| bad_offset(trimmed))?;

        Ok(Self { offset })
    }

    /// Re-express a UTC epoch timestamp at the configured offset. Epoch 0
    /// means "never happened" upstream and must not go through projection;
    /// it maps straight to the sentinel minimum date.
    pub fn project(&self, epoch_secs: i64) -> NaiveDateTime {
        if epoch_secs == 0 {
            return min_date();
        }

        match DateTime::<Utc>::from_timestamp(epoch_secs, 0) {
            Some(utc) => utc.with_timezone(&self.offset).naive_local(),
            None => min_date(),
        }
    }

    /// Current wall-clock time at the configured offset.
    pub fn now_local(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

fn bad_offset(offset: &str) -> Error {
    Error::ConfigInvalid(format!("unparsable timezone offset: '{}'", offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_signed_offsets() {
        assert!(LocalClock::parse("+02:00").is_ok());
        assert!(LocalClock::parse("-05:30").is_ok());
        assert!(LocalClock::parse("00:00").is_ok());
        assert!(LocalClock::parse("banana").is_err());
        assert!(LocalClock::parse("+25:00").is_err());
    }

    #[test]
    fn test_projection_applies_offset() {
        // 2024-01-01T00:00:00Z at +02:00 is 02:00 local the same day
        let clock = LocalClock::parse("+02:00").unwrap();
        let epoch = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();

        let local = clock.project(epoch);
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(local.hour(), 2);
        assert_eq!(local.minute(), 0);
    }

    #[test]
    fn test_negative_offset_crosses_midnight() {
        let clock = LocalClock::parse("-05:30").unwrap();
        let epoch = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();

        let local = clock.project(epoch);
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(local.hour(), 19);
        assert_eq!(local.minute(), 30);
    }

    #[test]
    fn test_epoch_zero_is_sentinel_not_1970() {
        let clock = LocalClock::parse("+02:00").unwrap();
        assert_eq!(clock.project(0), min_date());
    }
}
