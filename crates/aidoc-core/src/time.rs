//! Wall-clock value types
//!
//! Effect handlers produce [`PhysicalTime`]; everything else formats it.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// A wall-clock reading in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhysicalTime {
    /// Milliseconds since the Unix epoch
    pub ts_ms: u64,
}

impl PhysicalTime {
    /// Wrap a millisecond timestamp
    pub fn from_millis(ts_ms: u64) -> Self {
        Self { ts_ms }
    }

    /// Timestamp rendered as a decimal string, used for record ids.
    pub fn id_string(&self) -> String {
        self.ts_ms.to_string()
    }

    /// Short locale date (`M/D/YYYY`) in the local timezone.
    pub fn locale_date_string(&self) -> String {
        match self.to_utc() {
            Some(utc) => utc.with_timezone(&Local).format("%-m/%-d/%Y").to_string(),
            None => String::new(),
        }
    }

    fn to_utc(self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.ts_ms).ok()?;
        DateTime::<Utc>::from_timestamp_millis(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_string_is_decimal_millis() {
        assert_eq!(PhysicalTime::from_millis(1_700_000_000_123).id_string(), "1700000000123");
    }

    #[test]
    fn locale_date_has_no_zero_padding() {
        // 2023-10-05T12:00:00Z: Oct 4, 5 or 6 depending on the local zone
        let date = PhysicalTime::from_millis(1_696_507_200_000).locale_date_string();
        let parts: Vec<&str> = date.split('/').collect();
        assert_eq!(parts.len(), 3, "{date}");
        assert_eq!(parts[0], "10");
        assert!(["4", "5", "6"].contains(&parts[1]), "{date}");
        assert_eq!(parts[2], "2023");
    }
}
