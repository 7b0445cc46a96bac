// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS timestamp type as recorded in bag files.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Seconds + nanoseconds since the Unix epoch, as serialized in bag records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    pub secs: u32,
    pub nsecs: u32,
}

impl Time {
    pub fn new(secs: u32, nsecs: u32) -> Self {
        Time { secs, nsecs }
    }

    /// Decode from the 8-byte wire layout: u32 secs then u32 nsecs, LE.
    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        let secs = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let nsecs = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Time { secs, nsecs }
    }

    /// Total nanoseconds since the epoch.
    pub fn as_nanos(&self) -> u64 {
        self.secs as u64 * 1_000_000_000 + self.nsecs as u64
    }

    /// Convert to a UTC datetime. Nanoseconds out of range fall back to the
    /// whole-second value.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.secs as i64, self.nsecs)
            .single()
            .unwrap_or_else(|| Utc.timestamp_opt(self.secs as i64, 0).single().unwrap_or_default())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nsecs)
    }
}
