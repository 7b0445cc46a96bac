// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use bagcodec::Time;

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Format a bag timestamp to a human-readable string.
pub fn format_timestamp(time: Time) -> String {
    time.to_datetime().format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string()
}

/// Render a span given in nanoseconds with a precision suited to its size.
pub fn format_duration(nanos: u64) -> String {
    let total_secs = nanos / 1_000_000_000;
    let millis = nanos % 1_000_000_000 / 1_000_000;
    match (total_secs / 3600, total_secs / 60 % 60, total_secs % 60) {
        (0, 0, 0) => format!("{millis}ms"),
        (0, 0, s) => format!("{s}.{millis:03}s"),
        (0, m, s) => format!("{m}m {s:02}s"),
        (h, m, _) => format!("{h}h {m:02}m"),
    }
}
