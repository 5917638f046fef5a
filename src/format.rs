// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Minute rounding and wall-clock rendering of computed timestamps.
//!
//! Rounding operates on the raw UTC millisecond value; rendering converts
//! through the configured [`Zone`] so named IANA zones get DST-correct local
//! times.  NaN timestamps (polar night / midnight sun left unresolved by the
//! high-latitude rule) render as [`INVALID_TIME`] — never an error.

use chrono::{DateTime, TimeZone};

use crate::settings::{Rounding, TimeFormat, Zone};

/// Placeholder rendered for astronomically undefined times.
pub const INVALID_TIME: &str = "-----";

const MINUTE_MS: f64 = 60_000.0;

/// Round a millisecond timestamp to a minute boundary per the configured
/// mode.  NaN propagates.
pub(crate) fn round_timestamp(timestamp_ms: f64, rounding: Rounding) -> f64 {
    match rounding {
        Rounding::Nearest => (timestamp_ms / MINUTE_MS).round() * MINUTE_MS,
        Rounding::Up => (timestamp_ms / MINUTE_MS).ceil() * MINUTE_MS,
        Rounding::Down => (timestamp_ms / MINUTE_MS).floor() * MINUTE_MS,
        Rounding::None => timestamp_ms,
    }
}

/// Render one timestamp in the requested format and zone.
pub(crate) fn format_timestamp(timestamp_ms: f64, format: TimeFormat, zone: Zone) -> String {
    if timestamp_ms.is_nan() {
        return INVALID_TIME.to_string();
    }

    match format {
        TimeFormat::Custom(render) => render(timestamp_ms),
        TimeFormat::UnixMillis => format!("{}", timestamp_ms.floor() as i64),
        TimeFormat::UnixSeconds => format!("{}", (timestamp_ms / 1000.0).floor() as i64),
        TimeFormat::H24 | TimeFormat::H12 | TimeFormat::H12NoSuffix => {
            let Some(utc) = DateTime::from_timestamp_millis(timestamp_ms as i64) else {
                return INVALID_TIME.to_string();
            };
            match zone {
                Zone::Named(tz) => render_wall_clock(utc.with_timezone(&tz), format),
                Zone::Fixed(offset) => render_wall_clock(utc.with_timezone(&offset), format),
            }
        }
    }
}

fn render_wall_clock<Z: TimeZone>(local: DateTime<Z>, format: TimeFormat) -> String
where
    Z::Offset: std::fmt::Display,
{
    let spec = match format {
        TimeFormat::H24 => "%H:%M",
        TimeFormat::H12 => "%-I:%M %p",
        _ => "%-I:%M",
    };
    local.format(spec).to_string()
}
