// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Effective settings and the layered builder that produces them.
//!
//! A [`Settings`] value is the fully resolved configuration for one query.
//! It is built by [`SettingsBuilder`] through field-by-field layering:
//!
//! ```text
//! defaults → method preset → explicit overrides → location/format calls
//! ```
//!
//! Later layers override earlier ones; unspecified fields are inherited.
//! All configuration errors surface at [`SettingsBuilder::build`] — the
//! computation itself cannot fail on valid settings.

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use qtty::Degrees;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::format;
use crate::method::{Method, MethodParams};
use crate::solver::Computation;
use crate::times::TimeName;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Parameter enums
// ═══════════════════════════════════════════════════════════════════════════

/// Maghrib/Isha parameter: either a twilight depression angle or a fixed
/// number of minutes after the anchor time (Sunset for Maghrib, Maghrib for
/// Isha).
///
/// The tagged representation replaces the reference engine's `"90 min"`
/// string sniffing; [`FromStr`] still accepts both spellings for callers
/// that feed configuration text through.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DuskOffset {
    /// Sun depression angle below the horizon, in degrees.
    Angle(Degrees),
    /// Minutes added to the anchor time.
    Minutes(f64),
}

impl DuskOffset {
    /// The angle used while the iterative solver runs.
    ///
    /// A minutes-based value has no twilight angle of its own; the raw
    /// number stands in as a (small) degree value during iteration and for
    /// the `AngleBased` night portion, exactly as the reference engine does.
    /// The minutes semantics are applied afterwards by the substitution step.
    #[inline]
    pub(crate) fn proxy_angle(self) -> Degrees {
        match self {
            DuskOffset::Angle(a) => a,
            DuskOffset::Minutes(m) => Degrees::new(m),
        }
    }

    /// Minutes after the anchor, if this is a minutes-based offset.
    #[inline]
    pub(crate) fn minutes(self) -> Option<f64> {
        match self {
            DuskOffset::Angle(_) => None,
            DuskOffset::Minutes(m) => Some(m),
        }
    }
}

impl FromStr for DuskOffset {
    type Err = Error;

    /// Accepts `"17.5"` (angle in degrees) or `"90 min"` (minutes after the
    /// anchor).  Anything else is a configuration error.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(prefix) = trimmed.strip_suffix("min") {
            let minutes = prefix
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidDuskOffset(s.to_string()))?;
            return Ok(DuskOffset::Minutes(minutes));
        }
        let angle = trimmed
            .parse::<f64>()
            .map_err(|_| Error::InvalidDuskOffset(s.to_string()))?;
        Ok(DuskOffset::Angle(Degrees::new(angle)))
    }
}

/// Juristic rule defining the Asr shadow-length threshold.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AsrRule {
    /// Shafii, Maliki, Jafari, Hanbali — shadow factor 1.
    Standard,
    /// Hanafi school — shadow factor 2.
    Hanafi,
    /// Explicit numeric shadow factor.
    ShadowFactor(f64),
}

impl AsrRule {
    /// Multiplier of gnomon height defining the Asr altitude.
    #[inline]
    pub fn shadow_factor(self) -> f64 {
        match self {
            AsrRule::Standard => 1.0,
            AsrRule::Hanafi => 2.0,
            AsrRule::ShadowFactor(f) => f,
        }
    }
}

impl FromStr for AsrRule {
    type Err = Error;

    /// Accepts the literal school names or a raw numeric shadow factor.
    /// An unrecognized non-numeric string fails rather than silently
    /// defaulting.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Standard" => Ok(AsrRule::Standard),
            "Hanafi" => Ok(AsrRule::Hanafi),
            other => other
                .parse::<f64>()
                .map(AsrRule::ShadowFactor)
                .map_err(|_| Error::InvalidAsrRule(s.to_string())),
        }
    }
}

/// Fallback rule bounding twilight-based times where the sun never reaches
/// the configured depression angle (required above ~48° latitude).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HighLatitudeRule {
    /// Twilight may span up to half the night.
    NightMiddle,
    /// Twilight may span up to one seventh of the night.
    OneSeventh,
    /// Twilight portion proportional to the configured angle: (angle/60)·night.
    AngleBased,
    /// No correction; undefined times stay NaN.
    None,
}

impl FromStr for HighLatitudeRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "NightMiddle" => Ok(HighLatitudeRule::NightMiddle),
            "OneSeventh" => Ok(HighLatitudeRule::OneSeventh),
            "AngleBased" => Ok(HighLatitudeRule::AngleBased),
            "None" => Ok(HighLatitudeRule::None),
            _ => Err(Error::InvalidHighLatitudeRule(s.to_string())),
        }
    }
}

/// Definition of solar midnight.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MidnightRule {
    /// Mean of Sunset and Sunrise.
    Standard,
    /// Mean of Sunset and next-day Fajr.
    Jafari,
}

impl FromStr for MidnightRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Standard" => Ok(MidnightRule::Standard),
            "Jafari" => Ok(MidnightRule::Jafari),
            _ => Err(Error::InvalidMidnightRule(s.to_string())),
        }
    }
}

/// Minute-boundary rounding applied to each computed timestamp.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rounding {
    /// Round to the nearest minute.
    Nearest,
    /// Round up (ceil).
    Up,
    /// Round down (floor).
    Down,
    /// Leave the millisecond timestamp unrounded.
    None,
}

impl FromStr for Rounding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "nearest" => Ok(Rounding::Nearest),
            "up" => Ok(Rounding::Up),
            "down" => Ok(Rounding::Down),
            "none" => Ok(Rounding::None),
            _ => Err(Error::InvalidRounding(s.to_string())),
        }
    }
}

/// Output rendering mode.
#[derive(Debug, Copy, Clone)]
pub enum TimeFormat {
    /// 24-hour wall clock, `"05:07"`.
    H24,
    /// 12-hour wall clock with suffix, `"5:07 AM"`.
    H12,
    /// 12-hour wall clock without suffix, `"5:07"`.
    H12NoSuffix,
    /// Raw epoch milliseconds (floored).
    UnixMillis,
    /// Raw epoch seconds (floored).
    UnixSeconds,
    /// Caller-supplied rendering of the millisecond timestamp.
    Custom(fn(f64) -> String),
}

// Derived PartialEq would compare the `Custom` payloads as raw `==` on
// function pointers, which the compiler flags as unpredictable (addresses may
// merge or duplicate across codegen units).  Compare through `fn_addr_eq`
// instead.
impl PartialEq for TimeFormat {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TimeFormat::H24, TimeFormat::H24)
            | (TimeFormat::H12, TimeFormat::H12)
            | (TimeFormat::H12NoSuffix, TimeFormat::H12NoSuffix)
            | (TimeFormat::UnixMillis, TimeFormat::UnixMillis)
            | (TimeFormat::UnixSeconds, TimeFormat::UnixSeconds) => true,
            (TimeFormat::Custom(a), TimeFormat::Custom(b)) => std::ptr::fn_addr_eq(*a, *b),
            _ => false,
        }
    }
}

impl FromStr for TimeFormat {
    type Err = Error;

    /// The reference spellings: `24h`, `12h`, `12H`, `x` (millis), `X` (seconds).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "24h" => Ok(TimeFormat::H24),
            "12h" => Ok(TimeFormat::H12),
            "12H" => Ok(TimeFormat::H12NoSuffix),
            "x" => Ok(TimeFormat::UnixMillis),
            "X" => Ok(TimeFormat::UnixSeconds),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

/// Target timezone for wall-clock rendering.
///
/// A named IANA zone converts through `chrono-tz`, which accounts for
/// daylight-saving transitions on the query date.  A fixed offset applies a
/// flat shift.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Zone {
    /// IANA zone, e.g. `Asia/Jakarta`.
    Named(Tz),
    /// Fixed UTC offset.
    Fixed(FixedOffset),
}

// ═══════════════════════════════════════════════════════════════════════════
// Settings — the resolved configuration
// ═══════════════════════════════════════════════════════════════════════════

/// Fully resolved configuration for one prayer-time query.
///
/// Immutable once built; create a new one (cheap) to change any field.
/// See [`SettingsBuilder`] for the layering rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub(crate) fajr: Option<Degrees>,
    pub(crate) maghrib: DuskOffset,
    pub(crate) isha: DuskOffset,
    pub(crate) midnight: MidnightRule,
    pub(crate) dhuhr_minutes: f64,
    pub(crate) asr: AsrRule,
    pub(crate) high_lats: HighLatitudeRule,
    pub(crate) tune: BTreeMap<TimeName, f64>,
    pub(crate) format: TimeFormat,
    pub(crate) rounding: Rounding,
    pub(crate) zone: Zone,
    pub(crate) latitude: Degrees,
    pub(crate) longitude: Degrees,
    pub(crate) iterations: u32,
}

impl Settings {
    /// Start a builder pre-loaded with the defaults layer.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Observer latitude.
    #[inline]
    pub fn latitude(&self) -> Degrees {
        self.latitude
    }

    /// Observer longitude.
    #[inline]
    pub fn longitude(&self) -> Degrees {
        self.longitude
    }

    /// Target timezone.
    #[inline]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Compute the formatted time table for a calendar date.
    ///
    /// The date is a plain (year, month, day) triple — the *local* calendar
    /// day the caller is interested in, decoupled from any clock.  Undefined
    /// times render as [`crate::INVALID_TIME`].
    pub fn times(&self, year: i32, month: u32, day: u32) -> Result<BTreeMap<TimeName, String>> {
        let stamps = self.timestamps(year, month, day)?;
        Ok(stamps
            .into_iter()
            .map(|(name, ms)| (name, format::format_timestamp(ms, self.format, self.zone)))
            .collect())
    }

    /// Compute the raw (rounded) UTC millisecond timestamps for a date.
    ///
    /// Undefined times are NaN.  This is the numeric form schedulers poll
    /// against; [`Settings::times`] is the same table rendered as strings.
    pub fn timestamps(&self, year: i32, month: u32, day: u32) -> Result<BTreeMap<TimeName, f64>> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(Error::InvalidDate { year, month, day })?;
        let utc_midnight_ms = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();

        let table = Computation::new(self, utc_midnight_ms).run();
        Ok(TimeName::ALL.iter().copied().zip(table).collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SettingsBuilder — layered merge
// ═══════════════════════════════════════════════════════════════════════════

/// Internal builder state for the timezone, resolved at `build()`.
#[derive(Debug, Clone)]
enum ZoneSpec {
    Named(Tz),
    NamedStr(String),
    FixedMinutes(f64),
}

/// Builder producing an immutable [`Settings`].
///
/// Every setter overrides whatever an earlier layer put in the same field;
/// [`SettingsBuilder::method`] re-applies the defaults layer underneath the
/// chosen preset, so a preset that leaves a field unset falls back to the
/// defaults rather than to a previously selected method.
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    fajr: Option<Degrees>,
    maghrib: DuskOffset,
    isha: DuskOffset,
    midnight: MidnightRule,
    dhuhr_minutes: f64,
    asr: AsrRule,
    high_lats: HighLatitudeRule,
    tune: BTreeMap<TimeName, f64>,
    format: TimeFormat,
    rounding: Rounding,
    zone: ZoneSpec,
    latitude: f64,
    longitude: f64,
    iterations: u32,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsBuilder {
    /// The defaults layer: everything a query needs before any preset or
    /// override is applied.
    pub fn new() -> Self {
        let defaults = MethodParams::defaults();
        Self {
            fajr: defaults.fajr,
            // Present in the defaults preset, so unwrapping cannot fail.
            maghrib: defaults.maghrib.unwrap_or(DuskOffset::Minutes(1.0)),
            isha: defaults.isha.unwrap_or(DuskOffset::Angle(Degrees::new(14.0))),
            midnight: defaults.midnight.unwrap_or(MidnightRule::Standard),
            dhuhr_minutes: 0.0,
            asr: AsrRule::Standard,
            high_lats: HighLatitudeRule::NightMiddle,
            tune: BTreeMap::new(),
            format: TimeFormat::H24,
            rounding: Rounding::Nearest,
            zone: ZoneSpec::Named(Tz::UTC),
            latitude: 0.0,
            longitude: 0.0,
            iterations: 1,
        }
    }

    fn apply(&mut self, params: MethodParams) {
        if let Some(fajr) = params.fajr {
            self.fajr = Some(fajr);
        }
        if let Some(maghrib) = params.maghrib {
            self.maghrib = maghrib;
        }
        if let Some(isha) = params.isha {
            self.isha = isha;
        }
        if let Some(midnight) = params.midnight {
            self.midnight = midnight;
        }
    }

    /// Apply a named calculation method: defaults first, then the preset's
    /// own fields on top.
    pub fn method(mut self, method: Method) -> Self {
        self.apply(MethodParams::defaults());
        self.apply(method.params());
        self
    }

    /// Override the Fajr twilight angle, in degrees.
    pub fn fajr_angle(mut self, degrees: f64) -> Self {
        self.fajr = Some(Degrees::new(degrees));
        self
    }

    /// Override the Maghrib parameter.
    pub fn maghrib(mut self, offset: DuskOffset) -> Self {
        self.maghrib = offset;
        self
    }

    /// Override the Isha parameter.
    pub fn isha(mut self, offset: DuskOffset) -> Self {
        self.isha = offset;
        self
    }

    /// Override the midnight rule.
    pub fn midnight(mut self, rule: MidnightRule) -> Self {
        self.midnight = rule;
        self
    }

    /// Minutes added to Dhuhr after all other logic.
    pub fn dhuhr_minutes(mut self, minutes: f64) -> Self {
        self.dhuhr_minutes = minutes;
        self
    }

    /// Override the Asr juristic rule.
    pub fn asr(mut self, rule: AsrRule) -> Self {
        self.asr = rule;
        self
    }

    /// Override the high-latitude correction rule.
    pub fn high_latitude(mut self, rule: HighLatitudeRule) -> Self {
        self.high_lats = rule;
        self
    }

    /// Add a per-time tuning offset in minutes (applied last).
    pub fn tune(mut self, name: TimeName, minutes: f64) -> Self {
        self.tune.insert(name, minutes);
        self
    }

    /// Observer location in degrees: latitude ∈ [-90, 90],
    /// longitude ∈ [-180, 180].  Validated at `build()`.
    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Render output in a named IANA timezone (DST-aware).
    pub fn timezone(mut self, tz: Tz) -> Self {
        self.zone = ZoneSpec::Named(tz);
        self
    }

    /// Render output in an IANA timezone given by name.
    ///
    /// Unknown names are rejected at `build()`.
    pub fn timezone_name(mut self, name: impl Into<String>) -> Self {
        self.zone = ZoneSpec::NamedStr(name.into());
        self
    }

    /// Render output at a fixed UTC offset.
    ///
    /// Values with magnitude below 16 are interpreted as hours, otherwise as
    /// minutes (the reference engine's convention).
    pub fn utc_offset(mut self, offset: f64) -> Self {
        let minutes = if offset.abs() < 16.0 { offset * 60.0 } else { offset };
        self.zone = ZoneSpec::FixedMinutes(minutes);
        self
    }

    /// Output rendering mode.
    pub fn format(mut self, format: TimeFormat) -> Self {
        self.format = format;
        self
    }

    /// Minute-rounding mode.
    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Number of fixed-point refinement passes (normally 1).
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Validate and freeze into an immutable [`Settings`].
    pub fn build(self) -> Result<Settings> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::LongitudeOutOfRange(self.longitude));
        }
        if self.iterations == 0 {
            return Err(Error::ZeroIterations);
        }

        let zone = match self.zone {
            ZoneSpec::Named(tz) => Zone::Named(tz),
            ZoneSpec::NamedStr(name) => Zone::Named(
                name.parse::<Tz>()
                    .map_err(|_| Error::UnknownTimezone(name.clone()))?,
            ),
            ZoneSpec::FixedMinutes(minutes) => {
                let seconds = (minutes * 60.0) as i32;
                Zone::Fixed(
                    FixedOffset::east_opt(seconds).ok_or(Error::UtcOffsetOutOfRange(minutes))?,
                )
            }
        };

        Ok(Settings {
            fajr: self.fajr,
            maghrib: self.maghrib,
            isha: self.isha,
            midnight: self.midnight,
            dhuhr_minutes: self.dhuhr_minutes,
            asr: self.asr,
            high_lats: self.high_lats,
            tune: self.tune,
            format: self.format,
            rounding: self.rounding,
            zone,
            latitude: Degrees::new(self.latitude),
            longitude: Degrees::new(self.longitude),
            iterations: self.iterations,
        })
    }
}
