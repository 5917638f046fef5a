// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Solar position and hour-angle solving for one UTC day at one location.
//!
//! [`SolarDay`] is a caller-owned computation context: it pins the UTC
//! midnight of the query day plus the observer coordinates, and memoizes the
//! sun position per exact fractional-hour key.  A fresh `SolarDay` is built
//! for every top-level query, so cached declinations can never leak into a
//! later query at a different date or location.
//!
//! The ephemeris is the compact low-precision series used by prayer-time
//! engines (Meeus-style mean elements, arcminute-level accuracy): mean
//! anomaly `g`, mean longitude `q`, ecliptic longitude `L`, obliquity `e`,
//! then declination `arcsin(sin e · sin L)` and equation of time
//! `q/15 − RA`.

use qtty::{Degrees, Hours};
use std::collections::HashMap;

use crate::math::{arccos, arccot, arcsin, arctan2, wrap_hour};

/// Declination and equation of time for one fractional-hour input.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct SunPosition {
    /// Sun's angular distance from the celestial equator.
    pub(crate) declination: Degrees,
    /// Solar time minus mean clock time.
    pub(crate) equation: Hours,
}

/// Direction of an hour-angle offset relative to solar noon.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Before noon (Fajr, Sunrise).
    Dawn,
    /// After noon (Asr, Sunset, Maghrib, Isha).
    Dusk,
}

impl Direction {
    #[inline]
    pub(crate) fn sign(self) -> f64 {
        match self {
            Direction::Dawn => -1.0,
            Direction::Dusk => 1.0,
        }
    }
}

/// Per-computation solar context: one UTC day, one location, one memo.
#[derive(Debug)]
pub(crate) struct SolarDay {
    utc_midnight_ms: i64,
    latitude: Degrees,
    longitude: Degrees,
    // Keyed by the exact f64 bit pattern of the fractional hour; lives only
    // as long as this SolarDay.
    memo: HashMap<u64, SunPosition>,
}

/// Days between the Unix epoch and J2000.0 (2000-01-01T12:00 UTC).
const UNIX_TO_J2000_DAYS: f64 = 10_957.5;

const MS_PER_DAY: f64 = 86_400_000.0;

impl SolarDay {
    pub(crate) fn new(utc_midnight_ms: i64, latitude: Degrees, longitude: Degrees) -> Self {
        Self {
            utc_midnight_ms,
            latitude,
            longitude,
            memo: HashMap::new(),
        }
    }

    #[inline]
    pub(crate) fn utc_midnight_ms(&self) -> i64 {
        self.utc_midnight_ms
    }

    /// Sun position at a fractional hour of the query day, memoized.
    pub(crate) fn sun_position(&mut self, hour: Hours) -> SunPosition {
        let key = hour.value().to_bits();
        if let Some(cached) = self.memo.get(&key) {
            return *cached;
        }

        // Days since J2000.0 at the local solar moment of `hour`.
        let d = self.utc_midnight_ms as f64 / MS_PER_DAY - UNIX_TO_J2000_DAYS
            + hour.value() / 24.0
            - self.longitude.value() / 360.0;

        let g = Degrees::new(357.529 + 0.985_600_28 * d).wrap_pos();
        let q = Degrees::new(280.459 + 0.985_647_36 * d).wrap_pos();
        let l = (q + Degrees::new(1.915 * g.sin() + 0.020 * (2.0 * g).sin())).wrap_pos();
        let e = Degrees::new(23.439 - 0.000_000_36 * d);

        let ra = Hours::new(wrap_hour(arctan2(e.cos() * l.sin(), l.cos()).value() / 15.0));
        let position = SunPosition {
            declination: arcsin(e.sin() * l.sin()),
            equation: Hours::new(q.value() / 15.0) - ra,
        };

        self.memo.insert(key, position);
        position
    }

    /// Local solar noon (Dhuhr) estimate: 12 − equation of time, in [0, 24).
    pub(crate) fn mid_day(&mut self, hour: Hours) -> Hours {
        let equation = self.sun_position(hour).equation;
        Hours::new(wrap_hour((Hours::new(12.0) - equation).value()))
    }

    /// Time at which the sun reaches `angle` below the horizon, on the given
    /// side of noon.
    ///
    /// Solves `cos H = (−sin α − sin φ sin δ) / (cos φ cos δ)` and converts
    /// the hour angle to hours.  When the angle is unreachable at this
    /// latitude and season the arccos argument leaves [-1, 1] and the result
    /// is NaN — the signal consumed by the high-latitude corrector, not an
    /// error.
    pub(crate) fn angle_time(&mut self, angle: Degrees, hour: Hours, direction: Direction) -> Hours {
        let declination = self.sun_position(hour).declination;
        let numerator = -angle.sin() - self.latitude.sin() * declination.sin();
        let hour_angle = arccos(numerator / (self.latitude.cos() * declination.cos()));
        let offset = Hours::new(hour_angle.value() / 15.0);
        self.mid_day(hour) + offset * direction.sign()
    }

    /// Sun altitude at which an object's shadow is `shadow_factor` times its
    /// height (negated for the hour-angle solve).
    pub(crate) fn asr_altitude(&mut self, shadow_factor: f64, hour: Hours) -> Degrees {
        let declination = self.sun_position(hour).declination;
        let separation = (self.latitude - declination).abs();
        -arccot(shadow_factor + separation.tan())
    }

    #[cfg(test)]
    pub(crate) fn memo_len(&self) -> usize {
        self.memo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2000-06-21T00:00:00Z
    const JUNE_SOLSTICE_2000_MS: i64 = 961_545_600_000;
    // 2000-03-20T00:00:00Z
    const MARCH_EQUINOX_2000_MS: i64 = 953_510_400_000;

    fn equator_day(utc_midnight_ms: i64) -> SolarDay {
        SolarDay::new(utc_midnight_ms, Degrees::new(0.0), Degrees::new(0.0))
    }

    #[test]
    fn declination_near_zero_at_equinox() {
        let mut day = equator_day(MARCH_EQUINOX_2000_MS);
        let position = day.sun_position(Hours::new(12.0));
        assert!(
            position.declination.value().abs() < 1.0,
            "equinox declination = {}",
            position.declination
        );
    }

    #[test]
    fn declination_near_obliquity_at_june_solstice() {
        let mut day = equator_day(JUNE_SOLSTICE_2000_MS);
        let position = day.sun_position(Hours::new(12.0));
        assert!(
            (position.declination.value() - 23.44).abs() < 0.1,
            "solstice declination = {}",
            position.declination
        );
    }

    #[test]
    fn equation_of_time_stays_within_physical_bounds() {
        // EoT never exceeds ~±16.5 minutes over the year.  The raw
        // q/15 − RA value can sit a full turn off near the RA wrap (the
        // mid-day step wraps it away), so fold into (−12, 12] first.
        for month_ms in (0..12).map(|m| MARCH_EQUINOX_2000_MS + m * 30 * 86_400_000) {
            let mut day = equator_day(month_ms);
            let equation = day.sun_position(Hours::new(12.0)).equation;
            let folded = (equation.value() + 12.0).rem_euclid(24.0) - 12.0;
            assert!(
                folded.abs() < 0.30,
                "EoT = {} h at {}",
                folded,
                month_ms
            );
        }
    }

    #[test]
    fn memo_hit_returns_identical_position() {
        let mut day = equator_day(JUNE_SOLSTICE_2000_MS);
        let first = day.sun_position(Hours::new(5.0));
        let second = day.sun_position(Hours::new(5.0));
        assert_eq!(first, second);
        assert_eq!(day.memo_len(), 1);

        day.sun_position(Hours::new(6.0));
        assert_eq!(day.memo_len(), 2);
    }

    #[test]
    fn mid_day_close_to_noon_at_greenwich() {
        let mut day = equator_day(JUNE_SOLSTICE_2000_MS);
        let noon = day.mid_day(Hours::new(12.0));
        assert!(
            (noon.value() - 12.0).abs() < 0.3,
            "solar noon = {}",
            noon
        );
    }

    #[test]
    fn sunrise_before_noon_sunset_after() {
        let mut day = equator_day(JUNE_SOLSTICE_2000_MS);
        let horizon = Degrees::new(0.833);
        let sunrise = day.angle_time(horizon, Hours::new(6.0), Direction::Dawn);
        let sunset = day.angle_time(horizon, Hours::new(18.0), Direction::Dusk);
        let noon = day.mid_day(Hours::new(12.0));
        assert!(sunrise < noon && noon < sunset);
    }

    #[test]
    fn unreachable_angle_yields_nan() {
        // 18° twilight does not occur at 65°N near the June solstice.
        let mut day = SolarDay::new(
            JUNE_SOLSTICE_2000_MS,
            Degrees::new(65.0),
            Degrees::new(0.0),
        );
        let fajr = day.angle_time(Degrees::new(18.0), Hours::new(5.0), Direction::Dawn);
        assert!(fajr.value().is_nan());
    }

    #[test]
    fn asr_altitude_is_negative_of_arccot() {
        let mut day = equator_day(MARCH_EQUINOX_2000_MS);
        let altitude = day.asr_altitude(1.0, Hours::new(13.0));
        // At the equinox on the equator the shadow term is ~tan(0), so the
        // altitude approaches -arccot(1) = -45°.
        assert!(
            (altitude.value() + 45.0).abs() < 1.0,
            "asr altitude = {}",
            altitude
        );
    }
}
