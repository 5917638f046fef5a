// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The per-query computation: iterative estimation, high-latitude
//! correction, post-pass substitutions, tuning, and conversion to UTC
//! millisecond timestamps.
//!
//! A [`Computation`] owns all mutable state of one query — the solar memo
//! and the `adjusted` flag — so separate queries never share anything.  The
//! stages run in a fixed order:
//!
//! 1. `iterations` fixed-point passes from the seed table,
//! 2. high-latitude clamping (sets `adjusted`),
//! 3. minute-based Maghrib/Isha substitution, Jafari midnight, Dhuhr offset,
//! 4. per-time tuning,
//! 5. longitude correction + conversion to floored millisecond timestamps,
//!    then minute rounding.
//!
//! Each later step depends on values produced earlier in the same pass, so
//! the order is load-bearing.

use qtty::{Degrees, Hours};

use crate::format::round_timestamp;
use crate::settings::{HighLatitudeRule, MidnightRule, Settings};
use crate::sun::{Direction, SolarDay};
use crate::times::{TimeName, TimeTable};

/// Horizon depression for sunrise/sunset: atmospheric refraction plus the
/// solar disk radius.
const HORIZON: Degrees = Degrees::new(0.833);

/// One prayer-time query in flight.
pub(crate) struct Computation<'a> {
    settings: &'a Settings,
    solar: SolarDay,
    adjusted: bool,
}

impl<'a> Computation<'a> {
    pub(crate) fn new(settings: &'a Settings, utc_midnight_ms: i64) -> Self {
        Self {
            solar: SolarDay::new(utc_midnight_ms, settings.latitude, settings.longitude),
            settings,
            adjusted: false,
        }
    }

    /// Run the full pipeline; returns rounded UTC millisecond timestamps in
    /// [`TimeName::ALL`] order (NaN where a time is undefined).
    pub(crate) fn run(mut self) -> [f64; 8] {
        let mut table = TimeTable::seed();

        for _ in 0..self.settings.iterations {
            self.pass(&mut table);
        }

        self.adjust_high_latitudes(&mut table);
        self.apply_substitutions(&mut table);
        self.apply_tuning(&mut table);
        self.to_timestamps(&table)
    }

    /// One fixed-point pass: every entry is recomputed from the solar
    /// position valid at its previous estimate.
    fn pass(&mut self, table: &mut TimeTable) {
        use TimeName::*;
        let s = self.settings;
        let fajr_angle = s.fajr.unwrap_or(Degrees::new(0.0));

        let next = [
            self.solar.angle_time(fajr_angle, table[Fajr], Direction::Dawn),
            self.solar.angle_time(HORIZON, table[Sunrise], Direction::Dawn),
            self.solar.mid_day(table[Dhuhr]),
            {
                let altitude = self
                    .solar
                    .asr_altitude(s.asr.shadow_factor(), table[Asr]);
                self.solar.angle_time(altitude, table[Asr], Direction::Dusk)
            },
            self.solar.angle_time(HORIZON, table[Sunset], Direction::Dusk),
            self.solar
                .angle_time(s.maghrib.proxy_angle(), table[Maghrib], Direction::Dusk),
            self.solar
                .angle_time(s.isha.proxy_angle(), table[Isha], Direction::Dusk),
            self.solar.mid_day(table[Midnight]) + Hours::new(12.0),
        ];

        for (name, value) in TimeName::ALL.into_iter().zip(next) {
            table[name] = value;
        }
    }

    /// Clamp Fajr/Isha/Maghrib offsets to the allowed night portion when the
    /// natural solution is undefined or out of bounds.  Skipped entirely for
    /// [`HighLatitudeRule::None`].
    fn adjust_high_latitudes(&mut self, table: &mut TimeTable) {
        use TimeName::*;
        let s = self.settings;
        if s.high_lats == HighLatitudeRule::None {
            return;
        }

        self.adjusted = false;
        let night = Hours::new(24.0) + table[Sunrise] - table[Sunset];

        let fajr_angle = s.fajr.map_or(0.0, |a| a.value());
        table[Fajr] = self.clamp_to_portion(
            table[Fajr],
            table[Sunrise],
            fajr_angle,
            night,
            Direction::Dawn,
        );
        table[Isha] = self.clamp_to_portion(
            table[Isha],
            table[Sunset],
            s.isha.proxy_angle().value(),
            night,
            Direction::Dusk,
        );
        table[Maghrib] = self.clamp_to_portion(
            table[Maghrib],
            table[Sunset],
            s.maghrib.proxy_angle().value(),
            night,
            Direction::Dusk,
        );
    }

    fn clamp_to_portion(
        &mut self,
        time: Hours,
        anchor: Hours,
        angle: f64,
        night: Hours,
        direction: Direction,
    ) -> Hours {
        let fraction = match self.settings.high_lats {
            HighLatitudeRule::NightMiddle => 1.0 / 2.0,
            HighLatitudeRule::OneSeventh => 1.0 / 7.0,
            HighLatitudeRule::AngleBased => angle / 60.0,
            HighLatitudeRule::None => 0.0,
        };
        let portion = night * fraction;
        let sign = direction.sign();
        let offset = (time - anchor).value() * sign;

        if time.value().is_nan() || offset > portion.value() {
            self.adjusted = true;
            anchor + portion * sign
        } else {
            time
        }
    }

    /// Minute-based Maghrib/Isha substitution, Jafari midnight, and the
    /// Dhuhr offset — in that order, since each depends on values produced
    /// earlier in the same pass.
    fn apply_substitutions(&mut self, table: &mut TimeTable) {
        use TimeName::*;
        let s = self.settings;

        if let Some(minutes) = s.maghrib.minutes() {
            table[Maghrib] = table[Sunset] + Hours::new(minutes / 60.0);
        }
        if let Some(minutes) = s.isha.minutes() {
            table[Isha] = table[Maghrib] + Hours::new(minutes / 60.0);
        }

        if s.midnight == MidnightRule::Jafari {
            if let Some(fajr_angle) = s.fajr {
                // Mean of sunset and next-day Fajr.  Once the high-latitude
                // clamp has fired, the already-adjusted Fajr (plus a day) is
                // the only consistent estimate; otherwise seed a fresh
                // next-day solve at hour 29 (= 5 + 24).
                let next_fajr = if self.adjusted {
                    table[Fajr] + Hours::new(24.0)
                } else {
                    self.solar
                        .angle_time(fajr_angle, Hours::new(29.0), Direction::Dawn)
                        + Hours::new(24.0)
                };
                table[Midnight] = (table[Sunset] + next_fajr) * 0.5;
            }
        }

        table[Dhuhr] += Hours::new(s.dhuhr_minutes / 60.0);
    }

    fn apply_tuning(&mut self, table: &mut TimeTable) {
        for (&name, &minutes) in &self.settings.tune {
            table[name] += Hours::new(minutes / 60.0);
        }
    }

    /// Apply the longitude correction (solar time → zone time) and convert
    /// each fractional hour to an absolute UTC timestamp, flooring at
    /// millisecond precision, then round per the configured mode.
    fn to_timestamps(&self, table: &TimeTable) -> [f64; 8] {
        let longitude_hours = self.settings.longitude.value() / 15.0;
        let midnight_ms = self.solar.utc_midnight_ms() as f64;

        TimeName::ALL.map(|name| {
            let local = table[name].value() - longitude_hours;
            let timestamp = midnight_ms + (local * 3_600_000.0).floor();
            round_timestamp(timestamp, self.settings.rounding)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AsrRule, DuskOffset, Rounding};
    use crate::Method;

    // 2000-06-21T00:00:00Z
    const JUNE_SOLSTICE_2000_MS: i64 = 961_545_600_000;

    fn run(settings: &Settings) -> [f64; 8] {
        Computation::new(settings, JUNE_SOLSTICE_2000_MS).run()
    }

    fn hours_between(later_ms: f64, earlier_ms: f64) -> f64 {
        (later_ms - earlier_ms) / 3_600_000.0
    }

    #[test]
    fn table_is_chronologically_ordered_at_mid_latitude() {
        let settings = Settings::builder()
            .method(Method::Mwl)
            .location(43.0, -80.0)
            .rounding(Rounding::None)
            .build()
            .unwrap();
        let t = run(&settings);
        for pair in t.windows(2).take(6) {
            assert!(pair[0] < pair[1], "table out of order: {:?}", t);
        }
    }

    #[test]
    fn high_latitude_clamp_replaces_nan_fajr() {
        let settings = Settings::builder()
            .method(Method::Mwl)
            .location(65.0, 0.0)
            .high_latitude(HighLatitudeRule::NightMiddle)
            .rounding(Rounding::None)
            .build()
            .unwrap();
        let t = run(&settings);
        let (fajr, sunrise, sunset) = (t[0], t[1], t[4]);
        assert!(!fajr.is_nan());

        let night = 24.0 + hours_between(sunrise, sunset);
        let expected = sunrise - night / 2.0 * 3_600_000.0;
        assert!(
            (fajr - expected).abs() < 5.0,
            "fajr {} vs sunrise - night/2 {}",
            fajr,
            expected
        );
    }

    #[test]
    fn rule_none_leaves_undefined_times_nan() {
        let settings = Settings::builder()
            .method(Method::Mwl)
            .location(65.0, 0.0)
            .high_latitude(HighLatitudeRule::None)
            .build()
            .unwrap();
        let t = run(&settings);
        assert!(t[0].is_nan(), "fajr should stay NaN at 65N solstice");
        // Sunrise/sunset still exist at 65N in June.
        assert!(!t[1].is_nan() && !t[4].is_nan());
    }

    #[test]
    fn one_seventh_portion_is_tighter_than_night_middle() {
        let base = Settings::builder()
            .method(Method::Mwl)
            .location(65.0, 0.0)
            .rounding(Rounding::None);
        let middle = base
            .clone()
            .high_latitude(HighLatitudeRule::NightMiddle)
            .build()
            .unwrap();
        let seventh = base
            .high_latitude(HighLatitudeRule::OneSeventh)
            .build()
            .unwrap();
        // A smaller allowed portion pulls Fajr closer to sunrise.
        assert!(run(&seventh)[0] > run(&middle)[0]);
    }

    #[test]
    fn minutes_isha_is_exact_offset_from_maghrib() {
        let settings = Settings::builder()
            .method(Method::Makkah)
            .location(21.4225, 39.8262)
            .rounding(Rounding::None)
            .build()
            .unwrap();
        let t = run(&settings);
        let (maghrib, isha) = (t[5], t[6]);
        assert!(
            (isha - maghrib - 5_400_000.0).abs() <= 2.0,
            "isha - maghrib = {} ms",
            isha - maghrib
        );
    }

    #[test]
    fn minutes_maghrib_follows_sunset() {
        // Defaults carry maghrib = "1 min".
        let settings = Settings::builder()
            .method(Method::Isna)
            .location(43.0, -80.0)
            .rounding(Rounding::None)
            .build()
            .unwrap();
        let t = run(&settings);
        assert!((t[5] - t[4] - 60_000.0).abs() <= 2.0);
    }

    #[test]
    fn jafari_midnight_lies_between_sunset_and_next_fajr() {
        let settings = Settings::builder()
            .method(Method::Tehran)
            .location(35.7, 51.4)
            .rounding(Rounding::None)
            .build()
            .unwrap();
        let t = run(&settings);
        let (fajr, sunset, midnight) = (t[0], t[4], t[7]);
        assert!(midnight > sunset);
        assert!(midnight < fajr + 24.0 * 3_600_000.0);
    }

    #[test]
    fn jafari_midnight_uses_clamped_fajr_when_twilight_is_undefined() {
        let settings = Settings::builder()
            .method(Method::Tehran)
            .location(65.0, 0.0)
            .high_latitude(HighLatitudeRule::NightMiddle)
            .rounding(Rounding::None)
            .build()
            .unwrap();
        let t = run(&settings);
        let (fajr, sunrise, sunset, midnight) = (t[0], t[1], t[4], t[7]);

        // 17.7° twilight is unreachable at 65°N in June, so Fajr is the
        // clamped value sunrise − night/2.
        let night = 24.0 + hours_between(sunrise, sunset);
        assert!(
            (fajr - (sunrise - night / 2.0 * 3_600_000.0)).abs() < 5.0,
            "fajr not clamped: {}",
            fajr
        );

        // Jafari midnight then averages sunset with that adjusted Fajr a day
        // on, not with a fresh next-day twilight solve.
        let expected = (sunset + fajr + 24.0 * 3_600_000.0) / 2.0;
        assert!(
            (midnight - expected).abs() < 5.0,
            "midnight {} vs (sunset + fajr + 24h)/2 {}",
            midnight,
            expected
        );
    }

    #[test]
    fn hanafi_asr_falls_after_standard_asr() {
        let base = || {
            Settings::builder()
                .method(Method::Karachi)
                .location(24.86, 67.0)
                .rounding(Rounding::None)
        };
        let standard = base().build().unwrap();
        let hanafi = base().asr(AsrRule::Hanafi).build().unwrap();
        // A doubled shadow threshold is reached later in the afternoon.
        assert!(run(&hanafi)[3] > run(&standard)[3]);
    }

    #[test]
    fn dhuhr_offset_and_tuning_shift_times() {
        let base = Settings::builder()
            .method(Method::Mwl)
            .location(43.0, -80.0)
            .rounding(Rounding::None)
            .build()
            .unwrap();
        let shifted = Settings::builder()
            .method(Method::Mwl)
            .location(43.0, -80.0)
            .rounding(Rounding::None)
            .dhuhr_minutes(2.0)
            .tune(TimeName::Fajr, -3.0)
            .build()
            .unwrap();
        let (a, b) = (run(&base), run(&shifted));
        assert!((b[2] - a[2] - 120_000.0).abs() <= 2.0, "dhuhr offset");
        assert!((b[0] - a[0] + 180_000.0).abs() <= 2.0, "fajr tuning");
    }

    #[test]
    fn iterations_beyond_one_only_marginally_move_times() {
        let once = Settings::builder()
            .method(Method::Mwl)
            .location(43.0, -80.0)
            .rounding(Rounding::None)
            .build()
            .unwrap();
        let twice = Settings::builder()
            .method(Method::Mwl)
            .location(43.0, -80.0)
            .rounding(Rounding::None)
            .iterations(3)
            .build()
            .unwrap();
        let (a, b) = (run(&once), run(&twice));
        for (x, y) in a.iter().zip(&b) {
            // Declination drifts slowly; extra passes move times by well
            // under a minute.
            assert!((x - y).abs() < 60_000.0);
        }
    }

    #[test]
    fn angle_based_portion_uses_configured_angle() {
        let settings = Settings::builder()
            .method(Method::Mwl)
            .location(65.0, 0.0)
            .high_latitude(HighLatitudeRule::AngleBased)
            .isha(DuskOffset::Angle(Degrees::new(18.0)))
            .rounding(Rounding::None)
            .build()
            .unwrap();
        let t = run(&settings);
        let (sunrise, sunset, isha) = (t[1], t[4], t[6]);
        let night_ms = 24.0 * 3_600_000.0 + sunrise - sunset;
        let expected = sunset + 18.0 / 60.0 * night_ms;
        assert!(
            (isha - expected).abs() < 5.0,
            "isha {} vs sunset + (18/60)*night {}",
            isha,
            expected
        );
    }
}
