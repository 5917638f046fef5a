// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Degree-based inverse trigonometry and hour wrapping.
//!
//! `qtty` angles provide forward trig (`Degrees::sin` converts to radians
//! internally); the inverse functions here return [`Degrees`] directly so the
//! solar formulas read in the same unit they are published in.  All functions
//! follow IEEE-754: out-of-domain inputs yield NaN rather than panicking —
//! `arccos` outside [-1, 1] is the signal the high-latitude corrector
//! consumes.

use qtty::{Degree, Degrees, Radians};

/// Inverse sine, result in degrees.  NaN outside [-1, 1].
#[inline]
pub(crate) fn arcsin(x: f64) -> Degrees {
    Radians::new(x.asin()).to::<Degree>()
}

/// Inverse cosine, result in degrees.  NaN outside [-1, 1].
#[inline]
pub(crate) fn arccos(x: f64) -> Degrees {
    Radians::new(x.acos()).to::<Degree>()
}

/// Four-quadrant inverse tangent, result in degrees.
#[inline]
pub(crate) fn arctan2(y: f64, x: f64) -> Degrees {
    Radians::new(y.atan2(x)).to::<Degree>()
}

/// Inverse cotangent, result in degrees.
#[inline]
pub(crate) fn arccot(x: f64) -> Degrees {
    Radians::new((1.0 / x).atan()).to::<Degree>()
}

/// Wrap a fractional-hour value into [0, 24).  NaN propagates.
#[inline]
pub(crate) fn wrap_hour(hours: f64) -> f64 {
    hours.rem_euclid(24.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arcsin_arccos_match_known_angles() {
        assert!((arcsin(1.0).value() - 90.0).abs() < 1e-12);
        assert!((arcsin(0.5).value() - 30.0).abs() < 1e-12);
        assert!((arccos(0.0).value() - 90.0).abs() < 1e-12);
        assert!((arccos(-1.0).value() - 180.0).abs() < 1e-12);
    }

    #[test]
    fn arccos_out_of_domain_is_nan() {
        assert!(arccos(1.5).value().is_nan());
        assert!(arccos(-1.0001).value().is_nan());
    }

    #[test]
    fn arccot_of_one_is_45_degrees() {
        assert!((arccot(1.0).value() - 45.0).abs() < 1e-12);
    }

    #[test]
    fn arctan2_covers_quadrants() {
        assert!((arctan2(1.0, 1.0).value() - 45.0).abs() < 1e-12);
        assert!((arctan2(1.0, -1.0).value() - 135.0).abs() < 1e-12);
        assert!((arctan2(-1.0, 1.0).value() + 45.0).abs() < 1e-12);
    }

    #[test]
    fn wrap_hour_stays_in_day_range() {
        assert_eq!(wrap_hour(25.5), 1.5);
        assert_eq!(wrap_hour(-1.0), 23.0);
        assert_eq!(wrap_hour(12.0), 12.0);
        assert!(wrap_hour(f64::NAN).is_nan());
    }
}
