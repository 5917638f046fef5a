// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calculation-method presets.
//!
//! Each preset is an immutable partial parameter set (Fajr angle, Isha
//! angle-or-minutes, Maghrib angle-or-minutes, midnight rule) published by a
//! regional authority.  The `defaults` set is merged underneath any named
//! preset by the settings builder.
//!
//! | Preset | Fajr | Isha | Maghrib | Midnight |
//! |--------|------|------|---------|----------|
//! | MWL | 18° | 17° | — | — |
//! | ISNA | 15° | 15° | — | — |
//! | Egypt | 19.5° | 17.5° | — | — |
//! | Makkah | 18.5° | 90 min | — | — |
//! | Karachi | 18° | 18° | — | — |
//! | Tehran | 17.7° | — | 4.5° | Jafari |
//! | Jafari | 16° | — | 4° | Jafari |
//! | France | 12° | 12° | — | — |
//! | Russia | 16° | 15° | — | — |
//! | Singapore | 20° | 18° | — | — |
//! | NU | 20° | 18° | — | — |
//! | MU | 18° | 18° | — | — |

use qtty::Degrees;
use std::str::FromStr;

use crate::error::Error;
use crate::settings::{DuskOffset, MidnightRule};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named calculation-method preset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Method {
    /// Muslim World League.
    Mwl,
    /// Islamic Society of North America.
    Isna,
    /// Egyptian General Authority of Survey.
    Egypt,
    /// Umm Al-Qura University, Makkah.
    Makkah,
    /// University of Islamic Sciences, Karachi.
    Karachi,
    /// Institute of Geophysics, University of Tehran.
    Tehran,
    /// Shia Ithna-Ashari, Leva Institute, Qum.
    Jafari,
    /// Union des Organisations Islamiques de France.
    France,
    /// Spiritual Administration of Muslims of Russia.
    Russia,
    /// Majlis Ugama Islam Singapura.
    Singapore,
    /// Nahdlatul Ulama, Indonesia.
    Nu,
    /// Muhammadiyah, Indonesia.
    Mu,
}

/// Partial parameter set contributed by one layer of the settings merge.
///
/// `None` fields are inherited from the layer below.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct MethodParams {
    pub(crate) fajr: Option<Degrees>,
    pub(crate) maghrib: Option<DuskOffset>,
    pub(crate) isha: Option<DuskOffset>,
    pub(crate) midnight: Option<MidnightRule>,
}

impl MethodParams {
    const EMPTY: Self = Self {
        fajr: None,
        maghrib: None,
        isha: None,
        midnight: None,
    };

    /// The fallback layer merged underneath every named preset.
    pub(crate) fn defaults() -> Self {
        Self {
            fajr: None,
            maghrib: Some(DuskOffset::Minutes(1.0)),
            isha: Some(DuskOffset::Angle(Degrees::new(14.0))),
            midnight: Some(MidnightRule::Standard),
        }
    }

    fn angles(fajr: f64, isha: f64) -> Self {
        Self {
            fajr: Some(Degrees::new(fajr)),
            isha: Some(DuskOffset::Angle(Degrees::new(isha))),
            ..Self::EMPTY
        }
    }
}

impl Method {
    /// Every known preset, in declaration order.
    pub const ALL: [Method; 12] = [
        Method::Mwl,
        Method::Isna,
        Method::Egypt,
        Method::Makkah,
        Method::Karachi,
        Method::Tehran,
        Method::Jafari,
        Method::France,
        Method::Russia,
        Method::Singapore,
        Method::Nu,
        Method::Mu,
    ];

    /// Canonical preset name.
    pub const fn name(self) -> &'static str {
        match self {
            Method::Mwl => "MWL",
            Method::Isna => "ISNA",
            Method::Egypt => "Egypt",
            Method::Makkah => "Makkah",
            Method::Karachi => "Karachi",
            Method::Tehran => "Tehran",
            Method::Jafari => "Jafari",
            Method::France => "France",
            Method::Russia => "Russia",
            Method::Singapore => "Singapore",
            Method::Nu => "NU",
            Method::Mu => "MU",
        }
    }

    /// The preset's partial parameter set.
    pub(crate) fn params(self) -> MethodParams {
        match self {
            Method::Mwl => MethodParams::angles(18.0, 17.0),
            Method::Isna => MethodParams::angles(15.0, 15.0),
            Method::Egypt => MethodParams::angles(19.5, 17.5),
            Method::Makkah => MethodParams {
                fajr: Some(Degrees::new(18.5)),
                isha: Some(DuskOffset::Minutes(90.0)),
                ..MethodParams::EMPTY
            },
            Method::Karachi => MethodParams::angles(18.0, 18.0),
            Method::Tehran => MethodParams {
                fajr: Some(Degrees::new(17.7)),
                maghrib: Some(DuskOffset::Angle(Degrees::new(4.5))),
                midnight: Some(MidnightRule::Jafari),
                ..MethodParams::EMPTY
            },
            Method::Jafari => MethodParams {
                fajr: Some(Degrees::new(16.0)),
                maghrib: Some(DuskOffset::Angle(Degrees::new(4.0))),
                midnight: Some(MidnightRule::Jafari),
                ..MethodParams::EMPTY
            },
            Method::France => MethodParams::angles(12.0, 12.0),
            Method::Russia => MethodParams::angles(16.0, 15.0),
            Method::Singapore => MethodParams::angles(20.0, 18.0),
            Method::Nu => MethodParams::angles(20.0, 18.0),
            Method::Mu => MethodParams::angles(18.0, 18.0),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Resolve a preset by its canonical name.  Unknown names are a
    /// configuration error — there is no silent fallback.
    fn from_str(s: &str) -> Result<Self, Error> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}
