// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The eight named entries of a prayer-time table, and the mutable
//! fractional-hour scratch table the solver refines in place.

use qtty::Hours;
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of one entry in the computed time table.
///
/// The ordering is the chronological order of the times within a day and is
/// stable: iteration over a `BTreeMap<TimeName, _>` yields Fajr first and
/// Midnight last.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimeName {
    Fajr = 0,
    Sunrise = 1,
    Dhuhr = 2,
    Asr = 3,
    Sunset = 4,
    Maghrib = 5,
    Isha = 6,
    Midnight = 7,
}

impl TimeName {
    /// All entries in table order.
    pub const ALL: [TimeName; 8] = [
        TimeName::Fajr,
        TimeName::Sunrise,
        TimeName::Dhuhr,
        TimeName::Asr,
        TimeName::Sunset,
        TimeName::Maghrib,
        TimeName::Isha,
        TimeName::Midnight,
    ];

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            TimeName::Fajr => "Fajr",
            TimeName::Sunrise => "Sunrise",
            TimeName::Dhuhr => "Dhuhr",
            TimeName::Asr => "Asr",
            TimeName::Sunset => "Sunset",
            TimeName::Maghrib => "Maghrib",
            TimeName::Isha => "Isha",
            TimeName::Midnight => "Midnight",
        }
    }
}

impl std::fmt::Display for TimeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Scratch table of fractional hours since UTC midnight of the query day.
///
/// Rebuilt from seed values at the start of every computation, refined in
/// place through the solver stages, then converted to timestamps.  Never
/// retained between calls.
#[derive(Debug, Copy, Clone)]
pub(crate) struct TimeTable {
    values: [Hours; 8],
}

impl TimeTable {
    /// Rough seed times the fixed-point iteration starts from.
    pub(crate) fn seed() -> Self {
        Self {
            values: [
                Hours::new(5.0),  // Fajr
                Hours::new(6.0),  // Sunrise
                Hours::new(12.0), // Dhuhr
                Hours::new(13.0), // Asr
                Hours::new(18.0), // Sunset
                Hours::new(18.0), // Maghrib
                Hours::new(18.0), // Isha
                Hours::new(24.0), // Midnight
            ],
        }
    }
}

impl Index<TimeName> for TimeTable {
    type Output = Hours;

    #[inline]
    fn index(&self, name: TimeName) -> &Hours {
        &self.values[name as usize]
    }
}

impl IndexMut<TimeName> for TimeTable {
    #[inline]
    fn index_mut(&mut self, name: TimeName) -> &mut Hours {
        &mut self.values[name as usize]
    }
}
