// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Prayer Time Module
//!
//! This crate computes the five daily Islamic prayer times (plus sunrise,
//! sunset, and solar midnight) for an arbitrary date, geographic coordinate,
//! and timezone.  It is a pure function of
//! `(date, location, timezone, method parameters) → time table`: no clock
//! access, no I/O, no hidden state between calls.
//!
//! # Core types
//!
//! - [`Settings`] — the resolved, immutable configuration for one query.
//! - [`SettingsBuilder`] — layered merge: defaults → method preset → overrides.
//! - [`Method`] — named calculation-method presets (MWL, ISNA, Makkah, …).
//! - [`TimeName`] — the eight named entries of the output table.
//! - [`DuskOffset`] — tagged angle-or-minutes value for Maghrib/Isha.
//! - [`Zone`] — IANA timezone (DST-aware) or fixed UTC offset.
//!
//! # Pipeline
//!
//! Each query runs four stages in strict order:
//!
//! | Stage | Role |
//! |-------|------|
//! | Method resolver | merge preset + overrides into [`Settings`] |
//! | Iterative estimator | fixed-point solve from seed times |
//! | High-latitude corrector | clamp twilight offsets to a night fraction |
//! | Formatter/rounder | timezone-aware rendering of UTC timestamps |
//!
//! The solar position (declination + equation of time) is memoized per
//! fractional-hour key inside a single computation and discarded afterwards.
//!
//! # Quick example
//!
//! ```rust
//! use waqt::{Method, Settings, TimeName};
//!
//! let settings = Settings::builder()
//!     .method(Method::Isna)
//!     .location(43.0, -80.0)
//!     .timezone(chrono_tz::America::Toronto)
//!     .build()
//!     .unwrap();
//!
//! let times = settings.times(2024, 6, 21).unwrap();
//! println!("Fajr: {}", times[&TimeName::Fajr]);
//! ```
//!
//! # Undefined times
//!
//! Above ~48° latitude the sun may never reach a configured depression angle.
//! Those times propagate as NaN through the pipeline and are either resolved
//! by the high-latitude rule or rendered as the `"-----"` placeholder —
//! never raised as errors.  Configuration errors (unknown method name,
//! malformed asr/angle strings, out-of-range coordinates), by contrast, fail
//! at build time before any computation begins.

mod error;
mod format;
mod math;
mod method;
mod settings;
mod solver;
mod sun;
mod times;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use error::{Error, Result};
pub use format::INVALID_TIME;
pub use method::Method;
pub use settings::{
    AsrRule, DuskOffset, HighLatitudeRule, MidnightRule, Rounding, Settings, SettingsBuilder,
    TimeFormat, Zone,
};
pub use times::TimeName;
