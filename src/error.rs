// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for waqt.
//!
//! All variants are configuration errors: they are raised while resolving
//! settings or validating the requested date, before any computation begins.
//! Astronomically undefined times (polar night / midnight sun) are *not*
//! errors — they propagate as NaN and render as a placeholder string.

use thiserror::Error;

/// Result type for waqt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised during settings resolution and input validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Method name does not match any known preset.
    #[error("unknown calculation method: {0}")]
    UnknownMethod(String),

    /// Asr rule is neither a known school nor a numeric shadow factor.
    #[error("unrecognized asr rule: {0}")]
    InvalidAsrRule(String),

    /// Angle-or-minutes value could not be parsed.
    #[error("malformed angle/minutes value: {0}")]
    InvalidDuskOffset(String),

    /// High-latitude rule name is not recognized.
    #[error("unrecognized high-latitude rule: {0}")]
    InvalidHighLatitudeRule(String),

    /// Midnight rule name is not recognized.
    #[error("unrecognized midnight rule: {0}")]
    InvalidMidnightRule(String),

    /// Rounding mode name is not recognized.
    #[error("unrecognized rounding mode: {0}")]
    InvalidRounding(String),

    /// Time format name is not recognized.
    #[error("unrecognized time format: {0}")]
    InvalidFormat(String),

    /// Timezone identifier is not a valid IANA zone name.
    #[error("unknown timezone identifier: {0}")]
    UnknownTimezone(String),

    /// Fixed UTC offset falls outside the representable range.
    #[error("UTC offset out of range: {0} minutes")]
    UtcOffsetOutOfRange(f64),

    /// Latitude must lie in [-90, 90] degrees.
    #[error("latitude out of range [-90, 90]: {0}")]
    LatitudeOutOfRange(f64),

    /// Longitude must lie in [-180, 180] degrees.
    #[error("longitude out of range [-180, 180]: {0}")]
    LongitudeOutOfRange(f64),

    /// The (year, month, day) triple is not a valid calendar date.
    #[error("invalid calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The solver needs at least one refinement pass.
    #[error("iteration count must be at least 1")]
    ZeroIterations,
}
