// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color value types: hue, saturation, and color temperature.

use std::fmt;

use serde::Serialize;

use crate::error::ValueError;

/// Hue angle on the bridge's 16-bit color wheel (0-65535).
///
/// 0 and 65535 are both red; 25500 is green, 46920 is blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HueValue(u16);

impl HueValue {
    /// Minimum hue (0).
    pub const MIN: Self = Self(0);

    /// Maximum hue (65535).
    pub const MAX: Self = Self(65535);

    /// Creates a new hue value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value is outside 0-65535.
    pub fn new(value: i64) -> Result<Self, ValueError> {
        if !(0..=65535).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 65535,
                actual: value,
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(value as u16))
    }

    /// Creates a hue value, clamping to the valid range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn clamped(value: i64) -> Self {
        if value < 0 {
            Self(0)
        } else if value > 65535 {
            Self(65535)
        } else {
            Self(value as u16)
        }
    }

    /// Returns the native hue value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for HueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Color saturation (0-254), where 0 is white and 254 is fully saturated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Saturation(u8);

impl Saturation {
    /// Minimum saturation (0, white).
    pub const MIN: Self = Self(0);

    /// Maximum saturation (254).
    pub const MAX: Self = Self(254);

    /// Creates a new saturation value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value is outside 0-254.
    pub fn new(value: i64) -> Result<Self, ValueError> {
        if !(0..=254).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 254,
                actual: value,
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(value as u8))
    }

    /// Creates a saturation value, clamping to the valid range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn clamped(value: i64) -> Self {
        if value < 0 {
            Self(0)
        } else if value > 254 {
            Self(254)
        } else {
            Self(value as u8)
        }
    }

    /// Returns the native saturation value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Saturation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// White color temperature in mireds (153-500).
///
/// 153 mireds is the coolest white a Hue bulb renders (~6500K), 500 the
/// warmest (~2000K).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ColorTemp(u16);

impl ColorTemp {
    /// Coolest supported temperature (153 mireds).
    pub const MIN: Self = Self(153);

    /// Warmest supported temperature (500 mireds).
    pub const MAX: Self = Self(500);

    /// Creates a new color temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value is outside 153-500.
    pub fn new(value: i64) -> Result<Self, ValueError> {
        if !(153..=500).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: 153,
                max: 500,
                actual: value,
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(value as u16))
    }

    /// Creates a color temperature, clamping to the valid range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn clamped(value: i64) -> Self {
        if value < 153 {
            Self(153)
        } else if value > 500 {
            Self(500)
        } else {
            Self(value as u16)
        }
    }

    /// Returns the temperature in mireds.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ColorTemp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mireds", self.0)
    }
}
