// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for light level control.
//!
//! This module provides a type-safe representation of the bridge's `bri`
//! value, ensuring values are always within the valid range of 1-254.

use std::fmt;

use serde::Serialize;

use crate::error::ValueError;

/// Brightness level on the bridge's native scale (1-254).
///
/// Hue bridges use 1-254 for brightness, where 1 is the dimmest level a
/// light can render while on and 254 is full brightness. Zero is not a
/// valid brightness; turning a light off is a separate power command.
///
/// # Examples
///
/// ```
/// use huepanel::types::Brightness;
///
/// let bri = Brightness::new(200).unwrap();
/// assert_eq!(bri.value(), 200);
///
/// // Out-of-range input clamps to the nearest bound
/// assert_eq!(Brightness::clamped(9999).value(), 254);
/// assert_eq!(Brightness::clamped(-5).value(), 1);
///
/// // Validating constructor rejects instead
/// assert!(Brightness::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum brightness (1).
    pub const MIN: Self = Self(1);

    /// Maximum brightness (254).
    pub const MAX: Self = Self(254);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value is outside 1-254.
    pub fn new(value: i64) -> Result<Self, ValueError> {
        if !(1..=254).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: 254,
                actual: value,
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(value as u8))
    }

    /// Creates a brightness value, clamping to the valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use huepanel::types::Brightness;
    ///
    /// assert_eq!(Brightness::clamped(300).value(), 254);
    /// assert_eq!(Brightness::clamped(0).value(), 1);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn clamped(value: i64) -> Self {
        if value < 1 {
            Self(1)
        } else if value > 254 {
            Self(254)
        } else {
            Self(value as u8)
        }
    }

    /// Returns the native brightness value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Brightness {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
