// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Hue bridge commands.
//!
//! This module provides type-safe representations of the values a Hue bridge
//! accepts in light and group commands. Each type ensures values are within
//! the bridge-native range at construction time.
//!
//! # Types
//!
//! - [`Brightness`] - Brightness level (1-254)
//! - [`HueValue`] - Hue angle on the bridge's 16-bit wheel (0-65535)
//! - [`Saturation`] - Color saturation (0-254)
//! - [`ColorTemp`] - White color temperature in mireds (153-500)
//!
//! Every type offers both a validating constructor (`new`) and a clamping
//! one (`clamped`). The control-panel write path always clamps: out-of-range
//! client input is pulled to the nearest bound, never rejected.

mod brightness;
mod color;

pub use brightness::Brightness;
pub use color::{ColorTemp, HueValue, Saturation};
