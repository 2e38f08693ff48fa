// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light command definitions and normalization.
//!
//! This module turns the loosely-typed attribute mapping a client submits
//! (`on`, `brightness`, `hue`, `saturation`, `color_temp`) into a
//! [`LightCommand`] carrying the bridge's native fields (`on`, `bri`, `hue`,
//! `sat`, `ct`), each clamped to its valid range.
//!
//! | input key     | native field | valid range |
//! |---------------|--------------|-------------|
//! | `on`          | `on`         | boolean     |
//! | `brightness`  | `bri`        | 1-254       |
//! | `hue`         | `hue`        | 0-65535     |
//! | `saturation`  | `sat`        | 0-254       |
//! | `color_temp`  | `ct`         | 153-500     |
//!
//! Absent keys stay absent: a command only changes the fields the client
//! supplied. Normalization is all-or-nothing; one malformed field rejects
//! the whole mapping and nothing is sent to the bridge.

use serde::Serialize;
use serde_json::Value;

use crate::error::CommandError;
use crate::types::{Brightness, ColorTemp, HueValue, Saturation};

/// A validated, range-clamped set of light attributes to apply in one write.
///
/// Serializes to the exact JSON body the bridge expects on
/// `PUT /lights/{id}/state` and `PUT /groups/{id}/action`; `None` fields are
/// omitted so partial updates leave the other attributes untouched.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use huepanel::command::LightCommand;
///
/// let body = json!({"brightness": 300, "hue": -10});
/// let cmd = LightCommand::normalize(&body).unwrap();
///
/// assert_eq!(serde_json::to_value(&cmd).unwrap(), json!({"bri": 254, "hue": 0}));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LightCommand {
    /// Power state, if the client supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,

    /// Brightness (1-254), if supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<Brightness>,

    /// Hue (0-65535), if supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<HueValue>,

    /// Saturation (0-254), if supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat: Option<Saturation>,

    /// Color temperature in mireds (153-500), if supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<ColorTemp>,
}

impl LightCommand {
    /// Builds a command from an untyped client attribute mapping.
    ///
    /// Recognized keys are mapped and clamped per the module table;
    /// unrecognized keys are ignored. An input with no recognized keys
    /// yields an empty command, which the bridge treats as a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NotAnObject`] if `body` is not a JSON object,
    /// [`CommandError::NotBoolean`] if `on` is not a boolean, and
    /// [`CommandError::NotNumeric`] if a numeric field cannot be read as an
    /// integer. No partial command is produced on error.
    pub fn normalize(body: &Value) -> Result<Self, CommandError> {
        let Some(map) = body.as_object() else {
            return Err(CommandError::NotAnObject);
        };

        let mut command = Self::default();

        if let Some(value) = map.get("on") {
            command.on = Some(value.as_bool().ok_or(CommandError::NotBoolean)?);
        }
        if let Some(value) = map.get("brightness") {
            command.bri = Some(Brightness::clamped(coerce_int(value, "brightness")?));
        }
        if let Some(value) = map.get("hue") {
            command.hue = Some(HueValue::clamped(coerce_int(value, "hue")?));
        }
        if let Some(value) = map.get("saturation") {
            command.sat = Some(Saturation::clamped(coerce_int(value, "saturation")?));
        }
        if let Some(value) = map.get("color_temp") {
            command.ct = Some(ColorTemp::clamped(coerce_int(value, "color_temp")?));
        }

        Ok(command)
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.on.is_none()
            && self.bri.is_none()
            && self.hue.is_none()
            && self.sat.is_none()
            && self.ct.is_none()
    }
}

/// Reads a JSON value as an integer the way the panel's clients send them:
/// integers, floats (truncated toward zero), and integer strings.
fn coerce_int(value: &Value, field: &'static str) -> Result<i64, CommandError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                #[allow(clippy::cast_possible_truncation)]
                Ok(f as i64)
            } else {
                // u64 beyond i64::MAX; far past every clamp ceiling.
                Ok(i64::MAX)
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| CommandError::NotNumeric { field }),
        _ => Err(CommandError::NotNumeric { field }),
    }
}
