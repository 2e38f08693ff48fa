// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw serde types for Hue bridge payloads.
//!
//! These mirror the bridge's v1 REST API shapes as reported, before any
//! normalization. Fields the bridge omits for non-color or non-dimmable
//! devices are `Option`s.

use serde::{Deserialize, Serialize};

/// Current state of a light, as reported by the bridge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightState {
    /// Power state.
    pub on: bool,
    /// Brightness (1-254). Absent on non-dimmable devices.
    pub bri: Option<u8>,
    /// Hue (0-65535). Absent on devices without a color channel.
    pub hue: Option<u16>,
    /// Saturation (0-254). Absent on devices without a color channel.
    pub sat: Option<u8>,
    /// Color temperature in mireds. Absent on fixed-white devices.
    pub ct: Option<u16>,
    /// Whether the bridge can currently reach the device.
    pub reachable: bool,
}

impl LightState {
    /// A light "has color" iff its state carries both a hue and a
    /// saturation channel.
    #[must_use]
    pub const fn has_color(&self) -> bool {
        self.hue.is_some() && self.sat.is_some()
    }
}

/// Attributes of a light, as reported by the bridge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightAttributes {
    /// Display name.
    pub name: String,
    /// Device type string, e.g. "Extended color light".
    #[serde(rename = "type")]
    pub kind: String,
    /// Current state.
    pub state: LightState,
}

/// Attributes of a group, as reported by the bridge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupAttributes {
    /// Display name.
    pub name: String,
    /// Group type discriminator: "Room", "Zone", "LightGroup", ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Ids of the lights in the group.
    #[serde(default)]
    pub lights: Vec<String>,
}

/// One entry in the bridge's reply to a pairing or write request.
///
/// The bridge answers these requests with an array of entries, each either
/// a `success` or an `error` object.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyEntry {
    /// Present on success. The payload shape varies per request.
    pub success: Option<serde_json::Value>,
    /// Present on failure.
    pub error: Option<ApiError>,
}

/// An error object inside a bridge reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Hue error type code. 101 means the link button was not pressed.
    #[serde(rename = "type")]
    pub kind: u32,
    /// Resource address the error refers to.
    #[serde(default)]
    pub address: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// Hue error type code for "link button not pressed".
pub const LINK_BUTTON_NOT_PRESSED: u32 = 101;

/// One candidate bridge in the discovery service's reply.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryEntry {
    /// The bridge's address on the local network.
    pub internalipaddress: String,
}
