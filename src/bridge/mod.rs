// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hue bridge communication.
//!
//! This module talks the bridge's REST API:
//!
//! - [`BridgeClient`]: the live authenticated session handle. Opening one
//!   performs the pairing handshake, which on first-ever pairing requires
//!   the bridge's physical link button to be pressed.
//! - [`DiscoveryResolver`]: queries the public meethue discovery service
//!   for a candidate bridge address.
//! - [`wire`]: raw serde types for bridge payloads.

mod client;
mod discovery;
pub mod wire;

pub use client::BridgeClient;
pub use discovery::{DEFAULT_DISCOVERY_URL, DiscoveryResolver};
