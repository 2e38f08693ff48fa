// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `huepanel` - the bridge-connection and command core of a local Philips
//! Hue control panel.
//!
//! This library acquires a Hue bridge (remembered address first, network
//! discovery as fallback), holds the single authenticated session to it,
//! normalizes loosely-typed client requests into range-clamped bridge
//! commands, and assembles presentation-ready snapshots of lights and
//! rooms. The web server, routing, and HTML rendering live in the embedding
//! application; this crate defines the handler semantics they wire up.
//!
//! # Architecture
//!
//! - [`manager::ConnectionManager`]: owns the process-wide session and the
//!   remembered address; `ensure_connected` is idempotent and safe before
//!   every request
//! - [`bridge::BridgeClient`]: the live session handle (pairing handshake,
//!   typed reads, fire-and-confirm writes)
//! - [`bridge::DiscoveryResolver`]: queries the public discovery service,
//!   never fails loudly
//! - [`command::LightCommand`]: validated, clamped device commands
//! - [`snapshot`]: the normalized read path (lights + "Room" groups)
//! - [`handlers`]: the HTTP surface as framework-free functions
//!
//! # Quick Start
//!
//! ```no_run
//! use huepanel::ConnectionManager;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> huepanel::Result<()> {
//!     // Loads HUE_BRIDGE_IP from the environment or .env; connects on
//!     // first use. First-ever pairing with a bridge requires its link
//!     // button to be pressed.
//!     let manager = ConnectionManager::new();
//!     let _ = manager.ensure_connected().await;
//!
//!     // Dim light 5, clamped to the bridge's native ranges.
//!     let reply = huepanel::handlers::update_light(
//!         &manager,
//!         5,
//!         &json!({"on": true, "brightness": 300}),
//!     )
//!     .await?;
//!     assert_eq!(reply.command.bri.unwrap().value(), 254);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Pairing
//!
//! The one-time pairing handshake cannot be automated: when the bridge's
//! link button has not been pressed, connecting fails with
//! [`error::ConnectionError::PairingRequired`] so the caller can render
//! actionable guidance instead of a generic connection error.

pub mod bridge;
pub mod command;
pub mod config;
pub mod error;
pub mod handlers;
pub mod manager;
pub mod snapshot;
pub mod types;

pub use bridge::{BridgeClient, DiscoveryResolver};
pub use command::LightCommand;
pub use config::ConfigStore;
pub use error::{
    BridgeError, CommandError, ConfigError, ConnectionError, DiscoveryError, Error, Result,
    ValueError,
};
pub use manager::{ConnectionManager, ConnectionManagerBuilder};
pub use snapshot::{LightSummary, Room, Snapshot, build_snapshot};
pub use types::{Brightness, ColorTemp, HueValue, Saturation};
