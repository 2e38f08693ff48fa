// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized snapshots of the bridge's lights and rooms.
//!
//! The snapshot is the read path's presentation model: one
//! [`LightSummary`] row per light, ordered by id, plus the bridge's groups
//! reduced to the "Room" type. Room data is best-effort; light data is not.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::bridge::BridgeClient;
use crate::bridge::wire::{GroupAttributes, LightAttributes};
use crate::error::BridgeError;

/// Group type discriminator the snapshot surfaces; zones and plain light
/// groups are filtered out.
const ROOM_TYPE: &str = "Room";

/// One light, normalized for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightSummary {
    /// Bridge-assigned id, stable per bridge.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Power state.
    pub on: bool,
    /// Brightness (1-254); 0 when the device reports none.
    pub brightness: u8,
    /// Whether the bridge can currently reach the device.
    pub reachable: bool,
    /// Device type string.
    #[serde(rename = "type")]
    pub kind: String,
    /// True iff the device reports both a hue and a saturation channel.
    pub has_color: bool,
}

impl LightSummary {
    /// Normalizes a raw bridge report into a summary row.
    #[must_use]
    pub fn from_attributes(id: u32, light: &LightAttributes) -> Self {
        Self {
            id,
            name: light.name.clone(),
            on: light.state.on,
            brightness: light.state.bri.unwrap_or(0),
            reachable: light.state.reachable,
            kind: light.kind.clone(),
            has_color: light.state.has_color(),
        }
    }
}

/// One room, normalized for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    /// Display name.
    pub name: String,
    /// Ids of the lights the bridge assigns to this room.
    pub lights: Vec<String>,
}

/// A point-in-time view of everything the panel presents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    /// All lights, ordered by id ascending.
    pub lights: Vec<LightSummary>,
    /// Groups of type "Room", keyed by group id.
    pub rooms: BTreeMap<u32, Room>,
}

/// Reads all lights and rooms through `session` into a [`Snapshot`].
///
/// Rooms are best-effort: a failed group read logs a warning and yields an
/// empty room map, but the lights are still returned. A failed light read
/// fails the whole snapshot.
///
/// # Errors
///
/// Returns [`BridgeError`] if listing or fetching any light fails.
pub async fn build_snapshot(session: &BridgeClient) -> Result<Snapshot, BridgeError> {
    let ids = session.list_light_ids().await?;

    let mut lights = Vec::with_capacity(ids.len());
    for id in ids {
        let attributes = session.get_light(id).await?;
        lights.push(LightSummary::from_attributes(id, &attributes));
    }

    let rooms = match session.get_groups().await {
        Ok(groups) => rooms_only(groups),
        Err(e) => {
            tracing::warn!(error = %e, "Group read failed, presenting lights without rooms");
            BTreeMap::new()
        }
    };

    tracing::debug!(lights = lights.len(), rooms = rooms.len(), "Snapshot assembled");
    Ok(Snapshot { lights, rooms })
}

/// Keeps only groups whose type is exactly "Room".
fn rooms_only(groups: BTreeMap<u32, GroupAttributes>) -> BTreeMap<u32, Room> {
    groups
        .into_iter()
        .filter(|(_, group)| group.kind == ROOM_TYPE)
        .map(|(id, group)| {
            (
                id,
                Room {
                    name: group.name,
                    lights: group.lights,
                },
            )
        })
        .collect()
}
