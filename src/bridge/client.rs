// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The live bridge session handle.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::bridge::wire::{ApiError, GroupAttributes, LightAttributes, ReplyEntry};
use crate::command::LightCommand;
use crate::error::{BridgeError, ConnectionError};

/// Application identifier sent in the pairing handshake.
const DEVICE_TYPE: &str = "huepanel#rust";

/// Default request timeout for bridge calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// An authenticated session with one Hue bridge.
///
/// Created by [`BridgeClient::connect`], which performs the pairing
/// handshake: on first-ever pairing with a bridge the physical link button
/// must be pressed, otherwise the handshake fails with
/// [`ConnectionError::PairingRequired`]. The handle is cheap to clone; all
/// clones share one HTTP connection pool and one application key.
///
/// # Examples
///
/// ```no_run
/// use huepanel::bridge::BridgeClient;
///
/// # async fn example() -> huepanel::Result<()> {
/// let session = BridgeClient::connect("192.168.1.42").await?;
/// for id in session.list_light_ids().await? {
///     let light = session.get_light(id).await?;
///     println!("{id}: {} (on: {})", light.name, light.state.on);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BridgeClient {
    client: Client,
    base_url: String,
    app_key: String,
    host: String,
}

impl BridgeClient {
    /// Opens an authenticated session against the bridge at `host`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::PairingRequired`] if the bridge's link
    /// button has not been pressed, [`ConnectionError::PairingRejected`]
    /// for other bridge-side refusals, and [`ConnectionError::Http`] /
    /// [`ConnectionError::Handshake`] for transport or protocol failures.
    pub async fn connect(host: impl Into<String>) -> Result<Self, ConnectionError> {
        let host = host.into();
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.clone()
        } else {
            format!("http://{host}")
        };

        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        tracing::debug!(host = %host, "Starting pairing handshake");

        let response = client
            .post(format!("{base_url}/api"))
            .json(&serde_json::json!({ "devicetype": DEVICE_TYPE }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConnectionError::Handshake(format!(
                "bridge returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let body = response.text().await?;
        let replies: Vec<ReplyEntry> = serde_json::from_str(&body)
            .map_err(|e| ConnectionError::Handshake(format!("{e}: {body}")))?;

        let Some(reply) = replies.into_iter().next() else {
            return Err(ConnectionError::Handshake("empty reply".to_string()));
        };

        if let Some(err) = reply.error {
            return Err(pairing_error(err));
        }

        let app_key = reply
            .success
            .as_ref()
            .and_then(|s| s.get("username"))
            .and_then(Value::as_str)
            .ok_or_else(|| ConnectionError::Handshake("reply carries no username".to_string()))?
            .to_string();

        tracing::info!(host = %host, "Paired with bridge");

        Ok(Self {
            client,
            base_url,
            app_key,
            host,
        })
    }

    /// Returns the address this session is bound to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns all light ids known to the bridge, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the bridge cannot be reached or rejects
    /// the read.
    pub async fn list_light_ids(&self) -> Result<Vec<u32>, BridgeError> {
        let value = self.get_value("/lights").await?;
        let mut ids: Vec<u32> = value
            .as_object()
            .map(|map| map.keys().filter_map(|k| k.parse().ok()).collect())
            .unwrap_or_default();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Fetches the raw state of one light.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Rejected`] if the bridge does not know the
    /// id, or other [`BridgeError`] variants on transport/parse failure.
    pub async fn get_light(&self, id: u32) -> Result<LightAttributes, BridgeError> {
        let value = self.get_value(&format!("/lights/{id}")).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetches all groups as the bridge reports them, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the bridge cannot be reached or rejects
    /// the read.
    pub async fn get_groups_raw(&self) -> Result<Value, BridgeError> {
        self.get_value("/groups").await
    }

    /// Fetches all groups, typed and keyed by numeric group id.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the bridge cannot be reached, rejects the
    /// read, or reports groups in an unexpected shape.
    pub async fn get_groups(&self) -> Result<BTreeMap<u32, GroupAttributes>, BridgeError> {
        let raw: BTreeMap<String, GroupAttributes> =
            serde_json::from_value(self.get_groups_raw().await?)?;
        Ok(raw
            .into_iter()
            .filter_map(|(id, group)| id.parse().ok().map(|id: u32| (id, group)))
            .collect())
    }

    /// Applies a command to one light. Fire-and-confirm: the bridge's reply
    /// is checked for errors, but nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the bridge cannot be reached or rejects
    /// any part of the write.
    pub async fn apply_light_command(
        &self,
        id: u32,
        command: &LightCommand,
    ) -> Result<(), BridgeError> {
        self.put_command(&format!("/lights/{id}/state"), command)
            .await
    }

    /// Applies a command to one group.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the bridge cannot be reached or rejects
    /// any part of the write.
    pub async fn apply_group_command(
        &self,
        id: u32,
        command: &LightCommand,
    ) -> Result<(), BridgeError> {
        self.put_command(&format!("/groups/{id}/action"), command)
            .await
    }

    /// Builds the authenticated URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}{path}", self.base_url, self.app_key)
    }

    /// Performs an authenticated GET and unwraps bridge-level errors.
    async fn get_value(&self, path: &str) -> Result<Value, BridgeError> {
        let url = self.api_url(path);
        tracing::debug!(url = %url, "Bridge GET");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(BridgeError::Status(response.status().as_u16()));
        }

        let value: Value = serde_json::from_str(&response.text().await?)?;
        reject_if_error(value)
    }

    /// Performs an authenticated PUT of a command body and checks the
    /// per-field reply entries for errors.
    async fn put_command(&self, path: &str, command: &LightCommand) -> Result<(), BridgeError> {
        let url = self.api_url(path);
        tracing::debug!(url = %url, command = ?command, "Bridge PUT");

        let response = self.client.put(&url).json(command).send().await?;
        if !response.status().is_success() {
            return Err(BridgeError::Status(response.status().as_u16()));
        }

        let replies: Vec<ReplyEntry> = serde_json::from_str(&response.text().await?)?;
        for reply in replies {
            if let Some(err) = reply.error {
                return Err(rejected(err));
            }
        }
        Ok(())
    }
}

/// Bridges answer failed requests with HTTP 200 and an error array in the
/// body; surface that as a rejection instead of handing it to callers.
fn reject_if_error(value: Value) -> Result<Value, BridgeError> {
    if let Some(entries) = value.as_array() {
        for entry in entries {
            if let Some(err) = entry.get("error") {
                let err: ApiError = serde_json::from_value(err.clone())?;
                return Err(rejected(err));
            }
        }
    }
    Ok(value)
}

fn rejected(err: ApiError) -> BridgeError {
    BridgeError::Rejected {
        kind: err.kind,
        address: err.address,
        description: err.description,
    }
}

fn pairing_error(err: ApiError) -> ConnectionError {
    if err.kind == crate::bridge::wire::LINK_BUTTON_NOT_PRESSED {
        ConnectionError::PairingRequired
    } else {
        ConnectionError::PairingRejected {
            kind: err.kind,
            description: err.description,
        }
    }
}
