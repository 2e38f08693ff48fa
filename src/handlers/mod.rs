// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handler semantics for the panel's HTTP surface.
//!
//! The web framework itself lives outside this crate: an embedding server
//! routes verbs and paths to these functions and maps their typed outcomes
//! to rendered pages, redirects, or JSON responses. Every failure is caught
//! here, logged with context, and converted into either a setup-page view
//! (browser routes) or an [`ApiErrorBody`] with status 500 (API routes);
//! nothing propagates to the serving layer as an unhandled fault.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/` | [`index`] |
//! | GET | `/setup` | [`setup_form`] |
//! | POST | `/setup` | [`submit_setup`] |
//! | GET | `/api/lights` | [`lights_json`] |
//! | PUT | `/api/lights/{id}` | [`update_light`] |
//! | GET | `/api/groups` | [`groups_json`] |
//! | PUT | `/api/groups/{id}` | [`update_group`] |

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::command::LightCommand;
use crate::error::Error;
use crate::manager::ConnectionManager;
use crate::snapshot::{self, LightSummary, Room};

/// HTTP status the serving layer uses for [`ApiErrorBody`] responses.
pub const API_ERROR_STATUS: u16 = 500;

/// Data for the main dashboard page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// All lights, ordered by id.
    pub lights: Vec<LightSummary>,
    /// Rooms keyed by group id.
    pub rooms: BTreeMap<u32, Room>,
    /// The connected bridge's address.
    pub bridge_ip: Option<String>,
}

/// Data for the setup page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SetupView {
    /// Error text to show, if the last attempt failed.
    pub error: Option<String>,
    /// Address suggested by discovery, if any.
    pub discovered_ip: Option<String>,
    /// The currently remembered address, if any.
    pub current_ip: Option<String>,
}

/// Outcome of the index route.
#[derive(Debug, Clone)]
pub enum IndexOutcome {
    /// Render the dashboard.
    Dashboard(DashboardView),
    /// Not connected (or the read failed): render the setup page.
    Setup(SetupView),
}

/// Outcome of a setup form submission.
#[derive(Debug, Clone)]
pub enum SetupOutcome {
    /// Connected: redirect to `/`.
    Redirect,
    /// Not connected: re-render the setup page.
    Retry(SetupView),
}

/// JSON body for failed API routes, served with status 500.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    /// Human-readable failure description.
    pub error: String,
}

impl ApiErrorBody {
    /// Converts a handler error into the API error body.
    #[must_use]
    pub fn from_error(err: &Error) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Reply body for successful light and group updates.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReply {
    /// Always `true`; failures use [`ApiErrorBody`] instead.
    pub success: bool,
    /// Set for light updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_id: Option<u32>,
    /// Set for group updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u32>,
    /// The normalized command as sent to the bridge.
    pub command: LightCommand,
}

/// GET `/` — the dashboard, or the setup page when no bridge is usable.
pub async fn index(manager: &ConnectionManager) -> IndexOutcome {
    if let Err(e) = manager.ensure_connected().await {
        tracing::error!(error = %e, "Index request with no usable bridge");
        return IndexOutcome::Setup(SetupView {
            error: Some(e.to_string()),
            current_ip: manager.bridge_address().await,
            ..SetupView::default()
        });
    }

    let snapshot = match manager.session().await {
        Ok(session) => snapshot::build_snapshot(&session).await,
        Err(e) => {
            return IndexOutcome::Setup(SetupView {
                error: Some(e.to_string()),
                current_ip: manager.bridge_address().await,
                ..SetupView::default()
            });
        }
    };

    match snapshot {
        Ok(snapshot) => IndexOutcome::Dashboard(DashboardView {
            lights: snapshot.lights,
            rooms: snapshot.rooms,
            bridge_ip: manager.bridge_address().await,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read lights for dashboard");
            IndexOutcome::Setup(SetupView {
                error: Some(e.to_string()),
                current_ip: manager.bridge_address().await,
                ..SetupView::default()
            })
        }
    }
}

/// GET `/setup` — the setup page, with a discovery-suggested address.
pub async fn setup_form(manager: &ConnectionManager) -> SetupView {
    SetupView {
        error: None,
        discovered_ip: manager.resolver().discover().await,
        current_ip: manager.bridge_address().await,
    }
}

/// POST `/setup` — submit a bridge address and try to connect.
///
/// A blank or missing `bridge_ip` behaves like the GET route. On a failed
/// connection the new address stays remembered and the setup page is
/// re-rendered with the failure text and a fresh discovery suggestion.
pub async fn submit_setup(manager: &ConnectionManager, bridge_ip: Option<&str>) -> SetupOutcome {
    let submitted = bridge_ip.map(str::trim).filter(|ip| !ip.is_empty());

    let error = if let Some(address) = submitted {
        match manager.set_address(address).await {
            Ok(()) => return SetupOutcome::Redirect,
            Err(e) => {
                tracing::error!(address = %address, error = %e, "Submitted bridge address did not connect");
                Some(e.to_string())
            }
        }
    } else {
        None
    };

    SetupOutcome::Retry(SetupView {
        error,
        discovered_ip: manager.resolver().discover().await,
        current_ip: manager.bridge_address().await,
    })
}

/// GET `/api/lights` — all lights as a JSON map keyed by id.
///
/// # Errors
///
/// Returns [`Error`] when no bridge is usable or a read fails; the serving
/// layer maps it through [`ApiErrorBody`] to status 500.
pub async fn lights_json(manager: &ConnectionManager) -> Result<BTreeMap<u32, LightSummary>, Error> {
    let session = manager.session().await?;
    let snapshot = snapshot::build_snapshot(&session).await?;
    Ok(snapshot
        .lights
        .into_iter()
        .map(|light| (light.id, light))
        .collect())
}

/// PUT `/api/lights/{id}` — normalize and apply a light command.
///
/// # Errors
///
/// Returns [`Error::Command`] for malformed input (nothing is sent to the
/// bridge), or connection/bridge errors for transport failures.
pub async fn update_light(
    manager: &ConnectionManager,
    id: u32,
    body: &Value,
) -> Result<UpdateReply, Error> {
    let command = LightCommand::normalize(body)?;
    let session = manager.session().await?;
    session.apply_light_command(id, &command).await?;

    tracing::info!(light = id, command = ?command, "Applied light command");
    Ok(UpdateReply {
        success: true,
        light_id: Some(id),
        group_id: None,
        command,
    })
}

/// GET `/api/groups` — the raw group map as the bridge reports it.
///
/// # Errors
///
/// Returns [`Error`] when no bridge is usable or the read fails.
pub async fn groups_json(manager: &ConnectionManager) -> Result<Value, Error> {
    let session = manager.session().await?;
    Ok(session.get_groups_raw().await?)
}

/// PUT `/api/groups/{id}` — normalize and apply a group command.
///
/// # Errors
///
/// Returns [`Error::Command`] for malformed input, or connection/bridge
/// errors for transport failures.
pub async fn update_group(
    manager: &ConnectionManager,
    id: u32,
    body: &Value,
) -> Result<UpdateReply, Error> {
    let command = LightCommand::normalize(body)?;
    let session = manager.session().await?;
    session.apply_group_command(id, &command).await?;

    tracing::info!(group = id, command = ?command, "Applied group command");
    Ok(UpdateReply {
        success: true,
        light_id: None,
        group_id: Some(id),
        command,
    })
}
