// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection lifecycle management.
//!
//! [`ConnectionManager`] owns the process-wide bridge session: at most one
//! live [`BridgeClient`] at a time, bound to at most one remembered address.
//! Request handlers share it by reference and call
//! [`ensure_connected`](ConnectionManager::ensure_connected) before every
//! request; the call is idempotent and performs no network work while a
//! session is alive.

use tokio::sync::Mutex;

use crate::bridge::{BridgeClient, DiscoveryResolver};
use crate::config::ConfigStore;
use crate::error::ConnectionError;

/// Owner of the single live bridge session.
///
/// Acquisition order on a cold start: the remembered address (environment
/// or config file) is tried first; if that fails or none is remembered,
/// discovery runs once and a successful discovery-derived connection
/// persists the found address. All failures leave the remembered address
/// untouched so the next request can retry.
///
/// The embedding application typically calls
/// [`ensure_connected`](Self::ensure_connected) once at startup and ignores
/// the result; the panel serves its setup page until a bridge is reachable.
///
/// # Examples
///
/// ```no_run
/// use huepanel::manager::ConnectionManager;
///
/// # async fn example() -> huepanel::Result<()> {
/// let manager = ConnectionManager::new();
/// manager.ensure_connected().await?;
///
/// let session = manager.session().await?;
/// let ids = session.list_light_ids().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConnectionManager {
    config: ConfigStore,
    resolver: DiscoveryResolver,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    address: Option<String>,
    session: Option<BridgeClient>,
}

impl ConnectionManager {
    /// Creates a manager with the default config file and discovery
    /// service, loading the remembered address once.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for customizing config path and discovery
    /// endpoint.
    #[must_use]
    pub fn builder() -> ConnectionManagerBuilder {
        ConnectionManagerBuilder::default()
    }

    /// Ensures a live session exists, connecting if necessary.
    ///
    /// Idempotent: with a session already open this returns immediately
    /// without touching the network. Otherwise the remembered address is
    /// tried, then discovery, in that order; a successful discovery-derived
    /// connection persists the discovered address.
    ///
    /// # Errors
    ///
    /// Returns the handshake error of the last attempt, or
    /// [`ConnectionError::NoBridgeAvailable`] when there was nothing to
    /// try. No session is retained on failure and the remembered address
    /// is left unchanged.
    pub async fn ensure_connected(&self) -> Result<(), ConnectionError> {
        let mut inner = self.inner.lock().await;

        if inner.session.is_some() {
            return Ok(());
        }

        let mut last_error = None;

        if let Some(address) = inner.address.clone() {
            match BridgeClient::connect(&address).await {
                Ok(session) => {
                    tracing::info!(address = %address, "Connected to remembered bridge");
                    inner.session = Some(session);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(address = %address, error = %e, "Remembered bridge unreachable, falling back to discovery");
                    last_error = Some(e);
                }
            }
        }

        if let Some(address) = self.resolver.discover().await {
            match BridgeClient::connect(&address).await {
                Ok(session) => {
                    tracing::info!(address = %address, "Connected to discovered bridge");
                    // Write failure only costs us the memory across restarts.
                    if let Err(e) = self.config.store(&address) {
                        tracing::warn!(error = %e, "Could not persist discovered address");
                    }
                    inner.address = Some(address);
                    inner.session = Some(session);
                    return Ok(());
                }
                Err(e) => {
                    tracing::error!(address = %address, error = %e, "Discovered bridge refused connection");
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or(ConnectionError::NoBridgeAvailable))
    }

    /// Returns a handle to the live session, connecting first if needed.
    ///
    /// The handle is a cheap clone sharing the session's connection pool.
    ///
    /// # Errors
    ///
    /// Propagates [`ensure_connected`](Self::ensure_connected) failures.
    pub async fn session(&self) -> Result<BridgeClient, ConnectionError> {
        self.ensure_connected().await?;
        let inner = self.inner.lock().await;
        inner
            .session
            .clone()
            .ok_or(ConnectionError::NoBridgeAvailable)
    }

    /// Replaces the remembered address with an explicit user submission,
    /// then attempts to connect to it.
    ///
    /// The new address is remembered and persisted before the connection
    /// attempt, so a failed handshake (link button not yet pressed, say)
    /// keeps it for the retry. Any prior session is dropped: session and
    /// address change together.
    ///
    /// # Errors
    ///
    /// Returns the connection failure; the address stays remembered.
    pub async fn set_address(&self, address: impl Into<String>) -> Result<(), ConnectionError> {
        let address = address.into();
        {
            let mut inner = self.inner.lock().await;
            inner.session = None;
            inner.address = Some(address.clone());
        }

        tracing::info!(address = %address, "Bridge address set by user");
        if let Err(e) = self.config.store(&address) {
            tracing::warn!(error = %e, "Could not persist submitted address");
        }

        self.ensure_connected().await
    }

    /// Returns the currently remembered bridge address, if any.
    pub async fn bridge_address(&self) -> Option<String> {
        self.inner.lock().await.address.clone()
    }

    /// Returns `true` if a session is currently alive.
    pub async fn is_connected(&self) -> bool {
        self.inner.lock().await.session.is_some()
    }

    /// Returns the discovery resolver this manager consults.
    #[must_use]
    pub fn resolver(&self) -> &DiscoveryResolver {
        &self.resolver
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ConnectionManager`].
#[derive(Debug, Default)]
pub struct ConnectionManagerBuilder {
    config: Option<ConfigStore>,
    resolver: Option<DiscoveryResolver>,
    address: Option<String>,
}

impl ConnectionManagerBuilder {
    /// Uses a custom config file path.
    #[must_use]
    pub fn config_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config = Some(ConfigStore::with_path(path));
        self
    }

    /// Uses a custom discovery endpoint.
    #[must_use]
    pub fn discovery_url(mut self, url: impl Into<String>) -> Self {
        self.resolver = Some(DiscoveryResolver::with_endpoint(url));
        self
    }

    /// Starts with an explicit remembered address, overriding whatever the
    /// config store holds.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Builds the manager, loading the remembered address from the config
    /// store unless one was given explicitly.
    #[must_use]
    pub fn build(self) -> ConnectionManager {
        let config = self.config.unwrap_or_default();
        let address = self.address.or_else(|| config.load());
        if let Some(addr) = &address {
            tracing::info!(address = %addr, "Remembered bridge address loaded");
        }

        ConnectionManager {
            config,
            resolver: self.resolver.unwrap_or_default(),
            inner: Mutex::new(Inner {
                address,
                session: None,
            }),
        }
    }
}
