// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge discovery via the public meethue service.

use std::time::Duration;

use reqwest::Client;

use crate::bridge::wire::DiscoveryEntry;
use crate::error::DiscoveryError;

/// The public Hue discovery endpoint.
pub const DEFAULT_DISCOVERY_URL: &str = "https://discovery.meethue.com/";

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolver for finding a bridge on the local network.
///
/// Issues one query to the discovery service and reports the first
/// candidate's address. Discovery never fails loudly: any network or parse
/// problem is logged and collapses to "no bridge found".
///
/// # Examples
///
/// ```no_run
/// use huepanel::bridge::DiscoveryResolver;
///
/// # async fn example() {
/// let resolver = DiscoveryResolver::new();
/// match resolver.discover().await {
///     Some(addr) => println!("found bridge at {addr}"),
///     None => println!("no bridge found"),
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DiscoveryResolver {
    endpoint: String,
}

impl DiscoveryResolver {
    /// Creates a resolver against the public discovery service.
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_DISCOVERY_URL)
    }

    /// Creates a resolver against a custom discovery endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Queries the discovery service for a bridge address.
    ///
    /// Returns the `internalipaddress` of the first candidate, or `None`
    /// when the service lists none or cannot be reached.
    pub async fn discover(&self) -> Option<String> {
        match self.try_discover().await {
            Ok(Some(addr)) => {
                tracing::info!(address = %addr, "Discovered bridge");
                Some(addr)
            }
            Ok(None) => {
                tracing::info!("Discovery service lists no bridges");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Bridge discovery failed");
                None
            }
        }
    }

    async fn try_discover(&self) -> Result<Option<String>, DiscoveryError> {
        let client = Client::builder().timeout(DISCOVERY_TIMEOUT).build()?;

        tracing::debug!(endpoint = %self.endpoint, "Querying discovery service");
        let body = client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let entries: Vec<DiscoveryEntry> = serde_json::from_str(&body)?;
        Ok(entries.into_iter().next().map(|e| e.internalipaddress))
    }
}

impl Default for DiscoveryResolver {
    fn default() -> Self {
        Self::new()
    }
}
