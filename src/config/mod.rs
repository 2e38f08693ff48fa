// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistence for the remembered bridge address.
//!
//! The panel remembers exactly one datum across restarts: the bridge's
//! network address, stored as a single `HUE_BRIDGE_IP=<address>` line. The
//! `HUE_BRIDGE_IP` process environment variable, when set, takes precedence
//! over the file at load time; stores always rewrite the file wholesale.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The environment variable and file key holding the bridge address.
pub const BRIDGE_IP_KEY: &str = "HUE_BRIDGE_IP";

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_FILE: &str = ".env";

/// Loads and stores the remembered bridge address.
///
/// Loading never fails: a missing or unreadable file just means no address
/// is remembered. Storing reports failure but callers keep the in-memory
/// address either way, so a read-only filesystem degrades to
/// remember-until-restart.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store over the default `.env` file.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(DEFAULT_CONFIG_FILE)
    }

    /// Creates a store over a custom file path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the remembered bridge address, if any.
    ///
    /// The `HUE_BRIDGE_IP` environment variable wins over the file so an
    /// operator can pin an address per process.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        if let Ok(addr) = std::env::var(BRIDGE_IP_KEY)
            && !addr.trim().is_empty()
        {
            tracing::debug!(address = %addr, "Bridge address from environment");
            return Some(addr.trim().to_string());
        }
        self.load_from_file()
    }

    fn load_from_file(&self) -> Option<String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Could not read config file");
                return None;
            }
        };

        for line in contents.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            if let Some(value) = line.strip_prefix(BRIDGE_IP_KEY)
                && let Some(value) = value.trim_start().strip_prefix('=')
            {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
        None
    }

    /// Persists `address`, rewriting the file wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Write`] if the file cannot be written.
    pub fn store(&self, address: &str) -> Result<(), ConfigError> {
        fs::write(&self.path, format!("{BRIDGE_IP_KEY}={address}\n")).map_err(|source| {
            ConfigError::Write {
                path: self.path.display().to_string(),
                source,
            }
        })?;
        tracing::info!(address = %address, path = %self.path.display(), "Persisted bridge address");
        Ok(())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str) -> ConfigStore {
        let mut path = std::env::temp_dir();
        path.push(format!("huepanel-test-{}-{name}.env", std::process::id()));
        let _ = fs::remove_file(&path);
        ConfigStore::with_path(path)
    }

    #[test]
    fn missing_file_loads_nothing() {
        let store = temp_config("missing");
        assert_eq!(store.load_from_file(), None);
    }

    #[test]
    fn store_then_load_round_trips() {
        let store = temp_config("roundtrip");
        store.store("192.168.1.42").unwrap();
        assert_eq!(store.load_from_file(), Some("192.168.1.42".to_string()));
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn store_rewrites_wholesale() {
        let store = temp_config("rewrite");
        fs::write(store.path(), "OTHER_KEY=keepme\nHUE_BRIDGE_IP=10.0.0.1\n").unwrap();
        store.store("10.0.0.2").unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "HUE_BRIDGE_IP=10.0.0.2\n");
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn load_skips_comments_and_blank_values() {
        let store = temp_config("comments");
        fs::write(
            store.path(),
            "# HUE_BRIDGE_IP=commented\nHUE_BRIDGE_IP = 172.16.0.9\n",
        )
        .unwrap();
        assert_eq!(store.load_from_file(), Some("172.16.0.9".to_string()));

        fs::write(store.path(), "HUE_BRIDGE_IP=\n").unwrap();
        assert_eq!(store.load_from_file(), None);
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn store_into_unwritable_path_errors() {
        let store = ConfigStore::with_path("/definitely/not/a/real/dir/.env");
        assert!(store.store("10.0.0.1").is_err());
    }
}
