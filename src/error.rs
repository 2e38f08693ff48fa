// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `huepanel` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! value validation, bridge discovery, connection/pairing, bridge reads and
//! writes, command normalization, and configuration persistence.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all failures that can occur while discovering,
/// connecting to, reading from, or writing to a Hue bridge.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Bridge discovery failed.
    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Opening a session against a bridge failed.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// A bridge read or write failed.
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// A client-supplied command could not be normalized.
    #[error("invalid command: {0}")]
    Command(#[from] CommandError),

    /// Reading or writing the persisted configuration failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },
}

/// Errors reaching or parsing the public discovery service.
///
/// Discovery failures are always non-fatal: the resolver logs them and
/// reports absence. These variants exist so the log line carries the cause.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The discovery request itself failed.
    #[error("discovery request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The discovery service returned a body we could not parse.
    #[error("unexpected discovery response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors opening an authenticated session against a bridge.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The bridge requires its link button to be pressed before it will
    /// pair with a new application. This is a physical, out-of-band step.
    #[error("bridge link button not pressed; press it and retry within 30 seconds")]
    PairingRequired,

    /// The bridge refused the pairing request for another reason.
    #[error("bridge rejected pairing (type {kind}): {description}")]
    PairingRejected {
        /// Hue error type code.
        kind: u32,
        /// Bridge-supplied description.
        description: String,
    },

    /// The handshake request could not reach the bridge.
    #[error("failed to reach bridge: {0}")]
    Http(#[from] reqwest::Error),

    /// The handshake response was not in the expected shape.
    #[error("unexpected handshake response: {0}")]
    Handshake(String),

    /// No bridge address is remembered and discovery found none.
    #[error("no bridge available: no remembered address and discovery found nothing")]
    NoBridgeAvailable,
}

/// Errors on bridge reads and writes after a session is established.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The bridge could not be reached over the network.
    #[error("bridge unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The bridge answered but rejected the operation.
    #[error("bridge rejected request (type {kind}) at {address}: {description}")]
    Rejected {
        /// Hue error type code.
        kind: u32,
        /// Resource address the bridge reported the error against.
        address: String,
        /// Bridge-supplied description.
        description: String,
    },

    /// The bridge answered with a body we could not parse.
    #[error("protocol error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The bridge answered with an unexpected HTTP status.
    #[error("protocol error: bridge returned HTTP {0}")]
    Status(u16),
}

/// Errors normalizing a client-supplied attribute mapping into a command.
///
/// A command is all-or-nothing: any malformed field rejects the whole
/// mapping and nothing is sent to the bridge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A numeric field held a value that is not a number.
    #[error("field '{field}' must be a number")]
    NotNumeric {
        /// The offending input key.
        field: &'static str,
    },

    /// The power field held a value that is not a boolean.
    #[error("field 'on' must be a boolean")]
    NotBoolean,

    /// The request body was not a JSON object.
    #[error("command body must be a JSON object")]
    NotAnObject,
}

/// Errors persisting the remembered bridge address.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Writing the configuration file failed.
    #[error("failed to write config file {path}: {source}")]
    Write {
        /// The configuration file path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
