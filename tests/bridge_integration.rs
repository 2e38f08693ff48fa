// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a mock Hue bridge using wiremock.

use std::path::PathBuf;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use huepanel::error::{BridgeError, ConnectionError, Error};
use huepanel::handlers::{self, IndexOutcome, SetupOutcome};
use huepanel::{BridgeClient, ConnectionManager, build_snapshot};

/// Application key the mock bridge hands out on pairing.
const APP_KEY: &str = "abc123";

/// Mounts a successful pairing handshake on `server`.
async fn mount_pairing_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"success": {"username": APP_KEY}}])),
        )
        .mount(server)
        .await;
}

/// Starts a mock discovery service answering every GET with `entries`.
async fn discovery_returning(entries: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .mount(&server)
        .await;
    server
}

/// A config file path in the temp dir that does not exist yet.
fn temp_config(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "huepanel-itest-{}-{name}.env",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn api_path(suffix: &str) -> String {
    format!("/api/{APP_KEY}{suffix}")
}

// ============================================================================
// Pairing handshake
// ============================================================================

mod pairing {
    use super::*;

    #[tokio::test]
    async fn connect_succeeds_on_pairing_success() {
        let bridge = MockServer::start().await;
        mount_pairing_ok(&bridge).await;

        let session = BridgeClient::connect(bridge.uri()).await.unwrap();
        assert_eq!(session.host(), bridge.uri());
    }

    #[tokio::test]
    async fn link_button_not_pressed_is_pairing_required() {
        let bridge = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"error": {"type": 101, "address": "/", "description": "link button not pressed"}}
            ])))
            .mount(&bridge)
            .await;

        let err = BridgeClient::connect(bridge.uri()).await.unwrap_err();
        assert!(matches!(err, ConnectionError::PairingRequired));
    }

    #[tokio::test]
    async fn other_bridge_refusal_is_pairing_rejected() {
        let bridge = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"error": {"type": 7, "address": "/", "description": "invalid value"}}
            ])))
            .mount(&bridge)
            .await;

        let err = BridgeClient::connect(bridge.uri()).await.unwrap_err();
        assert!(matches!(err, ConnectionError::PairingRejected { kind: 7, .. }));
    }

    #[tokio::test]
    async fn http_error_status_fails_handshake() {
        let bridge = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&bridge)
            .await;

        let err = BridgeClient::connect(bridge.uri()).await.unwrap_err();
        assert!(matches!(err, ConnectionError::Handshake(_)));
    }
}

// ============================================================================
// Session reads and writes
// ============================================================================

mod session {
    use super::*;

    async fn connected_session(bridge: &MockServer) -> BridgeClient {
        mount_pairing_ok(bridge).await;
        BridgeClient::connect(bridge.uri()).await.unwrap()
    }

    #[tokio::test]
    async fn light_ids_come_back_sorted() {
        let bridge = MockServer::start().await;
        let session = connected_session(&bridge).await;

        Mock::given(method("GET"))
            .and(path(api_path("/lights")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "10": {}, "2": {}, "7": {}
            })))
            .mount(&bridge)
            .await;

        assert_eq!(session.list_light_ids().await.unwrap(), vec![2, 7, 10]);
    }

    #[tokio::test]
    async fn get_light_parses_attributes() {
        let bridge = MockServer::start().await;
        let session = connected_session(&bridge).await;

        Mock::given(method("GET"))
            .and(path(api_path("/lights/7")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Hue color lamp",
                "type": "Extended color light",
                "state": {
                    "on": true, "bri": 144, "hue": 13088, "sat": 212,
                    "ct": 467, "reachable": true
                }
            })))
            .mount(&bridge)
            .await;

        let light = session.get_light(7).await.unwrap();
        assert_eq!(light.name, "Hue color lamp");
        assert!(light.state.has_color());
        assert_eq!(light.state.bri, Some(144));
    }

    #[tokio::test]
    async fn unknown_light_surfaces_rejection() {
        let bridge = MockServer::start().await;
        let session = connected_session(&bridge).await;

        Mock::given(method("GET"))
            .and(path(api_path("/lights/99")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"error": {"type": 3, "address": "/lights/99", "description": "resource not available"}}
            ])))
            .mount(&bridge)
            .await;

        let err = session.get_light(99).await.unwrap_err();
        assert!(matches!(err, BridgeError::Rejected { kind: 3, .. }));
    }

    #[tokio::test]
    async fn light_command_puts_clamped_body() {
        let bridge = MockServer::start().await;
        let session = connected_session(&bridge).await;

        Mock::given(method("PUT"))
            .and(path(api_path("/lights/5/state")))
            .and(body_json(json!({"bri": 254, "hue": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"success": {"/lights/5/state/bri": 254}},
                {"success": {"/lights/5/state/hue": 0}}
            ])))
            .expect(1)
            .mount(&bridge)
            .await;

        let command =
            huepanel::LightCommand::normalize(&json!({"brightness": 300, "hue": -10})).unwrap();
        session.apply_light_command(5, &command).await.unwrap();
    }

    #[tokio::test]
    async fn group_command_targets_action_endpoint() {
        let bridge = MockServer::start().await;
        let session = connected_session(&bridge).await;

        Mock::given(method("PUT"))
            .and(path(api_path("/groups/3/action")))
            .and(body_json(json!({"on": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"success": {"/groups/3/action/on": false}}
            ])))
            .expect(1)
            .mount(&bridge)
            .await;

        let command = huepanel::LightCommand::normalize(&json!({"on": false})).unwrap();
        session.apply_group_command(3, &command).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_write_is_an_error() {
        let bridge = MockServer::start().await;
        let session = connected_session(&bridge).await;

        Mock::given(method("PUT"))
            .and(path(api_path("/lights/5/state")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"error": {"type": 201, "address": "/lights/5/state/bri",
                           "description": "parameter, bri, is not modifiable"}}
            ])))
            .mount(&bridge)
            .await;

        let command = huepanel::LightCommand::normalize(&json!({"brightness": 10})).unwrap();
        let err = session.apply_light_command(5, &command).await.unwrap_err();
        assert!(matches!(err, BridgeError::Rejected { kind: 201, .. }));
    }
}

// ============================================================================
// Connection manager lifecycle
// ============================================================================

mod connection {
    use super::*;

    #[tokio::test]
    async fn ensure_connected_is_idempotent() {
        let bridge = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"success": {"username": APP_KEY}}])),
            )
            .expect(1)
            .mount(&bridge)
            .await;

        // A discovery service that must never be consulted.
        let discovery = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&discovery)
            .await;

        let manager = ConnectionManager::builder()
            .config_path(temp_config("idempotent"))
            .discovery_url(discovery.uri())
            .address(bridge.uri())
            .build();

        manager.ensure_connected().await.unwrap();
        manager.ensure_connected().await.unwrap();
        assert!(manager.is_connected().await);
    }

    #[tokio::test]
    async fn fallback_tries_discovery_then_fails_without_touching_config() {
        let dead_bridge = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&dead_bridge)
            .await;

        let discovery = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&discovery)
            .await;

        let config = temp_config("fallback-fail");
        std::fs::write(&config, format!("HUE_BRIDGE_IP={}\n", dead_bridge.uri())).unwrap();

        let manager = ConnectionManager::builder()
            .config_path(&config)
            .discovery_url(discovery.uri())
            .address(dead_bridge.uri())
            .build();

        assert!(manager.ensure_connected().await.is_err());
        assert!(!manager.is_connected().await);

        // The remembered address survives the failure for the next retry.
        let contents = std::fs::read_to_string(&config).unwrap();
        assert_eq!(contents, format!("HUE_BRIDGE_IP={}\n", dead_bridge.uri()));
        assert_eq!(manager.bridge_address().await, Some(dead_bridge.uri()));
        std::fs::remove_file(&config).unwrap();
    }

    #[tokio::test]
    async fn dead_remembered_address_falls_back_to_discovered_bridge() {
        let dead_bridge = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&dead_bridge)
            .await;

        let good_bridge = MockServer::start().await;
        mount_pairing_ok(&good_bridge).await;

        let discovery =
            discovery_returning(json!([{"internalipaddress": good_bridge.uri()}])).await;

        let config = temp_config("fallback-ok");
        let manager = ConnectionManager::builder()
            .config_path(&config)
            .discovery_url(discovery.uri())
            .address(dead_bridge.uri())
            .build();

        manager.ensure_connected().await.unwrap();
        assert_eq!(manager.bridge_address().await, Some(good_bridge.uri()));

        let contents = std::fs::read_to_string(&config).unwrap();
        assert_eq!(contents, format!("HUE_BRIDGE_IP={}\n", good_bridge.uri()));
        std::fs::remove_file(&config).unwrap();
    }

    #[tokio::test]
    async fn discovered_address_is_persisted_exactly_once() {
        let bridge = MockServer::start().await;
        mount_pairing_ok(&bridge).await;

        let discovery = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"internalipaddress": bridge.uri()}])),
            )
            .expect(1)
            .mount(&discovery)
            .await;

        let config = temp_config("discovery-persist");
        let manager = ConnectionManager::builder()
            .config_path(&config)
            .discovery_url(discovery.uri())
            .build();

        manager.ensure_connected().await.unwrap();
        // Second call must not re-discover or re-persist.
        manager.ensure_connected().await.unwrap();

        let contents = std::fs::read_to_string(&config).unwrap();
        assert_eq!(contents, format!("HUE_BRIDGE_IP={}\n", bridge.uri()));
        std::fs::remove_file(&config).unwrap();
    }

    #[tokio::test]
    async fn submitted_address_is_remembered_even_when_connect_fails() {
        let dead_bridge = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&dead_bridge)
            .await;

        let discovery = discovery_returning(json!([])).await;

        let config = temp_config("submit-keeps");
        let manager = ConnectionManager::builder()
            .config_path(&config)
            .discovery_url(discovery.uri())
            .build();

        assert!(manager.set_address(dead_bridge.uri()).await.is_err());
        assert_eq!(manager.bridge_address().await, Some(dead_bridge.uri()));

        let contents = std::fs::read_to_string(&config).unwrap();
        assert_eq!(contents, format!("HUE_BRIDGE_IP={}\n", dead_bridge.uri()));
        std::fs::remove_file(&config).unwrap();
    }
}

// ============================================================================
// Snapshot assembly
// ============================================================================

mod snapshots {
    use super::*;

    async fn bridge_with_one_light() -> (MockServer, BridgeClient) {
        let bridge = MockServer::start().await;
        mount_pairing_ok(&bridge).await;

        Mock::given(method("GET"))
            .and(path(api_path("/lights")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"1": {}})))
            .mount(&bridge)
            .await;
        Mock::given(method("GET"))
            .and(path(api_path("/lights/1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Desk",
                "type": "Dimmable light",
                "state": {"on": true, "bri": 100, "reachable": true}
            })))
            .mount(&bridge)
            .await;

        let session = BridgeClient::connect(bridge.uri()).await.unwrap();
        (bridge, session)
    }

    #[tokio::test]
    async fn group_failure_degrades_to_empty_rooms() {
        let (bridge, session) = bridge_with_one_light().await;

        Mock::given(method("GET"))
            .and(path(api_path("/groups")))
            .respond_with(ResponseTemplate::new(500))
            .mount(&bridge)
            .await;

        let snapshot = build_snapshot(&session).await.unwrap();
        assert_eq!(snapshot.lights.len(), 1);
        assert_eq!(snapshot.lights[0].name, "Desk");
        assert!(snapshot.rooms.is_empty());
    }

    #[tokio::test]
    async fn only_room_groups_are_surfaced() {
        let (bridge, session) = bridge_with_one_light().await;

        Mock::given(method("GET"))
            .and(path(api_path("/groups")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "1": {"name": "Living room", "type": "Room", "lights": ["1"]},
                "2": {"name": "Upstairs", "type": "Zone", "lights": ["1"]}
            })))
            .mount(&bridge)
            .await;

        let snapshot = build_snapshot(&session).await.unwrap();
        assert_eq!(snapshot.rooms.len(), 1);
        assert_eq!(snapshot.rooms[&1].name, "Living room");
    }
}

// ============================================================================
// Handler end-to-end
// ============================================================================

mod handler_flow {
    use super::*;

    async fn panel(bridge: &MockServer, name: &str) -> ConnectionManager {
        mount_pairing_ok(bridge).await;
        // Discovery is not under test here; an unreachable endpoint just
        // collapses to "no bridge found" if anything consults it.
        ConnectionManager::builder()
            .config_path(temp_config(name))
            .discovery_url("http://127.0.0.1:9/")
            .address(bridge.uri())
            .build()
    }

    #[tokio::test]
    async fn put_light_returns_spec_reply() {
        let bridge = MockServer::start().await;
        let manager = panel(&bridge, "e2e-put").await;

        Mock::given(method("PUT"))
            .and(path(api_path("/lights/5/state")))
            .and(body_json(json!({"bri": 254, "hue": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"success": {"/lights/5/state/bri": 254}}
            ])))
            .expect(1)
            .mount(&bridge)
            .await;

        let reply =
            handlers::update_light(&manager, 5, &json!({"brightness": 300, "hue": -10}))
                .await
                .unwrap();

        assert_eq!(
            serde_json::to_value(reply).unwrap(),
            json!({"success": true, "light_id": 5, "command": {"bri": 254, "hue": 0}})
        );
    }

    #[tokio::test]
    async fn malformed_command_never_reaches_the_bridge() {
        let bridge = MockServer::start().await;
        let manager = panel(&bridge, "e2e-invalid").await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&bridge)
            .await;

        let err = handlers::update_light(&manager, 5, &json!({"hue": "red"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Command(_)));
    }

    #[tokio::test]
    async fn lights_json_is_keyed_by_id() {
        let bridge = MockServer::start().await;
        let manager = panel(&bridge, "e2e-lights").await;

        Mock::given(method("GET"))
            .and(path(api_path("/lights")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"3": {}})))
            .mount(&bridge)
            .await;
        Mock::given(method("GET"))
            .and(path(api_path("/lights/3")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Hallway",
                "type": "Color light",
                "state": {"on": false, "bri": 40, "hue": 100, "sat": 50, "reachable": false}
            })))
            .mount(&bridge)
            .await;
        Mock::given(method("GET"))
            .and(path(api_path("/groups")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&bridge)
            .await;

        let lights = handlers::lights_json(&manager).await.unwrap();
        assert_eq!(lights.len(), 1);
        let light = &lights[&3];
        assert_eq!(light.name, "Hallway");
        assert!(!light.reachable);
        assert!(light.has_color);
    }

    #[tokio::test]
    async fn groups_json_passes_raw_map_through() {
        let bridge = MockServer::start().await;
        let manager = panel(&bridge, "e2e-groups").await;

        let raw = json!({
            "1": {"name": "Kitchen", "type": "Room", "lights": ["4"],
                  "action": {"on": true, "bri": 120}}
        });
        Mock::given(method("GET"))
            .and(path(api_path("/groups")))
            .respond_with(ResponseTemplate::new(200).set_body_json(raw.clone()))
            .mount(&bridge)
            .await;

        assert_eq!(handlers::groups_json(&manager).await.unwrap(), raw);
    }

    #[tokio::test]
    async fn update_group_replies_with_group_id() {
        let bridge = MockServer::start().await;
        let manager = panel(&bridge, "e2e-group-put").await;

        Mock::given(method("PUT"))
            .and(path(api_path("/groups/2/action")))
            .and(body_json(json!({"on": true, "ct": 500})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"success": {"/groups/2/action/on": true}}
            ])))
            .mount(&bridge)
            .await;

        let reply =
            handlers::update_group(&manager, 2, &json!({"on": true, "color_temp": 9000}))
                .await
                .unwrap();

        assert_eq!(
            serde_json::to_value(reply).unwrap(),
            json!({"success": true, "group_id": 2, "command": {"on": true, "ct": 500}})
        );
    }

    #[tokio::test]
    async fn index_renders_dashboard_when_connected() {
        let bridge = MockServer::start().await;
        let manager = panel(&bridge, "e2e-index").await;

        Mock::given(method("GET"))
            .and(path(api_path("/lights")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"1": {}})))
            .mount(&bridge)
            .await;
        Mock::given(method("GET"))
            .and(path(api_path("/lights/1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Desk",
                "type": "Dimmable light",
                "state": {"on": true, "bri": 100, "reachable": true}
            })))
            .mount(&bridge)
            .await;
        Mock::given(method("GET"))
            .and(path(api_path("/groups")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "1": {"name": "Office", "type": "Room", "lights": ["1"]}
            })))
            .mount(&bridge)
            .await;

        match handlers::index(&manager).await {
            IndexOutcome::Dashboard(view) => {
                assert_eq!(view.lights.len(), 1);
                assert_eq!(view.rooms[&1].name, "Office");
                assert_eq!(view.bridge_ip, Some(bridge.uri()));
            }
            IndexOutcome::Setup(view) => panic!("expected dashboard, got setup: {view:?}"),
        }
    }

    #[tokio::test]
    async fn index_falls_back_to_setup_when_nothing_connects() {
        let dead_bridge = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&dead_bridge)
            .await;

        let discovery = discovery_returning(json!([])).await;
        let manager = ConnectionManager::builder()
            .config_path(temp_config("e2e-setupfall"))
            .discovery_url(discovery.uri())
            .address(dead_bridge.uri())
            .build();

        match handlers::index(&manager).await {
            IndexOutcome::Setup(view) => {
                assert!(view.error.is_some());
                assert_eq!(view.current_ip, Some(dead_bridge.uri()));
            }
            IndexOutcome::Dashboard(_) => panic!("expected setup fallback"),
        }
    }

    #[tokio::test]
    async fn blank_setup_submission_rerenders_with_suggestion() {
        let bridge = MockServer::start().await;
        mount_pairing_ok(&bridge).await;
        let discovery =
            discovery_returning(json!([{"internalipaddress": "192.168.1.77"}])).await;

        let manager = ConnectionManager::builder()
            .config_path(temp_config("e2e-setupblank"))
            .discovery_url(discovery.uri())
            .address(bridge.uri())
            .build();

        match handlers::submit_setup(&manager, Some("   ")).await {
            SetupOutcome::Retry(view) => {
                assert_eq!(view.error, None);
                assert_eq!(view.discovered_ip, Some("192.168.1.77".to_string()));
            }
            SetupOutcome::Redirect => panic!("blank submission must not redirect"),
        }
    }

    #[tokio::test]
    async fn valid_setup_submission_redirects() {
        let bridge = MockServer::start().await;
        let manager = panel(&bridge, "e2e-setupok").await;

        let uri = bridge.uri();
        let outcome = handlers::submit_setup(&manager, Some(uri.as_str())).await;
        assert!(matches!(outcome, SetupOutcome::Redirect));
        assert_eq!(manager.bridge_address().await, Some(bridge.uri()));
    }
}
