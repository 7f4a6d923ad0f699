//! End-to-end tests over real HTTP: a launched overlay delivering messages
//! between users through the relay chain.
//!
//! Each test uses its own port range so they can run concurrently.

use serde_json::{json, Value};
use veilnet_node::{launch_network, NetworkConfig, NodeConfig};
use veilnet_routing::RoutingConfig;

fn test_network(
    directory_port: u16,
    relay_base: u64,
    user_base: u64,
    relays: u32,
    users: u32,
) -> NetworkConfig {
    let routing = RoutingConfig::new()
        .with_relay_address_base(relay_base)
        .with_user_address_base(user_base);
    let node = NodeConfig::new()
        .with_directory_port(directory_port)
        .with_routing(routing);
    NetworkConfig::new(relays, users).with_node(node)
}

#[tokio::test]
async fn message_crosses_the_overlay() {
    let config = test_network(18080, 14000, 13000, 3, 2);
    let node = config.node.clone();
    let _handles = launch_network(&config).await.unwrap();

    let client = reqwest::Client::new();
    let message = "mëet at the üsual place";

    let sender_url = node.address_url(node.routing.user_address(0));
    let response = client
        .post(format!("{sender_url}/send"))
        .json(&json!({ "message": message, "destinationUserId": 1 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // The forward chain is synchronous, so delivery finished before /send
    // answered.
    let receiver_url = node.address_url(node.routing.user_address(1));
    let received: Value = client
        .get(format!("{receiver_url}/diagnostics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(received["lastReceivedMessage"], message);

    let sent: Value = client
        .get(format!("{sender_url}/diagnostics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(sent["lastSentMessage"], message);

    // The audit trail lists exactly the chosen circuit, in order.
    assert_eq!(received["lastAuditTrail"], sent["lastCircuit"]);

    // Every relay on the circuit saw and forwarded one layer.
    for id in sent["lastCircuit"].as_array().unwrap() {
        let relay_url = node.address_url(node.routing.relay_address(id.as_u64().unwrap() as u32));
        let diagnostics: Value = client
            .get(format!("{relay_url}/diagnostics"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(diagnostics["lastDestination"].is_u64());
        assert!(diagnostics["lastReceivedEncrypted"].is_string());
    }
}

#[tokio::test]
async fn send_fails_when_the_directory_is_too_small() {
    let config = test_network(18090, 14100, 13100, 2, 1);
    let node = config.node.clone();
    let _handles = launch_network(&config).await.unwrap();

    let client = reqwest::Client::new();
    let sender_url = node.address_url(node.routing.user_address(0));
    let response = client
        .post(format!("{sender_url}/send"))
        .json(&json!({ "message": "nobody will carry this", "destinationUserId": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn malformed_envelopes_are_rejected_at_the_relay() {
    let config = test_network(18100, 14200, 13200, 1, 0);
    let node = config.node.clone();
    let _handles = launch_network(&config).await.unwrap();

    let client = reqwest::Client::new();
    let relay_url = node.address_url(node.routing.relay_address(0));

    // Shorter than the fixed key-encapsulation width.
    let response = client
        .post(format!("{relay_url}/message"))
        .json(&json!({ "onion": "far too short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    // Correct width, but not encrypted for this relay.
    let bogus = "A".repeat(veilnet_routing::ENCAPSULATED_KEY_B64_LEN + 40);
    let response = client
        .post(format!("{relay_url}/message"))
        .json(&json!({ "onion": bogus }))
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        reqwest::StatusCode::UNPROCESSABLE_ENTITY
    );
}
