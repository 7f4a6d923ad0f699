//! Process bootstrap: starts the overlay's roles in dependency order.
//!
//! The directory must be reachable before any relay can publish its key,
//! and every relay must be reachable before a user can route through it, so
//! launch is strictly sequential: directory, then relays one by one, then
//! users.

use anyhow::Context;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::{NetworkConfig, NodeConfig};
use crate::directory::directory_router;
use crate::relay_node::launch_relay;
use crate::user_node::launch_user;

const READINESS_ATTEMPTS: u32 = 20;
const READINESS_INTERVAL: Duration = Duration::from_millis(250);

/// Starts the directory service.
pub async fn launch_directory(node: &NodeConfig) -> anyhow::Result<JoinHandle<()>> {
    let listener = tokio::net::TcpListener::bind((node.host.as_str(), node.directory_port))
        .await
        .with_context(|| format!("directory failed to bind port {}", node.directory_port))?;
    info!(port = node.directory_port, "directory listening");

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, directory_router()).await {
            error!(error = %e, "directory server exited");
        }
    }))
}

/// Polls a service's `/status` route until it answers.
pub async fn wait_for_status(client: &reqwest::Client, base_url: &str) -> anyhow::Result<()> {
    for _ in 0..READINESS_ATTEMPTS {
        match client.get(format!("{base_url}/status")).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            _ => tokio::time::sleep(READINESS_INTERVAL).await,
        }
    }
    anyhow::bail!("{base_url} did not become ready")
}

/// Launches the whole overlay and returns the serving task handles.
pub async fn launch_network(config: &NetworkConfig) -> anyhow::Result<Vec<JoinHandle<()>>> {
    let client = reqwest::Client::new();
    let node = &config.node;
    let mut handles = Vec::new();

    handles.push(launch_directory(node).await?);
    wait_for_status(&client, &node.directory_url()).await?;

    for relay_id in 0..config.relays {
        handles.push(launch_relay(relay_id, node.clone()).await?);
        let url = node.address_url(node.routing.relay_address(relay_id));
        wait_for_status(&client, &url).await?;
    }

    for user_id in 0..config.users {
        handles.push(launch_user(user_id, node.clone()).await?);
        let url = node.address_url(node.routing.user_address(user_id));
        wait_for_status(&client, &url).await?;
    }

    info!(
        relays = config.relays,
        users = config.users,
        "overlay network up"
    );
    Ok(handles)
}
