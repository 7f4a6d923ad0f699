//! # Veilnet Node
//!
//! Transport and bootstrap plumbing around the veilnet routing core.
//!
//! Everything here is deliberately protocol-free: the directory is a plain
//! key-value store over HTTP, relays and users are small axum services that
//! delegate to [`veilnet_routing`], and bytes move between processes as JSON
//! envelopes over reqwest. The layered-encryption core neither knows nor
//! cares that HTTP is underneath it.
//!
//! Process roles:
//! - **Directory**: relay id to public key store; `POST /relays`, `GET /relays`
//! - **Relay**: peels one onion layer per `POST /message` and forwards
//! - **User**: builds onions on `POST /send`, receives plaintext on
//!   `POST /message`
//!
//! [`launch::launch_network`] starts the three roles in dependency order the
//! way the `veilnet-netd` binary does.

pub mod config;
pub mod directory;
pub mod forwarder;
pub mod http;
pub mod launch;
pub mod relay_node;
pub mod user_node;

pub use config::{NetworkConfig, NodeConfig};
pub use directory::{directory_router, HttpDirectoryClient};
pub use forwarder::HttpForwarder;
pub use launch::launch_network;
pub use relay_node::launch_relay;
pub use user_node::launch_user;
