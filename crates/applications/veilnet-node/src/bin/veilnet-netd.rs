//! Launches a local veilnet overlay: directory, relays and users.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use veilnet_node::{launch_network, NetworkConfig, NodeConfig};
use veilnet_routing::RoutingConfig;

#[derive(Parser, Debug)]
#[command(name = "veilnet-netd", about = "Run a local veilnet onion overlay")]
struct Args {
    /// Number of relays to launch
    #[arg(long, default_value_t = 3)]
    relays: u32,

    /// Number of users to launch
    #[arg(long, default_value_t = 2)]
    users: u32,

    /// Host every service binds and dials on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Directory service port
    #[arg(long, default_value_t = 8080)]
    directory_port: u16,

    /// Base of the relay address space (relay n listens here + n)
    #[arg(long, default_value_t = 4000)]
    relay_address_base: u64,

    /// Base of the user address space (user n listens here + n)
    #[arg(long, default_value_t = 3000)]
    user_address_base: u64,

    /// Relays per circuit
    #[arg(long, default_value_t = 3)]
    circuit_length: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let routing = RoutingConfig::new()
        .with_circuit_length(args.circuit_length)
        .with_relay_address_base(args.relay_address_base)
        .with_user_address_base(args.user_address_base);
    let node = NodeConfig::new()
        .with_host(args.host)
        .with_directory_port(args.directory_port)
        .with_routing(routing);
    let config = NetworkConfig::new(args.relays, args.users).with_node(node);

    let _handles = launch_network(&config).await?;
    info!("overlay running, press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    Ok(())
}
