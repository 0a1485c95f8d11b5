//! Drives both sides of the port-binding protocol against a live Gluon
//! server: a network service announcing ports, and a compute service
//! binding them.

use anyhow::{Context, Result};
use clap::Parser;
use gluon_client::utils::logger;
use gluon_client::utils::validation::Validate;
use gluon_client::{
    connect, Binding, ComputeServiceApi, NetworkServiceApi, PortEvent, TomlConfig,
};

#[derive(Parser)]
#[command(name = "protocol_smoke")]
#[command(about = "Exercise registration, notification and binding against a Gluon server")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "gluon.toml")]
    config: String,

    /// Port to announce and bind
    #[arg(long, default_value = "456")]
    port_id: String,

    #[arg(long, default_value = "vm1")]
    device_id: String,

    #[arg(long, default_value = "myhost")]
    host: String,

    #[arg(long, default_value = "nova")]
    zone: String,

    /// Emit JSON logs instead of compact text
    #[arg(long)]
    json_logs: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;
    config.validate().context("Configuration validation failed")?;

    let network = config.require_network_service()?;
    let compute = config.require_compute_service()?;

    let mut network_api = NetworkServiceApi::with_options(
        connect(&config)?,
        network.name.clone(),
        network.url.clone(),
        config.network_service_options(),
    )?;
    let compute_api = ComputeServiceApi::new(connect(&config)?, compute.name.clone())?;

    network_api.register().await.context("Registration failed")?;
    println!("registered backend '{}': {}", network_api.name(), network_api.is_registered());

    network_api.notify_create(&args.port_id).await?;
    println!("announced port {}", args.port_id);

    let binding = Binding::new(&args.zone, &args.device_id, &args.host);
    compute_api.bind(&args.port_id, &binding).await?;
    network_api
        .notify_event(&args.device_id, &args.port_id, PortEvent::VifPlugged)
        .await?;
    println!(
        "bound port {} (unbound now: {})",
        args.port_id,
        compute_api.is_unbound(&args.port_id).await?
    );

    let details = compute_api.get_vnic_details(&args.port_id).await?;
    println!(
        "vnic type {}, physical network '{}'",
        details.vnic_type, details.physical_network
    );

    compute_api.unbind(&args.port_id).await?;
    network_api
        .notify_event(&args.device_id, &args.port_id, PortEvent::VifUnplugged)
        .await?;
    println!("unbound port {}", args.port_id);

    network_api.notify_delete(&args.port_id).await?;
    println!("withdrew port {}", args.port_id);

    Ok(())
}
