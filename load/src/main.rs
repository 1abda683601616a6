//! Command-line entry point for the Skyward load driver

use anyhow::Context;
use clap::Parser;
use skyward_client::{ClientConfig, SkywardClient};
use skyward_load::{LoadConfig, LoadDriver, metrics};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let load = LoadConfig::parse();
    load.validate()?;

    let mut client_config = ClientConfig::from_env().context("loading client configuration")?;
    if let Some(host) = &load.host {
        client_config = client_config.with_base_url(host.as_str());
    }
    let client = SkywardClient::new(&client_config).context("building HTTP client")?;

    if let Some(addr) = load.metrics_addr {
        metrics::install_exporter(addr)?;
    }

    tracing::info!(
        environment = %client_config.environment,
        base_url = client.base_url(),
        users = load.users,
        spawn_rate = load.spawn_rate,
        "Starting load run"
    );

    let driver = LoadDriver::new(client, client_config.credentials, &load)?;
    let stats = driver.run().await;

    println!("{stats}");

    if stats.has_failures() {
        anyhow::bail!(
            "{} of {} requests failed",
            stats.total_failures(),
            stats.total_requests()
        );
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyward_load=info,skyward_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
