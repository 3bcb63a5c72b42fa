//! PVA CLI - merge NASA POWER climate data with plant meter exports and
//! report performance against the PV*SOL estimate.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "pva-cli",
    version,
    about = "Solar PV plant performance analysis toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: pva_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Starting pva-cli {}", env!("CARGO_PKG_VERSION"));
    pva_cmd::run(cli.command).await
}
