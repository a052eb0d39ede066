//! agri CLI - renders parcel monitoring dashboards and maps from CSV exports.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "agri-cli",
    version,
    about = "Agricultural parcel monitoring dashboard and map toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: agri_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("agri-cli {}", env!("CARGO_PKG_VERSION"));
    agri_cmd::run(cli.command)
}
