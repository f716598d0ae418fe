use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use pin_mapper::comet::load_comet_connectors_to_fpga;
use pin_mapper::{MappingConfig, comet_dcb, comet_path_finder};
use std::path::PathBuf;

/// Resolves end-to-end signal paths across the COMET, Pathfinder and DCB boards.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Board configuration
    #[arg(short, long, default_value = "config/comet.toml")]
    config: PathBuf,

    /// Overrides the output directory from the configuration
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// DCB GBTx pins to COMET FPGA pins
    CometDcb,
    /// Pathfinder U.FL connectors to COMET FPGA pins
    CometPathFinder,
    /// Both of the above
    All,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = MappingConfig::load(&cli.config)?;
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    info!("Writing to {}", config.output_dir.display());

    let connectors_to_fpga = load_comet_connectors_to_fpga(&config)?;
    match cli.command {
        Command::CometDcb => comet_dcb::run(&config, &connectors_to_fpga),
        Command::CometPathFinder => comet_path_finder::run(&config, &connectors_to_fpga),
        Command::All => {
            comet_dcb::run(&config, &connectors_to_fpga)?;
            comet_path_finder::run(&config, &connectors_to_fpga)
        }
    }
}
