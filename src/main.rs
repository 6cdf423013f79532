use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vr_skate_runtime::config::{LOOP_HZ, MAX_LOOP_HZ, SkateConfig};

/// VR skateboard locomotion runtime
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file with locomotion tunables (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame loop rate (Hz)
    #[arg(
        long,
        default_value_t = LOOP_HZ,
        value_parser = clap::value_parser!(u64).range(1..=MAX_LOOP_HZ)
    )]
    loop_hz: u64,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    let config = match args.config {
        Some(path) => match SkateConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(1);
            }
        },
        None => SkateConfig::default(),
    };

    if let Err(e) = vr_skate_runtime::runtime::run(config, args.loop_hz).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
