// src/main.rs

use cron_runner::{cli, config::RunnerConfig, logging};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(&args.log, args.debug) {
        eprintln!("cron-runner error: {err:#}");
        std::process::exit(1);
    }

    let cfg = match RunnerConfig::from_args(&args) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("cron-runner error: {err:#}");
            eprintln!("run with --help for usage");
            std::process::exit(3);
        }
    };

    if let Err(err) = cron_runner::run(cfg).await {
        eprintln!("cron-runner error: {err:?}");
        std::process::exit(1);
    }
}
