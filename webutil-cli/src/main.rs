use webutil_cli::{
    commands::{self, Cli},
    config::Config,
};

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenv().ok();
    // Config via env: WEBUTIL_OUTPUT, WEBUTIL_LOG, WEBUTIL_ALLOWED_HOST, WEBUTIL_DOSEQ
    let cfg = Config::from_env();
    init_tracing(&cfg.log_filter);

    let cli = Cli::parse();

    let output = commands::run(&cli.command, &cfg)?;
    println!("{}", output.render(cfg.output));
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("[log] invalid WEBUTIL_LOG filter {filter:?} ({e}); using \"warn\"");
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
