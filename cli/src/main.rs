mod cli;
mod commands;

use clap::Parser;
use cli::{Args, Commands};
use eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut out = std::io::stdout().lock();
    match args.command {
        Commands::Ls(a) => commands::ls(&a, &mut out)?,
        Commands::Group(a) => commands::group(&a, &mut out)?,
        Commands::Compact(a) => commands::compact(&a, &mut out)?,
        Commands::Expand(a) => commands::expand(&a, &mut out)?,
        Commands::Plan(a) => commands::plan(&a, &mut out)?,
    }

    Ok(())
}
