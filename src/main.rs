//! castgraph - co-appearance networks and cast analytics for episodic series
//!
//! Usage:
//!   castgraph network --episode 500      Network as of episode 500
//!   castgraph communities                Community legend
//!   castgraph partners "Nami"            Strongest partners of a character
//!   castgraph stats                      Per-episode metrics
//!   castgraph --help                     Show all commands

use anyhow::Result;
use clap::Parser;

use castgraph::cli::output::OutputMode;
use castgraph::cli::{print_completions, Cli, Commands};
use castgraph::init::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("castgraph=info".parse()?),
        )
        .init();

    let mode = OutputMode::from_flags(cli.json, cli.md);

    match &cli.command {
        Commands::Completions { shell } => print_completions(*shell),
        cmd => {
            let ctx = AppContext::new(cli.data_path.clone()).await?;
            castgraph::cli::execute(cmd, &ctx, mode)?;
        }
    }

    Ok(())
}
