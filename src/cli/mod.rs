//! CLI interface for castgraph.

pub mod handlers;
pub mod output;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::BucketId;
use output::OutputMode;

/// castgraph - co-appearance networks and cast analytics for episodic series
#[derive(Parser)]
#[command(name = "castgraph", version, about, long_about = None)]
pub struct Cli {
    /// Override data directory (default: ./data, then ~/.castgraph)
    #[arg(long, env = "CASTGRAPH_DATA_PATH", global = true)]
    pub data_path: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    /// Output as Markdown
    #[arg(long, global = true)]
    pub md: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Co-appearance network as of an episode
    Network {
        /// Inclusive episode cut-off (default: last episode)
        #[arg(long)]
        episode: Option<i64>,
        /// Minimum appearances for a character to be drawn
        #[arg(long)]
        min_node: Option<u32>,
        /// Minimum shared episodes for an edge to be drawn
        #[arg(long)]
        min_edge: Option<u32>,
        /// Keep only the N most frequent characters
        #[arg(long, conflicts_with = "all")]
        top_n: Option<usize>,
        /// Disable the top-N cap
        #[arg(long)]
        all: bool,
        /// Hide a community bucket (id, "other" or "none"; repeatable)
        #[arg(long, action = clap::ArgAction::Append)]
        hide: Vec<BucketId>,
        /// Maximum edges to list in human output
        #[arg(long, default_value = "25")]
        edges: usize,
    },

    /// Community buckets in legend order
    Communities,

    /// Strongest co-appearance partners of one character
    Partners {
        /// Character name (case-insensitive)
        name: String,
        /// Inclusive episode cut-off (default: last episode)
        #[arg(long)]
        episode: Option<i64>,
        /// Maximum partners
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Per-episode debut and appearance metrics
    Stats {
        /// Rolling mean window (default from config)
        #[arg(long)]
        window: Option<usize>,
        /// Show only the last N episodes
        #[arg(long, default_value = "20")]
        last: usize,
    },

    /// Crew credits per role
    Crew {
        /// Leaderboard entries per role
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Cumulative technique debuts per character
    Techniques {
        /// Minimum total debuts for a character to be listed
        #[arg(long)]
        min_debuts: Option<u32>,
    },

    /// Arcs and sagas present in the data
    Arcs,

    /// Character presence categories
    Presence {
        /// Minimum listings for a character to be included
        #[arg(long)]
        min_count: Option<usize>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: clap_complete::Shell,
    },
}

/// Print shell completions for `shell` to stdout.
pub fn print_completions(shell: clap_complete::Shell) {
    clap_complete::generate(
        shell,
        &mut Cli::command(),
        "castgraph",
        &mut std::io::stdout(),
    );
}

/// Execute a CLI command against a loaded session.
pub fn execute(
    command: &Commands,
    ctx: &crate::init::AppContext,
    mode: OutputMode,
) -> anyhow::Result<()> {
    match command {
        Commands::Network {
            episode,
            min_node,
            min_edge,
            top_n,
            all,
            hide,
            edges,
        } => {
            let top_n = if *all {
                None
            } else {
                top_n.or(ctx.config.top_n)
            };
            let args = handlers::network::NetworkArgs {
                episode: *episode,
                min_node: min_node.unwrap_or(ctx.config.min_node_appearances),
                min_edge: min_edge.unwrap_or(ctx.config.min_edge_weight),
                top_n,
                hide: hide.clone(),
                edge_limit: *edges,
            };
            handlers::network::handle_network(ctx, &args, mode)?
        }

        Commands::Communities => handlers::community::handle_communities(ctx, mode)?,

        Commands::Partners {
            name,
            episode,
            limit,
        } => handlers::network::handle_partners(ctx, name, *episode, *limit, mode)?,

        Commands::Stats { window, last } => handlers::analytics::handle_stats(
            ctx,
            window.unwrap_or(ctx.config.rolling_window),
            *last,
            mode,
        )?,

        Commands::Crew { limit } => handlers::analytics::handle_crew(ctx, *limit, mode)?,

        Commands::Techniques { min_debuts } => handlers::analytics::handle_techniques(
            ctx,
            min_debuts.unwrap_or(ctx.config.technique_min_debuts),
            mode,
        )?,

        Commands::Arcs => handlers::analytics::handle_arcs(ctx, mode)?,

        Commands::Presence { min_count } => handlers::analytics::handle_presence(
            ctx,
            min_count.unwrap_or(ctx.config.presence_min_count),
            mode,
        )?,

        Commands::Completions { shell } => print_completions(*shell),
    }

    Ok(())
}
