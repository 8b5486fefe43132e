use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

mod completion;
mod config;
mod dispatch;
mod render;

#[derive(Parser, Debug)]
#[command(name = "apkgraph")]
#[command(about = "Dependency graph visualizer for Alpine package indexes", long_about = None)]
struct Cli {
    /// Config file; defaults to $XDG_CONFIG_HOME/apkgraph/config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Repository URL or path to a local APKINDEX / APKINDEX.tar.gz.
    #[arg(long, global = true)]
    repository: Option<String>,
    /// Download the index again even if a cached copy exists.
    #[arg(long, global = true)]
    refresh: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build and render the dependency graph of a package.
    Graph(GraphArgs),
    /// Show the index entry of a package.
    Info { package: String },
    /// List packages whose name contains the query.
    Search { query: String },
    /// Print a shell completion script.
    Completions { shell: Shell },
}

#[derive(clap::Args, Debug, Clone, Default)]
struct GraphArgs {
    package: String,
    #[arg(long)]
    max_depth: Option<usize>,
    /// Mermaid renderer program (e.g. mmdc).
    #[arg(long)]
    renderer: Option<PathBuf>,
    /// Image written by the renderer.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Where the Mermaid source is written before rendering.
    #[arg(long)]
    diagram: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = GraphFormat::Mermaid)]
    format: GraphFormat,
    /// Print the graph without invoking the renderer.
    #[arg(long)]
    no_render: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum GraphFormat {
    #[default]
    Mermaid,
    Edges,
    Json,
}

fn main() -> Result<()> {
    dispatch::run_cli(Cli::parse())
}
