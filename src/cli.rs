//! Command-line arguments

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "coi_server")]
#[command(about = "Serve a directory over HTTP with cross-origin isolation headers", long_about = None)]
pub struct Cli {
    /// Directory to serve (overrides `server.root`)
    pub root: Option<String>,

    /// Configuration file, extension optional
    #[arg(short, long, default_value = "coi_server")]
    pub config: String,

    /// Listen port (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Listen host (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,
}
