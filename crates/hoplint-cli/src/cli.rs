use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hoplint")]
#[command(about = "Audit a site's declared redirects against live behavior", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe every declared redirect and report issues
    Audit {
        /// Base URL of the site to audit (e.g. https://example.com)
        base_url: String,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Suggestion payload budget in bytes (default from config: 409600)
        #[arg(long)]
        budget_bytes: Option<usize>,

        /// Concurrent probes (default from config: 8)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Write the packed suggestions as JSON lines to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Fetch and print the declared redirect rules without probing
    Rules {
        /// Base URL of the site to audit
        base_url: String,

        /// Print the rule list as JSON
        #[arg(long)]
        json: bool,
    },
}
