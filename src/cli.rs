// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - fetch:       download one page and list its links
// - extract:     list the links in a local HTML file (no network)
// - interactive: read URLs line by line; each new one replaces the last
//
// Global flags (--timeout-secs, --user-agent, -v) configure the HTTP
// client and logging for every subcommand.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use link_harvest::FetchConfig;

#[derive(Parser, Debug)]
#[command(
    name = "link-harvest",
    version,
    about = "Fetch a web page and list the absolute http(s) links it contains",
    long_about = "link-harvest downloads a single HTML page and prints every absolute \
                  http/https link found in its <a href> attributes, deduplicated and in \
                  document order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Overall request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(FetchConfig::default_user_agent),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a page and list its links
    ///
    /// Example: link-harvest fetch wikipedia.org
    Fetch {
        /// Page to fetch; https:// is assumed when no scheme is given
        input: String,

        /// Output results in JSON format instead of a list
        #[arg(long)]
        json: bool,

        /// Also print the raw HTML of the page
        #[arg(long)]
        html: bool,
    },

    /// List the links in a local HTML file without fetching anything
    ///
    /// Example: link-harvest extract page.html --base https://example.com/docs/
    Extract {
        /// HTML file to read, or '-' for stdin
        file: PathBuf,

        /// URL the document was fetched from, used to resolve relative links
        #[arg(long)]
        base: String,

        /// Output results in JSON format instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Read one URL per line from stdin; a new line replaces the running fetch
    ///
    /// A blank line cancels the running fetch. Ctrl-C does the same.
    Interactive {
        /// Output each result as one line of JSON
        #[arg(long)]
        json: bool,
    },
}
