//! Command line entry points.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::export::{ExportFormat, ExportOptions, Exporter};
use crate::app::session::{SESSION_DIR, SessionStore};
use crate::app::state::Derived;
use crate::infra::config::{self, Config};
use crate::infra::location;
use crate::infra::logging::{self, LogConfig, LogTarget};
use crate::ui::app::UiApp;

const LOG_FILE: &str = "booltable.log";

#[derive(Debug, Parser)]
#[command(
    name = "booltable",
    author,
    version,
    about = "Enumerate every true/false combination of named options",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Start the editor from a shareable link or query string
    #[arg(long, conflicts_with = "options")]
    pub url: Option<String>,

    /// Start the editor with this option text
    #[arg(long)]
    pub options: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the truth table for comma separated options
    Table {
        /// Option names, e.g. "loggedIn, isAdmin"
        options: String,
        /// Output format (defaults to the configured export format)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
    },
    /// Print a shareable link for comma separated options
    Url {
        /// Option names, e.g. "loggedIn, isAdmin"
        options: String,
        /// Override the configured base URL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let log_config = LogConfig::from_verbosity(cli.verbose);
    match cli.command {
        Some(command) => {
            logging::init_logging(&log_config)?;
            let config = Config::load()?;
            run_command(command, &config, &mut io::stdout().lock())
        }
        None => {
            let root = config::workspace_root()?;
            let log_path = root.join(SESSION_DIR).join(LOG_FILE);
            logging::init_logging(&log_config.with_target(LogTarget::File(log_path)))?;
            let config = Config::load()?;
            let store = SessionStore::new(&root);
            let initial = initial_query(cli.url.as_deref(), cli.options.as_deref(), &store)?;
            tracing::info!(location = %initial, "starting editor");
            let mut app = UiApp::new(config, initial, store)?;
            app.run()
        }
    }
}

fn run_command(command: Commands, config: &Config, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Table { options, format } => {
            let derived = Derived::from_text(&options);
            if derived.options.len() > config.defaults.option_limit {
                tracing::warn!(
                    count = derived.options.len(),
                    limit = config.defaults.option_limit,
                    "large option count; output grows as 2^n"
                );
            }
            let mut export = ExportOptions::from_config(config);
            if let Some(format) = format {
                export.format = format;
            }
            let rendered = Exporter::new()?.render(&derived, &export)?;
            writeln!(out, "{}", rendered.trim_end_matches('\n')).context("failed to write table")?;
        }
        Commands::Url { options, base_url } => {
            let base = base_url.as_deref().unwrap_or(&config.defaults.base_url);
            let url = location::shareable_url(base, &location::options_query(&options))?;
            writeln!(out, "{url}").context("failed to write url")?;
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "booltable", out);
        }
    }
    Ok(())
}

/// Pick the starting location: explicit options, then a link, then the saved session.
fn initial_query(url: Option<&str>, options: Option<&str>, store: &SessionStore) -> Result<String> {
    if let Some(options) = options {
        return Ok(location::options_query(options));
    }
    if let Some(url) = url {
        return Ok(location::query_from_url(url));
    }
    Ok(store
        .load()
        .context("failed to restore previous session")?
        .map(|snapshot| snapshot.location)
        .unwrap_or_default())
}
