use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the booltable test suite with cargo nextest
    Test {
        #[arg(long)]
        profile: Option<String>,
        /// Accept pending insta snapshots after the run
        #[arg(long)]
        accept: bool,
    },
    /// Formatting, lints, and tests as run in CI
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Test { profile, accept } => run_tests(profile, accept)?,
        Commands::Ci => run_ci()?,
    }
    Ok(())
}

fn run_tests(profile: Option<String>, accept: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["nextest", "run", "-p", "booltable"]);
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if accept {
        cmd.env("INSTA_UPDATE", "always");
    }
    run(cmd, "cargo nextest run")
}

fn run_ci() -> Result<()> {
    let mut fmt = Command::new("cargo");
    fmt.args(["fmt", "--all", "--check"]);
    run(fmt, "cargo fmt")?;

    let mut clippy = Command::new("cargo");
    clippy.args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]);
    run(clippy, "cargo clippy")?;

    run_tests(Some("ci".into()), false)
}

fn run(mut cmd: Command, label: &str) -> Result<()> {
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}
