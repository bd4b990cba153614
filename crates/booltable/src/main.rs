use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = booltable::cli::Cli::parse();
    booltable::cli::run(cli)
}
