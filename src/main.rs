use clap::Parser;

mod capgains;
mod cmd;
mod disclaimer;
mod record;
mod report;
mod sources;
mod strategy;
mod transaction;
mod utils;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = cmd::Cli::parse();
    if !cli.quiet {
        disclaimer::show();
    }
    cli.exec()
}
