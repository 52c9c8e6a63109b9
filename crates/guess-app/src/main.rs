#![deny(warnings)]

use clap::Parser;

use guess_app::cli::{Cli, run};
use guess_app::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
