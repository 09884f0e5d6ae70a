use clap::Parser;

use crate::cli::app::App;

mod cli;
mod logging;
mod settings;

fn main() -> anyhow::Result<()> {
    logging::setup_logging();

    let app = App::parse();
    tracing::debug!(?app, "parsed arguments");

    cli::run::run(app)
}
