use anyhow::Result;
use folder_merger::cli;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = cli::parse();
    app::run(args)
}
