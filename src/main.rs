//! dotview - live Graphviz preview windows
//!
//! Opens a preview surface for each DOT file given on the command line and
//! keeps it in sync with the file on disk.

use anyhow::{bail, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use dotview::cli::CliArgs;
use dotview::config::PreviewConfig;

mod runtime;

use runtime::App;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    dotview::tracing::init();

    let mut config = PreviewConfig::load();
    args.apply_to(&mut config);

    if args.save_config {
        config.save().map_err(anyhow::Error::msg)?;
        if args.files.is_empty() {
            return Ok(());
        }
    }

    let documents = match args.documents() {
        Ok(documents) => documents,
        Err(e) => bail!(e),
    };

    let template = config.template_path();
    if !template.is_file() {
        tracing::warn!("Template {} not found", template.display());
    }
    tracing::info!("Previewing {} file(s) with {}", documents.len(), template.display());

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, documents);

    event_loop.run_app(&mut app)?;

    Ok(())
}
