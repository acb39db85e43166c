mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use sbfplot::filter::loader::load_filter;
use sbfplot::{DefaultSurface, PlotConfig, PlotSession};

use cli::Args;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = PlotConfig::load(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let opts = args.plot_options(&config);

    let filter = load_filter(&args.snapshot)
        .with_context(|| format!("loading filter {}", args.snapshot.display()))?;

    let mut session = PlotSession::new(filter);
    let mut surface = DefaultSurface {
        width: config.width,
        height: config.height,
    };

    cli::run(
        &mut session,
        args.kind,
        &opts,
        &mut surface,
        &mut std::io::stdout(),
    )?;
    Ok(())
}
