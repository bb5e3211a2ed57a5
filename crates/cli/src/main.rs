mod cli;

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tickprof_core::parsers::parse_snapshot;
use tickprof_core::{
    BuildMode, ClockComment, CommentSource, FixedComment, ReportConfig, ReportRenderer,
};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ReportConfig> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ReportConfig::default(),
    };
    if cli.dev {
        config.build_mode = BuildMode::Dev;
    }
    if let Some(rate) = cli.tick_rate {
        if rate == 0 {
            bail!("--tick-rate must be positive");
        }
        config.tick_rate = rate;
    }
    if let Some(separator) = cli.separator {
        config.separator = separator;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let data = std::fs::read(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let result = parse_snapshot(&data, config.separator)
        .with_context(|| format!("parsing snapshot {}", cli.snapshot.display()))?;
    tracing::debug!(
        snapshot = %cli.snapshot.display(),
        locations = result.store().len(),
        tick_span = result.tick_span(),
        "loaded snapshot"
    );

    let comments: Box<dyn CommentSource> = match &cli.comment {
        Some(text) => Box::new(FixedComment::new(text.as_str())),
        None => Box::new(ClockComment::new()),
    };
    let renderer = ReportRenderer::new(&result, &config, comments.as_ref());

    if let Some(output) = &cli.output {
        if !result.save(output, &config, comments.as_ref()) {
            bail!("could not save profiler results to {}", output.display());
        }
        return Ok(());
    }

    let text = if cli.root_only {
        renderer.render_root_timings()
    } else {
        renderer.render()
    };
    std::io::stdout()
        .lock()
        .write_all(text.as_bytes())
        .context("writing report to stdout")?;
    Ok(())
}
