//! Scripted host for the strata view manager.
//!
//! Builds a manager over the headless collaborators, replays a short
//! menu → game → dialogs → menu session on a fixed frame clock, and prints
//! what ended up on screen.

mod cli;
mod script;

use anyhow::Context;
use clap::Parser;
use strata_views::ViewManagerConfig;
use tracing::info;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = match &cli.config {
		Some(path) => ViewManagerConfig::load(path).with_context(|| format!("loading view manager config from {}", path.display()))?,
		None => ViewManagerConfig::default(),
	};
	info!(mode = ?cli.mode(), frame = ?cli.frame(), dev_mode = config.dev_mode, "starting demo session");

	let report = script::run(config, cli.mode(), cli.frame()).await?;
	info!(frames = report.frames, opened = report.opened, closed = report.closed, "session finished");
	for (layer, view) in &report.on_screen {
		println!("{layer:<8} {view}");
	}
	Ok(())
}

fn setup_tracing(verbose: u8) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("STRATA_LOG").unwrap_or_else(|_| match verbose {
		0 => EnvFilter::new("strata_views=info,strata_demo=info"),
		1 => EnvFilter::new("strata_views=debug,strata_demo=debug"),
		_ => EnvFilter::new("strata_views=trace,strata_demo=trace"),
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}
