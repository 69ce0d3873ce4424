use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use strata_views::headless::TransitionMode;

#[derive(Parser, Debug)]
#[command(name = "strata-demo")]
#[command(about = "Plays a scripted menu/game/dialog session against the view manager")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// View manager configuration (TOML)
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Complete transitions one frame at a time instead of immediately
	#[arg(long)]
	pub deferred: bool,

	/// Frame length in milliseconds
	#[arg(long, value_name = "MS", default_value_t = 16)]
	pub frame_ms: u64,

	/// Verbose logging (repeat for trace)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

impl Cli {
	pub fn mode(&self) -> TransitionMode {
		if self.deferred {
			TransitionMode::Deferred
		} else {
			TransitionMode::Immediate
		}
	}

	pub fn frame(&self) -> Duration {
		Duration::from_millis(self.frame_ms.max(1))
	}
}
