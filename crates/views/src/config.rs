//! Runtime configuration.
//!
//! ```toml
//! dev_mode = false
//!
//! [backdrop]
//! target_alpha = 0.3
//! fade_step = 0.02
//! tick_interval_us = 8300
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level view manager configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewManagerConfig {
	/// Skips the loaded-scene identity check. Meant for editors and local-load
	/// workflows where scenes are swapped behind the manager's back.
	pub dev_mode: bool,
	pub backdrop: BackdropConfig,
}

/// Dimming backdrop behind overlay layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackdropConfig {
	/// Alpha the backdrop fades to while an overlay is open.
	pub target_alpha: f32,
	/// Alpha change per fade tick.
	pub fade_step: f32,
	/// Fade tick length in microseconds.
	pub tick_interval_us: u64,
}

impl Default for ViewManagerConfig {
	fn default() -> Self {
		Self {
			dev_mode: false,
			backdrop: BackdropConfig::default(),
		}
	}
}

impl Default for BackdropConfig {
	fn default() -> Self {
		Self {
			target_alpha: 0.3,
			fade_step: 0.02,
			tick_interval_us: 8_300,
		}
	}
}

impl BackdropConfig {
	pub fn tick_interval(&self) -> Duration {
		Duration::from_micros(self.tick_interval_us)
	}
}

impl ViewManagerConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(src)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let src = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&src)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		let backdrop = &self.backdrop;
		if !(0.0..=1.0).contains(&backdrop.target_alpha) {
			return Err(ConfigError::InvalidAlpha(backdrop.target_alpha));
		}
		if !(backdrop.fade_step > 0.0 && backdrop.fade_step <= 1.0) {
			return Err(ConfigError::InvalidFadeStep(backdrop.fade_step));
		}
		if backdrop.tick_interval_us == 0 {
			return Err(ConfigError::ZeroTickInterval);
		}
		Ok(())
	}
}
