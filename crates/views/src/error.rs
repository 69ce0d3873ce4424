//! Error types for the view manager.

use std::path::PathBuf;

use thiserror::Error;

use crate::ContentLocator;

/// Unrecoverable misuse of the view manager.
///
/// Recoverable misuse (unknown ids, redundant add/remove calls) is logged and
/// ignored instead; everything here means the host is wired up incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
	/// A view id was registered twice.
	#[error("a view with id {view} has already been registered")]
	AlreadyRegistered {
		/// Display form of the duplicate id.
		view: String,
	},

	/// The scene that finished loading is not the one that was requested.
	#[error("scene {loaded:?} finished loading but {expected:?} was requested; scenes must only be changed through the view manager")]
	SceneMismatch {
		/// Scene requested through the manager.
		expected: String,
		/// Scene reported by the loader.
		loaded: String,
	},

	/// A scene finished loading while no scene change was in progress.
	#[error("scene {loaded:?} finished loading but no scene change was requested")]
	UnrequestedScene {
		/// Scene reported by the loader.
		loaded: String,
	},

	/// A scene finished loading before its bundle reported which scene it holds.
	#[error("scene {loaded:?} finished loading before bundle {bundle:?} was ready")]
	SceneBeforeBundle {
		/// Scene reported by the loader.
		loaded: String,
		/// Bundle still in flight.
		bundle: String,
	},

	/// A bundle-backed scene change was requested without a bundle loader.
	#[error("the bundle loader has not been set; bundles cannot be loaded by the view manager")]
	MissingBundleLoader,

	/// Input was re-enabled more often than it was disabled.
	#[error("input disable counter was reduced below zero")]
	InputUnderflow,
}

/// Result type for view manager operations.
pub type Result<T, E = ViewError> = std::result::Result<T, E>;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Backdrop alpha outside `0.0..=1.0`.
	#[error("invalid backdrop alpha {0} (expected 0.0..=1.0)")]
	InvalidAlpha(f32),

	/// Fade step outside `(0.0, 1.0]`.
	#[error("invalid backdrop fade step {0} (expected a value in (0.0, 1.0])")]
	InvalidFadeStep(f32),

	/// Fade tick interval of zero.
	#[error("backdrop tick interval must be non-zero")]
	ZeroTickInterval,
}

/// A renderer failed to produce content for a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to instantiate {locator}: {reason}")]
pub struct RenderError {
	/// Display form of the locator that failed.
	pub locator: String,
	/// Renderer supplied reason.
	pub reason: String,
}

impl RenderError {
	pub fn new(locator: &ContentLocator, reason: impl Into<String>) -> Self {
		Self {
			locator: locator.to_string(),
			reason: reason.into(),
		}
	}
}
