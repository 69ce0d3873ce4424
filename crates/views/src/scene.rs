//! Scene and bundle loading collaborators plus the single-flight load state.

use crate::error::{Result, ViewError};
use crate::{AssetDone, AssetRequest, BundleDone, BundleRequest, Ticket};

/// Starts loading a scene. Completion is reported through
/// [`ViewManager::scene_loaded`](crate::ViewManager::scene_loaded) or a
/// [`SignalSender`](crate::SignalSender).
pub trait SceneLoader {
	fn load(&mut self, scene: &str);
}

impl<F: FnMut(&str)> SceneLoader for F {
	fn load(&mut self, scene: &str) {
		self(scene)
	}
}

/// Loads asset bundles: scene bundles for scene changes, and the content of
/// views registered with a bundle locator.
///
/// `A` is the renderer's [`Asset`](crate::Renderer::Asset) type.
pub trait BundleLoader<A> {
	/// Starts loading `request`. `done` must be resolved with the name of the
	/// scene inside the bundle; dropping it reports failure.
	fn load(&mut self, request: BundleRequest, done: BundleDone);

	/// Starts loading the content of a bundled view. `done` carries the asset
	/// back; dropping it reports failure, which is all the default does.
	fn load_view(&mut self, request: AssetRequest, done: AssetDone<A>) {
		tracing::warn!(asset = %request, "this bundle loader cannot load views");
		drop(done);
	}
}

/// What a bundle completion meant for the current load.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum BundleOutcome {
	/// The ticket belongs to a request that was superseded.
	Stale,
	/// The bundle is ready; this scene should be loaded next.
	Scene(String),
	/// The bundle failed; the load was abandoned with `dropped` callbacks.
	Failed { bundle: String, dropped: usize },
}

/// Single-flight scene load tracking with callback fan-out.
#[derive(Debug)]
pub(crate) struct LoadState<C> {
	in_progress: bool,
	expected: Option<String>,
	bundle: Option<(Ticket, String)>,
	pending: Vec<C>,
}

impl<C> Default for LoadState<C> {
	fn default() -> Self {
		Self {
			in_progress: false,
			expected: None,
			bundle: None,
			pending: Vec::new(),
		}
	}
}

impl<C> LoadState<C> {
	pub fn is_in_progress(&self) -> bool {
		self.in_progress
	}

	pub fn expected(&self) -> Option<&str> {
		self.expected.as_deref()
	}

	pub fn pending_bundle(&self) -> Option<&str> {
		self.bundle.as_ref().map(|(_, bundle)| bundle.as_str())
	}

	pub fn pending_callbacks(&self) -> usize {
		self.pending.len()
	}

	/// Starts a direct scene load. Returns true if another load was already running.
	pub fn begin(&mut self, scene: &str, callback: Option<C>) -> bool {
		let overlapped = self.in_progress;
		self.in_progress = true;
		self.expected = Some(scene.to_owned());
		self.bundle = None;
		self.pending.extend(callback);
		overlapped
	}

	/// Starts a bundle-backed load. Returns true if another load was already running.
	pub fn begin_bundle(&mut self, ticket: Ticket, bundle: &str, callback: Option<C>) -> bool {
		let overlapped = self.in_progress;
		self.in_progress = true;
		self.expected = None;
		self.bundle = Some((ticket, bundle.to_owned()));
		self.pending.extend(callback);
		overlapped
	}

	pub fn bundle_resolved(&mut self, ticket: Ticket, scene: Option<String>) -> BundleOutcome {
		let Some((_, bundle)) = self.bundle.take_if(|(pending, _)| *pending == ticket) else {
			return BundleOutcome::Stale;
		};
		match scene {
			Some(scene) => {
				self.expected = Some(scene.clone());
				BundleOutcome::Scene(scene)
			}
			None => {
				let dropped = self.pending.len();
				*self = Self::default();
				BundleOutcome::Failed { bundle, dropped }
			}
		}
	}

	/// Applies a loaded notification. On success the load ends and the queued
	/// callbacks are returned in request order; on error nothing changes.
	pub fn resolve(&mut self, loaded: &str, dev_mode: bool) -> Result<Vec<C>> {
		if !dev_mode {
			if !self.in_progress {
				return Err(ViewError::UnrequestedScene { loaded: loaded.to_owned() });
			}
			if let Some((_, bundle)) = &self.bundle {
				return Err(ViewError::SceneBeforeBundle {
					loaded: loaded.to_owned(),
					bundle: bundle.clone(),
				});
			}
			let expected = self.expected.as_deref().unwrap_or_default();
			if expected.to_lowercase() != loaded.to_lowercase() {
				return Err(ViewError::SceneMismatch {
					expected: expected.to_owned(),
					loaded: loaded.to_owned(),
				});
			}
		}
		self.in_progress = false;
		self.expected = None;
		self.bundle = None;
		Ok(std::mem::take(&mut self.pending))
	}
}

#[cfg(test)]
mod tests;
