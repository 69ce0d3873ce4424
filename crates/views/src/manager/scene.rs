use super::{Callback, ViewManager};
use crate::error::{Result, ViewError};
use crate::render::Renderer;
use crate::scene::{BundleLoader, BundleOutcome};
use crate::{BundleRequest, Changes, Ticket};

impl<R: Renderer> ViewManager<R> {
	/// Asks the scene loader for `scene`.
	///
	/// Overlapping requests are allowed but logged; the most recent one decides
	/// which scene is expected to finish loading.
	pub fn change_scene(&mut self, scene: &str) {
		self.begin_scene(scene, None);
		self.settle();
	}

	/// Like [`Self::change_scene`], running `then` once the scene has loaded.
	pub fn change_scene_then(&mut self, scene: &str, then: impl FnOnce(&mut Self) + 'static) {
		self.begin_scene(scene, Some(Box::new(then)));
		self.settle();
	}

	/// Loads the scene contained in the asset bundle at `bundle`.
	pub fn change_scene_bundle(&mut self, bundle: &str) -> Result<()> {
		self.begin_bundle(bundle, None)?;
		self.settle();
		Ok(())
	}

	/// Like [`Self::change_scene_bundle`], running `then` once the scene has loaded.
	pub fn change_scene_bundle_then(&mut self, bundle: &str, then: impl FnOnce(&mut Self) + 'static) -> Result<()> {
		self.begin_bundle(bundle, Some(Box::new(then)))?;
		self.settle();
		Ok(())
	}

	/// Installs the loader used by [`Self::change_scene_bundle`] and for views
	/// registered with a bundle locator.
	pub fn set_bundle_loader(&mut self, loader: impl BundleLoader<R::Asset> + 'static) {
		if self.bundle_loader.replace(Box::new(loader)).is_some() {
			tracing::warn!("replacing an existing bundle loader");
		}
	}

	/// True while a scene change has not resolved.
	pub fn is_loading_scene(&self) -> bool {
		self.loads.is_in_progress()
	}

	/// Scene the in-flight change expects to load, once known.
	pub fn expected_scene(&self) -> Option<&str> {
		self.loads.expected()
	}

	/// Bundle still being loaded for the in-flight change.
	pub fn pending_bundle(&self) -> Option<&str> {
		self.loads.pending_bundle()
	}

	/// Callbacks waiting on the in-flight change.
	pub fn pending_scene_callbacks(&self) -> usize {
		self.loads.pending_callbacks()
	}

	/// Reports that `scene` finished loading.
	///
	/// Outside dev mode the scene must be the one last requested (compared
	/// case-insensitively). On success every queued callback runs in request
	/// order.
	pub fn scene_loaded(&mut self, scene: &str) -> Result<()> {
		self.apply_scene_loaded(scene)?;
		self.settle();
		Ok(())
	}

	fn begin_scene(&mut self, scene: &str, then: Option<Callback<R>>) {
		if self.loads.begin(scene, then) {
			tracing::warn!(scene, "a scene is already loading; loading another at the same time may cause unexpected issues");
		}
		tracing::debug!(scene, "changing scene");
		self.scene_loader.load(scene);
	}

	fn begin_bundle(&mut self, bundle: &str, then: Option<Callback<R>>) -> Result<()> {
		let Some(loader) = self.bundle_loader.as_mut() else {
			return Err(Self::fatal(ViewError::MissingBundleLoader));
		};
		let done = self.signals.bundle();
		if self.loads.begin_bundle(done.ticket(), bundle, then) {
			tracing::warn!(bundle, "a scene is already loading; loading another at the same time may cause unexpected issues");
		}
		tracing::debug!(bundle, ticket = %done.ticket(), "changing scene from bundle");
		loader.load(BundleRequest { bundle: bundle.to_owned() }, done);
		Ok(())
	}

	pub(super) fn bundle_resolved(&mut self, ticket: Ticket, scene: Option<String>) {
		match self.loads.bundle_resolved(ticket, scene) {
			BundleOutcome::Stale => tracing::debug!(%ticket, "ignoring completion of a superseded bundle load"),
			BundleOutcome::Scene(scene) => {
				tracing::debug!(%scene, "bundle ready; loading its scene");
				self.scene_loader.load(&scene);
			}
			BundleOutcome::Failed { bundle, dropped } => {
				tracing::error!(%bundle, dropped_callbacks = dropped, "bundle failed to load; scene change abandoned");
			}
		}
	}

	pub(super) fn apply_scene_loaded(&mut self, scene: &str) -> Result<()> {
		let callbacks = self.loads.resolve(scene, self.config.dev_mode).map_err(Self::fatal)?;
		tracing::debug!(scene, callbacks = callbacks.len(), "scene loaded");
		self.changes |= Changes::SCENE;
		for callback in callbacks {
			callback(self);
		}
		Ok(())
	}
}
