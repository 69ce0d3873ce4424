use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::ViewManager;
use crate::backdrop::Backdrop;
use crate::config::ViewManagerConfig;
use crate::error::ConfigError;
use crate::events::EventHub;
use crate::guard::GuardSets;
use crate::input::InputGate;
use crate::layers::LayerTable;
use crate::registry::DescriptorRegistry;
use crate::render::Renderer;
use crate::scene::{BundleLoader, LoadState, SceneLoader};
use crate::signal::SignalBus;
use crate::stage::{InstanceClock, Stage};
use crate::Changes;

/// One-shot construction of a [`ViewManager`].
///
/// `build` consumes the builder, so each builder yields exactly one manager.
pub struct ViewManagerBuilder<R: Renderer> {
	renderer: R,
	scene_loader: Box<dyn SceneLoader>,
	bundle_loader: Option<Box<dyn BundleLoader<R::Asset>>>,
	config: ViewManagerConfig,
	overlays: Vec<R::LayerId>,
}

impl<R: Renderer> ViewManager<R> {
	pub fn builder(renderer: R, scene_loader: impl SceneLoader + 'static) -> ViewManagerBuilder<R> {
		ViewManagerBuilder {
			renderer,
			scene_loader: Box::new(scene_loader),
			bundle_loader: None,
			config: ViewManagerConfig::default(),
			overlays: Vec::new(),
		}
	}
}

impl<R: Renderer> ViewManagerBuilder<R> {
	pub fn bundle_loader(mut self, loader: impl BundleLoader<R::Asset> + 'static) -> Self {
		self.bundle_loader = Some(Box::new(loader));
		self
	}

	pub fn config(mut self, config: ViewManagerConfig) -> Self {
		self.config = config;
		self
	}

	pub fn overlays(mut self, layers: impl IntoIterator<Item = R::LayerId>) -> Self {
		self.overlays.extend(layers);
		self
	}

	/// Validates the configuration and builds the manager.
	pub fn build(self) -> Result<ViewManager<R>, ConfigError> {
		self.config.validate()?;
		let mut backdrop = Backdrop::new(&self.config.backdrop);
		backdrop.declare(self.overlays);

		let mut manager = ViewManager {
			renderer: self.renderer,
			scene_loader: self.scene_loader,
			bundle_loader: self.bundle_loader,
			config: self.config,
			registry: DescriptorRegistry::new(),
			layers: LayerTable::new(),
			guards: GuardSets::default(),
			stage: Stage::default(),
			instances: InstanceClock::default(),
			signals: SignalBus::default(),
			continuations: FxHashMap::default(),
			assets: BTreeMap::new(),
			backdrop,
			loads: LoadState::default(),
			input: InputGate::default(),
			events: EventHub::default(),
			changes: Changes::NONE,
		};
		tracing::debug!(
			dev_mode = manager.config.dev_mode,
			overlays = manager.backdrop.overlays().len(),
			bundles = manager.bundle_loader.is_some(),
			"view manager built"
		);
		manager.renderer.paint_backdrop(manager.backdrop.frame());
		Ok(manager)
	}
}
