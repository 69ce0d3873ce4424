//! Renderer and live-view capabilities consumed by the manager.

use crate::error::RenderError;
use crate::{BackdropFrame, ContentLocator, InstanceId, Key, TransitionDone};

/// Everything a renderer needs to instantiate one view.
#[derive(Debug, Clone, Copy)]
pub struct Instantiate<'a, V, L> {
	pub view: &'a V,
	pub layer: &'a L,
	/// Readable label of the target layer.
	pub label: &'a str,
	pub locator: &'a ContentLocator,
	pub instance: InstanceId,
}

/// Presentation backend.
///
/// Only [`Self::instantiate`] is required. The remaining hooks default to
/// no-ops for hosts without layer containers, a backdrop node or an input
/// system.
pub trait Renderer {
	type ViewId: Key;
	type LayerId: Key;
	type Content: LiveView;
	/// What a [`BundleLoader`](crate::BundleLoader) delivers for a bundled view.
	type Asset;

	/// Creates content for a view. Called once per admitted add.
	fn instantiate(&mut self, request: Instantiate<'_, Self::ViewId, Self::LayerId>) -> Result<Self::Content, RenderError>;

	/// Creates content for a bundled view from the asset its loader delivered.
	///
	/// Defaults to [`Self::instantiate`] for renderers that resolve bundle
	/// locators themselves once the bundle is resident.
	fn instantiate_loaded(
		&mut self,
		request: Instantiate<'_, Self::ViewId, Self::LayerId>,
		asset: Self::Asset,
	) -> Result<Self::Content, RenderError> {
		let _ = asset;
		self.instantiate(request)
	}

	/// Called whenever the layer list changes, with every layer bottom to top.
	fn realize_layers(&mut self, layers: &[(Self::LayerId, String)]) {
		let _ = layers;
	}

	/// Moves the backdrop node directly beneath `layer`.
	fn place_backdrop(&mut self, layer: &Self::LayerId) {
		let _ = layer;
	}

	fn paint_backdrop(&mut self, frame: BackdropFrame) {
		let _ = frame;
	}

	fn set_input_enabled(&mut self, enabled: bool) {
		let _ = enabled;
	}
}

/// Capability set of an instantiated view.
///
/// Transitions hand over a [`TransitionDone`] ticket. Completing it (or
/// dropping it) reports the transition as finished; the defaults complete
/// immediately.
pub trait LiveView {
	/// Payload accepted by [`Self::update`].
	type Data;

	fn transition_in(&mut self, done: TransitionDone) {
		done.complete();
	}

	fn transition_out(&mut self, done: TransitionDone) {
		done.complete();
	}

	fn update(&mut self, data: Self::Data) {
		let _ = data;
	}

	/// Releases the content. Called exactly once per instance.
	fn destroy(self)
	where
		Self: Sized,
	{
	}
}
