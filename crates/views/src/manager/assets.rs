//! Bundled views: content fetched through the bundle loader before it can be
//! instantiated.
//!
//! A pending load reserves its layer. The slot stays empty and the view stays
//! in the adding set until the asset ticket comes back. Any other view admitted
//! to the layer in the meantime supersedes the load, and its ticket is then
//! ignored.

use super::{PendingAsset, ViewData, ViewManager};
use crate::Ticket;
use crate::render::Renderer;

impl<R: Renderer> ViewManager<R> {
	/// Bundled views whose content is still loading.
	pub fn pending_view_loads(&self) -> usize {
		self.assets.len()
	}

	/// View whose bundled content is loading into `layer`.
	pub fn loading_on_layer(&self, layer: &R::LayerId) -> Option<&R::ViewId> {
		self.assets.get(layer).map(|pending| &pending.view)
	}

	/// Brings `view` into the empty slot `layer`, either opening it on the spot
	/// or starting the load of its bundled content. Returns true if it opened.
	pub(super) fn admit(&mut self, view: &R::ViewId, layer: &R::LayerId, init: Option<ViewData<R>>) -> bool {
		self.cancel_asset(layer);
		let Some(descriptor) = self.registry.get(view) else {
			return false;
		};
		let Some(request) = descriptor.locator().asset_request() else {
			return self.open(view, layer, init, None);
		};
		let Some(loader) = self.bundle_loader.as_mut() else {
			tracing::error!(view = %view, asset = %request, "the bundle loader has not been set; bundled view cannot be loaded");
			return false;
		};

		self.guards.begin_add(view);
		let done = self.signals.asset();
		tracing::debug!(view = %view, asset = %request, ticket = %done.ticket(), "loading bundled view");
		self.assets.insert(
			layer.clone(),
			PendingAsset {
				ticket: done.ticket(),
				view: view.clone(),
				init,
			},
		);
		loader.load_view(request, done);
		false
	}

	/// Drops the load pending on `layer`, if any.
	pub(super) fn cancel_asset(&mut self, layer: &R::LayerId) {
		if let Some(pending) = self.assets.remove(layer) {
			tracing::debug!(view = %pending.view, layer = %layer, ticket = %pending.ticket, "bundled view load superseded");
			self.guards.finish_add(&pending.view);
		}
	}

	/// Drops every pending load outside `exempt`.
	pub(super) fn cancel_assets_except(&mut self, exempt: &[R::LayerId]) {
		let layers: Vec<_> = self.assets.keys().filter(|layer| !exempt.contains(*layer)).cloned().collect();
		for layer in &layers {
			self.cancel_asset(layer);
		}
	}

	pub(super) fn asset_arrived(&mut self, ticket: Ticket, asset: Option<R::Asset>) {
		let layer = self
			.assets
			.iter()
			.find(|(_, pending)| pending.ticket == ticket)
			.map(|(layer, _)| layer.clone());
		let Some((layer, PendingAsset { view, init, .. })) = layer.and_then(|layer| self.assets.remove_entry(&layer)) else {
			tracing::trace!(%ticket, "ignoring content of a superseded bundle load");
			return;
		};
		self.guards.finish_add(&view);

		let Some(asset) = asset else {
			tracing::error!(view = %view, layer = %layer, "bundled view failed to load");
			return;
		};
		if self.open(&view, &layer, init, Some(asset)) {
			self.refresh_backdrop(&layer);
		}
	}
}
