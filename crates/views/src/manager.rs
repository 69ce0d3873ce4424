//! The view manager: slot controller, backdrop, scene loads and input in one
//! explicit context object.
//!
//! Every public operation ends by draining the transition channel, so a
//! renderer that completes its tickets synchronously observes the same
//! ordering as one that completes them later from [`ViewManager::pump`].

use std::collections::BTreeMap;
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::backdrop::{Backdrop, BackdropUpdate};
use crate::config::ViewManagerConfig;
use crate::error::{Result, ViewError};
use crate::events::{EventHub, SubscriptionId, ViewEvent};
use crate::guard::GuardSets;
use crate::input::InputGate;
use crate::layers::LayerTable;
use crate::registry::DescriptorRegistry;
use crate::render::{LiveView, Renderer};
use crate::scene::{BundleLoader, LoadState, SceneLoader};
use crate::signal::{AssetSignal, LoadSignal, SignalBus};
use crate::stage::{InstanceClock, Stage};
use crate::{Changes, InstanceId, SignalSender, Ticket};

mod assets;
mod builder;
mod scene;
mod slots;

pub use builder::ViewManagerBuilder;

/// Deferred work handed to the manager. Receives the manager so it may issue
/// further requests.
pub type Callback<R> = Box<dyn FnOnce(&mut ViewManager<R>)>;

/// Payload type accepted by a renderer's live views.
pub type ViewData<R> = <<R as Renderer>::Content as LiveView>::Data;

/// What to do when a transition ticket comes back.
enum Continuation<R: Renderer> {
	/// Outgoing occupant finished; the new view goes in next.
	Replace {
		view: R::ViewId,
		layer: R::LayerId,
		outgoing: InstanceId,
		init: Option<ViewData<R>>,
	},
	/// Occupant finished its exit after an explicit remove.
	Remove {
		view: R::ViewId,
		layer: R::LayerId,
		outgoing: InstanceId,
		then: Option<Callback<R>>,
	},
	/// A freshly installed view finished entering.
	Enter { view: R::ViewId, instance: InstanceId },
}

/// A bundled view whose content is still being loaded. Reserves its layer.
struct PendingAsset<R: Renderer> {
	ticket: Ticket,
	view: R::ViewId,
	init: Option<ViewData<R>>,
}

/// Slot-based view lifecycle manager.
///
/// Built once through [`ViewManager::builder`]. Owns the renderer, the
/// collaborators and every live view.
pub struct ViewManager<R: Renderer> {
	renderer: R,
	scene_loader: Box<dyn SceneLoader>,
	bundle_loader: Option<Box<dyn BundleLoader<R::Asset>>>,
	config: ViewManagerConfig,
	registry: DescriptorRegistry<R::ViewId, R::LayerId>,
	layers: LayerTable<R::ViewId, R::LayerId>,
	guards: GuardSets<R::ViewId>,
	stage: Stage<R::Content>,
	instances: InstanceClock,
	signals: SignalBus<R::Asset>,
	continuations: FxHashMap<Ticket, Continuation<R>>,
	assets: BTreeMap<R::LayerId, PendingAsset<R>>,
	backdrop: Backdrop<R::LayerId>,
	loads: LoadState<Callback<R>>,
	input: InputGate,
	events: EventHub<R::ViewId>,
	changes: Changes,
}

impl<R: Renderer> ViewManager<R> {
	pub fn renderer(&self) -> &R {
		&self.renderer
	}

	pub fn renderer_mut(&mut self) -> &mut R {
		&mut self.renderer
	}

	pub fn config(&self) -> &ViewManagerConfig {
		&self.config
	}

	pub fn registry(&self) -> &DescriptorRegistry<R::ViewId, R::LayerId> {
		&self.registry
	}

	pub fn layers(&self) -> &LayerTable<R::ViewId, R::LayerId> {
		&self.layers
	}

	pub fn backdrop(&self) -> &Backdrop<R::LayerId> {
		&self.backdrop
	}

	/// Handle for reporting scene loads from loader code that cannot borrow
	/// the manager.
	pub fn signals(&self) -> SignalSender {
		self.signals.sender()
	}

	/// Registers a listener for [`ViewEvent`]s.
	pub fn subscribe(&mut self, listener: impl FnMut(&ViewEvent<R::ViewId>) + 'static) -> SubscriptionId {
		self.events.subscribe(listener)
	}

	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		self.events.unsubscribe(id)
	}

	/// Number of instantiated views, including ones still transitioning out.
	pub fn live_view_count(&self) -> usize {
		self.stage.len()
	}

	/// Transitions whose tickets have not come back yet.
	pub fn pending_transitions(&self) -> usize {
		self.continuations.len()
	}

	/// True when no transition is outstanding and no add/remove is in flight.
	pub fn is_settled(&self) -> bool {
		self.continuations.is_empty() && self.guards.is_idle()
	}

	pub fn is_adding(&self, id: &R::ViewId) -> bool {
		self.guards.is_adding(id)
	}

	pub fn is_removing(&self, id: &R::ViewId) -> bool {
		self.guards.is_removing(id)
	}

	pub fn is_input_enabled(&self) -> bool {
		self.input.is_enabled()
	}

	/// Suppresses (`false`) or releases (`true`) input. Disables stack.
	pub fn toggle_input(&mut self, enabled: bool) -> Result<()> {
		let flipped = self.input.toggle(enabled).map_err(Self::fatal)?;
		if let Some(enabled) = flipped {
			tracing::debug!(enabled, "input toggled");
			self.renderer.set_input_enabled(enabled);
			self.changes |= Changes::INPUT;
		}
		Ok(())
	}

	/// Declares which layers dim everything beneath them.
	pub fn declare_overlays(&mut self, layers: impl IntoIterator<Item = R::LayerId>) {
		self.backdrop.declare(layers);
		self.recompute_backdrop();
	}

	/// Changes the alpha the backdrop fades to while an overlay is open.
	pub fn set_backdrop_target_alpha(&mut self, alpha: f32) {
		if let Some(frame) = self.backdrop.set_configured(alpha) {
			self.renderer.paint_backdrop(frame);
		}
		self.changes |= Changes::BACKDROP;
	}

	/// Applies pending completions and load notifications.
	///
	/// Returns what changed since the last call to `pump` or [`Self::advance`].
	/// A fatal load error stops the drain; notifications behind it stay queued.
	pub fn pump(&mut self) -> Result<Changes> {
		self.settle();
		while let Some(signal) = self.signals.next_load() {
			match signal {
				LoadSignal::Bundle { ticket, scene } => self.bundle_resolved(ticket, scene),
				LoadSignal::Scene { scene } => self.apply_scene_loaded(&scene)?,
			}
			self.settle();
		}
		Ok(std::mem::take(&mut self.changes))
	}

	/// Advances time-based effects (the backdrop fade) by `elapsed`.
	pub fn advance(&mut self, elapsed: Duration) -> Changes {
		self.settle();
		let renderer = &mut self.renderer;
		if self.backdrop.advance(elapsed, |frame| renderer.paint_backdrop(frame)) {
			self.changes |= Changes::BACKDROP;
		}
		std::mem::take(&mut self.changes)
	}

	/// Drains completed transition and asset tickets.
	fn settle(&mut self) {
		loop {
			if let Some(ticket) = self.signals.next_transition() {
				self.resume(ticket);
			} else if let Some(AssetSignal { ticket, asset }) = self.signals.next_asset() {
				self.asset_arrived(ticket, asset);
			} else {
				break;
			}
		}
	}

	fn resume(&mut self, ticket: Ticket) {
		let Some(continuation) = self.continuations.remove(&ticket) else {
			tracing::trace!(%ticket, "completion for unknown ticket");
			return;
		};
		match continuation {
			Continuation::Replace {
				view,
				layer,
				outgoing,
				init,
			} => self.finish_replace(view, layer, outgoing, init),
			Continuation::Remove {
				view,
				layer,
				outgoing,
				then,
			} => self.finish_remove(view, layer, outgoing, then),
			Continuation::Enter { view, instance } => {
				tracing::trace!(view = %view, %instance, "transition in finished");
			}
		}
	}

	/// Recomputes the backdrop if `layer` is an overlay.
	fn refresh_backdrop(&mut self, layer: &R::LayerId) {
		if self.backdrop.is_overlay(layer) {
			self.recompute_backdrop();
		}
	}

	fn recompute_backdrop(&mut self) {
		let layers = &self.layers;
		let BackdropUpdate { beneath, frame } = self.backdrop.recompute(|layer| layers.occupant(layer).is_some());
		if let Some(layer) = &beneath {
			tracing::trace!(layer = %layer, "backdrop moved");
			self.renderer.place_backdrop(layer);
		}
		if let Some(frame) = frame {
			self.renderer.paint_backdrop(frame);
		}
		self.changes |= Changes::BACKDROP;
	}

	fn realize_layers(&mut self) {
		let labels = self.layers.labels();
		self.renderer.realize_layers(&labels);
	}

	fn emit(&mut self, event: ViewEvent<R::ViewId>) {
		self.events.emit(event);
	}

	/// Wraps a fatal error with an error log.
	fn fatal(error: ViewError) -> ViewError {
		tracing::error!(%error, "view manager misuse");
		error
	}
}
