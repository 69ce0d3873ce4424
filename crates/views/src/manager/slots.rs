//! Registration and the add/remove/update state machine.

use super::{Callback, Continuation, ViewData, ViewManager};
use crate::error::Result;
use crate::events::ViewEvent;
use crate::layers::Occupant;
use crate::render::{Instantiate, LiveView, Renderer};
use crate::signal::Direction;
use crate::{Changes, ContentLocator, InstanceId, TransitionDone};

impl<R: Renderer> ViewManager<R> {
	/// Registers a view and creates its layer if needed.
	///
	/// Fails if `id` is already registered; the existing descriptor is kept.
	pub fn register_view(&mut self, id: R::ViewId, layer: R::LayerId, locator: impl Into<ContentLocator>) -> Result<()> {
		let descriptor = self.registry.register(id, layer, locator.into()).map_err(Self::fatal)?;
		tracing::debug!(view = %descriptor.id(), layer = %descriptor.layer(), locator = %descriptor.locator(), "view registered");
		if self.layers.ensure(descriptor.layer()) {
			self.realize_layers();
		}
		Ok(())
	}

	/// Gives a layer a readable label, creating the layer if it does not exist.
	pub fn name_layer(&mut self, layer: R::LayerId, label: impl Into<String>) {
		self.layers.set_label(layer, label.into());
		self.realize_layers();
	}

	/// Puts `id` into its layer, transitioning out whatever is there first.
	///
	/// `init` is forwarded through [`LiveView::update`] once the view is
	/// instantiated. Redundant requests are ignored.
	pub fn add_view(&mut self, id: R::ViewId, init: Option<ViewData<R>>) {
		self.request_add(id, init);
		self.settle();
	}

	/// Transitions `id` out of its layer and destroys it.
	pub fn remove_view(&mut self, id: &R::ViewId) {
		self.request_remove(id, None);
		self.settle();
	}

	/// Like [`Self::remove_view`], running `then` once the view is gone.
	///
	/// `then` is dropped without running if the removal is rejected.
	pub fn remove_view_then(&mut self, id: &R::ViewId, then: impl FnOnce(&mut Self) + 'static) {
		self.request_remove(id, Some(Box::new(then)));
		self.settle();
	}

	/// Removes every occupant, abandons pending bundled views and hides the
	/// backdrop immediately.
	pub fn remove_all_views(&mut self) {
		self.cancel_assets_except(&[]);
		for view in self.removable_occupants(&[]) {
			self.request_remove(&view, None);
		}
		let frame = self.backdrop.force_inactive();
		self.renderer.paint_backdrop(frame);
		self.changes |= Changes::BACKDROP;
		self.settle();
	}

	/// Removes every occupant outside `exempt`. The backdrop follows whatever
	/// overlays remain occupied.
	pub fn remove_all_views_except(&mut self, exempt: &[R::LayerId]) {
		self.cancel_assets_except(exempt);
		for view in self.removable_occupants(exempt) {
			self.request_remove(&view, None);
		}
		self.recompute_backdrop();
		self.settle();
	}

	/// Forwards `data` to `id` if it is the current occupant of its layer.
	pub fn update_view(&mut self, id: &R::ViewId, data: ViewData<R>) {
		self.forward_update(id, data);
		self.settle();
	}

	pub fn view_on_layer(&self, layer: &R::LayerId) -> Option<&R::ViewId> {
		self.layers.occupant(layer).map(|occupant| &occupant.view)
	}

	/// True if `id` currently occupies its layer.
	pub fn is_active_view(&self, id: &R::ViewId) -> bool {
		let Some(descriptor) = self.registry.get(id) else {
			tracing::warn!(view = %id, "cannot query unregistered view");
			return false;
		};
		self.layers.occupant(descriptor.layer()).is_some_and(|occupant| occupant.view == *id)
	}

	/// Occupied layers, bottom to top.
	pub fn occupied_layers(&self) -> Vec<R::LayerId> {
		self.layers.occupied()
	}

	pub fn layer_label(&self, layer: &R::LayerId) -> Option<&str> {
		self.layers.label(layer)
	}

	fn request_add(&mut self, id: R::ViewId, init: Option<ViewData<R>>) {
		let Some(descriptor) = self.registry.get(&id) else {
			tracing::warn!(view = %id, "cannot add unregistered view");
			return;
		};
		let layer = descriptor.layer().clone();

		let outgoing = match self.layers.occupant(&layer) {
			Some(current) if current.view == id => {
				tracing::debug!(view = %id, "view is already active");
				return;
			}
			Some(current) => current.instance,
			None => {
				if self.guards.is_adding(&id) {
					tracing::debug!(view = %id, "view is already being added");
				} else if self.admit(&id, &layer, init) {
					self.refresh_backdrop(&layer);
				}
				return;
			}
		};
		if !self.guards.begin_add(&id) {
			tracing::debug!(view = %id, "view is already being added");
			return;
		}

		tracing::debug!(view = %id, layer = %layer, %outgoing, "replacing occupant");
		let done = self.signals.transition(Direction::Out);
		self.continuations.insert(
			done.ticket(),
			Continuation::Replace {
				view: id,
				layer,
				outgoing,
				init,
			},
		);
		self.transition_out(outgoing, done);
	}

	fn request_remove(&mut self, id: &R::ViewId, then: Option<Callback<R>>) {
		let Some(descriptor) = self.registry.get(id) else {
			tracing::warn!(view = %id, "cannot remove unregistered view");
			return;
		};
		let layer = descriptor.layer().clone();

		let outgoing = match self.layers.occupant(&layer) {
			Some(current) if current.view == *id => current.instance,
			_ => {
				tracing::warn!(view = %id, layer = %layer, "cannot remove a view that is not active");
				return;
			}
		};
		if !self.guards.begin_remove(id) {
			tracing::warn!(view = %id, "view is already being removed");
			return;
		}

		let done = self.signals.transition(Direction::Out);
		self.continuations.insert(
			done.ticket(),
			Continuation::Remove {
				view: id.clone(),
				layer,
				outgoing,
				then,
			},
		);
		self.transition_out(outgoing, done);
	}

	/// Occupants outside `exempt` that are not already on their way out.
	fn removable_occupants(&self, exempt: &[R::LayerId]) -> Vec<R::ViewId> {
		self.layers
			.iter()
			.filter(|(layer, _)| !exempt.contains(*layer))
			.filter_map(|(_, slot)| slot.occupant())
			.map(|occupant| occupant.view.clone())
			.filter(|view| !self.guards.is_removing(view))
			.collect()
	}

	fn forward_update(&mut self, id: &R::ViewId, data: ViewData<R>) {
		let Some(descriptor) = self.registry.get(id) else {
			tracing::warn!(view = %id, "cannot update unregistered view");
			return;
		};
		let instance = match self.layers.occupant(descriptor.layer()) {
			None => {
				tracing::warn!(view = %id, layer = %descriptor.layer(), "cannot update view; its layer is empty");
				return;
			}
			Some(current) if current.view != *id => {
				tracing::warn!(view = %id, active = %current.view, "cannot update view; another view is active on its layer");
				return;
			}
			Some(current) => current.instance,
		};
		match self.stage.get_mut(instance) {
			Some(content) => content.update(data),
			None => tracing::warn!(view = %id, %instance, "occupant has no live content"),
		}
	}

	fn transition_out(&mut self, instance: InstanceId, done: TransitionDone) {
		match self.stage.get_mut(instance) {
			Some(content) => content.transition_out(done),
			None => {
				tracing::trace!(%instance, "instance already destroyed; completing its exit");
				done.complete();
			}
		}
	}

	/// Instantiates `view` into the empty slot `layer`, from `asset` when its
	/// bundle delivered one. Returns true on success.
	pub(super) fn open(&mut self, view: &R::ViewId, layer: &R::LayerId, init: Option<ViewData<R>>, asset: Option<R::Asset>) -> bool {
		let Some(descriptor) = self.registry.get(view) else {
			return false;
		};
		let instance = self.instances.next();
		let request = Instantiate {
			view,
			layer,
			label: self.layers.label(layer).unwrap_or_default(),
			locator: descriptor.locator(),
			instance,
		};
		let content = match asset {
			Some(asset) => self.renderer.instantiate_loaded(request, asset),
			None => self.renderer.instantiate(request),
		};
		let content = match content {
			Ok(content) => content,
			Err(error) => {
				tracing::error!(view = %view, layer = %layer, %error, "failed to instantiate view");
				return false;
			}
		};

		self.stage.insert(instance, content);
		let occupant = Occupant {
			view: view.clone(),
			instance,
		};
		if let Some(previous) = self.layers.install(layer, occupant) {
			tracing::warn!(view = %view, previous = %previous.view, "slot was not empty when opening a view");
			self.stage.destroy(previous.instance);
		}
		self.changes |= Changes::OCCUPANCY;

		let done = self.signals.transition(Direction::In);
		self.continuations.insert(
			done.ticket(),
			Continuation::Enter {
				view: view.clone(),
				instance,
			},
		);
		if let Some(content) = self.stage.get_mut(instance) {
			content.transition_in(done);
		}

		self.emit(ViewEvent::Opened(view.clone()));
		if let Some(data) = init {
			self.forward_update(view, data);
		}
		true
	}

	pub(super) fn finish_replace(&mut self, view: R::ViewId, layer: R::LayerId, outgoing: InstanceId, init: Option<ViewData<R>>) {
		let previous = self.layers.take(&layer);
		self.stage.destroy(outgoing);
		if let Some(previous) = previous
			&& previous.instance != outgoing
		{
			tracing::debug!(view = %view, superseded = %previous.view, "destroying occupant installed mid-transition");
			self.stage.destroy(previous.instance);
		}
		self.changes |= Changes::OCCUPANCY;

		self.guards.finish_add(&view);
		self.admit(&view, &layer, init);
		self.refresh_backdrop(&layer);
	}

	pub(super) fn finish_remove(&mut self, view: R::ViewId, layer: R::LayerId, outgoing: InstanceId, then: Option<Callback<R>>) {
		self.emit(ViewEvent::Closed(view.clone()));
		self.guards.finish_remove(&view);
		self.stage.destroy(outgoing);
		if self.layers.clear_if(&layer, outgoing) {
			self.changes |= Changes::OCCUPANCY;
		} else {
			tracing::debug!(view = %view, layer = %layer, "slot changed hands before removal finished");
		}
		if let Some(then) = then {
			then(self);
		}
		self.refresh_backdrop(&layer);
	}
}
