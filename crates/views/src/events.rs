use std::fmt;

/// Lifecycle events observable by application code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent<V> {
	/// A view was instantiated into its layer.
	Opened(V),
	/// A view finished an explicit removal.
	///
	/// Replacing an occupant through `add_view` does not emit this for the
	/// outgoing view.
	Closed(V),
}

impl<V> ViewEvent<V> {
	pub fn view(&self) -> &V {
		match self {
			Self::Opened(view) | Self::Closed(view) => view,
		}
	}
}

/// Handle returned by [`ViewManager::subscribe`](crate::ViewManager::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<V> = Box<dyn FnMut(&ViewEvent<V>)>;

pub(crate) struct EventHub<V> {
	last: u64,
	listeners: Vec<(SubscriptionId, Listener<V>)>,
}

impl<V> Default for EventHub<V> {
	fn default() -> Self {
		Self {
			last: 0,
			listeners: Vec::new(),
		}
	}
}

impl<V: fmt::Display> EventHub<V> {
	pub fn subscribe(&mut self, listener: impl FnMut(&ViewEvent<V>) + 'static) -> SubscriptionId {
		self.last = self.last.wrapping_add(1);
		let id = SubscriptionId(self.last);
		self.listeners.push((id, Box::new(listener)));
		id
	}

	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.listeners.len();
		self.listeners.retain(|(sub, _)| *sub != id);
		self.listeners.len() != before
	}

	pub fn emit(&mut self, event: ViewEvent<V>) {
		match &event {
			ViewEvent::Opened(view) => tracing::debug!(view = %view, "view opened"),
			ViewEvent::Closed(view) => tracing::debug!(view = %view, "view closed"),
		}
		for (_, listener) in &mut self.listeners {
			listener(&event);
		}
	}
}
