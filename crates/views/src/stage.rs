use std::fmt;

use rustc_hash::FxHashMap;

use crate::LiveView;

/// Identity of one instantiation of a view.
///
/// Two instantiations of the same view id never share an `InstanceId`, which is
/// what lets completions tell a slot's current occupant apart from the one they
/// were started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for InstanceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Monotonic instance clock, starting at 1.
#[derive(Debug, Default)]
pub(crate) struct InstanceClock {
	last: u64,
}

impl InstanceClock {
	pub fn next(&mut self) -> InstanceId {
		self.last = self.last.wrapping_add(1);
		InstanceId(self.last)
	}
}

/// Owner of every live view, whether it sits in a slot or is being torn down.
pub(crate) struct Stage<C> {
	live: FxHashMap<InstanceId, C>,
}

impl<C> Default for Stage<C> {
	fn default() -> Self {
		Self {
			live: FxHashMap::default(),
		}
	}
}

impl<C: LiveView> Stage<C> {
	pub fn insert(&mut self, instance: InstanceId, content: C) {
		if let Some(previous) = self.live.insert(instance, content) {
			tracing::warn!(%instance, "instance id reused; destroying the previous content");
			previous.destroy();
		}
	}

	pub fn get_mut(&mut self, instance: InstanceId) -> Option<&mut C> {
		self.live.get_mut(&instance)
	}

	/// Destroys an instance. Returns false when it was already gone.
	pub fn destroy(&mut self, instance: InstanceId) -> bool {
		match self.live.remove(&instance) {
			Some(content) => {
				tracing::trace!(%instance, "destroying live view");
				content.destroy();
				true
			}
			None => false,
		}
	}

	pub fn len(&self) -> usize {
		self.live.len()
	}
}
