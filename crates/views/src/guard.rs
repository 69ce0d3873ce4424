use std::collections::BTreeSet;

use crate::Key;

/// In-flight add/remove tracking.
///
/// Membership means exactly one operation of that kind is outstanding for the
/// id; a second request is rejected by the caller rather than queued.
#[derive(Debug)]
pub struct GuardSets<V> {
	adding: BTreeSet<V>,
	removing: BTreeSet<V>,
}

impl<V> Default for GuardSets<V> {
	fn default() -> Self {
		Self {
			adding: BTreeSet::new(),
			removing: BTreeSet::new(),
		}
	}
}

impl<V: Key> GuardSets<V> {
	/// Marks an add as in flight. Returns false if one already was.
	pub fn begin_add(&mut self, id: &V) -> bool {
		self.adding.insert(id.clone())
	}

	pub fn finish_add(&mut self, id: &V) -> bool {
		self.adding.remove(id)
	}

	/// Marks a remove as in flight. Returns false if one already was.
	pub fn begin_remove(&mut self, id: &V) -> bool {
		self.removing.insert(id.clone())
	}

	pub fn finish_remove(&mut self, id: &V) -> bool {
		self.removing.remove(id)
	}

	pub fn is_adding(&self, id: &V) -> bool {
		self.adding.contains(id)
	}

	pub fn is_removing(&self, id: &V) -> bool {
		self.removing.contains(id)
	}

	/// True when nothing is in flight.
	pub fn is_idle(&self) -> bool {
		self.adding.is_empty() && self.removing.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn membership_is_exclusive_per_kind() {
		let mut guards = GuardSets::default();
		assert!(guards.begin_add(&"credits"));
		assert!(!guards.begin_add(&"credits"));
		assert!(guards.begin_remove(&"credits"));
		assert!(guards.is_adding(&"credits") && guards.is_removing(&"credits"));

		assert!(guards.finish_add(&"credits"));
		assert!(!guards.finish_add(&"credits"));
		assert!(guards.finish_remove(&"credits"));
		assert!(guards.is_idle());
	}
}
