//! Static view metadata.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::{Result, ViewError};
use crate::{ContentLocator, Key};

/// Static metadata for one registered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor<V, L> {
	id: V,
	layer: L,
	locator: ContentLocator,
}

impl<V, L> ViewDescriptor<V, L> {
	pub fn id(&self) -> &V {
		&self.id
	}

	/// Layer the view occupies when added.
	pub fn layer(&self) -> &L {
		&self.layer
	}

	pub fn locator(&self) -> &ContentLocator {
		&self.locator
	}
}

/// Append-only mapping from view id to its descriptor.
///
/// Descriptors are never replaced or removed once registered.
#[derive(Debug)]
pub struct DescriptorRegistry<V, L> {
	views: BTreeMap<V, ViewDescriptor<V, L>>,
}

impl<V, L> Default for DescriptorRegistry<V, L> {
	fn default() -> Self {
		Self { views: BTreeMap::new() }
	}
}

impl<V: Key, L: Key> DescriptorRegistry<V, L> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a descriptor, rejecting ids that are already taken.
	pub fn register(&mut self, id: V, layer: L, locator: ContentLocator) -> Result<&ViewDescriptor<V, L>> {
		match self.views.entry(id) {
			Entry::Occupied(entry) => Err(ViewError::AlreadyRegistered {
				view: entry.key().to_string(),
			}),
			Entry::Vacant(entry) => {
				let id = entry.key().clone();
				Ok(entry.insert(ViewDescriptor { id, layer, locator }))
			}
		}
	}

	pub fn get(&self, id: &V) -> Option<&ViewDescriptor<V, L>> {
		self.views.get(id)
	}

	pub fn contains(&self, id: &V) -> bool {
		self.views.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.views.len()
	}

	pub fn is_empty(&self) -> bool {
		self.views.is_empty()
	}

	/// Descriptors in ascending id order.
	pub fn iter(&self) -> impl Iterator<Item = &ViewDescriptor<V, L>> {
		self.views.values()
	}
}
