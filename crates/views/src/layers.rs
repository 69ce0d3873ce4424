//! Ordered layer slots.

use std::collections::BTreeMap;

use crate::{InstanceId, Key};

/// The live view bound to a layer slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant<V> {
	/// Registered id of the occupying view.
	pub view: V,
	/// Instantiation currently in the slot.
	pub instance: InstanceId,
}

/// One exclusive slot plus its readable label.
#[derive(Debug, Clone)]
pub struct Layer<V> {
	label: String,
	occupant: Option<Occupant<V>>,
}

impl<V> Layer<V> {
	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn occupant(&self) -> Option<&Occupant<V>> {
		self.occupant.as_ref()
	}
}

/// Layers keyed and stacked by ascending layer id.
#[derive(Debug)]
pub struct LayerTable<V, L> {
	layers: BTreeMap<L, Layer<V>>,
}

impl<V, L> Default for LayerTable<V, L> {
	fn default() -> Self {
		Self { layers: BTreeMap::new() }
	}
}

impl<V: Key, L: Key> LayerTable<V, L> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates the layer with its default label if missing. Returns true when created.
	pub fn ensure(&mut self, layer: &L) -> bool {
		if self.layers.contains_key(layer) {
			return false;
		}
		self.layers.insert(
			layer.clone(),
			Layer {
				label: layer.to_string(),
				occupant: None,
			},
		);
		true
	}

	/// Sets a layer's label, creating the layer if needed. Returns true when created.
	pub fn set_label(&mut self, layer: L, label: String) -> bool {
		match self.layers.get_mut(&layer) {
			Some(entry) => {
				entry.label = label;
				false
			}
			None => {
				self.layers.insert(layer, Layer { label, occupant: None });
				true
			}
		}
	}

	pub fn contains(&self, layer: &L) -> bool {
		self.layers.contains_key(layer)
	}

	pub fn label(&self, layer: &L) -> Option<&str> {
		self.layers.get(layer).map(Layer::label)
	}

	pub fn occupant(&self, layer: &L) -> Option<&Occupant<V>> {
		self.layers.get(layer)?.occupant.as_ref()
	}

	/// Puts an occupant into the slot, returning whatever was there.
	pub fn install(&mut self, layer: &L, occupant: Occupant<V>) -> Option<Occupant<V>> {
		match self.layers.get_mut(layer) {
			Some(entry) => entry.occupant.replace(occupant),
			None => {
				self.layers.insert(
					layer.clone(),
					Layer {
						label: layer.to_string(),
						occupant: Some(occupant),
					},
				);
				None
			}
		}
	}

	/// Empties the slot unconditionally.
	pub fn take(&mut self, layer: &L) -> Option<Occupant<V>> {
		self.layers.get_mut(layer)?.occupant.take()
	}

	/// Empties the slot only if it still holds `instance`.
	pub fn clear_if(&mut self, layer: &L, instance: InstanceId) -> bool {
		let Some(entry) = self.layers.get_mut(layer) else {
			return false;
		};
		if entry.occupant.as_ref().is_some_and(|o| o.instance == instance) {
			entry.occupant = None;
			return true;
		}
		false
	}

	/// Occupied layer ids, bottom to top.
	pub fn occupied(&self) -> Vec<L> {
		self.layers
			.iter()
			.filter(|(_, layer)| layer.occupant.is_some())
			.map(|(id, _)| id.clone())
			.collect()
	}

	/// `(layer, label)` pairs, bottom to top.
	pub fn labels(&self) -> Vec<(L, String)> {
		self.layers.iter().map(|(id, layer)| (id.clone(), layer.label.clone())).collect()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&L, &Layer<V>)> {
		self.layers.iter()
	}

	pub fn len(&self) -> usize {
		self.layers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}
}

#[cfg(test)]
mod tests;
