use pretty_assertions::assert_eq;

use super::*;
use crate::stage::InstanceClock;

fn occupant(view: &'static str, clock: &mut InstanceClock) -> Occupant<&'static str> {
	Occupant {
		view,
		instance: clock.next(),
	}
}

#[test]
fn ensure_creates_once_with_default_label() {
	let mut table: LayerTable<&str, u8> = LayerTable::new();
	assert!(table.ensure(&20));
	assert!(!table.ensure(&20));
	assert_eq!(table.label(&20), Some("20"));
	assert!(table.occupant(&20).is_none());
}

#[test]
fn set_label_renames_existing_layer() {
	let mut table: LayerTable<&str, u8> = LayerTable::new();
	table.ensure(&20);
	assert!(!table.set_label(20, "Modal".into()));
	assert!(table.set_label(30, "Popup".into()));
	assert_eq!(table.labels(), vec![(20, "Modal".to_string()), (30, "Popup".to_string())]);
}

#[test]
fn occupied_is_sorted_bottom_to_top() {
	let mut clock = InstanceClock::default();
	let mut table: LayerTable<&str, u8> = LayerTable::new();
	for layer in [30, 0, 20, 10] {
		table.ensure(&layer);
	}
	table.install(&30, occupant("popup", &mut clock));
	table.install(&0, occupant("start", &mut clock));
	table.install(&20, occupant("confirm", &mut clock));

	assert_eq!(table.occupied(), vec![0, 20, 30]);
}

#[test]
fn clear_if_ignores_other_instances() {
	let mut clock = InstanceClock::default();
	let mut table: LayerTable<&str, u8> = LayerTable::new();
	table.ensure(&0);

	let first = occupant("start", &mut clock);
	let stale = first.instance;
	table.install(&0, first);
	let second = occupant("credits", &mut clock);
	let current = second.instance;
	assert!(table.install(&0, second).is_some());

	assert!(!table.clear_if(&0, stale));
	assert_eq!(table.occupant(&0).map(|o| o.view), Some("credits"));
	assert!(table.clear_if(&0, current));
	assert!(table.occupant(&0).is_none());
}
