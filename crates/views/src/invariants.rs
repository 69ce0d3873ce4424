use std::time::Duration;

use crate::headless::TransitionMode;
use crate::testing::{BASE, MODAL, harness, with_logs};
use crate::{BackdropPhase, ViewError};

/// Must hold at most one occupant per layer.
///
/// - Enforced in: `LayerTable::install`, `ViewManager::finish_replace`
/// - Failure symptom: Two views render in the same slot and both receive updates.
#[cfg_attr(test, test)]
pub(crate) fn test_single_occupant_per_layer() {
	let mut h = harness(TransitionMode::Deferred);
	h.manager.add_view("start", None);
	h.manager.add_view("game", None);
	h.settle();

	assert_eq!(h.manager.occupied_layers(), vec![BASE]);
	assert_eq!(h.manager.live_view_count(), 1);
}

/// Must admit at most one in-flight add per view id.
///
/// - Enforced in: `ViewManager::request_add`, `GuardSets::begin_add`
/// - Failure symptom: A double-tapped button instantiates the same dialog twice.
#[cfg_attr(test, test)]
pub(crate) fn test_duplicate_add_rejected() {
	let mut h = harness(TransitionMode::Deferred);
	h.manager.add_view("credits", None);
	h.settle();
	h.manager.add_view("game_over", None);
	h.manager.add_view("game_over", None);
	h.settle();

	assert_eq!(h.views.instantiations_of(&"game_over"), 1);
}

/// Must clear a slot on removal only if it still holds the removed instance.
///
/// - Enforced in: `LayerTable::clear_if`, `ViewManager::finish_remove`
/// - Failure symptom: A late exit animation blanks the view that replaced it.
#[cfg_attr(test, test)]
pub(crate) fn test_stale_remove_keeps_replacement() {
	let mut h = harness(TransitionMode::Deferred);
	h.manager.add_view("start", None);
	h.settle();
	h.manager.remove_view(&"start");
	h.manager.add_view("game", None);
	h.views.complete_last();
	h.settle();

	assert_eq!(h.manager.view_on_layer(&BASE), Some(&"game"));
}

/// Must destroy every live view exactly once.
///
/// - Enforced in: `Stage::destroy`
/// - Failure symptom: Double-free style errors from the renderer when an add and a remove race.
#[cfg_attr(test, test)]
pub(crate) fn test_destroy_exactly_once() {
	let mut h = harness(TransitionMode::Deferred);
	h.manager.add_view("start", None);
	h.settle();
	h.manager.add_view("game", None);
	h.manager.remove_view(&"start");
	h.settle();

	assert_eq!(h.views.destructions_of(&"start"), 1);
}

/// Must not emit `Closed` for an occupant displaced by `add_view`.
///
/// - Enforced in: `ViewManager::finish_replace`
/// - Failure symptom: Listeners tear down state for a view swap they did not request.
#[cfg_attr(test, test)]
pub(crate) fn test_replacement_is_silent() {
	let mut h = harness(TransitionMode::Immediate);
	h.manager.add_view("start", None);
	h.manager.add_view("game", None);

	assert_eq!(h.closed("start"), 0);
}

/// Must keep the backdrop hidden whenever no overlay layer is occupied once fades finish.
///
/// - Enforced in: `Backdrop::recompute`, `ViewManager::refresh_backdrop`
/// - Failure symptom: The screen stays dimmed after the last dialog closes.
#[cfg_attr(test, test)]
pub(crate) fn test_backdrop_hidden_without_overlays() {
	let mut h = harness(TransitionMode::Immediate);
	h.manager.add_view("credits", None);
	h.manager.advance(Duration::from_secs(1));
	h.manager.remove_view(&"credits");
	h.manager.advance(Duration::from_secs(1));

	assert_eq!(h.manager.view_on_layer(&MODAL), None);
	assert_eq!(h.manager.backdrop().phase(), BackdropPhase::Inactive);
	assert!(!h.manager.backdrop().is_visible());
}

/// Must run scene callbacks once, in request order, only after the expected scene loads.
///
/// - Enforced in: `LoadState::resolve`
/// - Failure symptom: Gameplay setup runs against the previous scene or runs twice.
#[cfg_attr(test, test)]
pub(crate) fn test_scene_callbacks_fire_once_in_order() {
	use std::cell::RefCell;
	use std::rc::Rc;

	let mut h = harness(TransitionMode::Immediate);
	let order = Rc::new(RefCell::new(Vec::new()));
	for n in 0..3 {
		let order = Rc::clone(&order);
		h.manager.change_scene_then("Game", move |_| order.borrow_mut().push(n));
	}
	assert_eq!(
		h.manager.scene_loaded("Menu"),
		Err(ViewError::SceneMismatch {
			expected: "Game".into(),
			loaded: "Menu".into(),
		})
	);
	assert!(order.borrow().is_empty());

	h.manager.scene_loaded("Game").unwrap();
	assert!(h.manager.scene_loaded("Game").is_err());
	assert_eq!(*order.borrow(), vec![0, 1, 2]);
}

/// Must never let the input disable counter go below zero.
///
/// - Enforced in: `InputGate::toggle`
/// - Failure symptom: Input stays disabled forever after an unbalanced enable.
#[cfg_attr(test, test)]
pub(crate) fn test_input_counter_never_underflows() {
	let mut h = harness(TransitionMode::Immediate);
	let (result, logs) = with_logs(|| h.manager.toggle_input(true));

	assert_eq!(result, Err(ViewError::InputUnderflow));
	assert!(logs.contains("ERROR"), "{logs}");
	h.manager.toggle_input(false).unwrap();
	assert!(!h.manager.is_input_enabled());
}
