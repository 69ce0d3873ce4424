use pretty_assertions::assert_eq;

use super::*;
use crate::signal::SignalBus;

#[test]
fn matching_scene_resolves_callbacks_in_order() {
	let mut state = LoadState::default();
	assert!(!state.begin("Game", Some(1)));
	assert!(state.begin("Game", Some(2)), "second request overlaps the first");

	assert_eq!(state.resolve("game", false), Ok(vec![1, 2]));
	assert!(!state.is_in_progress());
	assert_eq!(state.expected(), None);
	assert_eq!(state.pending_callbacks(), 0);
}

#[test]
fn last_request_sets_the_expected_scene() {
	let mut state = LoadState::default();
	state.begin("Menu", Some(1));
	state.begin("Game", Some(2));

	assert_eq!(
		state.resolve("Menu", false),
		Err(ViewError::SceneMismatch {
			expected: "Game".into(),
			loaded: "Menu".into(),
		})
	);
	assert!(state.is_in_progress(), "a mismatch leaves the load untouched");
	assert_eq!(state.pending_callbacks(), 2);
}

#[test]
fn unrequested_scene_is_rejected_outside_dev_mode() {
	let mut state: LoadState<u8> = LoadState::default();
	assert_eq!(state.resolve("Game", false), Err(ViewError::UnrequestedScene { loaded: "Game".into() }));
	assert_eq!(state.resolve("Game", true), Ok(vec![]));
}

#[test]
fn dev_mode_accepts_any_scene() {
	let mut state = LoadState::default();
	state.begin("Game", Some(7));
	assert_eq!(state.resolve("Sandbox", true), Ok(vec![7]));
}

#[test]
fn bundle_completion_names_the_scene() {
	let mut bus: SignalBus<()> = SignalBus::default();
	let done = bus.bundle();
	let ticket = done.ticket();
	done.loaded("ignored");

	let mut state = LoadState::default();
	state.begin_bundle(ticket, "bundles/level1", Some(1));
	assert_eq!(state.pending_bundle(), Some("bundles/level1"));
	assert_eq!(
		state.resolve("Level1", false),
		Err(ViewError::SceneBeforeBundle {
			loaded: "Level1".into(),
			bundle: "bundles/level1".into(),
		})
	);

	assert_eq!(state.bundle_resolved(ticket, Some("Level1".into())), BundleOutcome::Scene("Level1".into()));
	assert_eq!(state.expected(), Some("Level1"));
	assert_eq!(state.resolve("Level1", false), Ok(vec![1]));
}

#[test]
fn failed_bundle_abandons_the_load() {
	let mut bus: SignalBus<()> = SignalBus::default();
	let ticket = bus.bundle().ticket();

	let mut state = LoadState::default();
	state.begin_bundle(ticket, "bundles/level1", Some(1));
	assert_eq!(
		state.bundle_resolved(ticket, None),
		BundleOutcome::Failed {
			bundle: "bundles/level1".into(),
			dropped: 1,
		}
	);
	assert!(!state.is_in_progress());
	assert_eq!(state.pending_callbacks(), 0);
}

#[test]
fn superseded_bundle_ticket_is_stale() {
	let mut bus: SignalBus<()> = SignalBus::default();
	let first = bus.bundle().ticket();
	let second = bus.bundle().ticket();

	let mut state = LoadState::default();
	state.begin_bundle(first, "bundles/a", Some(1));
	state.begin_bundle(second, "bundles/b", Some(2));

	assert_eq!(state.bundle_resolved(first, Some("A".into())), BundleOutcome::Stale);
	assert_eq!(state.pending_bundle(), Some("bundles/b"));

	state.begin("Menu", None);
	assert_eq!(state.bundle_resolved(second, Some("B".into())), BundleOutcome::Stale);
	assert_eq!(state.resolve("menu", false), Ok(vec![1, 2]));
}
