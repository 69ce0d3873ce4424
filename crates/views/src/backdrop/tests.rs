use std::collections::BTreeSet;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

const MODAL: u8 = 20;
const POPUP: u8 = 30;
const TICK: Duration = Duration::from_millis(10);

fn backdrop() -> Backdrop<u8> {
	let mut backdrop = Backdrop::new(&BackdropConfig {
		target_alpha: 0.5,
		fade_step: 0.25,
		tick_interval_us: 10_000,
	});
	backdrop.declare([POPUP, MODAL, POPUP]);
	backdrop
}

fn occupied(layers: &[u8]) -> impl Fn(&u8) -> bool + '_ {
	let set: BTreeSet<u8> = layers.iter().copied().collect();
	move |layer| set.contains(layer)
}

fn run_to_rest(backdrop: &mut Backdrop<u8>) -> Vec<BackdropFrame> {
	let mut frames = Vec::new();
	backdrop.advance(Duration::from_secs(1), |frame| frames.push(frame));
	frames
}

#[test]
fn overlays_are_sorted_and_deduplicated() {
	let backdrop = backdrop();
	assert_eq!(backdrop.overlays(), &[MODAL, POPUP]);
	assert!(backdrop.is_overlay(&MODAL));
	assert!(!backdrop.is_overlay(&10));
}

#[test]
fn occupying_an_overlay_fades_in_to_the_configured_alpha() {
	let mut backdrop = backdrop();
	let update = backdrop.recompute(occupied(&[MODAL]));

	assert_eq!(update.beneath, Some(MODAL));
	assert_eq!(update.frame, Some(BackdropFrame { visible: true, alpha: 0.0 }));
	assert_eq!(backdrop.phase(), BackdropPhase::FadingIn);
	assert_eq!(backdrop.target(), 0.5);

	let frames = run_to_rest(&mut backdrop);
	assert_eq!(
		frames,
		vec![
			BackdropFrame { visible: true, alpha: 0.25 },
			BackdropFrame { visible: true, alpha: 0.5 },
		]
	);
	assert_eq!(backdrop.phase(), BackdropPhase::Active);
}

#[test]
fn emptying_every_overlay_fades_out_and_hides() {
	let mut backdrop = backdrop();
	backdrop.recompute(occupied(&[MODAL]));
	run_to_rest(&mut backdrop);

	let update = backdrop.recompute(occupied(&[]));
	assert_eq!(update, BackdropUpdate { beneath: None, frame: None });
	assert_eq!(backdrop.phase(), BackdropPhase::FadingOut);
	assert_eq!(backdrop.target(), 0.0);

	let frames = run_to_rest(&mut backdrop);
	assert_eq!(frames.last(), Some(&BackdropFrame { visible: false, alpha: 0.0 }));
	assert_eq!(backdrop.phase(), BackdropPhase::Inactive);
	assert!(!backdrop.is_visible());
}

#[test]
fn backdrop_sits_beneath_the_topmost_occupied_overlay() {
	let mut backdrop = backdrop();
	assert_eq!(backdrop.recompute(occupied(&[MODAL, POPUP])).beneath, Some(POPUP));
	assert_eq!(backdrop.recompute(occupied(&[MODAL, POPUP])).beneath, None, "unchanged placement is not re-reported");
	assert_eq!(backdrop.recompute(occupied(&[MODAL])).beneath, Some(MODAL));
	assert_eq!(backdrop.beneath(), Some(&MODAL));
}

#[test]
fn partial_ticks_carry_over() {
	let mut backdrop = backdrop();
	backdrop.recompute(occupied(&[MODAL]));

	assert!(!backdrop.advance(TICK / 2, |_| {}));
	assert_eq!(backdrop.alpha(), 0.0);
	assert!(backdrop.advance(TICK / 2, |_| {}));
	assert_eq!(backdrop.alpha(), 0.25);
}

#[test]
fn retarget_mid_fade_reverses_direction() {
	let mut backdrop = backdrop();
	backdrop.recompute(occupied(&[MODAL]));
	backdrop.advance(TICK, |_| {});

	backdrop.recompute(occupied(&[]));
	assert_eq!(backdrop.phase(), BackdropPhase::FadingOut);
	backdrop.advance(TICK, |_| {});
	assert_eq!(backdrop.phase(), BackdropPhase::Inactive);
	assert!(!backdrop.is_visible());
}

#[test]
fn force_inactive_skips_the_fade() {
	let mut backdrop = backdrop();
	backdrop.recompute(occupied(&[MODAL]));
	backdrop.advance(TICK, |_| {});

	assert_eq!(backdrop.force_inactive(), BackdropFrame { visible: false, alpha: 0.0 });
	assert_eq!(backdrop.phase(), BackdropPhase::Inactive);
	assert!(!backdrop.advance(TICK, |_| {}));
}

#[test]
fn configured_alpha_retargets_only_while_an_overlay_is_occupied() {
	let mut backdrop = backdrop();
	assert_eq!(backdrop.set_configured(0.25), None);
	assert_eq!(backdrop.phase(), BackdropPhase::Inactive);

	backdrop.recompute(occupied(&[MODAL]));
	run_to_rest(&mut backdrop);
	assert_eq!(backdrop.alpha(), 0.25);

	backdrop.set_configured(2.0);
	assert_eq!(backdrop.configured_alpha(), 1.0);
	assert_eq!(backdrop.phase(), BackdropPhase::FadingIn);
	run_to_rest(&mut backdrop);
	assert_eq!(backdrop.alpha(), 1.0);
}

#[test]
fn zero_configured_alpha_never_shows() {
	let mut backdrop = backdrop();
	backdrop.set_configured(0.0);
	let update = backdrop.recompute(occupied(&[MODAL]));
	assert_eq!(update.frame, None);
	assert_eq!(backdrop.phase(), BackdropPhase::Inactive);
	assert!(!backdrop.is_visible());
}

#[test]
fn degenerate_config_still_reaches_the_target() {
	for (fade_step, tick_interval_us) in [(0.0, 10_000), (-0.5, 0), (f32::NAN, 0), (4.0, 10_000)] {
		let mut backdrop = Backdrop::new(&BackdropConfig {
			target_alpha: 0.5,
			fade_step,
			tick_interval_us,
		});
		backdrop.declare([MODAL]);
		backdrop.recompute(occupied(&[MODAL]));

		let frames = run_to_rest(&mut backdrop);
		assert_eq!(frames, vec![BackdropFrame { visible: true, alpha: 0.5 }], "step {fade_step}, tick {tick_interval_us}us");
		assert_eq!(backdrop.phase(), BackdropPhase::Active);
	}
}
