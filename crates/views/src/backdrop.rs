//! Dimming backdrop beneath the topmost occupied overlay layer.
//!
//! The backdrop is a pure state machine: the manager tells it when overlay
//! occupancy changed and how much time passed, and forwards the resulting
//! placement and frames to the renderer.
//!
//! ```text
//!            target > alpha               alpha == target > 0
//! Inactive ───────────────► FadingIn ─────────────────────────► Active
//!    ▲                         │  ▲                               │
//!    │ alpha == 0              │  │ target > alpha                │ target < alpha
//!    └────────────────── FadingOut ◄──────────────────────────────┘
//! ```

use std::time::Duration;

use crate::Key;
use crate::config::BackdropConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackdropPhase {
	Inactive,
	FadingIn,
	Active,
	FadingOut,
}

/// What the renderer should show for the backdrop node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropFrame {
	pub visible: bool,
	pub alpha: f32,
}

/// Result of a recompute: where to place the node (when it moved) and the frame
/// to paint (when visibility changed).
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropUpdate<L> {
	pub beneath: Option<L>,
	pub frame: Option<BackdropFrame>,
}

#[derive(Debug, Clone)]
pub struct Backdrop<L> {
	overlays: Vec<L>,
	phase: BackdropPhase,
	alpha: f32,
	target: f32,
	configured: f32,
	fade_step: f32,
	tick: Duration,
	carry: Duration,
	visible: bool,
	engaged: bool,
	beneath: Option<L>,
}

/// Shortest fade tick; a zero tick would never let `advance` return.
const MIN_TICK: Duration = Duration::from_micros(1);

impl<L: Key> Backdrop<L> {
	/// Builds an inactive backdrop. Out-of-range values are clamped: a fade
	/// step outside `(0, 1]` jumps straight to the target and the tick is at
	/// least one microsecond.
	pub fn new(config: &BackdropConfig) -> Self {
		let fade_step = if config.fade_step > 0.0 { config.fade_step.min(1.0) } else { 1.0 };
		Self {
			overlays: Vec::new(),
			phase: BackdropPhase::Inactive,
			alpha: 0.0,
			target: 0.0,
			configured: config.target_alpha.clamp(0.0, 1.0),
			fade_step,
			tick: config.tick_interval().max(MIN_TICK),
			carry: Duration::ZERO,
			visible: false,
			engaged: false,
			beneath: None,
		}
	}

	/// Replaces the overlay layer list. Stored sorted and de-duplicated.
	pub fn declare(&mut self, layers: impl IntoIterator<Item = L>) {
		let mut overlays: Vec<L> = layers.into_iter().collect();
		overlays.sort();
		overlays.dedup();
		self.overlays = overlays;
	}

	pub fn overlays(&self) -> &[L] {
		&self.overlays
	}

	pub fn is_overlay(&self, layer: &L) -> bool {
		self.overlays.binary_search(layer).is_ok()
	}

	pub fn phase(&self) -> BackdropPhase {
		self.phase
	}

	pub fn alpha(&self) -> f32 {
		self.alpha
	}

	pub fn target(&self) -> f32 {
		self.target
	}

	pub fn configured_alpha(&self) -> f32 {
		self.configured
	}

	pub fn is_visible(&self) -> bool {
		self.visible
	}

	/// Layer the node currently sits beneath.
	pub fn beneath(&self) -> Option<&L> {
		self.beneath.as_ref()
	}

	pub fn frame(&self) -> BackdropFrame {
		BackdropFrame {
			visible: self.visible,
			alpha: self.alpha,
		}
	}

	/// Re-evaluates placement and target from overlay occupancy.
	pub fn recompute(&mut self, is_occupied: impl Fn(&L) -> bool) -> BackdropUpdate<L> {
		let topmost = self.overlays.iter().rev().find(|layer| is_occupied(layer)).cloned();
		let was_visible = self.visible;

		let beneath = match topmost {
			Some(layer) => {
				self.engaged = true;
				let moved = self.beneath.as_ref() != Some(&layer);
				self.beneath = Some(layer.clone());
				self.retarget(self.configured);
				moved.then_some(layer)
			}
			None => {
				self.engaged = false;
				self.retarget(0.0);
				None
			}
		};

		BackdropUpdate {
			beneath,
			frame: (self.visible != was_visible).then(|| self.frame()),
		}
	}

	/// Changes the configured alpha. Retargets when an overlay is occupied.
	/// Returns the frame to paint when visibility changed.
	pub fn set_configured(&mut self, alpha: f32) -> Option<BackdropFrame> {
		self.configured = alpha.clamp(0.0, 1.0);
		if !self.engaged {
			return None;
		}
		let was_visible = self.visible;
		self.retarget(self.configured);
		(self.visible != was_visible).then(|| self.frame())
	}

	/// Cancels any fade and starts a new one toward `target`.
	fn retarget(&mut self, target: f32) {
		self.target = target;
		self.carry = Duration::ZERO;
		self.phase = if target > self.alpha {
			self.visible = true;
			BackdropPhase::FadingIn
		} else if target < self.alpha {
			BackdropPhase::FadingOut
		} else {
			self.settle()
		};
	}

	fn settle(&mut self) -> BackdropPhase {
		self.carry = Duration::ZERO;
		if self.target > 0.0 {
			BackdropPhase::Active
		} else {
			self.visible = false;
			BackdropPhase::Inactive
		}
	}

	pub fn is_fading(&self) -> bool {
		matches!(self.phase, BackdropPhase::FadingIn | BackdropPhase::FadingOut)
	}

	/// Advances the fade by `elapsed`, painting one frame per whole tick.
	/// Returns true if any step ran.
	pub fn advance(&mut self, elapsed: Duration, mut paint: impl FnMut(BackdropFrame)) -> bool {
		if !self.is_fading() {
			return false;
		}
		self.carry += elapsed;
		let mut stepped = false;
		while self.is_fading() && self.carry >= self.tick {
			self.carry -= self.tick;
			self.step();
			stepped = true;
			paint(self.frame());
		}
		stepped
	}

	fn step(&mut self) {
		self.alpha = if self.target > self.alpha {
			(self.alpha + self.fade_step).min(self.target)
		} else {
			(self.alpha - self.fade_step).max(self.target)
		};
		if self.alpha == self.target {
			self.phase = self.settle();
		}
	}

	/// Jumps straight to hidden at alpha 0, cancelling any fade.
	pub fn force_inactive(&mut self) -> BackdropFrame {
		self.engaged = false;
		self.alpha = 0.0;
		self.target = 0.0;
		self.carry = Duration::ZERO;
		self.visible = false;
		self.phase = BackdropPhase::Inactive;
		self.frame()
	}
}

#[cfg(test)]
mod tests;
