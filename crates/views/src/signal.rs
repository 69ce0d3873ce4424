//! Completion tickets and the channels they report through.
//!
//! Collaborators never call back into the manager directly. They are handed a
//! one-shot ticket and complete it whenever their work is done; the ticket posts
//! to an unbounded channel that the manager drains.
//!
//! ```text
//! LiveView::transition_out ─► TransitionDone::complete ─► transitions ─┐
//! BundleLoader::load_view ──► AssetDone::loaded ────────► assets ──────┴─► settle() (every call)
//! BundleLoader::load ───────► BundleDone::loaded ──┐
//! SignalSender::scene_loaded ──────────────────────┴─► loads ─► pump()
//! ```
//!
//! Sending never blocks and needs no runtime, so a collaborator may complete a
//! ticket synchronously inside the call that handed it over.

use std::fmt;

use tokio::sync::mpsc;

/// Identity of one outstanding collaborator completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "t{}", self.0)
	}
}

/// Which transition a [`TransitionDone`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	In,
	Out,
}

/// One-shot completion handle for a view transition.
///
/// Not `Clone`; [`Self::complete`] consumes it. A ticket dropped without being
/// completed completes itself, so every transition reports exactly once even
/// when the view that held it is destroyed mid-animation.
#[derive(Debug)]
pub struct TransitionDone {
	ticket: Ticket,
	direction: Direction,
	tx: Option<mpsc::UnboundedSender<Ticket>>,
}

impl TransitionDone {
	pub fn ticket(&self) -> Ticket {
		self.ticket
	}

	pub fn direction(&self) -> Direction {
		self.direction
	}

	/// Reports the transition as finished.
	pub fn complete(mut self) {
		self.fire();
	}

	fn fire(&mut self) {
		if let Some(tx) = self.tx.take()
			&& tx.send(self.ticket).is_err()
		{
			tracing::trace!(ticket = %self.ticket, "view manager gone before transition completed");
		}
	}
}

impl Drop for TransitionDone {
	fn drop(&mut self) {
		if self.tx.is_some() {
			tracing::debug!(ticket = %self.ticket, direction = ?self.direction, "transition ticket dropped without completing");
			self.fire();
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadSignal {
	Bundle { ticket: Ticket, scene: Option<String> },
	Scene { scene: String },
}

/// One-shot completion handle for a bundle load.
///
/// Dropping it without calling [`Self::loaded`] reports the load as failed.
#[derive(Debug)]
pub struct BundleDone {
	ticket: Ticket,
	tx: Option<mpsc::UnboundedSender<LoadSignal>>,
}

impl BundleDone {
	pub fn ticket(&self) -> Ticket {
		self.ticket
	}

	/// Reports the bundle as loaded, naming the scene it contains.
	pub fn loaded(mut self, scene: impl Into<String>) {
		self.fire(Some(scene.into()));
	}

	/// Reports the bundle as failed.
	pub fn failed(mut self) {
		self.fire(None);
	}

	fn fire(&mut self, scene: Option<String>) {
		if let Some(tx) = self.tx.take()
			&& tx
				.send(LoadSignal::Bundle {
					ticket: self.ticket,
					scene,
				})
				.is_err()
		{
			tracing::trace!(ticket = %self.ticket, "view manager gone before bundle load completed");
		}
	}
}

impl Drop for BundleDone {
	fn drop(&mut self) {
		if self.tx.is_some() {
			self.fire(None);
		}
	}
}

/// Bundled view content delivered by a loader. `None` means the load failed.
#[derive(Debug)]
pub(crate) struct AssetSignal<A> {
	pub ticket: Ticket,
	pub asset: Option<A>,
}

/// One-shot completion handle for bundled view content.
///
/// Dropping it without calling [`Self::loaded`] reports the load as failed.
#[derive(Debug)]
pub struct AssetDone<A> {
	ticket: Ticket,
	tx: Option<mpsc::UnboundedSender<AssetSignal<A>>>,
}

impl<A> AssetDone<A> {
	pub fn ticket(&self) -> Ticket {
		self.ticket
	}

	/// Hands over the loaded content.
	pub fn loaded(mut self, asset: A) {
		self.fire(Some(asset));
	}

	/// Reports the load as failed.
	pub fn failed(mut self) {
		self.fire(None);
	}

	fn fire(&mut self, asset: Option<A>) {
		if let Some(tx) = self.tx.take()
			&& tx.send(AssetSignal { ticket: self.ticket, asset }).is_err()
		{
			tracing::trace!(ticket = %self.ticket, "view manager gone before bundled view loaded");
		}
	}
}

impl<A> Drop for AssetDone<A> {
	fn drop(&mut self) {
		if self.tx.is_some() {
			tracing::debug!(ticket = %self.ticket, "asset ticket dropped without completing");
			self.fire(None);
		}
	}
}

/// Cloneable handle for reporting scene loads from outside the manager.
///
/// Notifications are applied by [`ViewManager::pump`](crate::ViewManager::pump).
#[derive(Debug, Clone)]
pub struct SignalSender {
	loads: mpsc::UnboundedSender<LoadSignal>,
}

impl SignalSender {
	/// Reports that `scene` finished loading. Returns false if the manager is gone.
	pub fn scene_loaded(&self, scene: impl Into<String>) -> bool {
		self.loads.send(LoadSignal::Scene { scene: scene.into() }).is_ok()
	}
}

/// Every channel plus the ticket clock. `A` is the renderer's asset type.
pub(crate) struct SignalBus<A> {
	last: u64,
	transitions_tx: mpsc::UnboundedSender<Ticket>,
	transitions_rx: mpsc::UnboundedReceiver<Ticket>,
	assets_tx: mpsc::UnboundedSender<AssetSignal<A>>,
	assets_rx: mpsc::UnboundedReceiver<AssetSignal<A>>,
	loads_tx: mpsc::UnboundedSender<LoadSignal>,
	loads_rx: mpsc::UnboundedReceiver<LoadSignal>,
}

impl<A> Default for SignalBus<A> {
	fn default() -> Self {
		let (transitions_tx, transitions_rx) = mpsc::unbounded_channel();
		let (assets_tx, assets_rx) = mpsc::unbounded_channel();
		let (loads_tx, loads_rx) = mpsc::unbounded_channel();
		Self {
			last: 0,
			transitions_tx,
			transitions_rx,
			assets_tx,
			assets_rx,
			loads_tx,
			loads_rx,
		}
	}
}

impl<A> SignalBus<A> {
	fn ticket(&mut self) -> Ticket {
		self.last = self.last.wrapping_add(1);
		Ticket(self.last)
	}

	pub fn transition(&mut self, direction: Direction) -> TransitionDone {
		TransitionDone {
			ticket: self.ticket(),
			direction,
			tx: Some(self.transitions_tx.clone()),
		}
	}

	pub fn bundle(&mut self) -> BundleDone {
		BundleDone {
			ticket: self.ticket(),
			tx: Some(self.loads_tx.clone()),
		}
	}

	pub fn asset(&mut self) -> AssetDone<A> {
		AssetDone {
			ticket: self.ticket(),
			tx: Some(self.assets_tx.clone()),
		}
	}

	pub fn sender(&self) -> SignalSender {
		SignalSender {
			loads: self.loads_tx.clone(),
		}
	}

	pub fn next_transition(&mut self) -> Option<Ticket> {
		self.transitions_rx.try_recv().ok()
	}

	pub fn next_asset(&mut self) -> Option<AssetSignal<A>> {
		self.assets_rx.try_recv().ok()
	}

	pub fn next_load(&mut self) -> Option<LoadSignal> {
		self.loads_rx.try_recv().ok()
	}
}
