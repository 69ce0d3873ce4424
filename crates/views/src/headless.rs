//! In-memory collaborators for tests and scripted hosts.
//!
//! [`HeadlessRenderer`] records every call it receives and either completes
//! transitions on the spot or parks their tickets until a
//! [`HeadlessHandle`] releases them. The loaders record requests and hand
//! bundle and asset tickets back on demand. A delivered asset is the display
//! form of the request it answers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::error::RenderError;
use crate::render::{Instantiate, LiveView, Renderer};
use crate::scene::{BundleLoader, SceneLoader};
use crate::signal::Direction;
use crate::{AssetDone, AssetRequest, BackdropFrame, BundleDone, BundleRequest, InstanceId, Key, TransitionDone};

/// When a [`HeadlessView`] completes its transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionMode {
	/// Complete inside the transition call.
	#[default]
	Immediate,
	/// Park tickets until the handle releases them.
	Deferred,
}

/// One recorded renderer interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall<V, L, D> {
	RealizeLayers(Vec<(L, String)>),
	/// `asset` is set when the content came from a bundle loader.
	Instantiate {
		view: V,
		layer: L,
		instance: InstanceId,
		asset: Option<String>,
	},
	TransitionIn { view: V, instance: InstanceId },
	TransitionOut { view: V, instance: InstanceId },
	Update { view: V, data: D },
	Destroy { view: V, instance: InstanceId },
	PlaceBackdrop(L),
	PaintBackdrop(BackdropFrame),
	SetInputEnabled(bool),
}

struct Parked<V> {
	view: V,
	instance: InstanceId,
	done: TransitionDone,
}

struct Shared<V, L, D> {
	mode: TransitionMode,
	calls: Vec<RenderCall<V, L, D>>,
	parked: VecDeque<Parked<V>>,
	live: Vec<(InstanceId, V)>,
	failing: Vec<V>,
}

/// Renderer that keeps everything in memory.
pub struct HeadlessRenderer<V, L, D> {
	shared: Rc<RefCell<Shared<V, L, D>>>,
}

/// Test-side view of a [`HeadlessRenderer`].
pub struct HeadlessHandle<V, L, D> {
	shared: Rc<RefCell<Shared<V, L, D>>>,
}

impl<V, L, D> Clone for HeadlessHandle<V, L, D> {
	fn clone(&self) -> Self {
		Self {
			shared: Rc::clone(&self.shared),
		}
	}
}

/// Content produced by [`HeadlessRenderer`].
pub struct HeadlessView<V, L, D> {
	view: V,
	instance: InstanceId,
	shared: Rc<RefCell<Shared<V, L, D>>>,
}

impl<V, L, D> fmt::Debug for HeadlessView<V, L, D>
where
	V: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HeadlessView")
			.field("view", &self.view)
			.field("instance", &self.instance)
			.finish()
	}
}

impl<V: Key, L: Key, D: Clone + fmt::Debug + 'static> HeadlessRenderer<V, L, D> {
	pub fn new(mode: TransitionMode) -> Self {
		Self {
			shared: Rc::new(RefCell::new(Shared {
				mode,
				calls: Vec::new(),
				parked: VecDeque::new(),
				live: Vec::new(),
				failing: Vec::new(),
			})),
		}
	}

	pub fn handle(&self) -> HeadlessHandle<V, L, D> {
		HeadlessHandle {
			shared: Rc::clone(&self.shared),
		}
	}

	fn record(&self, call: RenderCall<V, L, D>) {
		self.shared.borrow_mut().calls.push(call);
	}

	fn create(&mut self, request: Instantiate<'_, V, L>, asset: Option<String>) -> Result<HeadlessView<V, L, D>, RenderError> {
		let mut shared = self.shared.borrow_mut();
		if shared.failing.contains(request.view) {
			return Err(RenderError::new(request.locator, "content unavailable"));
		}
		shared.calls.push(RenderCall::Instantiate {
			view: request.view.clone(),
			layer: request.layer.clone(),
			instance: request.instance,
			asset,
		});
		shared.live.push((request.instance, request.view.clone()));
		Ok(HeadlessView {
			view: request.view.clone(),
			instance: request.instance,
			shared: Rc::clone(&self.shared),
		})
	}
}

impl<V: Key, L: Key, D: Clone + fmt::Debug + 'static> Renderer for HeadlessRenderer<V, L, D> {
	type ViewId = V;
	type LayerId = L;
	type Content = HeadlessView<V, L, D>;
	type Asset = String;

	fn instantiate(&mut self, request: Instantiate<'_, V, L>) -> Result<Self::Content, RenderError> {
		self.create(request, None)
	}

	fn instantiate_loaded(&mut self, request: Instantiate<'_, V, L>, asset: String) -> Result<Self::Content, RenderError> {
		self.create(request, Some(asset))
	}

	fn realize_layers(&mut self, layers: &[(L, String)]) {
		self.record(RenderCall::RealizeLayers(layers.to_vec()));
	}

	fn place_backdrop(&mut self, layer: &L) {
		self.record(RenderCall::PlaceBackdrop(layer.clone()));
	}

	fn paint_backdrop(&mut self, frame: BackdropFrame) {
		self.record(RenderCall::PaintBackdrop(frame));
	}

	fn set_input_enabled(&mut self, enabled: bool) {
		self.record(RenderCall::SetInputEnabled(enabled));
	}
}

impl<V: Key, L, D> HeadlessView<V, L, D> {
	fn transition(&mut self, done: TransitionDone) {
		let mut shared = self.shared.borrow_mut();
		let call = match done.direction() {
			Direction::In => RenderCall::TransitionIn {
				view: self.view.clone(),
				instance: self.instance,
			},
			Direction::Out => RenderCall::TransitionOut {
				view: self.view.clone(),
				instance: self.instance,
			},
		};
		shared.calls.push(call);
		let mode = shared.mode;
		match mode {
			TransitionMode::Immediate => done.complete(),
			TransitionMode::Deferred => shared.parked.push_back(Parked {
				view: self.view.clone(),
				instance: self.instance,
				done,
			}),
		}
	}
}

impl<V: Key, L, D> LiveView for HeadlessView<V, L, D> {
	type Data = D;

	fn transition_in(&mut self, done: TransitionDone) {
		self.transition(done);
	}

	fn transition_out(&mut self, done: TransitionDone) {
		self.transition(done);
	}

	fn update(&mut self, data: D) {
		self.shared.borrow_mut().calls.push(RenderCall::Update {
			view: self.view.clone(),
			data,
		});
	}

	/// Destroying a view abandons its parked transitions, which completes them.
	fn destroy(self) {
		let abandoned = {
			let mut shared = self.shared.borrow_mut();
			shared.calls.push(RenderCall::Destroy {
				view: self.view.clone(),
				instance: self.instance,
			});
			shared.live.retain(|(instance, _)| *instance != self.instance);
			let (abandoned, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut shared.parked).into_iter().partition(|parked| parked.instance == self.instance);
			shared.parked = kept.into_iter().collect();
			abandoned
		};
		drop(abandoned);
	}
}

impl<V: Key, L: Clone, D: Clone> HeadlessHandle<V, L, D> {
	pub fn set_mode(&self, mode: TransitionMode) {
		self.shared.borrow_mut().mode = mode;
	}

	/// Makes every future instantiation of `view` fail.
	pub fn fail_view(&self, view: V) {
		self.shared.borrow_mut().failing.push(view);
	}

	/// Number of parked transitions.
	pub fn pending_transitions(&self) -> usize {
		self.shared.borrow().parked.len()
	}

	/// Views with a parked transition, oldest first.
	pub fn parked(&self) -> Vec<(V, Direction)> {
		self.shared
			.borrow()
			.parked
			.iter()
			.map(|parked| (parked.view.clone(), parked.done.direction()))
			.collect()
	}

	/// Completes the oldest parked transition.
	pub fn complete_next(&self) -> bool {
		let parked = self.shared.borrow_mut().parked.pop_front();
		parked.map(|parked| parked.done.complete()).is_some()
	}

	/// Completes the newest parked transition.
	pub fn complete_last(&self) -> bool {
		let parked = self.shared.borrow_mut().parked.pop_back();
		parked.map(|parked| parked.done.complete()).is_some()
	}

	/// Completes every parked transition. Returns how many were completed.
	pub fn complete_all(&self) -> usize {
		let parked = std::mem::take(&mut self.shared.borrow_mut().parked);
		let count = parked.len();
		for parked in parked {
			parked.done.complete();
		}
		count
	}

	/// Views that have been instantiated and not destroyed, oldest first.
	pub fn live(&self) -> Vec<V> {
		self.shared.borrow().live.iter().map(|(_, view)| view.clone()).collect()
	}

	pub fn instantiations_of(&self, view: &V) -> usize {
		self.shared
			.borrow()
			.calls
			.iter()
			.filter(|call| matches!(call, RenderCall::Instantiate { view: v, .. } if v == view))
			.count()
	}

	pub fn destructions_of(&self, view: &V) -> usize {
		self.shared
			.borrow()
			.calls
			.iter()
			.filter(|call| matches!(call, RenderCall::Destroy { view: v, .. } if v == view))
			.count()
	}

	pub fn calls(&self) -> Vec<RenderCall<V, L, D>> {
		self.shared.borrow().calls.clone()
	}

	pub fn last_backdrop_frame(&self) -> Option<BackdropFrame> {
		self.shared.borrow().calls.iter().rev().find_map(|call| match call {
			RenderCall::PaintBackdrop(frame) => Some(*frame),
			_ => None,
		})
	}

	pub fn clear_calls(&self) {
		self.shared.borrow_mut().calls.clear();
	}
}

/// Scene loader that only records what it was asked to load.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSceneLoader {
	requests: Rc<RefCell<Vec<String>>>,
}

impl HeadlessSceneLoader {
	pub fn requests(&self) -> Vec<String> {
		self.requests.borrow().clone()
	}
}

impl SceneLoader for HeadlessSceneLoader {
	fn load(&mut self, scene: &str) {
		self.requests.borrow_mut().push(scene.to_owned());
	}
}

/// Bundle loader that parks every request until resolved by hand.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBundleLoader {
	pending: Rc<RefCell<VecDeque<(BundleRequest, BundleDone)>>>,
	views: Rc<RefCell<VecDeque<(AssetRequest, AssetDone<String>)>>>,
}

impl HeadlessBundleLoader {
	pub fn pending(&self) -> Vec<String> {
		self.pending.borrow().iter().map(|(request, _)| request.bundle.clone()).collect()
	}

	/// Resolves the oldest request as containing `scene`. Returns its bundle path.
	pub fn resolve_next(&self, scene: &str) -> Option<String> {
		let (request, done) = self.pending.borrow_mut().pop_front()?;
		done.loaded(scene);
		Some(request.bundle)
	}

	/// Fails the oldest request. Returns its bundle path.
	pub fn fail_next(&self) -> Option<String> {
		let (request, done) = self.pending.borrow_mut().pop_front()?;
		done.failed();
		Some(request.bundle)
	}

	/// Bundled view requests still parked, oldest first.
	pub fn pending_views(&self) -> Vec<AssetRequest> {
		self.views.borrow().iter().map(|(request, _)| request.clone()).collect()
	}

	/// Delivers the oldest view request. Returns the asset handed over.
	pub fn deliver_next_view(&self) -> Option<String> {
		let (request, done) = self.views.borrow_mut().pop_front()?;
		let asset = request.to_string();
		done.loaded(asset.clone());
		Some(asset)
	}

	/// Delivers every parked view request. Returns how many were delivered.
	pub fn deliver_all_views(&self) -> usize {
		let parked = std::mem::take(&mut *self.views.borrow_mut());
		let count = parked.len();
		for (request, done) in parked {
			done.loaded(request.to_string());
		}
		count
	}

	/// Fails the oldest view request.
	pub fn fail_next_view(&self) -> Option<AssetRequest> {
		let (request, done) = self.views.borrow_mut().pop_front()?;
		done.failed();
		Some(request)
	}
}

impl BundleLoader<String> for HeadlessBundleLoader {
	fn load(&mut self, request: BundleRequest, done: BundleDone) {
		tracing::trace!(bundle = %request.bundle, ticket = %done.ticket(), "bundle request parked");
		self.pending.borrow_mut().push_back((request, done));
	}

	fn load_view(&mut self, request: AssetRequest, done: AssetDone<String>) {
		tracing::trace!(asset = %request, ticket = %done.ticket(), "view asset request parked");
		self.views.borrow_mut().push_back((request, done));
	}
}
