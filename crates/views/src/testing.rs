//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use crate::headless::{HeadlessBundleLoader, HeadlessHandle, HeadlessRenderer, HeadlessSceneLoader, TransitionMode};
use crate::{BackdropConfig, ContentLocator, ViewEvent, ViewManager, ViewManagerConfig};

pub(crate) type Views = HeadlessRenderer<&'static str, u8, String>;
pub(crate) type Manager = ViewManager<Views>;

pub(crate) const BASE: u8 = 0;
pub(crate) const HUD: u8 = 10;
pub(crate) const MODAL: u8 = 20;
pub(crate) const POPUP: u8 = 30;

pub(crate) const VIEWS: [(&str, u8); 6] = [
	("start", BASE),
	("game", BASE),
	("hud", HUD),
	("credits", MODAL),
	("game_over", MODAL),
	("confirm", POPUP),
];

/// Views whose content comes out of `bundles/ui`.
pub(crate) const BUNDLED: [(&str, u8); 2] = [("shop", POPUP), ("inventory", MODAL)];

pub(crate) struct Harness {
	pub manager: Manager,
	pub views: HeadlessHandle<&'static str, u8, String>,
	pub scenes: HeadlessSceneLoader,
	pub bundles: HeadlessBundleLoader,
	pub events: Rc<RefCell<Vec<ViewEvent<&'static str>>>>,
}

/// Backdrop steps of 0.25 toward 0.5 every 10ms, so fades land on exact values.
pub(crate) fn config() -> ViewManagerConfig {
	ViewManagerConfig {
		dev_mode: false,
		backdrop: BackdropConfig {
			target_alpha: 0.5,
			fade_step: 0.25,
			tick_interval_us: 10_000,
		},
	}
}

pub(crate) fn harness(mode: TransitionMode) -> Harness {
	harness_with(mode, config())
}

pub(crate) fn harness_with(mode: TransitionMode, config: ViewManagerConfig) -> Harness {
	let renderer: Views = HeadlessRenderer::new(mode);
	let views = renderer.handle();
	let scenes = HeadlessSceneLoader::default();
	let bundles = HeadlessBundleLoader::default();

	let mut manager = ViewManager::builder(renderer, scenes.clone())
		.bundle_loader(bundles.clone())
		.config(config)
		.overlays([MODAL, POPUP])
		.build()
		.unwrap();
	for (id, layer) in VIEWS {
		manager.register_view(id, layer, format!("views/{id}")).unwrap();
	}
	for (id, layer) in BUNDLED {
		manager.register_view(id, layer, ContentLocator::bundle(id, "bundles/ui")).unwrap();
	}

	let events = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&events);
	manager.subscribe(move |event| sink.borrow_mut().push(event.clone()));

	Harness {
		manager,
		views,
		scenes,
		bundles,
		events,
	}
}

impl Harness {
	/// Releases parked transitions and bundled views until nothing is left
	/// in flight. A pump can start new transitions, so it always goes first.
	pub fn settle(&mut self) {
		loop {
			self.manager.pump().unwrap();
			if self.views.complete_all() + self.bundles.deliver_all_views() == 0 {
				break;
			}
		}
	}

	pub fn opened(&self, view: &str) -> usize {
		self.events
			.borrow()
			.iter()
			.filter(|event| matches!(event, ViewEvent::Opened(v) if *v == view))
			.count()
	}

	pub fn closed(&self, view: &str) -> usize {
		self.events
			.borrow()
			.iter()
			.filter(|event| matches!(event, ViewEvent::Closed(v) if *v == view))
			.count()
	}
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

/// Runs `f` with a subscriber that records formatted log lines.
pub(crate) fn with_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
	with_logs_at(tracing::Level::DEBUG, f)
}

pub(crate) fn with_logs_at<T>(level: tracing::Level, f: impl FnOnce() -> T) -> (T, String) {
	let capture = Capture::default();
	let writer = capture.clone();
	let subscriber = tracing_subscriber::fmt()
		.with_writer(move || writer.clone())
		.with_ansi(false)
		.with_max_level(level)
		.finish();
	let out = tracing::subscriber::with_default(subscriber, f);
	let logs = String::from_utf8_lossy(&capture.0.lock().unwrap()).into_owned();
	(out, logs)
}
