//! The scripted session and the frame loop that plays the engine's part.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use anyhow::bail;
use strata_views::headless::{HeadlessBundleLoader, HeadlessHandle, HeadlessRenderer, HeadlessSceneLoader, TransitionMode};
use strata_views::{ContentLocator, ViewEvent, ViewManager, ViewManagerConfig};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{error, info};

/// Presentation layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DemoLayer {
	Base,
	Hud,
	Dialog,
	Confirm,
}

impl fmt::Display for DemoLayer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Base => "base",
			Self::Hud => "hud",
			Self::Dialog => "dialog",
			Self::Confirm => "confirm",
		})
	}
}

type DemoRenderer = HeadlessRenderer<&'static str, DemoLayer, String>;

const MAX_FRAMES: u64 = 10_000;

/// Outcome of a session.
#[derive(Debug)]
pub struct Report {
	pub frames: u64,
	pub opened: usize,
	pub closed: usize,
	pub input_enabled: bool,
	pub on_screen: Vec<(DemoLayer, &'static str)>,
}

struct Session {
	manager: ViewManager<DemoRenderer>,
	views: HeadlessHandle<&'static str, DemoLayer, String>,
	scenes: HeadlessSceneLoader,
	bundles: HeadlessBundleLoader,
	ticker: Interval,
	frame: Duration,
	frames: u64,
	served_scenes: usize,
}

impl Session {
	/// Runs frames until nothing is in flight and the backdrop is at rest.
	async fn settle(&mut self) -> anyhow::Result<()> {
		loop {
			self.ticker.tick().await;
			self.frames += 1;
			if self.frames > MAX_FRAMES {
				bail!("session did not settle within {MAX_FRAMES} frames");
			}

			// One animation finishes per frame.
			self.views.complete_next();
			self.serve_loads();
			self.manager.pump()?;
			self.manager.advance(self.frame);

			if self.manager.is_settled()
				&& !self.manager.is_loading_scene()
				&& !self.manager.backdrop().is_fading()
				&& self.views.pending_transitions() == 0
				&& self.manager.pending_view_loads() == 0
			{
				return Ok(());
			}
		}
	}

	/// Finishes requested bundle and scene loads the way an engine would.
	fn serve_loads(&mut self) {
		for bundle in self.bundles.pending() {
			self.bundles.resolve_next(scene_in_bundle(&bundle));
		}
		for request in self.bundles.pending_views() {
			info!(%request, "bundled view fetched");
		}
		self.bundles.deliver_all_views();
		let requests = self.scenes.requests();
		let signals = self.manager.signals();
		for scene in requests.iter().skip(self.served_scenes) {
			info!(%scene, "scene finished loading");
			signals.scene_loaded(scene.as_str());
		}
		self.served_scenes = requests.len();
	}
}

/// Bundles in this session hold a single scene named after the last path segment.
fn scene_in_bundle(bundle: &str) -> &str {
	bundle.rsplit('/').next().unwrap_or(bundle)
}

pub async fn run(config: ViewManagerConfig, mode: TransitionMode, frame: Duration) -> anyhow::Result<Report> {
	let renderer = DemoRenderer::new(mode);
	let views = renderer.handle();
	let scenes = HeadlessSceneLoader::default();
	let bundles = HeadlessBundleLoader::default();

	let mut manager = ViewManager::builder(renderer, scenes.clone())
		.bundle_loader(bundles.clone())
		.config(config)
		.overlays([DemoLayer::Dialog, DemoLayer::Confirm])
		.build()?;
	for layer in [DemoLayer::Base, DemoLayer::Hud, DemoLayer::Dialog, DemoLayer::Confirm] {
		manager.name_layer(layer, format!("{layer} layer"));
	}
	manager.register_view("start", DemoLayer::Base, "views/StartView")?;
	manager.register_view("hud", DemoLayer::Hud, "views/PersistentUIView")?;
	manager.register_view("credits", DemoLayer::Dialog, "views/CreditsDialog")?;
	manager.register_view("game_over", DemoLayer::Dialog, ContentLocator::bundle("GameOverDialog", "bundles/dialogs"))?;
	manager.register_view("confirm", DemoLayer::Confirm, "views/ConfirmDialog")?;

	let tally = Rc::new(RefCell::new((0, 0)));
	let sink = Rc::clone(&tally);
	manager.subscribe(move |event| {
		let mut tally = sink.borrow_mut();
		match event {
			ViewEvent::Opened(view) => {
				tally.0 += 1;
				info!(%view, "opened");
			}
			ViewEvent::Closed(view) => {
				tally.1 += 1;
				info!(%view, "closed");
			}
		}
	});

	let mut ticker = tokio::time::interval(frame);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
	let mut session = Session {
		manager,
		views,
		scenes,
		bundles,
		ticker,
		frame,
		frames: 0,
		served_scenes: 0,
	};

	info!("main menu");
	session.manager.add_view("start", None);
	session.settle().await?;

	info!("credits over the menu");
	session.manager.add_view("credits", None);
	session.settle().await?;
	session.manager.remove_view(&"credits");
	session.settle().await?;

	info!("entering the game");
	session.manager.toggle_input(false)?;
	session.manager.change_scene_then("Game", |manager| {
		manager.remove_all_views();
		manager.add_view("hud", Some("score=0".into()));
		if let Err(error) = manager.toggle_input(true) {
			error!(%error, "input toggle unbalanced");
		}
	});
	session.settle().await?;
	session.manager.update_view(&"hud", "score=120".into());

	info!("game over");
	session.manager.add_view("game_over", Some("score=120".into()));
	session.settle().await?;
	session.manager.add_view("confirm", None);
	session.settle().await?;
	session.manager.remove_view(&"confirm");
	session.manager.remove_view_then(&"game_over", |manager| {
		let back_to_menu = manager.change_scene_bundle_then("bundles/menu", |manager| {
			manager.remove_all_views();
			manager.add_view("start", None);
		});
		if let Err(error) = back_to_menu {
			error!(%error, "cannot return to the menu");
		}
	});
	session.settle().await?;

	let manager = &session.manager;
	let on_screen = manager
		.occupied_layers()
		.into_iter()
		.filter_map(|layer| manager.view_on_layer(&layer).map(|view| (layer, *view)))
		.collect();
	let (opened, closed) = *tally.borrow();
	Ok(Report {
		frames: session.frames,
		opened,
		closed,
		input_enabled: manager.is_input_enabled(),
		on_screen,
	})
}
