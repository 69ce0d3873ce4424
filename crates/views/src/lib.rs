#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Slot-based view lifecycle management.
//!
//! A [`ViewManager`] decides which registered view occupies which layer of a
//! presentation surface, sequences the asynchronous transitions between
//! occupants, keeps a dimming backdrop beneath the topmost occupied overlay
//! layer, and guards scene changes so their callbacks fire exactly once.
//!
//! # Main Types
//!
//! - [`ViewManager`] - The explicit context object; built once via [`ViewManager::builder`]
//! - [`Renderer`] / [`LiveView`] - The presentation backend the manager drives
//! - [`SceneLoader`] / [`BundleLoader`] - Scene and asset bundle collaborators
//! - [`TransitionDone`] / [`BundleDone`] / [`AssetDone`] - One-shot completion tickets
//!
//! # Architecture
//!
//! ```text
//! ViewManager<R>
//! ├── registry: DescriptorRegistry      // view id -> layer + locator, append-only
//! ├── layers: LayerTable                // BTreeMap<layer, slot>, bottom to top
//! ├── guards: GuardSets                 // in-flight adds/removes per id
//! ├── stage: Stage<R::Content>          // every live view, keyed by InstanceId
//! ├── continuations: ticket -> work     // what to do when a transition reports back
//! ├── backdrop: Backdrop                // overlay dimming state machine
//! ├── loads: LoadState                  // single-flight scene change + callbacks
//! ├── assets: layer -> pending load     // bundled views reserving their layer
//! └── input: InputGate                  // stackable input suppression
//! ```
//!
//! Collaborators report completion by consuming tickets, which post to
//! channels the manager drains at the end of each call and in
//! [`ViewManager::pump`]. No locks, no global state.

pub mod backdrop;
mod changes;
pub mod config;
pub mod error;
mod events;
pub mod guard;
/// In-memory collaborators for tests and scripted hosts.
pub mod headless;
mod input;
#[cfg(test)]
mod invariants;
mod key;
pub mod layers;
mod locator;
mod manager;
pub mod registry;
mod render;
mod scene;
mod signal;
mod stage;
#[cfg(test)]
mod testing;

pub use backdrop::{Backdrop, BackdropFrame, BackdropPhase};
pub use changes::Changes;
pub use config::{BackdropConfig, ViewManagerConfig};
pub use error::{ConfigError, RenderError, Result, ViewError};
pub use events::{SubscriptionId, ViewEvent};
pub use input::InputGate;
pub use key::Key;
pub use locator::{AssetRequest, BundleRequest, ContentLocator};
pub use manager::{Callback, ViewData, ViewManager, ViewManagerBuilder};
pub use render::{Instantiate, LiveView, Renderer};
pub use scene::{BundleLoader, SceneLoader};
pub use signal::{AssetDone, BundleDone, Direction, SignalSender, Ticket, TransitionDone};
pub use stage::InstanceId;
