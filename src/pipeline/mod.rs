//! Launch pipeline.
//!
//! [`Root`] drives the tree through its lifecycle and puts the constructed
//! native tree on a [`Stage`]:
//!
//! ```text
//! Root::new(tree) → launch(stage) → before_construction → construct → after_construction
//!                                 → Scene(handle) on stage → show
//! ```
//!
//! The stage is an explicit object owned by the application. Window-level
//! services (stylesheets, accelerators) are reached through it, never
//! through process-wide state.

mod root;
mod stage;

pub use root::{CACHE_RESET_STYLE, Root};
pub use stage::{Key, LaunchOptions, RELOAD_KEY, Scene, Stage};

pub(crate) use root::RootInner;
