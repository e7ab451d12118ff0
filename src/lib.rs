//! # spark-tree
//!
//! Declarative, reactive component trees over a native widget toolkit.
//!
//! A UI is described as a tree of [`Component`] nodes, each optionally
//! carrying a native widget [`Handle`]. Properties and child lists can be
//! bound to reactive values, so the tree keeps itself in step with the data
//! underneath it.
//!
//! ## Architecture
//!
//! Everything is single-threaded `Rc<RefCell<..>>` state. A [`Root`] drives
//! the tree through four phases, each exactly once:
//! ```text
//! Root::launch(stage)
//!   → before_construction → construct → after_construction   (show on stage)
//! Root::close()
//!   → deconstruction                                          (hide stage)
//! ```
//!
//! After the first construction, changes to a node's children collection are
//! applied to the native tree right away: added children are constructed and
//! attached, removed ones detached and deconstructed.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Value, Phase, ChangeKind, Capabilities, ...)
//! - [`error`] - Error taxonomy
//! - [`reactive`] - ReactiveValue and ReactiveCollection
//! - [`engine`] - Native collaborator interface (Widget, Handle, property tables)
//! - [`widgets`] - Headless reference widgets
//! - [`component`] - Component nodes, lifecycle, bindings, search, dumps
//! - [`primitives`] - List builder and control factories
//! - [`pipeline`] - Root, Stage and Scene
//!
//! ## Example
//!
//! ```
//! use spark_tree::primitives::{text, vbox};
//! use spark_tree::{Hierarchy, Root, Stage, Verbosity};
//!
//! let root = Root::new(vbox([text("Hello"), text("World")]));
//! let stage = Stage::new();
//! root.launch(&stage).unwrap();
//!
//! assert!(stage.is_showing());
//! assert_eq!(
//!     root.hierarchy(Verbosity::Brief),
//!     "Root\n└── VBox\n    ├── Text\n    └── Text\n"
//! );
//! ```

pub mod component;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod reactive;
pub mod types;
pub mod widgets;

// Re-export commonly used items
pub use types::*;

pub use error::{Error, Result};

pub use reactive::{ReactiveCollection, ReactiveValue};

pub use engine::{Event, Handle, PropertyTable, Widget};

pub use component::{Component, Findable, Hierarchy, Lifecycle, Scope};

pub use pipeline::{LaunchOptions, Root, Scene, Stage};
