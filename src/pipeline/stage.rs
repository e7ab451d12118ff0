//! Window-level runtime context: stage, scene, launch options.
//!
//! A [`Stage`] is created by the application and handed to
//! [`Root::launch`](super::Root::launch). Launch builds a [`Scene`] around the
//! constructed root handle, puts it on the stage and shows the stage.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::engine::Handle;
use crate::types::Mode;

// =============================================================================
// Launch options
// =============================================================================

/// Window settings applied by [`Root::launch_with`](super::Root::launch_with).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchOptions {
    pub title: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Enables developer-only services in [`Mode::Debug`].
    pub mode: Mode,
}

// =============================================================================
// Keys
// =============================================================================

/// Key an accelerator is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Function key `F1`..`F12`.
    F(u8),
    Char(char),
    Enter,
    Escape,
}

/// Key that reloads stylesheets once developer shortcuts are enabled.
pub const RELOAD_KEY: Key = Key::F(5);

type Accelerator = Rc<dyn Fn()>;

// =============================================================================
// Scene
// =============================================================================

struct SceneInner {
    root: Handle,
    stylesheets: RefCell<Vec<String>>,
    accelerators: RefCell<Vec<(Key, Accelerator)>>,
}

/// Content of a stage: the root handle, stylesheets and accelerators.
#[derive(Clone)]
pub struct Scene {
    inner: Rc<SceneInner>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("root", &self.inner.root)
            .field("stylesheets", &self.inner.stylesheets.borrow())
            .field("accelerators", &self.inner.accelerators.borrow().len())
            .finish()
    }
}

/// Non-owning reference to a [`Scene`], for callbacks the scene itself stores.
pub(crate) struct WeakScene(Weak<SceneInner>);

impl WeakScene {
    pub(crate) fn upgrade(&self) -> Option<Scene> {
        self.0.upgrade().map(|inner| Scene { inner })
    }
}

impl Scene {
    pub fn new(root: Handle) -> Self {
        Self {
            inner: Rc::new(SceneInner {
                root,
                stylesheets: RefCell::new(Vec::new()),
                accelerators: RefCell::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakScene {
        WeakScene(Rc::downgrade(&self.inner))
    }

    pub fn root(&self) -> &Handle {
        &self.inner.root
    }

    /// Stylesheets in the order they were added.
    pub fn stylesheets(&self) -> Vec<String> {
        self.inner.stylesheets.borrow().clone()
    }

    pub fn add_stylesheet(&self, stylesheet: impl Into<String>) {
        self.inner.stylesheets.borrow_mut().push(stylesheet.into());
    }

    /// Remove the first occurrence of `stylesheet`.
    pub fn remove_stylesheet(&self, stylesheet: &str) -> bool {
        let mut stylesheets = self.inner.stylesheets.borrow_mut();
        match stylesheets.iter().position(|s| s == stylesheet) {
            Some(index) => {
                stylesheets.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every stylesheet, returning them in order.
    pub fn clear_stylesheets(&self) -> Vec<String> {
        std::mem::take(&mut *self.inner.stylesheets.borrow_mut())
    }

    /// Run `action` whenever `key` is triggered. Replaces an earlier
    /// accelerator for the same key.
    pub fn set_accelerator(&self, key: Key, action: impl Fn() + 'static) {
        let mut accelerators = self.inner.accelerators.borrow_mut();
        accelerators.retain(|(existing, _)| *existing != key);
        accelerators.push((key, Rc::new(action)));
    }

    pub fn has_accelerator(&self, key: Key) -> bool {
        self.inner
            .accelerators
            .borrow()
            .iter()
            .any(|(existing, _)| *existing == key)
    }

    /// Deliver a key press. Returns whether an accelerator handled it.
    pub fn trigger(&self, key: Key) -> bool {
        let action = self
            .inner
            .accelerators
            .borrow()
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, action)| action.clone());
        match action {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Stage
// =============================================================================

#[derive(Default)]
struct StageInner {
    title: RefCell<String>,
    width: Cell<Option<f64>>,
    height: Cell<Option<f64>>,
    scene: RefCell<Option<Scene>>,
    showing: Cell<bool>,
}

/// Top-level window owned by the application.
///
/// Clones share the same window.
#[derive(Clone, Default)]
pub struct Stage {
    inner: Rc<StageInner>,
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("title", &self.inner.title.borrow())
            .field("width", &self.inner.width.get())
            .field("height", &self.inner.height.get())
            .field("showing", &self.inner.showing.get())
            .finish()
    }
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the window settings of `options`. Unset fields keep their value.
    pub fn apply(&self, options: &LaunchOptions) {
        if let Some(title) = &options.title {
            self.set_title(title.clone());
        }
        if let Some(width) = options.width {
            self.inner.width.set(Some(width));
        }
        if let Some(height) = options.height {
            self.inner.height.set(Some(height));
        }
    }

    pub fn title(&self) -> String {
        self.inner.title.borrow().clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        *self.inner.title.borrow_mut() = title.into();
    }

    pub fn size(&self) -> (Option<f64>, Option<f64>) {
        (self.inner.width.get(), self.inner.height.get())
    }

    pub fn set_size(&self, width: f64, height: f64) {
        self.inner.width.set(Some(width));
        self.inner.height.set(Some(height));
    }

    pub fn scene(&self) -> Option<Scene> {
        self.inner.scene.borrow().clone()
    }

    pub fn set_scene(&self, scene: Scene) {
        *self.inner.scene.borrow_mut() = Some(scene);
    }

    pub fn show(&self) {
        debug!(target: "spark_tree::stage", title = %self.title(), "show");
        self.inner.showing.set(true);
    }

    pub fn hide(&self) {
        debug!(target: "spark_tree::stage", title = %self.title(), "hide");
        self.inner.showing.set(false);
    }

    pub fn is_showing(&self) -> bool {
        self.inner.showing.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Pane;
    use std::cell::Cell;

    #[test]
    fn test_apply_keeps_unset_fields() {
        let stage = Stage::new();
        stage.set_title("old");
        stage.set_size(100.0, 50.0);
        stage.apply(&LaunchOptions {
            width: Some(175.0),
            ..Default::default()
        });

        assert_eq!(stage.title(), "old");
        assert_eq!(stage.size(), (Some(175.0), Some(50.0)));
    }

    #[test]
    fn test_stylesheets() {
        let scene = Scene::new(Handle::new(Pane::new()));
        scene.add_stylesheet("a.css");
        scene.add_stylesheet("b.css");
        assert!(scene.remove_stylesheet("a.css"));
        assert!(!scene.remove_stylesheet("a.css"));
        assert_eq!(scene.clear_stylesheets(), vec!["b.css"]);
        assert!(scene.stylesheets().is_empty());
    }

    #[test]
    fn test_accelerators() {
        let scene = Scene::new(Handle::new(Pane::new()));
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        scene.set_accelerator(RELOAD_KEY, move || hits_clone.set(hits_clone.get() + 1));

        assert!(scene.trigger(Key::F(5)));
        assert!(!scene.trigger(Key::Escape));
        assert_eq!(hits.get(), 1);
        assert!(scene.has_accelerator(RELOAD_KEY));
    }
}
