//! Root - the unique tree entry point.
//!
//! A [`Root`] wraps a hidden top [`Component`] around the application's tree
//! and decorates its lifecycle with phase tracking:
//!
//! ```text
//! launch(stage)
//!   ├── before_construction   (recorded, timed)
//!   ├── construct             (must yield a handle)
//!   ├── after_construction    (deferred bindings resolve here)
//!   └── Scene::new(handle) → stage.set_scene → stage.show
//! close()
//!   └── deconstruction → stage.hide
//! ```
//!
//! Each phase runs at most once per `Root`; entering a phase twice is a
//! [`Error::Lifecycle`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::component::{Component, Findable, Hierarchy, Lifecycle, Scope, stringify_only_child};
use crate::engine::Handle;
use crate::error::{Error, Result};
use crate::reactive::ReactiveValue;
use crate::types::{Mode, Phase, Value, Verbosity};

use super::stage::{LaunchOptions, RELOAD_KEY, Scene, Stage};

/// Inline style stamped on the scene root while stylesheets reload.
pub const CACHE_RESET_STYLE: &str = "-spark-tree-cache-reset: all;";

pub(crate) struct RootInner {
    top: Component,
    phase: Cell<Option<Phase>>,
    measurements: RefCell<Vec<(Phase, Duration)>>,
    providers: RefCell<HashMap<String, ReactiveValue<Value>>>,
    stage: RefCell<Option<Stage>>,
    mode: Cell<Mode>,
}

/// Tree entry point. Clones refer to the same root.
#[derive(Clone)]
pub struct Root {
    inner: Rc<RootInner>,
}

impl PartialEq for Root {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("phase", &self.inner.phase.get())
            .field("mode", &self.inner.mode.get())
            .field("child", &self.child())
            .finish()
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify(Verbosity::Brief))
    }
}

impl Root {
    /// Make `child` the tree below this root.
    ///
    /// A child that already has a parent cannot be adopted; such a root fails
    /// to launch.
    pub fn new(child: Component) -> Self {
        let inner = Rc::new(RootInner {
            top: Component::wrap(child),
            phase: Cell::new(None),
            measurements: RefCell::new(Vec::new()),
            providers: RefCell::new(HashMap::new()),
            stage: RefCell::new(None),
            mode: Cell::new(Mode::default()),
        });
        inner.top.attach_root(&inner);
        Self { inner }
    }

    pub(crate) fn from_inner(inner: Rc<RootInner>) -> Self {
        Self { inner }
    }

    /// The hidden top node. Its only child is the application's tree.
    pub fn component(&self) -> &Component {
        &self.inner.top
    }

    /// The application's tree.
    pub fn child(&self) -> Option<Component> {
        self.inner.top.children().first()
    }

    // =========================================================================
    // Providers
    // =========================================================================

    /// Register `value` under `id` for named bindings.
    pub fn provide(&self, id: impl Into<String>, value: ReactiveValue<Value>) -> &Self {
        self.inner.providers.borrow_mut().insert(id.into(), value);
        self
    }

    pub fn provider(&self, id: &str) -> Option<ReactiveValue<Value>> {
        self.inner.providers.borrow().get(id).cloned()
    }

    // =========================================================================
    // Mode
    // =========================================================================

    pub fn mode(&self) -> Mode {
        self.inner.mode.get()
    }

    pub fn set_mode(&self, mode: Mode) -> &Self {
        self.inner.mode.set(mode);
        self
    }

    // =========================================================================
    // Launch
    // =========================================================================

    /// Run the first three phases and show the result on `stage`.
    ///
    /// Fails with [`Error::IllegalState`] if construction yields no handle.
    pub fn launch(&self, stage: &Stage) -> Result<()> {
        *self.inner.stage.borrow_mut() = Some(stage.clone());

        self.before_construction()?;
        let tree = self
            .construct()?
            .ok_or_else(|| Error::illegal_state("Component hierarchy construction failed."))?;
        self.after_construction()?;

        stage.set_scene(Scene::new(tree));
        stage.show();
        debug!(target: "spark_tree::root", mode = ?self.mode(), "launched");
        Ok(())
    }

    /// Apply `options` to `stage` and the root's mode, then [`launch`](Self::launch).
    pub fn launch_with(&self, stage: &Stage, options: LaunchOptions) -> Result<()> {
        stage.apply(&options);
        self.set_mode(options.mode);
        self.launch(stage)
    }

    /// Deconstruct the tree and hide the stage.
    pub fn close(&self) -> Result<()> {
        self.deconstruct()?;
        if let Some(stage) = self.stage() {
            stage.hide();
        }
        Ok(())
    }

    pub fn stage(&self) -> Option<Stage> {
        self.inner.stage.borrow().clone()
    }

    /// The scene built by [`launch`](Self::launch).
    pub fn scene(&self) -> Result<Scene> {
        self.stage()
            .and_then(|stage| stage.scene())
            .ok_or_else(|| Error::lifecycle("Scene has not been constructed yet."))
    }

    // =========================================================================
    // Stylesheets
    // =========================================================================

    pub fn add_stylesheet(&self, stylesheet: impl Into<String>) -> Result<&Self> {
        self.scene()?.add_stylesheet(stylesheet);
        Ok(self)
    }

    pub fn remove_stylesheet(&self, stylesheet: &str) -> Result<&Self> {
        self.scene()?.remove_stylesheet(stylesheet);
        Ok(self)
    }

    pub fn stylesheets(&self) -> Result<Vec<String>> {
        Ok(self.scene()?.stylesheets())
    }

    /// Drop and re-add every stylesheet, stamping the scene root with
    /// [`CACHE_RESET_STYLE`] in between.
    pub fn reload_stylesheets(&self) -> Result<&Self> {
        let scene = self.scene()?;
        reload(&scene);
        Ok(self)
    }

    /// Register developer shortcuts (F5 reloads stylesheets).
    ///
    /// Only allowed in [`Mode::Debug`]. Without a scene there is nothing to
    /// register on yet and the call does nothing.
    pub fn enable_developer_shortcuts(&self) -> Result<&Self> {
        if self.mode() != Mode::Debug {
            return Err(Error::illegal_state(
                "Developer shortcuts can only be enabled in Debug mode.",
            ));
        }
        if let Ok(scene) = self.scene() {
            let weak_scene = scene.downgrade();
            scene.set_accelerator(RELOAD_KEY, move || {
                if let Some(scene) = weak_scene.upgrade() {
                    reload(&scene);
                }
            });
            debug!(target: "spark_tree::root", "developer shortcuts enabled");
        }
        Ok(self)
    }

    // =========================================================================
    // Phase state
    // =========================================================================

    /// The most recently entered phase.
    pub fn lifecycle_phase(&self) -> Result<Phase> {
        self.inner
            .phase
            .get()
            .ok_or_else(|| Error::lifecycle("Lifecycle has not yet started."))
    }

    /// Phases entered so far with their durations, in invocation order.
    pub fn measurements(&self) -> Vec<(Phase, Duration)> {
        self.inner.measurements.borrow().clone()
    }

    fn run_phase<R>(&self, phase: Phase, run: impl FnOnce(&Component) -> Result<R>) -> Result<R> {
        let slot = {
            let mut measurements = self.inner.measurements.borrow_mut();
            if measurements.iter().any(|(entered, _)| *entered == phase) {
                return Err(Error::lifecycle(format!(
                    "Phase {phase} has already been invoked."
                )));
            }
            // The first phase can only fail the re-entry check above.
            if let Some(previous) = phase.previous() {
                if measurements.last().map(|(entered, _)| *entered) != Some(previous) {
                    return Err(Error::lifecycle(format!(
                        "Phase {phase} requires phase {previous} to run first."
                    )));
                }
            }
            measurements.push((phase, Duration::ZERO));
            measurements.len() - 1
        };
        self.inner.phase.set(Some(phase));

        let start = Instant::now();
        let result = run(&self.inner.top);
        let elapsed = start.elapsed();

        self.inner.measurements.borrow_mut()[slot].1 = elapsed;
        debug!(target: "spark_tree::root", %phase, ?elapsed, ok = result.is_ok(), "phase finished");
        result
    }

    // =========================================================================
    // Identity (unsupported)
    // =========================================================================

    pub fn id(&self) -> Result<Option<String>> {
        Err(Error::unsupported("Root has no id."))
    }

    pub fn set_id(&self, _id: &str) -> Result<&Self> {
        Err(Error::unsupported("Root has no id."))
    }

    pub fn style(&self) -> Result<String> {
        Err(Error::unsupported("Root has no style."))
    }

    pub fn set_style(&self, _style: &str) -> Result<&Self> {
        Err(Error::unsupported("Root has no style."))
    }

    pub fn add_class(&self, _class: &str) -> Result<&Self> {
        Err(Error::unsupported("Root has no style classes."))
    }

    pub fn remove_class(&self, _class: &str) -> Result<&Self> {
        Err(Error::unsupported("Root has no style classes."))
    }
}

fn reload(scene: &Scene) {
    let stylesheets = scene.clear_stylesheets();
    scene.root().set_style(CACHE_RESET_STYLE);
    for stylesheet in &stylesheets {
        scene.add_stylesheet(stylesheet.clone());
    }
    debug!(target: "spark_tree::root", count = stylesheets.len(), "stylesheets reloaded");
}

fn format_duration(duration: Duration) -> String {
    if duration.as_millis() == 0 {
        format!("{}ns", duration.as_nanos())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl Lifecycle for Root {
    fn before_construction(&self) -> Result<()> {
        self.run_phase(Phase::BeforeConstruction, Component::before_construction)
    }

    fn construct(&self) -> Result<Option<Handle>> {
        self.run_phase(Phase::Construction, Component::construct)
    }

    fn after_construction(&self) -> Result<()> {
        self.run_phase(Phase::AfterConstruction, Component::after_construction)
    }

    fn deconstruct(&self) -> Result<()> {
        self.run_phase(Phase::Deconstruction, Component::deconstruct)
    }
}

impl Findable for Root {
    fn find_by_id(&self, id: &str, _scope: Scope) -> Result<Option<Component>> {
        match self.child() {
            Some(child) => child.find_by_id(id, Scope::Subtree),
            None => Ok(None),
        }
    }

    fn find_by_class(&self, class: &str, _scope: Scope) -> Result<Vec<Component>> {
        match self.child() {
            Some(child) => child.find_by_class(class, Scope::Subtree),
            None => Ok(Vec::new()),
        }
    }
}

impl Hierarchy for Root {
    fn stringify(&self, verbosity: Verbosity) -> String {
        let measurements = self.inner.measurements.borrow();
        if verbosity == Verbosity::Brief || measurements.is_empty() {
            return "Root".to_string();
        }
        let timings: Vec<String> = measurements
            .iter()
            .map(|(phase, duration)| format!("{phase}: {}", format_duration(*duration)))
            .collect();
        format!("Root ({})", timings.join(", "))
    }

    fn stringify_hierarchy(
        &self,
        out: &mut String,
        prefix: &str,
        child_prefix: &str,
        verbosity: Verbosity,
    ) {
        out.push_str(prefix);
        out.push_str(&self.stringify(verbosity));
        out.push('\n');
        if let Some(child) = self.child() {
            stringify_only_child(&child, out, child_prefix, verbosity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Text, VBox};

    fn text(content: &str) -> Component {
        Component::leaf(Handle::new(Text::new(content)))
    }

    fn app() -> Root {
        Root::new(Component::new(
            Some(Handle::new(VBox::new())),
            [text("a"), text("b")],
        ))
    }

    #[test]
    fn test_phase_before_launch_is_lifecycle_error() {
        let root = app();
        assert_eq!(
            root.lifecycle_phase().unwrap_err(),
            Error::lifecycle("Lifecycle has not yet started.")
        );
        assert!(matches!(root.scene(), Err(Error::Lifecycle(_))));
        assert!(matches!(root.add_stylesheet("a.css"), Err(Error::Lifecycle(_))));
    }

    #[test]
    fn test_launch_runs_three_phases_once() {
        let root = app();
        let stage = Stage::new();
        root.launch(&stage).unwrap();

        let phases: Vec<Phase> = root.measurements().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            phases,
            vec![Phase::BeforeConstruction, Phase::Construction, Phase::AfterConstruction]
        );
        assert_eq!(root.lifecycle_phase().unwrap(), Phase::AfterConstruction);
        assert!(stage.is_showing());
        assert_eq!(stage.scene().unwrap().root().children().len(), 2);
    }

    #[test]
    fn test_reentering_phase_fails() {
        let root = app();
        root.before_construction().unwrap();
        assert_eq!(
            root.before_construction().unwrap_err(),
            Error::lifecycle("Phase before_construction has already been invoked.")
        );
        assert!(matches!(root.launch(&Stage::new()), Err(Error::Lifecycle(_))));
    }

    #[test]
    fn test_phases_must_run_in_order() {
        let root = app();
        assert_eq!(
            root.deconstruct().unwrap_err(),
            Error::lifecycle("Phase deconstruction requires phase after_construction to run first.")
        );
        assert_eq!(
            root.construct().unwrap_err(),
            Error::lifecycle("Phase construction requires phase before_construction to run first.")
        );
        assert!(root.measurements().is_empty());

        // Rejected calls leave no trace, so the regular sequence still works.
        let stage = Stage::new();
        root.launch(&stage).unwrap();
        assert!(stage.is_showing());
        root.close().unwrap();
    }

    #[test]
    fn test_skipping_after_construction_fails() {
        let root = app();
        root.before_construction().unwrap();
        root.construct().unwrap();
        assert!(matches!(root.deconstruct(), Err(Error::Lifecycle(_))));
        assert_eq!(root.lifecycle_phase().unwrap(), Phase::Construction);
    }

    #[test]
    fn test_launch_without_handle_fails() {
        let root = Root::new(Component::new(None, [text("a"), text("b")]));
        assert_eq!(
            root.launch(&Stage::new()).unwrap_err(),
            Error::illegal_state("Component hierarchy construction failed.")
        );
    }

    #[test]
    fn test_identity_unsupported() {
        let root = app();
        assert!(matches!(root.id(), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(root.set_id("x"), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(root.style(), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(root.set_style("x"), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(root.add_class("x"), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(root.remove_class("x"), Err(Error::UnsupportedOperation(_))));
    }

    #[test]
    fn test_root_cannot_be_adopted() {
        let root = app();
        let other = Component::new(Some(Handle::new(VBox::new())), []);
        assert!(matches!(
            other.add(root.component().clone()),
            Err(Error::IllegalState(_))
        ));
    }

    #[test]
    fn test_get_root_from_descendant() {
        let leaf = text("x");
        let root = Root::new(Component::new(Some(Handle::new(VBox::new())), [leaf.clone()]));
        assert_eq!(leaf.get_root().unwrap(), root);
    }

    #[test]
    fn test_developer_shortcuts_need_debug_mode() {
        let root = app();
        root.launch(&Stage::new()).unwrap();
        assert!(matches!(
            root.enable_developer_shortcuts(),
            Err(Error::IllegalState(_))
        ));

        root.set_mode(Mode::Debug);
        root.enable_developer_shortcuts().unwrap();
        root.add_stylesheet("a.css").unwrap().add_stylesheet("b.css").unwrap();

        let scene = root.scene().unwrap();
        assert!(scene.trigger(RELOAD_KEY));
        assert_eq!(scene.root().style(), CACHE_RESET_STYLE);
        assert_eq!(root.stylesheets().unwrap(), vec!["a.css", "b.css"]);
    }

    #[test]
    fn test_close_deconstructs_and_hides() {
        let root = app();
        let stage = Stage::new();
        root.launch(&stage).unwrap();
        root.close().unwrap();

        assert_eq!(root.lifecycle_phase().unwrap(), Phase::Deconstruction);
        assert!(!stage.is_showing());
        assert!(matches!(root.close(), Err(Error::Lifecycle(_))));
    }

    #[test]
    fn test_detailed_root_line() {
        let root = app();
        assert_eq!(root.stringify(Verbosity::Detailed), "Root");
        root.launch(&Stage::new()).unwrap();

        let line = root.stringify(Verbosity::Detailed);
        assert!(line.starts_with("Root (before_construction: "));
        assert!(line.contains(", construction: "));
        assert!(line.ends_with("s)"));
        assert_eq!(root.stringify(Verbosity::Brief), "Root");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_nanos(450)), "450ns");
        assert_eq!(format_duration(Duration::from_millis(12)), "12ms");
    }
}
