//! Property access, reactive bindings, listeners, identity and style.

use std::rc::Rc;

use tracing::trace;

use crate::engine::{Event, Handle, Widget};
use crate::error::{Error, Result};
use crate::reactive::ReactiveValue;
use crate::types::Value;

use super::Component;

/// A binding recorded before its component had a native handle.
pub(crate) struct DeferredBinding {
    property: String,
    source: DeferredSource,
}

enum DeferredSource {
    /// Bind this value directly.
    Value(ReactiveValue<Value>),
    /// Look the value up in the root's provider registry.
    Named(String),
    /// Derive the property's bound value through `compute`.
    Computed(Box<dyn FnOnce(&ReactiveValue<Value>)>),
}

impl Component {
    // =========================================================================
    // Property access
    // =========================================================================

    /// Read a native property. `id` and `style` read identity and inline style.
    pub fn get(&self, property: &str) -> Result<Value> {
        match property.to_ascii_lowercase().as_str() {
            "id" => Ok(self.id()?.into()),
            "style" => Ok(self.style()?.into()),
            _ => self.require_handle()?.get_property(property),
        }
    }

    /// Write a native property. `id` and `style` set identity and inline style.
    pub fn set(&self, property: &str, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        match property.to_ascii_lowercase().as_str() {
            "id" => {
                let handle = self.require_handle()?;
                handle.set_id((!value.is_null()).then(|| value.as_text()));
            }
            "style" => {
                self.set_style(value.as_text())?;
            }
            _ => self.require_handle()?.set_property(property, value)?,
        }
        Ok(self.clone())
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Push every change of `value` into `property`.
    ///
    /// With a handle the binding is live immediately and a present value is
    /// applied right away. Without one it is deferred to `after_construction`.
    pub fn bind(&self, property: &str, value: &ReactiveValue<Value>) -> Result<Self> {
        match self.handle() {
            Some(handle) => self.bind_now(&handle, property, value)?,
            None => self.defer(property, DeferredSource::Value(value.clone())),
        }
        Ok(self.clone())
    }

    /// Bind `property` to the value the root provides under `source_id`.
    ///
    /// Resolved immediately when the node has a handle and a reachable root,
    /// otherwise in `after_construction`. A missing provider is a
    /// [`Error::Binding`].
    pub fn bind_named(&self, property: &str, source_id: &str) -> Result<Self> {
        match (self.handle(), self.get_root()) {
            (Some(handle), Ok(_)) => {
                let value = self.lookup_provider(source_id)?;
                self.bind_now(&handle, property, &value)?;
            }
            _ => self.defer(property, DeferredSource::Named(source_id.to_string())),
        }
        Ok(self.clone())
    }

    /// Derive `property` from `source` through `combine`.
    ///
    /// Reuses the value already bound to `property`, or binds a fresh one.
    /// The property follows `combine(source)` from now on.
    pub fn compute<S, V>(
        &self,
        property: &str,
        source: &ReactiveValue<S>,
        combine: impl Fn(Option<&S>) -> V + 'static,
    ) -> Result<Self>
    where
        S: Clone + 'static,
        V: Into<Value>,
    {
        let source = source.clone();
        let attach = move |target: &ReactiveValue<Value>| {
            target.compute(&source, move |s| combine(s).into());
        };
        match self.handle() {
            Some(handle) => {
                let target = self.property_binding(&handle, property)?;
                attach(&target);
            }
            None => self.defer(property, DeferredSource::Computed(Box::new(attach))),
        }
        Ok(self.clone())
    }

    /// The value currently bound to `property`, if any.
    pub fn binding(&self, property: &str) -> Option<ReactiveValue<Value>> {
        self.inner
            .bindings
            .borrow()
            .get(&property.to_ascii_lowercase())
            .cloned()
    }

    /// Number of bindings still waiting for a handle.
    pub fn deferred_count(&self) -> usize {
        self.inner.deferred.borrow().len()
    }

    fn defer(&self, property: &str, source: DeferredSource) {
        trace!(target: "spark_tree::binding", node = %self, property, "deferred");
        self.inner.deferred.borrow_mut().push(DeferredBinding {
            property: property.to_ascii_lowercase(),
            source,
        });
    }

    fn bind_now(&self, handle: &Handle, property: &str, value: &ReactiveValue<Value>) -> Result<()> {
        if !handle.has_property(property) {
            return Err(Error::unknown_property(property, handle.type_name()));
        }
        let key = property.to_ascii_lowercase();
        if !handle.is_writable(&key) {
            return Err(Error::binding(format!(
                "Property '{key}' of {} is read-only.",
                handle.type_name()
            )));
        }

        let target = handle.clone();
        let slot = key.clone();
        value.subscribe(move |v| target.push_property(&slot, v.cloned().unwrap_or_default()));
        if let Some(current) = value.get() {
            handle.set_property(&key, current)?;
        }
        trace!(target: "spark_tree::binding", node = %self, property = %key, "bound");
        self.inner.bindings.borrow_mut().insert(key, value.clone());
        Ok(())
    }

    fn property_binding(&self, handle: &Handle, property: &str) -> Result<ReactiveValue<Value>> {
        if let Some(existing) = self.binding(property) {
            return Ok(existing);
        }
        let value = ReactiveValue::empty();
        self.bind_now(handle, property, &value)?;
        Ok(value)
    }

    fn lookup_provider(&self, source_id: &str) -> Result<ReactiveValue<Value>> {
        let root = self.get_root().map_err(|_| {
            Error::binding(format!(
                "Source '{source_id}' cannot be resolved: '{self}' is not attached to a Root."
            ))
        })?;
        root.provider(source_id).ok_or_else(|| {
            Error::binding(format!("Source '{source_id}' is not provided by the Root."))
        })
    }

    /// Resolve every deferred binding against the now existing handle.
    pub(super) fn resolve_deferred(&self) -> Result<()> {
        if self.inner.deferred.borrow().is_empty() {
            return Ok(());
        }
        let handle = self.require_handle()?;
        let pending = std::mem::take(&mut *self.inner.deferred.borrow_mut());
        for binding in pending {
            self.resolve(&handle, binding).map_err(|err| match err {
                Error::UnknownProperty { property, widget } => Error::binding(format!(
                    "Deferred binding for '{property}' failed: no such property on {widget}."
                )),
                other => other,
            })?;
        }
        Ok(())
    }

    fn resolve(&self, handle: &Handle, binding: DeferredBinding) -> Result<()> {
        let DeferredBinding { property, source } = binding;
        match source {
            DeferredSource::Value(value) => self.bind_now(handle, &property, &value),
            DeferredSource::Named(source_id) => {
                let value = self.lookup_provider(&source_id)?;
                self.bind_now(handle, &property, &value)
            }
            DeferredSource::Computed(attach) => {
                let target = self.property_binding(handle, &property)?;
                attach(&target);
                Ok(())
            }
        }
    }

    // =========================================================================
    // Listening
    // =========================================================================

    /// Call `handler` with this component and the new value whenever the
    /// native `property` changes.
    pub fn on(&self, property: &str, handler: impl Fn(&Component, &Value) + 'static) -> Result<Self> {
        let handle = self.require_handle()?;
        let this = Rc::downgrade(&self.inner);
        handle.on_property(property, move |value| {
            if let Some(inner) = this.upgrade() {
                handler(&Component { inner }, value);
            }
        })?;
        Ok(self.clone())
    }

    /// Call `handler` with this component whenever the native widget fires
    /// the event called `name`.
    pub fn on_event(&self, name: &str, handler: impl Fn(&Component, &Event) + 'static) -> Result<Self> {
        let handle = self.require_handle()?;
        let this = Rc::downgrade(&self.inner);
        handle.on_event(name, move |event| {
            if let Some(inner) = this.upgrade() {
                handler(&Component { inner }, event);
            }
        });
        Ok(self.clone())
    }

    /// Run `f` against the native widget as a `W`.
    pub fn fluent<W: Widget>(&self, f: impl FnOnce(&mut W)) -> Result<Self> {
        let handle = self.require_handle()?;
        handle.with_mut::<W, _>(f).ok_or_else(|| {
            Error::binding(format!(
                "Component '{self}' does not wrap a {}.",
                std::any::type_name::<W>()
            ))
        })?;
        Ok(self.clone())
    }

    // =========================================================================
    // Identity and style
    // =========================================================================

    pub fn id(&self) -> Result<Option<String>> {
        Ok(self.require_handle()?.id())
    }

    pub fn set_id(&self, id: impl Into<String>) -> Result<Self> {
        self.require_handle()?.set_id(Some(id.into()));
        Ok(self.clone())
    }

    pub fn style(&self) -> Result<String> {
        Ok(self.require_handle()?.style())
    }

    pub fn set_style(&self, style: impl Into<String>) -> Result<Self> {
        self.require_handle()?.set_style(style);
        Ok(self.clone())
    }

    pub fn classes(&self) -> Result<Vec<String>> {
        Ok(self.require_handle()?.classes())
    }

    pub fn add_class(&self, class: &str) -> Result<Self> {
        self.require_handle()?.add_class(class);
        Ok(self.clone())
    }

    pub fn remove_class(&self, class: &str) -> Result<Self> {
        self.require_handle()?.remove_class(class);
        Ok(self.clone())
    }
}
