//! Container widgets.

use std::sync::OnceLock;

use crate::engine::{Handle, PropertyRegistry, WidgetState, assign};
use crate::types::{Capabilities, Value};

// =============================================================================
// Pane
// =============================================================================

/// Plain container. Children keep their insertion order.
#[derive(Default)]
pub struct Pane {
    state: WidgetState,
}

impl Pane {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry() -> &'static PropertyRegistry<Pane> {
        static REGISTRY: OnceLock<PropertyRegistry<Pane>> = OnceLock::new();
        REGISTRY.get_or_init(|| PropertyRegistry::<Pane>::common("Pane"))
    }
}

impl_widget!(Pane, Capabilities::CONTAINER);

// =============================================================================
// HBox / VBox
// =============================================================================

/// Horizontal row container.
#[derive(Default)]
pub struct HBox {
    state: WidgetState,
    spacing: f64,
}

impl HBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    fn registry() -> &'static PropertyRegistry<HBox> {
        static REGISTRY: OnceLock<PropertyRegistry<HBox>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::<HBox>::common("HBox").property(
                "spacing",
                |w| Value::Float(w.spacing),
                |w, v| assign(v.as_float(), |s| w.spacing = s),
            )
        })
    }
}

impl_widget!(HBox, Capabilities::CONTAINER);

/// Vertical column container.
#[derive(Default)]
pub struct VBox {
    state: WidgetState,
    spacing: f64,
}

impl VBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    fn registry() -> &'static PropertyRegistry<VBox> {
        static REGISTRY: OnceLock<PropertyRegistry<VBox>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::<VBox>::common("VBox").property(
                "spacing",
                |w| Value::Float(w.spacing),
                |w, v| assign(v.as_float(), |s| w.spacing = s),
            )
        })
    }
}

impl_widget!(VBox, Capabilities::CONTAINER);

// =============================================================================
// BorderPane
// =============================================================================

/// Five-region container.
///
/// Regions are placed explicitly, so the generic construction pass never
/// fills this widget's child list.
#[derive(Default)]
pub struct BorderPane {
    state: WidgetState,
    top: Option<Handle>,
    bottom: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    center: Option<Handle>,
}

impl BorderPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_top(&mut self, handle: Option<Handle>) {
        self.top = handle;
    }

    pub fn set_bottom(&mut self, handle: Option<Handle>) {
        self.bottom = handle;
    }

    pub fn set_left(&mut self, handle: Option<Handle>) {
        self.left = handle;
    }

    pub fn set_right(&mut self, handle: Option<Handle>) {
        self.right = handle;
    }

    pub fn set_center(&mut self, handle: Option<Handle>) {
        self.center = handle;
    }

    pub fn center(&self) -> Option<&Handle> {
        self.center.as_ref()
    }

    /// Occupied regions in top, left, center, right, bottom order.
    pub fn regions(&self) -> Vec<Handle> {
        [&self.top, &self.left, &self.center, &self.right, &self.bottom]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    fn registry() -> &'static PropertyRegistry<BorderPane> {
        static REGISTRY: OnceLock<PropertyRegistry<BorderPane>> = OnceLock::new();
        REGISTRY.get_or_init(|| PropertyRegistry::<BorderPane>::common("BorderPane"))
    }
}

impl_widget!(
    BorderPane,
    Capabilities::CONTAINER | Capabilities::MANAGES_CHILDREN
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Text;

    #[test]
    fn test_capabilities() {
        assert!(Handle::new(Pane::new()).capabilities().hosts_children());
        assert!(Handle::new(VBox::new()).capabilities().hosts_children());
        assert!(!Handle::new(BorderPane::new()).capabilities().hosts_children());
    }

    #[test]
    fn test_spacing_property() {
        let hbox = Handle::new(HBox::new());
        hbox.set_property("Spacing", Value::Int(4)).unwrap();
        assert_eq!(hbox.with::<HBox, _>(HBox::spacing), Some(4.0));
    }

    #[test]
    fn test_border_pane_regions() {
        let center = Handle::new(Text::new("body"));
        let top = Handle::new(Text::new("head"));
        let pane = Handle::new(BorderPane::new());
        pane.with_mut::<BorderPane, _>(|p| {
            p.set_center(Some(center.clone()));
            p.set_top(Some(top.clone()));
        });

        assert_eq!(pane.with::<BorderPane, _>(BorderPane::regions), Some(vec![top, center]));
        assert!(pane.children().is_empty());
    }
}
