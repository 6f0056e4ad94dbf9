//! One carousel instance: index, measurement, targets and input.
//!
//! A [`SliderOrchestrator`] owns an [`IndexController`], an
//! [`AxisDimensionMeasurer`] and an [`AnimationTargetRegistry`] for one
//! content partition. It derives items-per-page from the measured
//! dimensions, turns input into navigation requests and produces a
//! [`SliderView`] for the rendering layer.

use std::ops::Range;

use tokio::time::Instant;

use crate::dom::node::NodeId;
use crate::event::binding::NavigationBindings;
use crate::event::input::{InputEvent, KeyEvent, MouseAction, MouseBtn, MouseEvent};
use crate::geometry::{Axis, Offset};
use crate::layout::{GeometryQuery, ResizeHub, SpatialMap};
use crate::reactive::{create_memo, create_signal, ReadSignal, Scope, WriteSignal};

use super::config::{ComponentProps, ItemsPerPage};
use super::index::{request, IndexController};
use super::measure::{AxisDimensionMeasurer, Dimensions};
use super::navigation::{
    NavButton, NavigationAction, NavigationTarget, NavigationTrigger, DRAG_THRESHOLD,
};
use super::targets::AnimationTargetRegistry;

#[derive(Debug, Clone, Copy)]
struct DragState {
    origin: Offset,
    moved: bool,
}

pub struct SliderOrchestrator {
    // Declared first so the items-per-page memo is disposed before the
    // measurer's signal it reads.
    _scope: Scope,
    label: &'static str,
    props: ComponentProps,
    count: usize,
    controller: IndexController,
    measurer: AxisDimensionMeasurer,
    registry: AnimationTargetRegistry,
    items_per_page_mode: WriteSignal<ItemsPerPage>,
    items_per_page: ReadSignal<usize>,
    buttons: [Option<NodeId>; 2],
    bindings: NavigationBindings,
    focused: bool,
    drag: Option<DragState>,
}

impl SliderOrchestrator {
    /// Create an orchestrator for `count` items. Call
    /// [`activate`](Self::activate) once its nodes are laid out.
    pub fn new(label: &'static str, props: ComponentProps, count: usize) -> Self {
        let controller = IndexController::new(
            label,
            count,
            props.initial_index,
            props.index,
            props.on_index_change.clone(),
        );
        let measurer =
            AxisDimensionMeasurer::new(props.shared.axis, props.items_per_page, props.shared.throttle);
        let mut registry = AnimationTargetRegistry::new();
        registry.resize(count);

        let scope = Scope::new();
        let dimensions = measurer.signal();
        let (items_per_page_mode, items_per_page) = scope.run(|| {
            let (mode, set_mode) = create_signal(props.items_per_page);
            let memo = create_memo(move || mode.get().resolve(dimensions.get()));
            (set_mode, memo)
        });

        tracing::debug!(target: "gilt_slider::orchestrator", label, count, "created");
        Self {
            _scope: scope,
            label,
            bindings: props.shared.resolved_bindings(),
            props,
            count,
            controller,
            measurer,
            registry,
            items_per_page_mode,
            items_per_page,
            buttons: [None, None],
            focused: false,
            drag: None,
        }
    }

    /// Attach resize listeners to `container` and take the first measurement.
    pub fn activate(
        &mut self,
        hub: &ResizeHub,
        container: Option<NodeId>,
        geometry: &dyn GeometryQuery,
        now: Instant,
    ) {
        self.measurer
            .activate(hub, container, geometry, &self.registry, now);
    }

    /// Release listeners and transient input state.
    pub fn deactivate(&mut self) {
        self.measurer.deactivate();
        self.focused = false;
        self.drag = None;
    }

    /// Apply new props and item count.
    pub fn sync(&mut self, props: ComponentProps, count: usize) {
        self.controller
            .sync(count, props.index, props.on_index_change.clone());
        self.measurer.set_items_per_page(props.items_per_page);
        self.items_per_page_mode.set_if_changed(props.items_per_page);
        self.registry.resize(count);
        self.bindings = props.shared.resolved_bindings();
        self.props = props;
        self.count = count;
    }

    pub fn attach_container(&mut self, container: Option<NodeId>) {
        self.measurer.set_container(container);
    }

    /// Record the rendered node of slide `position`.
    pub fn register_target(&mut self, position: usize, node: NodeId) {
        let changed = self.registry.get(position) != Some(node);
        self.registry.register(position, node);
        if position == 0 && changed && self.props.items_per_page.is_auto() {
            self.measurer.invalidate();
        }
    }

    pub fn unregister_target(&mut self, position: usize) -> Option<NodeId> {
        self.registry.unregister(position)
    }

    pub fn register_button(&mut self, button: NavButton, node: Option<NodeId>) {
        self.buttons[button_slot(button)] = node;
    }

    /// Re-measure and flush throttled values. Returns whether the dimensions
    /// changed.
    pub fn poll(&mut self, geometry: &dyn GeometryQuery, now: Instant) -> bool {
        self.measurer.poll(geometry, &self.registry, now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.measurer.next_deadline()
    }

    // -- navigation ---------------------------------------------------------

    /// Turn `action` into an index request. Returns whether it was accepted.
    pub fn navigate(&mut self, action: NavigationAction, trigger: NavigationTrigger) -> bool {
        if !self.props.shared.navigation_triggers.allows(trigger) {
            tracing::trace!(
                target: "gilt_slider::orchestrator",
                label = self.label,
                ?trigger,
                "trigger disabled"
            );
            return false;
        }
        let current = self.controller.index().unwrap_or(0);
        let page = request(self.items_per_page());
        let requested = match action {
            NavigationAction::Previous => request(current).saturating_sub(page),
            NavigationAction::Next => request(current).saturating_add(page),
            NavigationAction::First => 0,
            NavigationAction::Last => request(self.count).saturating_sub(1),
            NavigationAction::GoTo(i) => request(i),
        };
        let requested = self.props.shared.boundary.resolve(current, requested, self.count);
        tracing::trace!(
            target: "gilt_slider::orchestrator",
            label = self.label,
            ?action,
            ?trigger,
            current,
            requested,
            "navigate"
        );
        self.controller.set(Some(requested), trigger)
    }

    /// Forward a slide click to the item-click handler. The index is not
    /// touched.
    pub fn click_item(&self, position: usize) -> bool {
        if position >= self.count {
            return false;
        }
        let Some(handler) = self.props.on_item_click.clone() else {
            return false;
        };
        tracing::trace!(target: "gilt_slider::orchestrator", label = self.label, position, "item click");
        handler(position);
        true
    }

    // -- input --------------------------------------------------------------

    /// Route one input event. Returns whether it was consumed.
    pub fn handle_input(&mut self, event: &InputEvent, geometry: &dyn GeometryQuery) -> bool {
        match *event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse, geometry),
            InputEvent::FocusLost => {
                self.focused = false;
                self.drag = None;
                false
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.props.shared.navigation_target == NavigationTarget::Container && !self.focused {
            return false;
        }
        match self.bindings.resolve(&key) {
            Some(action) => self.navigate(action, NavigationTrigger::Keyboard),
            None => false,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, geometry: &dyn GeometryQuery) -> bool {
        let point = mouse.position();
        let axis = self.props.shared.axis;
        let window = self.props.shared.navigation_target == NavigationTarget::Window;
        let inside = self
            .container_region(geometry)
            .is_some_and(|r| r.contains_point(point));
        let button = self.button_at(point, geometry);

        if !window && !inside && button.is_none() && self.drag.is_none() {
            if matches!(mouse.kind, MouseAction::Down(_)) {
                self.focused = false;
            }
            return false;
        }

        match mouse.kind {
            MouseAction::Down(MouseBtn::Left) => {
                self.focused = true;
                if let Some(button) = button {
                    return self.navigate(button.action(), NavigationTrigger::Button);
                }
                self.drag = Some(DragState { origin: point, moved: false });
                true
            }
            MouseAction::Drag(MouseBtn::Left) => match &mut self.drag {
                Some(drag) => {
                    if (point - drag.origin).along(axis).abs() >= DRAG_THRESHOLD {
                        drag.moved = true;
                    }
                    true
                }
                None => false,
            },
            MouseAction::Up(MouseBtn::Left) => {
                let Some(drag) = self.drag.take() else {
                    return false;
                };
                let delta = (point - drag.origin).along(axis);
                if drag.moved || delta.abs() >= DRAG_THRESHOLD {
                    // Content follows the pointer: pulling it back reveals the next page.
                    let action = if delta < 0 {
                        NavigationAction::Next
                    } else {
                        NavigationAction::Previous
                    };
                    self.navigate(action, NavigationTrigger::Drag)
                } else {
                    match self.slide_at(drag.origin, geometry) {
                        Some(position) => self.click_item(position),
                        None => false,
                    }
                }
            }
            MouseAction::ScrollDown | MouseAction::ScrollRight => {
                self.navigate(NavigationAction::Next, NavigationTrigger::Wheel)
            }
            MouseAction::ScrollUp | MouseAction::ScrollLeft => {
                self.navigate(NavigationAction::Previous, NavigationTrigger::Wheel)
            }
            _ => false,
        }
    }

    fn container_region(&self, geometry: &dyn GeometryQuery) -> Option<crate::geometry::Region> {
        self.measurer.container().and_then(|c| geometry.region_of(c))
    }

    fn button_at(&self, point: Offset, geometry: &dyn GeometryQuery) -> Option<NavButton> {
        let mut map = SpatialMap::new();
        for button in [NavButton::Previous, NavButton::Next] {
            if let Some(region) = self.buttons[button_slot(button)].and_then(|n| geometry.region_of(n)) {
                map.push(button, region);
            }
        }
        map.node_at(point)
    }

    /// How far the track content is shifted so the active slide sits at the
    /// container origin.
    pub fn scroll_offset(&self, geometry: &dyn GeometryQuery) -> Offset {
        let axis = self.props.shared.axis;
        let (Some(container), Some(active)) = (
            self.container_region(geometry),
            self.controller
                .index()
                .and_then(|i| self.registry.get(i))
                .and_then(|node| geometry.region_of(node)),
        ) else {
            return Offset::default();
        };
        let shift = active.offset().along(axis) - container.offset().along(axis);
        match axis {
            Axis::Horizontal => Offset::new(shift, 0),
            Axis::Vertical => Offset::new(0, shift),
        }
    }

    /// Slide position under a screen point, accounting for the scroll shift.
    pub fn slide_at(&self, point: Offset, geometry: &dyn GeometryQuery) -> Option<usize> {
        if !self.container_region(geometry)?.contains_point(point) {
            return None;
        }
        let mut map = SpatialMap::new();
        map.update_ordered(
            self.registry
                .iter()
                .filter_map(|(pos, node)| geometry.region_of(node).map(|r| (pos, r))),
        );
        map.node_at(point + self.scroll_offset(geometry))
    }

    // -- state --------------------------------------------------------------

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn index(&self) -> Option<usize> {
        self.controller.index()
    }

    pub fn controller(&self) -> &IndexController {
        &self.controller
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Effective items per page, never below 1.
    pub fn items_per_page(&self) -> usize {
        self.items_per_page.get_untracked()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.measurer.dimensions()
    }

    pub fn measurer(&self) -> &AxisDimensionMeasurer {
        &self.measurer
    }

    pub fn registry(&self) -> &AnimationTargetRegistry {
        &self.registry
    }

    pub fn props(&self) -> &ComponentProps {
        &self.props
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Positions in the active page, bounded by the item count.
    pub fn visible_range(&self) -> Range<usize> {
        match self.index() {
            Some(index) => index..index.saturating_add(self.items_per_page()).min(self.count),
            None => 0..0,
        }
    }

    /// Snapshot of everything the rendering layer needs.
    pub fn view(&self) -> SliderView {
        let index = self.index();
        let visible = self.visible_range();
        let items_per_page = self.items_per_page();
        let names = &self.props.shared.class_names;

        let slides = (0..self.count)
            .map(|position| {
                let active = index == Some(position);
                let is_visible = visible.contains(&position);
                let mut classes = Vec::new();
                push_class(&mut classes, names.slide.as_deref());
                if active {
                    push_class(&mut classes, names.active_slide.as_deref());
                }
                if is_visible {
                    push_class(&mut classes, names.visible_slide.as_deref());
                }
                SlideView { position, active, visible: is_visible, classes }
            })
            .collect();

        let mut wrapper_classes = Vec::new();
        push_class(&mut wrapper_classes, names.wrapper.as_deref());
        if let Some(prefix) = names.items_per_page.as_deref() {
            push_class(&mut wrapper_classes, Some(&format!("{prefix}-{items_per_page}")));
        }

        SliderView {
            index,
            count: self.count,
            items_per_page,
            visible,
            dimensions: self.dimensions(),
            with_scaling: self.props.with_scaling,
            lightbox_mode: self.props.lightbox_mode,
            last_trigger: self.controller.last_trigger(),
            focused: self.focused,
            slides,
            root_classes: names.class_name.iter().cloned().collect(),
            wrapper_classes,
            previous_button_classes: names.previous_button.iter().cloned().collect(),
            next_button_classes: names.next_button.iter().cloned().collect(),
        }
    }
}

impl std::fmt::Debug for SliderOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderOrchestrator")
            .field("label", &self.label)
            .field("count", &self.count)
            .field("controller", &self.controller)
            .field("measurer", &self.measurer)
            .field("focused", &self.focused)
            .finish()
    }
}

fn button_slot(button: NavButton) -> usize {
    match button {
        NavButton::Previous => 0,
        NavButton::Next => 1,
    }
}

fn push_class(classes: &mut Vec<String>, class: Option<&str>) {
    if let Some(class) = class.filter(|c| !c.is_empty()) {
        classes.push(class.to_owned());
    }
}

/// One slide as the rendering layer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideView {
    pub position: usize,
    pub active: bool,
    pub visible: bool,
    pub classes: Vec<String>,
}

/// Render-ready state of one orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderView {
    pub index: Option<usize>,
    pub count: usize,
    pub items_per_page: usize,
    pub visible: Range<usize>,
    pub dimensions: Dimensions,
    pub with_scaling: bool,
    pub lightbox_mode: bool,
    pub last_trigger: Option<NavigationTrigger>,
    pub focused: bool,
    pub slides: Vec<SlideView>,
    pub root_classes: Vec<String>,
    pub wrapper_classes: Vec<String>,
    pub previous_button_classes: Vec<String>,
    pub next_button_classes: Vec<String>,
}

impl SliderView {
    pub fn is_visible(&self, position: usize) -> bool {
        self.visible.contains(&position)
    }
}
