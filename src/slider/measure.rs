//! Container and item extent measurement.
//!
//! [`AxisDimensionMeasurer`] reads the container's extent along its axis and,
//! in `Auto` items-per-page mode, the extent of the first registered slide.
//! It measures synchronously on activation, then again whenever the
//! [`ResizeHub`] flags a container resize or a viewport event. Every
//! measurement after the first goes through a per-dimension [`Throttle`].

use std::cell::Cell;
use std::rc::Rc;

use tokio::time::Instant;

use crate::dom::node::NodeId;
use crate::geometry::Axis;
use crate::layout::{GeometryQuery, ResizeHub, Subscription};
use crate::reactive::{create_signal, ReadSignal, Scope, WriteSignal};

use super::config::{ItemsPerPage, ThrottleConfig};
use super::targets::AnimationTargetRegistry;
use super::throttle::Throttle;

/// Measured extents in cells. Both start at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub container_width: i32,
    pub item_width: i32,
}

/// Held only for their `Drop`.
struct MeasureListeners {
    _observer: Option<Subscription>,
    _viewport: Subscription,
}

pub struct AxisDimensionMeasurer {
    axis: Axis,
    items_per_page: ItemsPerPage,
    container: Option<NodeId>,
    hub: Option<ResizeHub>,
    listeners: Option<MeasureListeners>,
    dirty: Rc<Cell<bool>>,
    container_throttle: Throttle<i32>,
    item_throttle: Throttle<i32>,
    dimensions: (ReadSignal<Dimensions>, WriteSignal<Dimensions>),
    _scope: Scope,
}

impl AxisDimensionMeasurer {
    pub fn new(axis: Axis, items_per_page: ItemsPerPage, throttle: ThrottleConfig) -> Self {
        let scope = Scope::new();
        let dimensions = scope.run(|| create_signal(Dimensions::default()));
        Self {
            axis,
            items_per_page,
            container: None,
            hub: None,
            listeners: None,
            dirty: Rc::new(Cell::new(false)),
            container_throttle: Throttle::new(throttle),
            item_throttle: Throttle::new(throttle),
            dimensions,
            _scope: scope,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn set_items_per_page(&mut self, items_per_page: ItemsPerPage) {
        self.items_per_page = items_per_page;
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Attach listeners and take the first, unthrottled measurement.
    pub fn activate(
        &mut self,
        hub: &ResizeHub,
        container: Option<NodeId>,
        geometry: &dyn GeometryQuery,
        registry: &AnimationTargetRegistry,
        now: Instant,
    ) {
        self.hub = Some(hub.clone());
        self.container = container;
        self.subscribe();
        self.measure(geometry, registry, now, true);
        // Anything that invalidated before activation is covered above.
        self.dirty.set(false);
    }

    /// Release every listener.
    pub fn deactivate(&mut self) {
        if self.listeners.take().is_some() {
            tracing::debug!(target: "gilt_slider::measure", "listeners released");
        }
        self.hub = None;
        self.dirty.set(false);
        self.container_throttle.reset();
        self.item_throttle.reset();
    }

    pub fn is_active(&self) -> bool {
        self.hub.is_some()
    }

    pub fn has_listeners(&self) -> bool {
        self.listeners.is_some()
    }

    /// Point the measurer at a different container node.
    ///
    /// Listeners of the previous container are released first. The next
    /// [`poll`](Self::poll) measures the new container.
    pub fn set_container(&mut self, container: Option<NodeId>) {
        if self.container == container {
            return;
        }
        self.container = container;
        if self.is_active() {
            self.subscribe();
            self.dirty.set(true);
        }
    }

    fn subscribe(&mut self) {
        self.listeners = None;
        let (Some(hub), Some(container)) = (&self.hub, self.container) else {
            tracing::trace!(target: "gilt_slider::measure", "no container; listeners not attached");
            return;
        };
        let observer = hub.observe(container, self.dirty.clone());
        if observer.is_none() {
            tracing::debug!(
                target: "gilt_slider::measure",
                "resize observation unavailable; using viewport events only"
            );
        }
        let viewport = hub.listen_viewport(self.dirty.clone());
        tracing::debug!(target: "gilt_slider::measure", ?container, "listeners attached");
        self.listeners = Some(MeasureListeners { _observer: observer, _viewport: viewport });
    }

    /// Read current extents. `immediate` bypasses the throttles.
    pub fn measure(
        &mut self,
        geometry: &dyn GeometryQuery,
        registry: &AnimationTargetRegistry,
        now: Instant,
        immediate: bool,
    ) {
        let Some(region) = self.container.and_then(|c| geometry.region_of(c)) else {
            tracing::trace!(target: "gilt_slider::measure", "container not laid out; skipped");
            return;
        };
        let container_width = region.extent(self.axis).max(0);
        let container_width = if immediate {
            Some(self.container_throttle.emit_now(container_width, now))
        } else {
            self.container_throttle.push(container_width, now)
        };

        let mut item_width = None;
        if self.items_per_page.is_auto() {
            match registry.first().and_then(|node| geometry.region_of(node)) {
                Some(item) => {
                    let width = item.extent(self.axis).max(0);
                    item_width = if immediate {
                        Some(self.item_throttle.emit_now(width, now))
                    } else {
                        self.item_throttle.push(width, now)
                    };
                }
                None => {
                    tracing::trace!(target: "gilt_slider::measure", "first slide not rendered; item width kept");
                }
            }
        }
        self.apply(container_width, item_width);
    }

    /// Override the item extent. Rate limited like measurements.
    pub fn set_item_width(&mut self, width: i32, now: Instant) {
        let emitted = self.item_throttle.push(width.max(0), now);
        self.apply(None, emitted);
    }

    /// Re-measure if a listener fired, then flush due trailing values.
    ///
    /// Returns whether the dimensions changed.
    pub fn poll(
        &mut self,
        geometry: &dyn GeometryQuery,
        registry: &AnimationTargetRegistry,
        now: Instant,
    ) -> bool {
        let before = self.dimensions();
        if self.dirty.replace(false) && self.listeners.is_some() {
            self.measure(geometry, registry, now, false);
        }
        let container_width = self.container_throttle.poll(now);
        let item_width = self.item_throttle.poll(now);
        self.apply(container_width, item_width);
        self.dimensions() != before
    }

    fn apply(&self, container_width: Option<i32>, item_width: Option<i32>) {
        if container_width.is_none() && item_width.is_none() {
            return;
        }
        let mut next = self.dimensions();
        if let Some(w) = container_width {
            next.container_width = w;
        }
        if let Some(w) = item_width {
            next.item_width = w;
        }
        if self.dimensions.1.set_if_changed(next) {
            tracing::trace!(
                target: "gilt_slider::measure",
                container_width = next.container_width,
                item_width = next.item_width,
                "dimensions"
            );
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions.0.get_untracked()
    }

    /// Dimensions as a signal, for memos downstream.
    pub fn signal(&self) -> ReadSignal<Dimensions> {
        self.dimensions.0
    }

    /// Request a re-measure on the next poll.
    pub fn invalidate(&self) {
        self.dirty.set(true);
    }

    /// Whether a listener has fired since the last poll.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Earliest pending trailing flush.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.container_throttle.deadline(), self.item_throttle.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl std::fmt::Debug for AxisDimensionMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisDimensionMeasurer")
            .field("axis", &self.axis)
            .field("items_per_page", &self.items_per_page)
            .field("container", &self.container)
            .field("active", &self.is_active())
            .field("dimensions", &self.dimensions.0.try_get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::{NodeData, NodeKind};
    use crate::dom::tree::Dom;
    use crate::geometry::Region;
    use crate::layout::ViewportEvent;
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Default)]
    struct Geometry(HashMap<NodeId, Region>);

    impl GeometryQuery for Geometry {
        fn region_of(&self, node: NodeId) -> Option<Region> {
            self.0.get(&node).copied()
        }
    }

    struct Fixture {
        hub: ResizeHub,
        track: NodeId,
        slide: NodeId,
        geometry: Geometry,
        registry: AnimationTargetRegistry,
        start: Instant,
    }

    fn fixture(hub: ResizeHub) -> Fixture {
        let mut dom = Dom::new();
        let track = dom.insert(NodeData::new(NodeKind::Track));
        let slide = dom
            .insert_child(track, NodeData::new(NodeKind::Slide { ordinal: 0 }))
            .unwrap();
        let mut geometry = Geometry::default();
        geometry.0.insert(track, Region::new(0, 0, 1000, 3));
        geometry.0.insert(slide, Region::new(0, 0, 250, 3));
        Fixture {
            hub,
            track,
            slide,
            geometry,
            registry: AnimationTargetRegistry::new(),
            start: Instant::now(),
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn measurer(ipp: ItemsPerPage) -> AxisDimensionMeasurer {
        AxisDimensionMeasurer::new(Axis::Horizontal, ipp, ThrottleConfig::default())
    }

    #[test]
    fn starts_at_zero() {
        assert_eq!(measurer(ItemsPerPage::Auto).dimensions(), Dimensions::default());
    }

    #[test]
    fn activation_measures_synchronously() {
        let mut f = fixture(ResizeHub::new());
        f.registry.register(0, f.slide);
        let mut m = measurer(ItemsPerPage::Auto);
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        assert_eq!(m.dimensions(), Dimensions { container_width: 1000, item_width: 250 });
        assert_eq!(f.hub.active_listeners(), 2);
    }

    #[test]
    fn activation_consumes_earlier_invalidation() {
        let mut f = fixture(ResizeHub::new());
        f.registry.register(0, f.slide);
        let mut m = measurer(ItemsPerPage::Auto);
        m.invalidate();
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        assert!(!m.is_dirty());

        // A quiet poll must not spend the leading edge.
        assert!(!m.poll(&f.geometry, &f.registry, f.start + ms(5)));
        assert_eq!(m.next_deadline(), None);

        f.geometry.0.insert(f.track, Region::new(0, 0, 600, 3));
        f.hub.dispatch_viewport(ViewportEvent::Resize { width: 600, height: 24 });
        assert!(m.poll(&f.geometry, &f.registry, f.start + ms(100)));
        assert_eq!(m.dimensions().container_width, 600);
    }

    #[test]
    fn fixed_mode_skips_item_width() {
        let mut f = fixture(ResizeHub::new());
        f.registry.register(0, f.slide);
        let mut m = measurer(ItemsPerPage::Fixed(2));
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        assert_eq!(m.dimensions(), Dimensions { container_width: 1000, item_width: 0 });
    }

    #[test]
    fn missing_first_target_keeps_item_width() {
        let f = fixture(ResizeHub::new());
        let mut m = measurer(ItemsPerPage::Auto);
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        assert_eq!(m.dimensions().item_width, 0);
        assert_eq!(m.dimensions().container_width, 1000);
    }

    #[test]
    fn missing_container_is_skipped_without_listeners() {
        let f = fixture(ResizeHub::new());
        let mut m = measurer(ItemsPerPage::Auto);
        m.activate(&f.hub, None, &f.geometry, &f.registry, f.start);
        assert_eq!(m.dimensions(), Dimensions::default());
        assert!(!m.has_listeners());
        assert_eq!(f.hub.active_listeners(), 0);
    }

    #[test]
    fn resize_burst_delivers_last_value_once() {
        let mut f = fixture(ResizeHub::new());
        let mut m = measurer(ItemsPerPage::Fixed(1));
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);

        let mut updates = Vec::new();
        for (step, width) in [(2, 900), (5, 800), (9, 700)] {
            f.geometry.0.insert(f.track, Region::new(0, 0, width, 3));
            f.hub.deliver_layout(&f.geometry);
            if m.poll(&f.geometry, &f.registry, f.start + ms(step)) {
                updates.push(m.dimensions().container_width);
            }
        }
        assert!(updates.is_empty(), "inside the window: {updates:?}");
        assert_eq!(m.next_deadline(), Some(f.start + ms(15)));

        assert!(m.poll(&f.geometry, &f.registry, f.start + ms(15)));
        assert_eq!(m.dimensions().container_width, 700);
        assert!(!m.poll(&f.geometry, &f.registry, f.start + ms(40)));
    }

    #[test]
    fn viewport_event_triggers_remeasure() {
        let mut f = fixture(ResizeHub::without_observer());
        let mut m = measurer(ItemsPerPage::Fixed(1));
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        assert_eq!(f.hub.active_listeners(), 1);

        f.geometry.0.insert(f.track, Region::new(0, 0, 600, 3));
        f.hub.deliver_layout(&f.geometry);
        assert!(!m.is_dirty(), "no observer in this environment");
        f.hub.dispatch_viewport(ViewportEvent::Resize { width: 600, height: 24 });
        assert!(m.poll(&f.geometry, &f.registry, f.start + ms(100)));
        assert_eq!(m.dimensions().container_width, 600);
    }

    #[test]
    fn deactivate_releases_listeners() {
        let f = fixture(ResizeHub::new());
        let mut m = measurer(ItemsPerPage::Auto);
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        m.deactivate();
        assert_eq!(f.hub.active_listeners(), 0);
        f.hub.dispatch_viewport(ViewportEvent::OrientationChange);
        assert!(!m.is_dirty());
    }

    #[test]
    fn dropping_releases_listeners() {
        let f = fixture(ResizeHub::new());
        let mut m = measurer(ItemsPerPage::Auto);
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        drop(m);
        assert_eq!(f.hub.active_listeners(), 0);
    }

    #[test]
    fn changing_container_resubscribes() {
        let mut f = fixture(ResizeHub::new());
        let mut m = measurer(ItemsPerPage::Fixed(1));
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        f.geometry.0.insert(f.slide, Region::new(0, 0, 120, 3));
        m.set_container(Some(f.slide));
        assert_eq!(f.hub.active_listeners(), 2);
        assert!(m.poll(&f.geometry, &f.registry, f.start + ms(50)));
        assert_eq!(m.dimensions().container_width, 120);
        m.set_container(None);
        assert_eq!(f.hub.active_listeners(), 0);
    }

    #[test]
    fn manual_item_width_is_throttled() {
        let f = fixture(ResizeHub::new());
        let mut m = measurer(ItemsPerPage::Auto);
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        m.set_item_width(100, f.start + ms(1));
        assert_eq!(m.dimensions().item_width, 100, "leading edge");
        m.set_item_width(125, f.start + ms(2));
        assert_eq!(m.dimensions().item_width, 100);
        assert!(m.poll(&f.geometry, &f.registry, f.start + ms(16)));
        assert_eq!(m.dimensions().item_width, 125);
    }

    #[test]
    fn vertical_axis_reads_heights() {
        let mut f = fixture(ResizeHub::new());
        f.geometry.0.insert(f.track, Region::new(0, 0, 40, 12));
        let mut m = AxisDimensionMeasurer::new(Axis::Vertical, ItemsPerPage::Fixed(1), ThrottleConfig::default());
        m.activate(&f.hub, Some(f.track), &f.geometry, &f.registry, f.start);
        assert_eq!(m.dimensions().container_width, 12);
    }
}
