//! Size-change notifications for laid-out nodes and the viewport.
//!
//! [`ResizeHub`] plays the part of a resize observer plus window
//! resize/orientation listeners. Subscribers hand in a dirty flag; the hub
//! raises it when the observed node's size changes after a layout pass, or
//! when a viewport event is dispatched. Dropping the returned
//! [`Subscription`] unsubscribes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::dom::node::NodeId;
use crate::geometry::Size;

use super::engine::GeometryQuery;

new_key_type! {
    struct ObserverKey;
    struct ListenerKey;
}

/// Viewport-level events that invalidate measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    Resize { width: u16, height: u16 },
    OrientationChange,
}

struct ObservedNode {
    node: NodeId,
    last: Option<Size>,
    flag: Rc<Cell<bool>>,
}

struct HubState {
    observer_supported: bool,
    observed: SlotMap<ObserverKey, ObservedNode>,
    listeners: SlotMap<ListenerKey, Rc<Cell<bool>>>,
}

/// Shared registry of size observers and viewport listeners.
#[derive(Clone)]
pub struct ResizeHub {
    state: Rc<RefCell<HubState>>,
}

impl ResizeHub {
    /// A hub with element observation available.
    pub fn new() -> Self {
        Self::with_support(true)
    }

    /// A hub where element observation is unavailable; only viewport
    /// listeners work and [`observe`](Self::observe) returns `None`.
    pub fn without_observer() -> Self {
        Self::with_support(false)
    }

    fn with_support(observer_supported: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(HubState {
                observer_supported,
                observed: SlotMap::with_key(),
                listeners: SlotMap::with_key(),
            })),
        }
    }

    /// Whether element observation is available.
    pub fn supports_observer(&self) -> bool {
        self.state.borrow().observer_supported
    }

    /// Raise `flag` whenever `node`'s laid-out size changes, including the
    /// first time it gets a layout.
    pub fn observe(&self, node: NodeId, flag: Rc<Cell<bool>>) -> Option<Subscription> {
        let mut state = self.state.borrow_mut();
        if !state.observer_supported {
            return None;
        }
        let key = state.observed.insert(ObservedNode { node, last: None, flag });
        tracing::trace!(target: "gilt_slider::observer", ?node, "observe");
        Some(Subscription {
            hub: Rc::downgrade(&self.state),
            slot: Slot::Node(key),
        })
    }

    /// Raise `flag` on every viewport event.
    pub fn listen_viewport(&self, flag: Rc<Cell<bool>>) -> Subscription {
        let key = self.state.borrow_mut().listeners.insert(flag);
        Subscription {
            hub: Rc::downgrade(&self.state),
            slot: Slot::Viewport(key),
        }
    }

    /// Notify viewport listeners.
    pub fn dispatch_viewport(&self, event: ViewportEvent) {
        let state = self.state.borrow();
        tracing::trace!(
            target: "gilt_slider::observer",
            ?event,
            listeners = state.listeners.len(),
            "viewport event"
        );
        for flag in state.listeners.values() {
            flag.set(true);
        }
    }

    /// Compare observed nodes against fresh layout results.
    pub fn deliver_layout(&self, geometry: &dyn GeometryQuery) {
        let mut state = self.state.borrow_mut();
        for observed in state.observed.values_mut() {
            let Some(region) = geometry.region_of(observed.node) else {
                continue;
            };
            let size = region.size();
            if observed.last != Some(size) {
                observed.last = Some(size);
                observed.flag.set(true);
            }
        }
    }

    /// Live observers plus viewport listeners.
    pub fn active_listeners(&self) -> usize {
        let state = self.state.borrow();
        state.observed.len() + state.listeners.len()
    }
}

impl Default for ResizeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResizeHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ResizeHub")
            .field("observer_supported", &state.observer_supported)
            .field("observed", &state.observed.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Node(ObserverKey),
    Viewport(ListenerKey),
}

/// Unsubscribes from its [`ResizeHub`] when dropped.
#[derive(Debug)]
pub struct Subscription {
    hub: Weak<RefCell<HubState>>,
    slot: Slot,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.hub.upgrade() else {
            return;
        };
        let Ok(mut state) = state.try_borrow_mut() else {
            tracing::warn!(target: "gilt_slider::observer", "hub busy; subscription leaked");
            return;
        };
        match self.slot {
            Slot::Node(key) => {
                state.observed.remove(key);
            }
            Slot::Viewport(key) => {
                state.listeners.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::{NodeData, NodeKind};
    use crate::dom::tree::Dom;
    use crate::geometry::Region;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeGeometry(HashMap<NodeId, Region>);

    impl GeometryQuery for FakeGeometry {
        fn region_of(&self, node: NodeId) -> Option<Region> {
            self.0.get(&node).copied()
        }
    }

    fn node() -> NodeId {
        Dom::new().insert(NodeData::new(NodeKind::Track))
    }

    #[test]
    fn first_layout_raises_flag() {
        let hub = ResizeHub::new();
        let track = node();
        let flag = Rc::new(Cell::new(false));
        let _sub = hub.observe(track, flag.clone()).unwrap();

        let mut geometry = FakeGeometry::default();
        hub.deliver_layout(&geometry);
        assert!(!flag.get(), "no layout yet");

        geometry.0.insert(track, Region::new(0, 0, 40, 3));
        hub.deliver_layout(&geometry);
        assert!(flag.get());
    }

    #[test]
    fn unchanged_size_does_not_raise_flag() {
        let hub = ResizeHub::new();
        let track = node();
        let flag = Rc::new(Cell::new(false));
        let _sub = hub.observe(track, flag.clone()).unwrap();
        let mut geometry = FakeGeometry::default();
        geometry.0.insert(track, Region::new(0, 0, 40, 3));
        hub.deliver_layout(&geometry);
        flag.set(false);

        // Moving without resizing is not a size change.
        geometry.0.insert(track, Region::new(5, 1, 40, 3));
        hub.deliver_layout(&geometry);
        assert!(!flag.get());

        geometry.0.insert(track, Region::new(5, 1, 30, 3));
        hub.deliver_layout(&geometry);
        assert!(flag.get());
    }

    #[test]
    fn viewport_events_reach_listeners() {
        let hub = ResizeHub::new();
        let flag = Rc::new(Cell::new(false));
        let _sub = hub.listen_viewport(flag.clone());
        hub.dispatch_viewport(ViewportEvent::OrientationChange);
        assert!(flag.get());
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let hub = ResizeHub::new();
        let flag = Rc::new(Cell::new(false));
        let node_sub = hub.observe(node(), flag.clone());
        let viewport_sub = hub.listen_viewport(flag.clone());
        assert_eq!(hub.active_listeners(), 2);
        drop(node_sub);
        drop(viewport_sub);
        assert_eq!(hub.active_listeners(), 0);
        hub.dispatch_viewport(ViewportEvent::Resize { width: 10, height: 5 });
        assert!(!flag.get());
    }

    #[test]
    fn hub_without_observer_still_listens_to_viewport() {
        let hub = ResizeHub::without_observer();
        assert!(!hub.supports_observer());
        let flag = Rc::new(Cell::new(false));
        assert!(hub.observe(node(), flag.clone()).is_none());
        let _sub = hub.listen_viewport(flag.clone());
        hub.dispatch_viewport(ViewportEvent::Resize { width: 100, height: 30 });
        assert!(flag.get());
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let hub = ResizeHub::new();
        let sub = hub.listen_viewport(Rc::new(Cell::new(false)));
        drop(hub);
        drop(sub);
    }
}
