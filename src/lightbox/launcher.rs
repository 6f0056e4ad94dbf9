//! Inline slider plus lightbox, sharing one partitioned content list.
//!
//! [`OverlayLauncher`] partitions the content, runs the inline
//! [`SliderOrchestrator`] on the main items and, while the lightbox index is
//! defined, a second orchestrator on the lightbox items. The lightbox index
//! has its own [`IndexController`]; inline navigation never touches it and
//! lightbox navigation never touches the inline index.
//!
//! ```text
//!   Closed ──(item click / prop set)──▶ Open { index }
//!     ▲                                    │
//!     └──(close request / prop cleared)────┘
//! ```

use std::rc::Rc;

use tokio::time::Instant;

use crate::event::input::InputEvent;
use crate::layout::GeometryQuery;
use crate::slider::config::{ComponentProps, IndexCallback, ItemClickHandler, SliderProps};
use crate::slider::index::{request, IndexController};
use crate::slider::navigation::{IndexChange, NavigationAction, NavigationTrigger};
use crate::slider::orchestrator::SliderOrchestrator;
use crate::slider::partition::{ChildPartitioner, ContentPartition, SlideItem};

use super::modal::ModalHost;

/// Whether the lightbox is showing, and at which position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxState {
    Closed,
    Open { index: usize },
}

impl LightboxState {
    pub fn is_open(self) -> bool {
        matches!(self, LightboxState::Open { .. })
    }
}

pub struct OverlayLauncher<C> {
    props: SliderProps,
    partitioner: ChildPartitioner<C>,
    partition: Rc<ContentPartition<C>>,
    lightbox_index: IndexController,
    inline: SliderOrchestrator,
    modal: Option<ModalHost>,
    lightbox: Option<SliderOrchestrator>,
}

impl<C> OverlayLauncher<C> {
    pub fn new(items: &Rc<[SlideItem<C>]>, props: SliderProps) -> Self {
        let mut partitioner = ChildPartitioner::new();
        let partition = partitioner.partition(items);
        let lightbox_index = IndexController::new(
            "lightbox-index",
            partition.lightbox_len(),
            None,
            props.lightbox_index,
            props.on_lightbox_index_change.clone(),
        );
        let inline = SliderOrchestrator::new(
            "inline",
            inline_props(&props, &lightbox_index),
            partition.main_len(),
        );
        let modal = props
            .with_lightbox
            .then(|| ModalHost::new(props.modal_label.clone(), props.modal_class_names.clone()));

        let mut launcher = Self {
            props,
            partitioner,
            partition,
            lightbox_index,
            inline,
            modal,
            lightbox: None,
        };
        launcher.refresh();
        launcher
    }

    /// Apply new content and props.
    pub fn update(&mut self, items: &Rc<[SlideItem<C>]>, props: SliderProps) {
        self.partition = self.partitioner.partition(items);
        self.lightbox_index.sync(
            self.partition.lightbox_len(),
            props.lightbox_index,
            props.on_lightbox_index_change.clone(),
        );
        self.inline
            .sync(inline_props(&props, &self.lightbox_index), self.partition.main_len());

        if props.with_lightbox {
            let label = props.modal_label.clone();
            let class_names = props.modal_class_names.clone();
            match &mut self.modal {
                Some(modal) => modal.sync(label, class_names),
                None => self.modal = Some(ModalHost::new(label, class_names)),
            }
        } else {
            self.modal = None;
        }
        self.props = props;
        self.refresh();
    }

    /// Mount or unmount the lightbox to match the lightbox index.
    ///
    /// Returns whether the lightbox was mounted or unmounted.
    pub fn refresh(&mut self) -> bool {
        let state = self.lightbox_state();
        let was_open = self.lightbox.is_some();
        if let Some(modal) = &mut self.modal {
            modal.set_open(state.is_open());
        }

        match state {
            LightboxState::Open { index } => {
                let props = lightbox_props(&self.props, index, &self.lightbox_index);
                let count = self.partition.lightbox_len();
                match &mut self.lightbox {
                    Some(lightbox) => lightbox.sync(props, count),
                    None => {
                        tracing::debug!(target: "gilt_slider::lightbox", index, "lightbox opened");
                        let mut lightbox = SliderOrchestrator::new("lightbox", props, count);
                        // The modal traps focus.
                        lightbox.set_focused(true);
                        self.lightbox = Some(lightbox);
                    }
                }
            }
            LightboxState::Closed => {
                if self.lightbox.take().is_some() {
                    tracing::debug!(target: "gilt_slider::lightbox", "lightbox closed");
                }
            }
        }
        was_open != self.lightbox.is_some()
    }

    /// `Closed` whenever the lightbox is disabled, regardless of the index.
    pub fn lightbox_state(&self) -> LightboxState {
        if !self.props.with_lightbox {
            return LightboxState::Closed;
        }
        match self.lightbox_index.index() {
            Some(index) => LightboxState::Open { index },
            None => LightboxState::Closed,
        }
    }

    /// Request the lightbox at `position`. Ignored while disabled.
    pub fn open_lightbox(&mut self, position: usize, trigger: NavigationTrigger) -> bool {
        if !self.props.with_lightbox {
            return false;
        }
        let accepted = self.lightbox_index.set_index(position, trigger);
        self.refresh();
        accepted
    }

    /// Request the lightbox to close.
    pub fn close_lightbox(&mut self, trigger: NavigationTrigger) -> bool {
        let accepted = self.lightbox_index.clear(trigger);
        self.refresh();
        accepted
    }

    /// Route input to the lightbox while it is open, otherwise to the inline
    /// slider. Escape closes an open lightbox.
    pub fn handle_input(&mut self, event: &InputEvent, geometry: &dyn GeometryQuery) -> bool {
        if self.modal.as_ref().is_some_and(|m| m.is_close_request(event)) {
            return self.close_lightbox(NavigationTrigger::Keyboard);
        }
        let consumed = match &mut self.lightbox {
            Some(lightbox) => lightbox.handle_input(event, geometry),
            None => self.inline.handle_input(event, geometry),
        };
        self.refresh();
        consumed
    }

    pub fn navigate_inline(&mut self, action: NavigationAction, trigger: NavigationTrigger) -> bool {
        self.inline.navigate(action, trigger)
    }

    pub fn navigate_lightbox(&mut self, action: NavigationAction, trigger: NavigationTrigger) -> bool {
        let accepted = match &mut self.lightbox {
            Some(lightbox) => lightbox.navigate(action, trigger),
            None => false,
        };
        self.refresh();
        accepted
    }

    /// Poll both orchestrators' measurers. Returns whether anything changed.
    pub fn poll(&mut self, geometry: &dyn GeometryQuery, now: Instant) -> bool {
        let inline = self.inline.poll(geometry, now);
        let lightbox = self
            .lightbox
            .as_mut()
            .is_some_and(|lightbox| lightbox.poll(geometry, now));
        inline || lightbox
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        let lightbox = self.lightbox.as_ref().and_then(SliderOrchestrator::next_deadline);
        match (self.inline.next_deadline(), lightbox) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn props(&self) -> &SliderProps {
        &self.props
    }

    pub fn partition(&self) -> &Rc<ContentPartition<C>> {
        &self.partition
    }

    pub fn inline(&self) -> &SliderOrchestrator {
        &self.inline
    }

    pub fn inline_mut(&mut self) -> &mut SliderOrchestrator {
        &mut self.inline
    }

    pub fn lightbox(&self) -> Option<&SliderOrchestrator> {
        self.lightbox.as_ref()
    }

    pub fn lightbox_mut(&mut self) -> Option<&mut SliderOrchestrator> {
        self.lightbox.as_mut()
    }

    pub fn modal(&self) -> Option<&ModalHost> {
        self.modal.as_ref()
    }

    pub fn lightbox_index(&self) -> &IndexController {
        &self.lightbox_index
    }
}

impl<C> std::fmt::Debug for OverlayLauncher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayLauncher")
            .field("state", &self.lightbox_state())
            .field("inline", &self.inline)
            .field("lightbox", &self.lightbox)
            .field("modal", &self.modal)
            .finish()
    }
}

/// Inline props; a slide click opens the lightbox at the same position.
fn inline_props(props: &SliderProps, lightbox_index: &IndexController) -> ComponentProps {
    let mut inline = props.inline_props();
    if props.with_lightbox {
        let lightbox_index = lightbox_index.clone();
        let handler: ItemClickHandler = Rc::new(move |position| {
            lightbox_index.set_index(position, NavigationTrigger::ItemClick);
        });
        inline.on_item_click = Some(handler);
    }
    inline
}

/// Lightbox props; its index is owned by the launcher's lightbox controller.
fn lightbox_props(props: &SliderProps, index: usize, lightbox_index: &IndexController) -> ComponentProps {
    let lightbox_index = lightbox_index.clone();
    let forward: IndexCallback = Rc::new(move |change: IndexChange| {
        lightbox_index.set(change.index.map(request), change.trigger);
    });
    let mut lightbox = props.lightbox_props();
    lightbox.index = Some(index);
    lightbox.on_index_change = Some(forward);
    lightbox
}
