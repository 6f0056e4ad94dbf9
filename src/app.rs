//! Headless host: node tree, layout, resize delivery and input routing.
//!
//! [`App`] builds the inline slider's nodes under a root the size of the
//! terminal, mounts an overlay with the lightbox's nodes while the lightbox is
//! open, keeps layout and resize notifications current, and writes the
//! orchestrators' class names back onto the nodes. Times are passed in
//! explicitly so tests can drive a virtual clock.

use std::rc::Rc;

use tokio::time::Instant;

use crate::dom::node::{NodeData, NodeId, NodeKind};
use crate::dom::tree::Dom;
use crate::event::input::{from_crossterm, InputEvent};
use crate::layout::{LayoutEngine, LayoutSpec, Length, ResizeHub, ViewportEvent};
use crate::lightbox::{LightboxState, OverlayLauncher};
use crate::slider::config::SliderProps;
use crate::slider::navigation::NavButton;
use crate::slider::orchestrator::{SliderOrchestrator, SliderView};
use crate::slider::partition::SlideItem;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Sizes of the host's nodes, in cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub slide_width: u16,
    pub slide_height: u16,
    pub button_width: u16,
    /// `false` models an environment without resize observation; only
    /// viewport events trigger re-measurement.
    pub observe_resize: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            slide_width: 10,
            slide_height: 3,
            button_width: 3,
            observe_resize: true,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slide_width(mut self, width: u16) -> Self {
        self.slide_width = width;
        self
    }

    pub fn with_slide_height(mut self, height: u16) -> Self {
        self.slide_height = height;
        self
    }

    pub fn with_button_width(mut self, width: u16) -> Self {
        self.button_width = width;
        self
    }

    pub fn with_observe_resize(mut self, observe: bool) -> Self {
        self.observe_resize = observe;
        self
    }

    fn button_spec(&self) -> LayoutSpec {
        LayoutSpec::row()
            .width(Length::Cells(f32::from(self.button_width)))
            .fixed()
    }

    fn track_spec(&self) -> LayoutSpec {
        LayoutSpec::row().grow(1.0).min_width(Length::Cells(0.0)).clip()
    }

    fn inline_slide_spec(&self) -> LayoutSpec {
        LayoutSpec::column()
            .width(Length::Cells(f32::from(self.slide_width)))
            .height(Length::Cells(f32::from(self.slide_height)))
            .fixed()
    }

    fn lightbox_slide_spec(&self) -> LayoutSpec {
        LayoutSpec::column()
            .width(Length::Percent(100.0))
            .height(Length::Percent(100.0))
            .fixed()
    }
}

// ---------------------------------------------------------------------------
// TrackNodes
// ---------------------------------------------------------------------------

/// The nodes making up one slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackNodes {
    pub wrapper: NodeId,
    pub previous: NodeId,
    pub track: NodeId,
    pub next: NodeId,
    pub slides: Vec<NodeId>,
}

impl TrackNodes {
    fn build(dom: &mut Dom, parent: NodeId, wrapper: LayoutSpec, config: &AppConfig) -> Self {
        let wrapper = dom.attach(parent, NodeData::new(NodeKind::Wrapper).with_layout(wrapper));
        let previous = dom.attach(
            wrapper,
            NodeData::new(NodeKind::Button(NavButton::Previous)).with_layout(config.button_spec()),
        );
        let track = dom.attach(wrapper, NodeData::new(NodeKind::Track).with_layout(config.track_spec()));
        let next = dom.attach(
            wrapper,
            NodeData::new(NodeKind::Button(NavButton::Next)).with_layout(config.button_spec()),
        );
        Self { wrapper, previous, track, next, slides: Vec::new() }
    }

    /// Replace the slide nodes with `count` fresh ones.
    fn rebuild_slides(&mut self, dom: &mut Dom, count: usize, spec: &LayoutSpec) {
        dom.clear_children(self.track);
        self.slides = (0..count)
            .map(|ordinal| {
                dom.attach(
                    self.track,
                    NodeData::new(NodeKind::Slide { ordinal }).with_layout(spec.clone()),
                )
            })
            .collect();
    }

    /// Hand this slider's nodes to its orchestrator.
    fn register(&self, orchestrator: &mut SliderOrchestrator) {
        for position in self.slides.len()..orchestrator.registry().len() {
            orchestrator.unregister_target(position);
        }
        for (position, &node) in self.slides.iter().enumerate() {
            orchestrator.register_target(position, node);
        }
        orchestrator.register_button(NavButton::Previous, Some(self.previous));
        orchestrator.register_button(NavButton::Next, Some(self.next));
        orchestrator.attach_container(Some(self.track));
    }

    fn apply_view(&self, dom: &mut Dom, view: &SliderView, extra: &[String]) {
        if let Some(data) = dom.get_mut(self.wrapper) {
            data.set_classes(
                extra
                    .iter()
                    .chain(&view.root_classes)
                    .chain(&view.wrapper_classes)
                    .map(String::as_str),
            );
        }
        for (slide, node) in view.slides.iter().zip(&self.slides) {
            if let Some(data) = dom.get_mut(*node) {
                data.set_classes(slide.classes.iter().map(String::as_str));
            }
        }
        if let Some(data) = dom.get_mut(self.previous) {
            data.set_classes(view.previous_button_classes.iter().map(String::as_str));
        }
        if let Some(data) = dom.get_mut(self.next) {
            data.set_classes(view.next_button_classes.iter().map(String::as_str));
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// A headless slider host.
pub struct App<C> {
    pub config: AppConfig,
    dom: Dom,
    engine: LayoutEngine,
    hub: ResizeHub,
    launcher: OverlayLauncher<C>,
    viewport: (u16, u16),
    root: NodeId,
    inline: TrackNodes,
    overlay: Option<(NodeId, TrackNodes)>,
}

impl<C> App<C> {
    /// Build, lay out and activate a slider host of `width` x `height` cells.
    pub fn new_headless(
        items: &Rc<[SlideItem<C>]>,
        props: SliderProps,
        config: AppConfig,
        (width, height): (u16, u16),
        now: Instant,
    ) -> Self {
        let mut dom = Dom::new();
        let root = dom.insert(
            NodeData::new(NodeKind::Root)
                .with_layout(LayoutSpec::column().width(Length::Vw(100.0)).height(Length::Vh(100.0))),
        );
        let mut inline = TrackNodes::build(&mut dom, root, LayoutSpec::row(), &config);
        let launcher = OverlayLauncher::new(items, props);
        inline.rebuild_slides(&mut dom, launcher.partition().main_len(), &config.inline_slide_spec());

        let hub = if config.observe_resize {
            ResizeHub::new()
        } else {
            ResizeHub::without_observer()
        };
        let mut app = Self {
            config,
            dom,
            engine: LayoutEngine::new(),
            hub,
            launcher,
            viewport: (width, height),
            root,
            inline,
            overlay: None,
        };
        app.relayout();
        let inline_orchestrator = app.launcher.inline_mut();
        app.inline.register(inline_orchestrator);
        inline_orchestrator.activate(&app.hub, Some(app.inline.track), &app.engine, now);
        app.reconcile(now);
        tracing::debug!(target: "gilt_slider::app", width, height, nodes = app.dom.len(), "app ready");
        app
    }

    fn relayout(&mut self) {
        self.engine.sync_tree(&self.dom, self.viewport);
        self.engine
            .compute(f32::from(self.viewport.0), f32::from(self.viewport.1));
        self.hub.deliver_layout(&self.engine);
    }

    /// Mount or unmount the overlay to match the launcher, then refresh
    /// classes.
    fn reconcile(&mut self, now: Instant) {
        match (self.launcher.lightbox().is_some(), self.overlay.is_some()) {
            (true, false) => self.mount_overlay(now),
            (false, true) => self.unmount_overlay(),
            _ => {}
        }
        self.apply_classes();
    }

    fn mount_overlay(&mut self, now: Instant) {
        let overlay = self.dom.attach(
            self.root,
            NodeData::new(NodeKind::Overlay).with_layout(LayoutSpec::column().overlay()),
        );
        let mut nodes = TrackNodes::build(&mut self.dom, overlay, LayoutSpec::row().grow(1.0), &self.config);
        nodes.rebuild_slides(
            &mut self.dom,
            self.launcher.partition().lightbox_len(),
            &self.config.lightbox_slide_spec(),
        );
        self.relayout();
        if let Some(lightbox) = self.launcher.lightbox_mut() {
            nodes.register(lightbox);
            lightbox.activate(&self.hub, Some(nodes.track), &self.engine, now);
        }
        tracing::debug!(target: "gilt_slider::app", slides = nodes.slides.len(), "overlay mounted");
        self.overlay = Some((overlay, nodes));
    }

    fn unmount_overlay(&mut self) {
        if let Some((overlay, _)) = self.overlay.take() {
            self.dom.remove(overlay);
            self.relayout();
            tracing::debug!(target: "gilt_slider::app", "overlay unmounted");
        }
    }

    fn apply_classes(&mut self) {
        let inline = self.launcher.inline().view();
        self.inline.apply_view(&mut self.dom, &inline, &[]);

        let modal = self.launcher.modal();
        if let (Some((overlay, nodes)), Some(lightbox)) = (&self.overlay, self.launcher.lightbox()) {
            let overlay_classes = modal.map(|m| m.overlay_classes()).unwrap_or_default();
            if let Some(data) = self.dom.get_mut(*overlay) {
                data.set_classes(overlay_classes.iter().map(String::as_str));
            }
            nodes.apply_view(&mut self.dom, &lightbox.view(), &[]);
        }
        let root_classes = modal
            .into_iter()
            .flat_map(|m| m.html_class().into_iter().chain(m.body_class()));
        if let Some(data) = self.dom.get_mut(self.root) {
            data.set_classes(root_classes);
        }
    }

    /// Route an input event. Returns whether it was consumed.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> bool {
        if let InputEvent::Resize { width, height } = event {
            self.resize(width, height, now);
            return true;
        }
        let consumed = self.launcher.handle_input(&event, &self.engine);
        self.reconcile(now);
        consumed
    }

    /// Route a raw terminal event. Events the slider does not react to are
    /// dropped.
    pub fn handle_terminal_event(&mut self, event: crossterm::event::Event, now: Instant) -> bool {
        match from_crossterm(event) {
            Some(event) => self.handle_input(event, now),
            None => false,
        }
    }

    /// The terminal changed size.
    pub fn resize(&mut self, width: u16, height: u16, now: Instant) {
        self.viewport = (width, height);
        self.relayout();
        self.hub
            .dispatch_viewport(ViewportEvent::Resize { width, height });
        self.poll(now);
    }

    pub fn orientation_change(&mut self, now: Instant) {
        self.hub.dispatch_viewport(ViewportEvent::OrientationChange);
        self.poll(now);
    }

    /// Run pending measurements and flushes. Returns whether anything changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let changed = self.launcher.poll(&self.engine, now);
        if changed {
            self.apply_classes();
        }
        changed
    }

    /// Earliest pending trailing flush.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.launcher.next_deadline()
    }

    /// Sleep until every pending flush has been delivered.
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.next_deadline() {
            tokio::time::sleep_until(deadline).await;
            self.poll(Instant::now().max(deadline));
        }
    }

    /// Apply new content and props.
    pub fn update(&mut self, items: &Rc<[SlideItem<C>]>, props: SliderProps, now: Instant) {
        self.launcher.update(items, props);

        let main_len = self.launcher.partition().main_len();
        if self.inline.slides.len() != main_len {
            self.inline
                .rebuild_slides(&mut self.dom, main_len, &self.config.inline_slide_spec());
            self.relayout();
            self.inline.register(self.launcher.inline_mut());
        }

        let lightbox_len = self.launcher.partition().lightbox_len();
        if let Some((overlay, mut nodes)) = self.overlay.take() {
            if nodes.slides.len() != lightbox_len {
                nodes.rebuild_slides(&mut self.dom, lightbox_len, &self.config.lightbox_slide_spec());
                self.relayout();
                if let Some(lightbox) = self.launcher.lightbox_mut() {
                    nodes.register(lightbox);
                }
            }
            self.overlay = Some((overlay, nodes));
        }
        self.reconcile(now);
        self.poll(now);
    }

    // -- queries --------------------------------------------------------------

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn hub(&self) -> &ResizeHub {
        &self.hub
    }

    pub fn launcher(&self) -> &OverlayLauncher<C> {
        &self.launcher
    }

    pub fn launcher_mut(&mut self) -> &mut OverlayLauncher<C> {
        &mut self.launcher
    }

    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub fn inline_nodes(&self) -> &TrackNodes {
        &self.inline
    }

    pub fn lightbox_nodes(&self) -> Option<&TrackNodes> {
        self.overlay.as_ref().map(|(_, nodes)| nodes)
    }

    pub fn overlay_node(&self) -> Option<NodeId> {
        self.overlay.as_ref().map(|(overlay, _)| *overlay)
    }

    pub fn inline_view(&self) -> SliderView {
        self.launcher.inline().view()
    }

    pub fn lightbox_view(&self) -> Option<SliderView> {
        self.launcher.lightbox().map(SliderOrchestrator::view)
    }

    pub fn lightbox_state(&self) -> LightboxState {
        self.launcher.lightbox_state()
    }

    /// Classes currently on `node`.
    pub fn classes_of(&self, node: NodeId) -> &[String] {
        self.dom.get(node).map_or(&[], |data| data.classes.as_slice())
    }
}
