//! Slider options: props, shared options, class names, throttle config.
//!
//! Everything here is plain data with builder methods. Option strings coming
//! from outside (`"auto"`, `"drag,wheel"`, `"window"`) are parsed through
//! `FromStr` impls that return [`ConfigError`].

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use crate::event::binding::NavigationBindings;
use crate::geometry::Axis;

use super::measure::Dimensions;
use super::navigation::{
    BoundaryPolicy, IndexChange, NavigationTarget, NavigationTriggers,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from parsing slider option strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid items per page {0:?}: expected \"auto\" or a positive integer")]
    InvalidItemsPerPage(String),
    #[error("unknown navigation trigger: {0}")]
    UnknownTrigger(String),
    #[error("unknown navigation target: {0}")]
    UnknownTarget(String),
    #[error("unknown boundary policy: {0}")]
    UnknownBoundaryPolicy(String),
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Receives index-change requests together with their trigger.
pub type IndexCallback = Rc<dyn Fn(IndexChange)>;

/// Receives the position of a clicked slide.
pub type ItemClickHandler = Rc<dyn Fn(usize)>;

struct CallbackDebug<'a, T: ?Sized>(&'a Option<Rc<T>>);

impl<T: ?Sized> fmt::Debug for CallbackDebug<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Some(<fn>)"),
            None => f.write_str("None"),
        }
    }
}

// ---------------------------------------------------------------------------
// ItemsPerPage
// ---------------------------------------------------------------------------

/// How many slides a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemsPerPage {
    /// Derived from measured container and item widths.
    Auto,
    Fixed(usize),
}

impl ItemsPerPage {
    /// Effective count for the given measurements, never below 1.
    pub fn resolve(self, dimensions: Dimensions) -> usize {
        let n = match self {
            ItemsPerPage::Fixed(n) => n,
            ItemsPerPage::Auto if dimensions.item_width > 0 => {
                (dimensions.container_width.max(0) / dimensions.item_width) as usize
            }
            ItemsPerPage::Auto => 1,
        };
        n.max(1)
    }

    pub fn is_auto(self) -> bool {
        matches!(self, ItemsPerPage::Auto)
    }
}

impl Default for ItemsPerPage {
    fn default() -> Self {
        ItemsPerPage::Fixed(1)
    }
}

impl fmt::Display for ItemsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemsPerPage::Auto => f.write_str("auto"),
            ItemsPerPage::Fixed(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for ItemsPerPage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(ItemsPerPage::Auto);
        }
        match trimmed.parse::<usize>() {
            Ok(n) if n > 0 => Ok(ItemsPerPage::Fixed(n)),
            _ => Err(ConfigError::InvalidItemsPerPage(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Class names
// ---------------------------------------------------------------------------

/// Presentation class names passed through to the rendered nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNames {
    /// On the slider's outer node.
    pub class_name: Option<String>,
    /// On the wrapper around the track.
    pub wrapper: Option<String>,
    /// On every slide.
    pub slide: Option<String>,
    /// Added to the active slide.
    pub active_slide: Option<String>,
    /// Added to slides inside the visible window.
    pub visible_slide: Option<String>,
    pub previous_button: Option<String>,
    pub next_button: Option<String>,
    /// Prefix for the `"<prefix>-<n>"` class on the wrapper.
    pub items_per_page: Option<String>,
}

impl ClassNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    pub fn with_wrapper(mut self, class: impl Into<String>) -> Self {
        self.wrapper = Some(class.into());
        self
    }

    pub fn with_slide(mut self, class: impl Into<String>) -> Self {
        self.slide = Some(class.into());
        self
    }

    pub fn with_active_slide(mut self, class: impl Into<String>) -> Self {
        self.active_slide = Some(class.into());
        self
    }

    pub fn with_visible_slide(mut self, class: impl Into<String>) -> Self {
        self.visible_slide = Some(class.into());
        self
    }

    pub fn with_previous_button(mut self, class: impl Into<String>) -> Self {
        self.previous_button = Some(class.into());
        self
    }

    pub fn with_next_button(mut self, class: impl Into<String>) -> Self {
        self.next_button = Some(class.into());
        self
    }

    pub fn with_items_per_page(mut self, prefix: impl Into<String>) -> Self {
        self.items_per_page = Some(prefix.into());
        self
    }
}

/// Class names forwarded to the modal host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalClassNames {
    pub modal: Option<String>,
    pub overlay: Option<String>,
    pub portal: Option<String>,
    /// Single class set on the app element while open.
    pub body_open: Option<String>,
    /// Single class set on the document root while open.
    pub html_open: Option<String>,
}

impl ModalClassNames {
    pub fn with_modal(mut self, class: impl Into<String>) -> Self {
        self.modal = Some(class.into());
        self
    }

    pub fn with_overlay(mut self, class: impl Into<String>) -> Self {
        self.overlay = Some(class.into());
        self
    }

    pub fn with_portal(mut self, class: impl Into<String>) -> Self {
        self.portal = Some(class.into());
        self
    }

    pub fn with_body_open(mut self, class: impl Into<String>) -> Self {
        self.body_open = Some(class.into());
        self
    }

    pub fn with_html_open(mut self, class: impl Into<String>) -> Self {
        self.html_open = Some(class.into());
        self
    }
}

// ---------------------------------------------------------------------------
// ThrottleConfig
// ---------------------------------------------------------------------------

/// Rate limit applied to each measured dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Minimum time between two emitted values.
    pub interval: Duration,
    /// Emit the first value of a quiet period immediately.
    pub leading: bool,
}

impl ThrottleConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(15);

    pub fn new(interval: Duration) -> Self {
        Self { interval, leading: true }
    }

    /// One emission per frame at `fps` frames per second. `0` is treated as 1.
    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    pub fn with_leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

// ---------------------------------------------------------------------------
// SharedOptions
// ---------------------------------------------------------------------------

/// Options applied identically to the inline and the lightbox slider.
#[derive(Debug, Clone, Default)]
pub struct SharedOptions {
    pub class_names: ClassNames,
    pub navigation_triggers: NavigationTriggers,
    pub navigation_target: NavigationTarget,
    pub boundary: BoundaryPolicy,
    pub throttle: ThrottleConfig,
    pub axis: Axis,
    /// Key bindings; `None` uses the defaults for `axis`.
    pub bindings: Option<NavigationBindings>,
}

impl SharedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_names(mut self, class_names: ClassNames) -> Self {
        self.class_names = class_names;
        self
    }

    pub fn with_navigation_triggers(mut self, triggers: NavigationTriggers) -> Self {
        self.navigation_triggers = triggers;
        self
    }

    pub fn with_navigation_target(mut self, target: NavigationTarget) -> Self {
        self.navigation_target = target;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_bindings(mut self, bindings: NavigationBindings) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// The bindings in effect.
    pub fn resolved_bindings(&self) -> NavigationBindings {
        self.bindings
            .clone()
            .unwrap_or_else(|| NavigationBindings::for_axis(self.axis))
    }
}

// ---------------------------------------------------------------------------
// ComponentProps
// ---------------------------------------------------------------------------

/// Props for a single [`SliderOrchestrator`](super::orchestrator::SliderOrchestrator).
#[derive(Clone)]
pub struct ComponentProps {
    pub items_per_page: ItemsPerPage,
    /// Externally owned index; only honored together with `on_index_change`.
    pub index: Option<usize>,
    pub on_index_change: Option<IndexCallback>,
    pub on_item_click: Option<ItemClickHandler>,
    /// Index an internally owned controller starts at.
    pub initial_index: Option<usize>,
    pub with_scaling: bool,
    pub lightbox_mode: bool,
    pub shared: SharedOptions,
}

impl Default for ComponentProps {
    fn default() -> Self {
        Self {
            items_per_page: ItemsPerPage::default(),
            index: None,
            on_index_change: None,
            on_item_click: None,
            initial_index: Some(0),
            with_scaling: false,
            lightbox_mode: false,
            shared: SharedOptions::default(),
        }
    }
}

impl fmt::Debug for ComponentProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentProps")
            .field("items_per_page", &self.items_per_page)
            .field("index", &self.index)
            .field("on_index_change", &CallbackDebug(&self.on_index_change))
            .field("on_item_click", &CallbackDebug(&self.on_item_click))
            .field("initial_index", &self.initial_index)
            .field("with_scaling", &self.with_scaling)
            .field("lightbox_mode", &self.lightbox_mode)
            .field("shared", &self.shared)
            .finish()
    }
}

impl ComponentProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items_per_page(mut self, items_per_page: ItemsPerPage) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn with_index(mut self, index: Option<usize>) -> Self {
        self.index = index;
        self
    }

    pub fn on_index_change(mut self, f: impl Fn(IndexChange) + 'static) -> Self {
        self.on_index_change = Some(Rc::new(f));
        self
    }

    pub fn on_item_click(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_item_click = Some(Rc::new(f));
        self
    }

    pub fn with_initial_index(mut self, index: Option<usize>) -> Self {
        self.initial_index = index;
        self
    }

    pub fn with_scaling(mut self, enabled: bool) -> Self {
        self.with_scaling = enabled;
        self
    }

    pub fn lightbox_mode(mut self, enabled: bool) -> Self {
        self.lightbox_mode = enabled;
        self
    }

    pub fn with_shared(mut self, shared: SharedOptions) -> Self {
        self.shared = shared;
        self
    }
}

// ---------------------------------------------------------------------------
// SliderProps
// ---------------------------------------------------------------------------

/// Props for the top-level [`OverlayLauncher`](crate::lightbox::OverlayLauncher).
#[derive(Clone)]
pub struct SliderProps {
    pub with_lightbox: bool,
    pub lightbox_index: Option<usize>,
    pub on_lightbox_index_change: Option<IndexCallback>,
    pub index: Option<usize>,
    pub on_index_change: Option<IndexCallback>,
    pub items_per_page: ItemsPerPage,
    pub with_scaling: bool,
    pub with_lightbox_scaling: bool,
    /// Accessibility label for the modal.
    pub modal_label: Option<String>,
    pub modal_class_names: ModalClassNames,
    pub shared: SharedOptions,
}

impl Default for SliderProps {
    fn default() -> Self {
        Self {
            with_lightbox: false,
            lightbox_index: None,
            on_lightbox_index_change: None,
            index: None,
            on_index_change: None,
            items_per_page: ItemsPerPage::default(),
            with_scaling: false,
            with_lightbox_scaling: true,
            modal_label: None,
            modal_class_names: ModalClassNames::default(),
            shared: SharedOptions::default(),
        }
    }
}

impl fmt::Debug for SliderProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderProps")
            .field("with_lightbox", &self.with_lightbox)
            .field("lightbox_index", &self.lightbox_index)
            .field("on_lightbox_index_change", &CallbackDebug(&self.on_lightbox_index_change))
            .field("index", &self.index)
            .field("on_index_change", &CallbackDebug(&self.on_index_change))
            .field("items_per_page", &self.items_per_page)
            .field("with_scaling", &self.with_scaling)
            .field("with_lightbox_scaling", &self.with_lightbox_scaling)
            .field("modal_label", &self.modal_label)
            .field("modal_class_names", &self.modal_class_names)
            .field("shared", &self.shared)
            .finish()
    }
}

impl SliderProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lightbox(mut self, enabled: bool) -> Self {
        self.with_lightbox = enabled;
        self
    }

    pub fn with_lightbox_index(mut self, index: Option<usize>) -> Self {
        self.lightbox_index = index;
        self
    }

    pub fn on_lightbox_index_change(mut self, f: impl Fn(IndexChange) + 'static) -> Self {
        self.on_lightbox_index_change = Some(Rc::new(f));
        self
    }

    pub fn with_index(mut self, index: Option<usize>) -> Self {
        self.index = index;
        self
    }

    pub fn on_index_change(mut self, f: impl Fn(IndexChange) + 'static) -> Self {
        self.on_index_change = Some(Rc::new(f));
        self
    }

    pub fn with_items_per_page(mut self, items_per_page: ItemsPerPage) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn with_scaling(mut self, enabled: bool) -> Self {
        self.with_scaling = enabled;
        self
    }

    pub fn with_lightbox_scaling(mut self, enabled: bool) -> Self {
        self.with_lightbox_scaling = enabled;
        self
    }

    pub fn with_modal_label(mut self, label: impl Into<String>) -> Self {
        self.modal_label = Some(label.into());
        self
    }

    pub fn with_modal_class_names(mut self, class_names: ModalClassNames) -> Self {
        self.modal_class_names = class_names;
        self
    }

    pub fn with_shared(mut self, shared: SharedOptions) -> Self {
        self.shared = shared;
        self
    }

    /// Props for the inline slider.
    pub fn inline_props(&self) -> ComponentProps {
        ComponentProps {
            items_per_page: self.items_per_page,
            index: self.index,
            on_index_change: self.on_index_change.clone(),
            on_item_click: None,
            initial_index: Some(0),
            with_scaling: self.with_scaling,
            lightbox_mode: false,
            shared: self.shared.clone(),
        }
    }

    /// Props for the lightbox slider; the launcher supplies index and callback.
    pub fn lightbox_props(&self) -> ComponentProps {
        ComponentProps {
            items_per_page: ItemsPerPage::Fixed(1),
            index: None,
            on_index_change: None,
            on_item_click: None,
            initial_index: None,
            with_scaling: self.with_lightbox_scaling,
            lightbox_mode: true,
            shared: self.shared.clone(),
        }
    }
}
