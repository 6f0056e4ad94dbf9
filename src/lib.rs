//! # gilt-slider
//!
//! A carousel slider with a synchronized lightbox, built on a retained node
//! tree, [taffy](https://crates.io/crates/taffy) layout and fine-grained
//! reactivity.
//!
//! A slider shows a list of items a page at a time. Its active index can be
//! owned by the slider itself or by the caller; pages are sized either from a
//! fixed count or from the measured container and item widths, re-measured
//! (throttled) whenever the container or the viewport resizes. With the
//! lightbox enabled, clicking an item opens a second slider over everything
//! else, positioned on that item and navigated independently.
//!
//! ## Core Systems
//!
//! - **[`slider`]**: index ownership, measurement, partitioning, navigation
//! - **[`lightbox`]**: modal host and the launcher composing both sliders
//! - **[`dom`]**: slotmap-backed node arena
//! - **[`layout`]**: taffy layout, hit testing and resize notifications
//! - **[`event`]**: input events and navigation key bindings
//! - **[`reactive`]**: signals, effects, memos
//! - **[`app`]**: headless host tying everything together
//! - **[`testing`]**: virtual-clock pilot and snapshot helpers
//! - **[`geometry`]**: Offset, Size, Region, Axis primitives

// Foundation
pub mod geometry;

// Core systems
pub mod dom;
pub mod layout;

// Events and reactivity
pub mod event;
pub mod reactive;

// Slider
pub mod lightbox;
pub mod slider;

// Application
pub mod app;
pub mod testing;

pub use app::{App, AppConfig, TrackNodes};
pub use lightbox::{set_modal_app_element, LightboxState, ModalHost, OverlayLauncher};
pub use slider::{
    BoundaryPolicy, ClassNames, ComponentProps, ConfigError, Dimensions, IndexChange,
    ItemsPerPage, ModalClassNames, NavigationAction, NavigationTarget, NavigationTrigger,
    NavigationTriggers, SharedOptions, SlideItem, SliderOrchestrator, SliderProps, SliderView,
    ThrottleConfig,
};
