//! Modal host state for the lightbox overlay.
//!
//! The app element is process-wide and set at most once, before the first
//! lightbox opens. Hosts that never set it get [`DEFAULT_APP_ELEMENT`].

use std::sync::OnceLock;

use crate::event::input::{InputEvent, Key};
use crate::slider::config::ModalClassNames;

/// App element used when [`set_modal_app_element`] was never called.
pub const DEFAULT_APP_ELEMENT: &str = "body";

static APP_ELEMENT: OnceLock<String> = OnceLock::new();

/// Designate the element the overlay hides from assistive technology while
/// open. Only the first call takes effect; returns whether this one did.
pub fn set_modal_app_element(element: impl Into<String>) -> bool {
    let element = element.into();
    match APP_ELEMENT.set(element) {
        Ok(()) => {
            tracing::debug!(target: "gilt_slider::modal", element = APP_ELEMENT.get().map(String::as_str), "app element set");
            true
        }
        Err(rejected) => {
            tracing::warn!(target: "gilt_slider::modal", %rejected, "app element already set; ignored");
            false
        }
    }
}

/// The configured app element, if any.
pub fn modal_app_element() -> Option<&'static str> {
    APP_ELEMENT.get().map(String::as_str)
}

/// The configured app element or the fallback.
pub fn resolve_app_element() -> &'static str {
    modal_app_element().unwrap_or(DEFAULT_APP_ELEMENT)
}

/// Overlay host for the lightbox. Exists whenever the lightbox is enabled;
/// open while the lightbox index is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalHost {
    label: Option<String>,
    class_names: ModalClassNames,
    app_element: Option<&'static str>,
    open: bool,
}

impl ModalHost {
    pub fn new(label: Option<String>, class_names: ModalClassNames) -> Self {
        Self { label, class_names, app_element: None, open: false }
    }

    /// Apply new label and class names.
    pub fn sync(&mut self, label: Option<String>, class_names: ModalClassNames) {
        self.label = label;
        self.class_names = class_names;
    }

    /// Open or close. Returns whether the state changed.
    pub fn set_open(&mut self, open: bool) -> bool {
        if self.open == open {
            return false;
        }
        self.open = open;
        if open {
            let app_element = resolve_app_element();
            self.app_element = Some(app_element);
            if self.label.as_deref().map_or(true, str::is_empty) {
                tracing::warn!(target: "gilt_slider::modal", "lightbox opened without a modal label");
            }
            tracing::debug!(target: "gilt_slider::modal", app_element, "opened");
        } else {
            self.app_element = None;
            tracing::debug!(target: "gilt_slider::modal", "closed");
        }
        true
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Accessible label of the overlay.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn class_names(&self) -> &ModalClassNames {
        &self.class_names
    }

    /// The element hidden behind the overlay; `None` while closed.
    pub fn app_element(&self) -> Option<&'static str> {
        self.app_element
    }

    /// Classes for the overlay node: overlay then modal.
    pub fn overlay_classes(&self) -> Vec<String> {
        [&self.class_names.overlay, &self.class_names.modal]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Single class for the app element while open.
    pub fn body_class(&self) -> Option<&str> {
        self.class_names.body_open.as_deref().filter(|_| self.open)
    }

    /// Single class for the document root while open.
    pub fn html_class(&self) -> Option<&str> {
        self.class_names.html_open.as_deref().filter(|_| self.open)
    }

    /// Whether `event` asks an open overlay to close.
    pub fn is_close_request(&self, event: &InputEvent) -> bool {
        self.open && matches!(event, InputEvent::Key(key) if key.code == Key::Escape)
    }
}
