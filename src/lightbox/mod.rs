//! Lightbox overlay: modal host state and the launcher composing the inline
//! and lightbox sliders.

pub mod launcher;
pub mod modal;

pub use launcher::{LightboxState, OverlayLauncher};
pub use modal::{
    modal_app_element, resolve_app_element, set_modal_app_element, ModalHost, DEFAULT_APP_ELEMENT,
};
