//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) on a virtual clock
//! without a terminal. Use [`render_track`] and [`render_app`] to capture slider
//! state as plain text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{render_app, render_track};
