//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`](crate::app::App) and a virtual clock, and
//! provides methods to simulate user input (key presses, clicks, drags,
//! wheel, resize) and the passage of time.

use std::rc::Rc;
use std::time::Duration;

use tokio::time::Instant;

use crate::app::{App, AppConfig};
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
use crate::lightbox::LightboxState;
use crate::slider::config::SliderProps;
use crate::slider::orchestrator::SliderView;
use crate::slider::partition::SlideItem;

use super::snapshot::render_app;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless slider driver for testing.
///
/// Time only moves when [`advance`](Self::advance) is called, so throttled
/// measurements are deterministic.
///
/// # Examples
///
/// ```ignore
/// use gilt_slider::testing::Pilot;
/// use gilt_slider::{SlideItem, SliderProps};
///
/// let mut pilot = Pilot::new(&["a", "b", "c"].map(SlideItem::new).into(), SliderProps::new());
/// pilot.click(5, 1);
/// pilot.press_key(Key::Right);
/// assert_eq!(pilot.inline_view().index, Some(1));
/// ```
pub struct Pilot<C> {
    app: App<C>,
    now: Instant,
}

impl<C> Pilot<C> {
    /// Create a headless app of 80x24 cells with default node sizes.
    pub fn new(items: &Rc<[SlideItem<C>]>, props: SliderProps) -> Self {
        Self::with_config(items, props, AppConfig::default(), 80, 24)
    }

    /// Create a headless app with explicit node sizes and terminal size.
    pub fn with_config(
        items: &Rc<[SlideItem<C>]>,
        props: SliderProps,
        config: AppConfig,
        width: u16,
        height: u16,
    ) -> Self {
        let now = Instant::now();
        Self {
            app: App::new_headless(items, props, config, (width, height), now),
            now,
        }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) -> bool {
        self.press_key_with(key, Modifiers::NONE)
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> bool {
        self.send(InputEvent::Key(KeyEvent::new(key, modifiers)))
    }

    /// Left-button press and release at (x, y).
    pub fn click(&mut self, x: u16, y: u16) {
        self.mouse(MouseAction::Down(MouseBtn::Left), x, y);
        self.mouse(MouseAction::Up(MouseBtn::Left), x, y);
    }

    /// Left-button press at `from_x`, drag to `to_x`, release there.
    pub fn drag(&mut self, from_x: u16, to_x: u16, y: u16) {
        self.mouse(MouseAction::Down(MouseBtn::Left), from_x, y);
        self.mouse(MouseAction::Drag(MouseBtn::Left), to_x, y);
        self.mouse(MouseAction::Up(MouseBtn::Left), to_x, y);
    }

    pub fn scroll_down(&mut self, x: u16, y: u16) -> bool {
        self.mouse(MouseAction::ScrollDown, x, y)
    }

    pub fn scroll_up(&mut self, x: u16, y: u16) -> bool {
        self.mouse(MouseAction::ScrollUp, x, y)
    }

    pub fn mouse(&mut self, kind: MouseAction, x: u16, y: u16) -> bool {
        self.send(InputEvent::Mouse(MouseEvent::new(kind, x, y)))
    }

    /// Simulate a terminal resize at the current virtual time.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.send(InputEvent::Resize { width, height });
    }

    pub fn orientation_change(&mut self) {
        self.app.orientation_change(self.now);
    }

    /// Deliver any input event at the current virtual time.
    pub fn send(&mut self, event: InputEvent) -> bool {
        self.app.handle_input(event, self.now)
    }

    /// Replace content and props.
    pub fn update(&mut self, items: &Rc<[SlideItem<C>]>, props: SliderProps) {
        self.app.update(items, props, self.now);
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Move the virtual clock forward and deliver anything now due.
    pub fn advance(&mut self, by: Duration) -> bool {
        self.now += by;
        self.app.poll(self.now)
    }

    /// Advance to the next pending deadline, if any.
    pub fn flush(&mut self) -> bool {
        match self.app.next_deadline() {
            Some(deadline) => {
                self.now = self.now.max(deadline);
                self.app.poll(self.now)
            }
            None => false,
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &App<C> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App<C> {
        &mut self.app
    }

    pub fn inline_view(&self) -> SliderView {
        self.app.inline_view()
    }

    pub fn lightbox_view(&self) -> Option<SliderView> {
        self.app.lightbox_view()
    }

    pub fn lightbox_state(&self) -> LightboxState {
        self.app.lightbox_state()
    }

    /// Text rendering of both sliders. See [`render_app`].
    pub fn render(&self) -> String {
        render_app(&self.app)
    }
}
