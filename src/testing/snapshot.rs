//! Snapshot rendering helpers.
//!
//! Converts slider views into compact plain text for snapshot assertions.
//! Slides render as their position: the active slide as `[n]`, other slides
//! in the visible window as `(n)`, the rest bare.

use crate::app::App;
use crate::slider::orchestrator::SliderView;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// One slider as a single line, e.g. `[1] (2) 3 4`.
///
/// A slider without items renders as `(empty)`.
pub fn render_track(view: &SliderView) -> String {
    if view.slides.is_empty() {
        return "(empty)".to_owned();
    }
    view.slides
        .iter()
        .map(|slide| {
            if slide.active {
                format!("[{}]", slide.position)
            } else if slide.visible {
                format!("({})", slide.position)
            } else {
                slide.position.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Both sliders of an app, one line each.
///
/// ```text
/// inline: ipp=2 [0] (1) 2 3
/// lightbox: closed
/// ```
pub fn render_app<C>(app: &App<C>) -> String {
    let inline = app.inline_view();
    let lightbox = match app.lightbox_view() {
        Some(view) => format!("ipp={} {}", view.items_per_page, render_track(&view)),
        None => "closed".to_owned(),
    };
    format!(
        "inline: ipp={} {}\nlightbox: {}",
        inline.items_per_page,
        render_track(&inline),
        lightbox
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::slider::config::{ItemsPerPage, SliderProps};
    use crate::slider::navigation::{NavigationAction, NavigationTrigger};
    use crate::slider::partition::SlideItem;
    use std::rc::Rc;
    use tokio::time::Instant;

    fn app(n: usize, props: SliderProps) -> App<usize> {
        let items: Rc<[SlideItem<usize>]> = (0..n).map(SlideItem::new).collect();
        App::new_headless(&items, props, AppConfig::default(), (80, 24), Instant::now())
    }

    #[test]
    fn track_marks_active_and_visible() {
        let app = app(5, SliderProps::new().with_items_per_page(ItemsPerPage::Fixed(2)));
        insta::assert_snapshot!(render_track(&app.inline_view()), @"[0] (1) 2 3 4");
    }

    #[test]
    fn empty_track() {
        let app = app(0, SliderProps::new());
        insta::assert_snapshot!(render_track(&app.inline_view()), @"(empty)");
    }

    #[test]
    fn app_with_closed_lightbox() {
        let app = app(3, SliderProps::new().with_lightbox(true));
        insta::assert_snapshot!(render_app(&app), @r"
        inline: ipp=1 [0] 1 2
        lightbox: closed
        ");
    }

    #[test]
    fn app_with_open_lightbox() {
        let props = SliderProps::new().with_lightbox(true).with_lightbox_index(Some(1));
        let mut app = app(3, props);
        // A supplied lightbox index without a callback only seeds the state.
        assert!(app.lightbox_state().is_open());
        app.launcher_mut()
            .navigate_lightbox(NavigationAction::Next, NavigationTrigger::Keyboard);
        insta::assert_snapshot!(render_app(&app), @r"
        inline: ipp=1 [0] 1 2
        lightbox: ipp=1 0 1 [2]
        ");
    }
}
