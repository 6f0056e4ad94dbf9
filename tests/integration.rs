//! Integration tests for gilt-slider.
//!
//! These tests drive the public API from outside the crate: a headless app on
//! a virtual clock, the inline slider, and the lightbox overlay.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use gilt_slider::app::{App, AppConfig};
use gilt_slider::event::input::Key;
use gilt_slider::slider::partition::partition_items;
use gilt_slider::testing::Pilot;
use gilt_slider::{
    BoundaryPolicy, Dimensions, IndexChange, ItemsPerPage, LightboxState, NavigationAction,
    NavigationTarget, NavigationTrigger, SharedOptions, SlideItem, SliderProps,
};

fn items(n: usize) -> Rc<[SlideItem<usize>]> {
    (0..n).map(SlideItem::new).collect()
}

/// Uppercase letters are lightbox-only.
fn letters(s: &str) -> Rc<[SlideItem<char>]> {
    s.chars()
        .map(|c| if c.is_uppercase() { SlideItem::lightbox(c) } else { SlideItem::new(c) })
        .collect()
}

fn recorder() -> (Rc<RefCell<Vec<IndexChange>>>, impl Fn(IndexChange) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    (log, move |change| sink.borrow_mut().push(change))
}

// ---------------------------------------------------------------------------
// Items per page
// ---------------------------------------------------------------------------

#[test]
fn auto_items_per_page_from_measured_layout() {
    let props = SliderProps::new().with_items_per_page(ItemsPerPage::Auto);

    let wide = Pilot::with_config(
        &items(8),
        props.clone(),
        AppConfig::new().with_slide_width(25),
        106,
        24,
    );
    let view = wide.inline_view();
    assert_eq!(view.dimensions, Dimensions { container_width: 100, item_width: 25 });
    assert_eq!(view.items_per_page, 4);

    let narrow = Pilot::with_config(&items(8), props, AppConfig::new().with_slide_width(10), 39, 24);
    assert_eq!(narrow.inline_view().dimensions.container_width, 33);
    assert_eq!(narrow.inline_view().items_per_page, 3);
}

#[test]
fn burst_of_resizes_delivers_the_last_value() {
    let props = SliderProps::new().with_items_per_page(ItemsPerPage::Auto);
    let mut pilot = Pilot::new(&items(10), props);
    pilot.advance(Duration::from_millis(100));

    pilot.resize(60, 24);
    assert_eq!(pilot.inline_view().dimensions.container_width, 54);

    pilot.resize(50, 24);
    pilot.resize(45, 24);
    pilot.resize(40, 24);
    assert_eq!(pilot.inline_view().dimensions.container_width, 54);

    pilot.advance(Duration::from_millis(15));
    assert_eq!(pilot.inline_view().dimensions.container_width, 34);
    assert_eq!(pilot.inline_view().items_per_page, 3);
    assert_eq!(pilot.app().next_deadline(), None);
}

#[test]
fn viewport_events_suffice_without_resize_observation() {
    let props = SliderProps::new().with_items_per_page(ItemsPerPage::Auto);
    let mut pilot = Pilot::with_config(
        &items(10),
        props,
        AppConfig::new().with_observe_resize(false),
        80,
        24,
    );
    assert_eq!(pilot.app().hub().active_listeners(), 1);
    pilot.advance(Duration::from_millis(50));
    pilot.resize(40, 24);
    assert_eq!(pilot.inline_view().items_per_page, 3);
}

#[test]
fn orientation_change_remeasures() {
    let props = SliderProps::new().with_items_per_page(ItemsPerPage::Auto);
    let mut pilot = Pilot::new(&items(10), props);
    pilot.advance(Duration::from_millis(50));
    pilot.orientation_change();
    assert_eq!(pilot.inline_view().items_per_page, 7);
}

// ---------------------------------------------------------------------------
// Index ownership and navigation
// ---------------------------------------------------------------------------

#[test]
fn out_of_range_requests_clamp() {
    let mut pilot = Pilot::new(&items(4), SliderProps::new());
    let launcher = pilot.app_mut().launcher_mut();
    assert!(launcher.navigate_inline(NavigationAction::GoTo(99), NavigationTrigger::Programmatic));
    assert_eq!(pilot.inline_view().index, Some(3));
}

#[test]
fn controlled_index_is_never_overridden() {
    let (log, on_change) = recorder();
    let props = SliderProps::new().with_index(Some(1)).on_index_change(on_change);
    let mut pilot = Pilot::new(&items(5), props);

    pilot.click(40, 1);
    pilot.press_key(Key::Right);
    pilot.press_key(Key::Right);
    assert_eq!(pilot.inline_view().index, Some(1));
    assert_eq!(
        log.borrow().iter().map(|c| c.index).collect::<Vec<_>>(),
        vec![Some(2), Some(2)]
    );
}

#[test]
fn wrap_boundary_policy() {
    let shared = SharedOptions::new().with_boundary(BoundaryPolicy::Wrap);
    let mut pilot = Pilot::new(&items(3), SliderProps::new().with_shared(shared));
    pilot.click(40, 1);
    pilot.press_key(Key::End);
    assert_eq!(pilot.inline_view().index, Some(2));
    pilot.press_key(Key::Right);
    assert_eq!(pilot.inline_view().index, Some(0));
}

#[test]
fn window_target_takes_keys_without_focus() {
    let shared = SharedOptions::new().with_navigation_target(NavigationTarget::Window);
    let mut pilot = Pilot::new(&items(3), SliderProps::new().with_shared(shared));
    assert!(pilot.press_key(Key::Right));
    assert_eq!(pilot.inline_view().index, Some(1));
}

#[test]
fn buttons_step_a_page() {
    let props = SliderProps::new().with_items_per_page(ItemsPerPage::Fixed(2));
    let mut pilot = Pilot::new(&items(6), props);
    pilot.click(78, 1);
    assert_eq!(pilot.inline_view().index, Some(2));
    assert_eq!(pilot.inline_view().last_trigger, Some(NavigationTrigger::Button));
    pilot.click(1, 1);
    assert_eq!(pilot.inline_view().index, Some(0));
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

#[test]
fn partition_is_complete_and_ordered() {
    let partition = partition_items(letters("aBcDe"));
    assert_eq!(partition.main_items().copied().collect::<String>(), "ace");
    assert_eq!(partition.lightbox_items().copied().collect::<String>(), "BD");
    assert_eq!(partition.main_len() + partition.lightbox_positions().len(), 5);
}

// ---------------------------------------------------------------------------
// Lightbox
// ---------------------------------------------------------------------------

#[test]
fn lightbox_disabled_ignores_supplied_index() {
    let props = SliderProps::new().with_lightbox_index(Some(2));
    let pilot = Pilot::new(&items(5), props);
    assert_eq!(pilot.lightbox_state(), LightboxState::Closed);
    assert!(pilot.app().launcher().lightbox().is_none());
    assert!(pilot.app().launcher().modal().is_none());
    assert_eq!(pilot.app().overlay_node(), None);
}

#[test]
fn click_opens_lightbox_at_item() {
    let (log, on_change) = recorder();
    let props = SliderProps::new()
        .with_lightbox(true)
        .on_lightbox_index_change(on_change);
    let mut pilot = Pilot::new(&items(5), props);

    // Slides are 10 cells wide starting at x=3; x=25 is the third.
    pilot.click(25, 1);
    assert_eq!(pilot.lightbox_state(), LightboxState::Open { index: 2 });
    assert_eq!(
        log.borrow().as_slice(),
        [IndexChange { index: Some(2), trigger: NavigationTrigger::ItemClick }]
    );

    let lightbox = pilot.lightbox_view().expect("lightbox mounted");
    assert_eq!(lightbox.index, Some(2));
    assert_eq!(lightbox.items_per_page, 1);
    assert!(lightbox.lightbox_mode);
    assert!(lightbox.with_scaling);
    assert_eq!(pilot.inline_view().index, Some(0));
}

#[test]
fn lightbox_navigation_leaves_inline_alone() {
    let mut pilot = Pilot::new(&items(5), SliderProps::new().with_lightbox(true));
    pilot.click(25, 1);
    pilot.press_key(Key::Right);
    assert_eq!(pilot.lightbox_state(), LightboxState::Open { index: 3 });
    assert_eq!(pilot.inline_view().index, Some(0));
}

#[test]
fn escape_closes_and_unmounts() {
    let mut pilot = Pilot::new(&items(5), SliderProps::new().with_lightbox(true));
    pilot.click(45, 1);
    assert_eq!(pilot.lightbox_state(), LightboxState::Open { index: 4 });
    assert!(pilot.app().overlay_node().is_some());

    pilot.press_key(Key::Escape);
    assert_eq!(pilot.lightbox_state(), LightboxState::Closed);
    assert_eq!(pilot.app().overlay_node(), None);
    assert!(pilot.lightbox_view().is_none());
}

#[test]
fn external_prop_closes_regardless_of_index() {
    let (_, on_change) = recorder();
    let props = SliderProps::new()
        .with_lightbox(true)
        .with_lightbox_index(Some(3))
        .on_lightbox_index_change(on_change);
    let mut pilot = Pilot::new(&items(5), props.clone());
    assert_eq!(pilot.lightbox_state(), LightboxState::Open { index: 3 });

    pilot.update(&items(5), props.with_lightbox_index(None));
    assert_eq!(pilot.lightbox_state(), LightboxState::Closed);
    assert_eq!(pilot.app().overlay_node(), None);
}

#[test]
fn lightbox_only_items_fill_the_overlay() {
    let mut pilot = Pilot::new(&letters("abcXY"), SliderProps::new().with_lightbox(true));
    assert_eq!(pilot.inline_view().count, 3);

    pilot.click(15, 1);
    let lightbox = pilot.lightbox_view().expect("lightbox mounted");
    assert_eq!(lightbox.count, 2);
    assert_eq!(lightbox.index, Some(1));
    assert_eq!(pilot.app().lightbox_nodes().map(|n| n.slides.len()), Some(2));
}

#[test]
fn snapshot_of_open_lightbox() {
    let props = SliderProps::new()
        .with_lightbox(true)
        .with_items_per_page(ItemsPerPage::Fixed(2));
    let mut pilot = Pilot::new(&items(4), props);
    pilot.click(15, 1);
    insta::assert_snapshot!(pilot.render(), @r"
    inline: ipp=2 [0] (1) 2 3
    lightbox: ipp=1 0 [1] 2 3
    ");
}

// ---------------------------------------------------------------------------
// Async flush
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn settle_delivers_trailing_measurement() {
    let props = SliderProps::new().with_items_per_page(ItemsPerPage::Auto);
    let start = tokio::time::Instant::now();
    let mut app = App::new_headless(&items(10), props, AppConfig::default(), (80, 24), start);

    app.resize(60, 24, start);
    app.resize(30, 24, start);
    assert_eq!(app.inline_view().dimensions.container_width, 74);

    app.settle().await;
    assert!(tokio::time::Instant::now() >= start + Duration::from_millis(15));
    assert_eq!(app.inline_view().dimensions.container_width, 24);
    assert_eq!(app.inline_view().items_per_page, 2);
}
