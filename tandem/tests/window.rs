// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Windows: content, auto-sizing and idle integration.

use std::cell::Cell;
use std::rc::Rc;

use tandem::{Button, Point, Rect, ScrollContainer, UiContext, UiMargin, Window};
use tandem_mock::MockProvider;

fn setup() -> (Rc<MockProvider>, UiContext) {
    let mock = Rc::new(MockProvider::new());
    let ctx = UiContext::new(mock.clone());
    (mock, ctx)
}

#[test]
fn auto_size_uses_the_settled_preferred_size() {
    let (mock, ctx) = setup();
    let window = Window::new(&ctx);
    let button = Button::new(&ctx);
    button.set_label("Continue");
    window.set_padding(UiMargin::new(4.0, 4.0, 4.0, 4.0));
    window.set_content_view(Some(button.element())).unwrap();
    window.realize().unwrap();
    window
        .set_bounds(Rect::new(10.0, 20.0, 11.0, 21.0))
        .unwrap();

    window.request_auto_size();
    ctx.pump_until_idle();

    let preferred = window.preferred_size();
    let content = button.preferred_size();
    assert!((preferred.width - (content.width + 8.0)).abs() < 1e-9);
    assert_eq!(window.position(), Point::new(10.0, 20.0));
    assert!((window.size().width - preferred.width).abs() < 1e-6);
    assert!((window.size().height - preferred.height).abs() < 1e-6);

    // The window's new size was passed down to its content.
    assert_eq!(button.position(), Point::new(4.0, 4.0));
    assert!((button.size().width - content.width).abs() < 1e-6);
    assert_eq!(mock.state(window.id()).unwrap().bounds, Some(window.bounds()));
    ctx.shutdown();
}

#[test]
fn auto_size_of_a_dropped_window_does_nothing() {
    let ctx = UiContext::headless();
    let window = Window::new(&ctx);
    window.request_auto_size();
    drop(window);
    assert_eq!(ctx.pump_until_idle(), 1);
}

#[test]
fn window_content_can_be_a_scroll_container() {
    let ctx = UiContext::headless();
    let window = Window::new(&ctx);
    let scroll = ScrollContainer::new(&ctx);
    window.set_content_view(Some(scroll.element())).unwrap();
    window.set_bounds(Rect::new(0.0, 0.0, 200.0, 100.0)).unwrap();
    ctx.pump_until_idle();
    assert_eq!(scroll.bounds(), Rect::new(0.0, 0.0, 200.0, 100.0));
    ctx.shutdown();
}

#[test]
fn waker_fires_once_per_batch() {
    let ctx = UiContext::headless();
    let wakes = Rc::new(Cell::new(0));
    let counter = wakes.clone();
    ctx.set_idle_waker(move || counter.set(counter.get() + 1));

    let window = Window::new(&ctx);
    window.set_title("one");
    window.set_title("two");
    window.request_auto_size();
    assert_eq!(wakes.get(), 1);

    ctx.pump_until_idle();
    window.set_title("three");
    assert_eq!(wakes.get(), 2);
    ctx.shutdown();
}
