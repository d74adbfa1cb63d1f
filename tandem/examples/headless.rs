// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builds a small tree against the mock backend and prints the settled
//! geometry.
//!
//! Run with `RUST_LOG=tandem=trace` to watch the drains.

use std::rc::Rc;

use tandem::{Button, Element, Rect, ScrollContainer, UiContext, UiLength, UiMargin, Window};
use tandem_mock::MockProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn print_tree(element: &Element, indent: usize) {
    println!(
        "{:indent$}{:?} {:?} bounds={:?} preferred={:?}",
        "",
        element.kind(),
        element.id(),
        element.bounds(),
        element.preferred_size(),
    );
    for child in element.children() {
        print_tree(&child, indent + 2);
    }
}

fn main() -> Result<(), tandem::Error> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tandem=debug"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let mock = Rc::new(MockProvider::new());
    let ctx = UiContext::new(mock.clone());

    let window = Window::new(&ctx);
    window.set_title("Tandem");
    window.set_padding(UiMargin::uniform(UiLength::sem(0.5)));

    let scroll = ScrollContainer::new(&ctx);
    scroll.set_horizontal_scrolling(true);
    window.set_content_view(Some(scroll.element()))?;

    let button = Button::new(&ctx);
    button.set_label("Press me");
    button.set_margin(UiMargin::new(1.0, 2.0, 3.0, 4.0));
    scroll.set_content_view(Some(button.element()))?;

    window.realize()?;
    window.set_bounds(Rect::new(40.0, 40.0, 100.0, 80.0))?;
    window.request_auto_size();
    let ticks = ctx.pump_until_idle();
    println!("settled after {ticks} idle ticks, {} drains", ctx.scheduler().cycles());
    print_tree(&window, 0);

    if let Some(state) = mock.state(button.id()) {
        println!("native button: {state:?}");
    }

    ctx.shutdown();
    Ok(())
}
