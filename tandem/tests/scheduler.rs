// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalescing, ordering and failure handling of deferred layout.

use std::cell::RefCell;
use std::rc::Rc;

use tandem::{
    Arrange, Button, ContextOptions, Core, CoreError, Element, ElementId, ElementKind, Error,
    Measure, Rect, SchedulerState, ScrollContainer, Size, UiContext, UiMargin, UiProvider,
};
use tandem_mock::MockProvider;

#[test]
fn invalidations_coalesce_into_one_drain() {
    let ctx = UiContext::headless();
    let scroll = ScrollContainer::new(&ctx);
    let button = Button::new(&ctx);
    assert_eq!(ctx.scheduler().state(), SchedulerState::Idle);

    scroll.set_content_view(Some(button.element())).unwrap();
    button.set_label("one");
    button.set_margin(UiMargin::new(1.0, 1.0, 1.0, 1.0));
    scroll.set_padding(UiMargin::new(2.0, 2.0, 2.0, 2.0));
    scroll.invalidate_layout();

    assert_eq!(ctx.scheduler().state(), SchedulerState::Scheduled);
    assert_eq!(ctx.idle_queue().len(), 1);
    assert!(button.is_sizing_dirty());
    assert!(scroll.is_sizing_dirty());
    assert!(scroll.is_layout_dirty());

    assert_eq!(ctx.pump_until_idle(), 1);
    assert_eq!(ctx.scheduler().cycles(), 1);
    assert_eq!(ctx.scheduler().state(), SchedulerState::Idle);
    for element in [scroll.element(), button.element()] {
        assert!(!element.is_sizing_dirty());
        assert!(!element.is_layout_dirty());
    }
}

#[test]
fn clean_tree_schedules_nothing() {
    let ctx = UiContext::headless();
    let scroll = ScrollContainer::new(&ctx);
    scroll.set_vertical_scrolling(true);
    scroll.set_margin(UiMargin::ZERO);
    assert!(ctx.is_idle());
    assert_eq!(ctx.scheduler().state(), SchedulerState::Idle);
}

type Log = Rc<RefCell<Vec<(&'static str, ElementId)>>>;

/// A backend whose cores only measure and arrange, recording each call.
#[derive(Debug, Default)]
struct Recording {
    log: Log,
}

#[derive(Debug)]
struct RecordingCore {
    kind: ElementKind,
    id: ElementId,
    log: Log,
}

impl UiProvider for Recording {
    fn name(&self) -> &str {
        "recording"
    }

    fn create_core(&self, element: &Element) -> Result<Box<dyn Core>, Error> {
        Ok(Box::new(RecordingCore {
            kind: element.kind(),
            id: element.id(),
            log: self.log.clone(),
        }))
    }
}

impl Core for RecordingCore {
    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn measure(&self) -> Option<&dyn Measure> {
        Some(self)
    }

    fn arrange(&mut self) -> Option<&mut dyn Arrange> {
        Some(self)
    }
}

impl Measure for RecordingCore {
    fn preferred_size(&self) -> Size {
        self.log.borrow_mut().push(("measure", self.id));
        Size::new(40.0, 20.0)
    }
}

impl Arrange for RecordingCore {
    fn set_bounds(&mut self, bounds: Rect) -> Result<Rect, CoreError> {
        self.log.borrow_mut().push(("arrange", self.id));
        Ok(bounds)
    }
}

#[test]
fn sizing_runs_before_layout() {
    let provider = Rc::new(Recording::default());
    let ctx = UiContext::new(provider.clone());
    let outer = ScrollContainer::new(&ctx);
    let inner = ScrollContainer::new(&ctx);
    let button = Button::new(&ctx);
    inner.set_content_view(Some(button.element())).unwrap();
    outer.set_content_view(Some(inner.element())).unwrap();
    outer.realize().unwrap();
    assert!(provider.log.borrow().is_empty());

    ctx.pump_until_idle();
    let log = provider.log.borrow();
    let first_arrange = log.iter().position(|(call, _)| *call == "arrange");
    let last_measure = log.iter().rposition(|(call, _)| *call == "measure");
    assert_eq!(last_measure, Some(0), "{log:?}");
    assert!(first_arrange > last_measure, "{log:?}");
    assert!(log.contains(&("arrange", button.id())));
    assert!(log.contains(&("arrange", inner.id())));
    drop(log);

    // The button's preferred size reached both holders.
    assert_eq!(inner.preferred_size(), Size::new(40.0, 20.0));
    assert_eq!(outer.preferred_size(), Size::new(40.0, 20.0));
    ctx.shutdown();
}

#[test]
fn invalidation_during_a_drain_waits_for_the_next_cycle() {
    let ctx = UiContext::headless();
    let outer = ScrollContainer::new(&ctx);
    let inner = ScrollContainer::new(&ctx);
    let button = Button::new(&ctx);
    inner.set_content_view(Some(button.element())).unwrap();
    outer.set_content_view(Some(inner.element())).unwrap();
    outer.set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();

    // Arranging `inner` resizes it, which schedules its own relayout.
    assert_eq!(ctx.run_idle_tick(), 1);
    assert_eq!(ctx.scheduler().cycles(), 1);
    assert_eq!(inner.size(), Size::new(100.0, 100.0));
    assert!(inner.is_layout_dirty());
    assert!(!outer.is_layout_dirty());
    assert_eq!(ctx.scheduler().state(), SchedulerState::Scheduled);

    assert_eq!(ctx.run_idle_tick(), 1);
    assert_eq!(ctx.scheduler().cycles(), 2);
    assert!(!inner.is_layout_dirty());
    assert!(ctx.is_idle());
}

fn failing_setup(options: ContextOptions) -> (Rc<MockProvider>, UiContext, ScrollContainer, Button) {
    let mock = Rc::new(MockProvider::new());
    let ctx = UiContext::with_options(mock.clone(), options);
    let scroll = ScrollContainer::new(&ctx);
    let button = Button::new(&ctx);
    button.set_label("Retry");
    scroll.set_content_view(Some(button.element())).unwrap();
    scroll.realize().unwrap();
    scroll.set_bounds(Rect::new(0.0, 0.0, 300.0, 200.0)).unwrap();
    ctx.pump_until_idle();
    (mock, ctx, scroll, button)
}

#[test]
fn failed_layout_is_retried_on_later_ticks() {
    let (mock, ctx, scroll, button) = failing_setup(ContextOptions::default());
    let before = button.bounds();

    mock.fail_arrange(2);
    scroll.set_padding(UiMargin::new(3.0, 3.0, 3.0, 3.0));
    assert_eq!(ctx.pump_until_idle(), 3);
    assert_eq!(button.position().x, 3.0);
    assert_eq!(button.position().y, 3.0);
    assert_ne!(button.bounds(), before);
    assert!(!scroll.is_layout_dirty());
    ctx.shutdown();
}

#[test]
fn layout_that_keeps_failing_is_abandoned() {
    let options = ContextOptions::default().with_max_layout_attempts(2);
    let (mock, ctx, scroll, button) = failing_setup(options);
    let before = button.bounds();

    mock.fail_arrange(5);
    scroll.set_padding(UiMargin::new(3.0, 3.0, 3.0, 3.0));
    assert_eq!(ctx.pump_until_idle(), 2);
    assert!(!scroll.is_layout_dirty());
    assert_eq!(button.bounds(), before);

    // Once the backend recovers, the next change lays out normally.
    mock.fail_arrange(0);
    scroll.set_padding(UiMargin::new(4.0, 4.0, 4.0, 4.0));
    assert_eq!(ctx.pump_until_idle(), 1);
    assert_eq!(button.position().x, 4.0);
    ctx.shutdown();
}

#[test]
fn pending_work_keeps_elements_alive() {
    let ctx = UiContext::headless();
    let scroll = ScrollContainer::new(&ctx);
    let button = Button::new(&ctx);
    scroll.set_content_view(Some(button.element())).unwrap();

    let destroyed = Rc::new(RefCell::new(Vec::new()));
    for element in [scroll.element(), button.element()] {
        let log = destroyed.clone();
        element.set_destruct_hook(move |e: &Element| log.borrow_mut().push(e.id()));
    }
    let weak = Rc::downgrade(scroll.element());
    let ids = (scroll.id(), button.id());
    drop(scroll);
    drop(button);

    assert!(weak.upgrade().is_some());
    assert!(destroyed.borrow().is_empty());

    ctx.pump_until_idle();
    assert!(weak.upgrade().is_none());
    assert_eq!(*destroyed.borrow(), vec![ids.0, ids.1]);
}

#[test]
fn shutdown_releases_pending_work() {
    let ctx = UiContext::headless();
    let scroll = ScrollContainer::new(&ctx);
    let button = Button::new(&ctx);
    scroll.set_content_view(Some(button.element())).unwrap();
    let weak = Rc::downgrade(scroll.element());
    drop(scroll);

    ctx.shutdown();
    assert!(weak.upgrade().is_none());
    assert!(button.parent().is_none());
    assert!(ctx.is_idle());
    assert_eq!(ctx.scheduler().state(), SchedulerState::Idle);
}
