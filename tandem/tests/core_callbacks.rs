// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cores that call back into their own element.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tandem::{
    Button, Core, Element, ElementKind, Measure, SchedulerState, ScrollContainer, Size, Text,
    UiContext, UiMargin, Visibility, props,
};

#[derive(Debug, Default)]
struct Log {
    visible: Vec<bool>,
    texts: Vec<String>,
    labels_seen: Vec<String>,
    saw_core: Vec<bool>,
    measured: usize,
    handed_back: Option<bool>,
    dropped: bool,
}

type SharedLog = Rc<RefCell<Log>>;

#[derive(Debug)]
enum Reaction {
    Nothing,
    /// Hides its own element and sets a margin on another while measuring.
    TouchOnMeasure(Weak<Element>),
    HideOnText,
    SwapOnText(SharedLog),
    DetachOnText,
}

#[derive(Debug)]
struct Echo {
    element: Weak<Element>,
    log: SharedLog,
    reaction: Reaction,
}

fn echo(element: &Rc<Element>, log: &SharedLog, reaction: Reaction) -> Box<dyn Core> {
    Box::new(Echo {
        element: Rc::downgrade(element),
        log: log.clone(),
        reaction,
    })
}

impl Drop for Echo {
    fn drop(&mut self) {
        self.log.borrow_mut().dropped = true;
    }
}

impl Visibility for Echo {
    fn set_visible(&mut self, visible: bool) {
        self.log.borrow_mut().visible.push(visible);
    }
}

impl Text for Echo {
    fn set_text(&mut self, text: &str) {
        self.log.borrow_mut().texts.push(text.to_owned());
        let Some(element) = self.element.upgrade() else {
            return;
        };
        let label = element.property(props::LABEL).unwrap();
        {
            let mut log = self.log.borrow_mut();
            log.saw_core.push(element.has_core());
            log.labels_seen.push(label);
        }
        match (&self.reaction, text) {
            (Reaction::HideOnText, "hide") => element.set_visible(false),
            (Reaction::SwapOnText(next), "swap") => {
                element
                    .attach_core(echo(&element, next, Reaction::Nothing))
                    .unwrap();
            }
            (Reaction::DetachOnText, "drop") => {
                let handed_back = element.detach_core();
                self.log.borrow_mut().handed_back = Some(handed_back.is_some());
            }
            _ => {}
        }
    }
}

impl Measure for Echo {
    fn preferred_size(&self) -> Size {
        self.log.borrow_mut().measured += 1;
        if let Reaction::TouchOnMeasure(other) = &self.reaction {
            if let Some(element) = self.element.upgrade() {
                element.set_visible(false);
            }
            if let Some(other) = other.upgrade() {
                other.set_margin(UiMargin::new(2.0, 2.0, 2.0, 2.0));
            }
        }
        Size::new(30.0, 10.0)
    }
}

impl Core for Echo {
    fn kind(&self) -> ElementKind {
        ElementKind::Button
    }

    fn visibility(&mut self) -> Option<&mut dyn Visibility> {
        Some(self)
    }

    fn text(&mut self) -> Option<&mut dyn Text> {
        Some(self)
    }

    fn measure(&self) -> Option<&dyn Measure> {
        Some(self)
    }
}

#[test]
fn measure_writes_land_in_the_next_cycle() {
    let ctx = UiContext::headless();
    let scroll = ScrollContainer::new(&ctx);
    let button = Button::new(&ctx);
    let other = Button::new(&ctx);
    scroll.set_content_view(Some(button.element())).unwrap();

    let log = SharedLog::default();
    let reaction = Reaction::TouchOnMeasure(Rc::downgrade(other.element()));
    button
        .attach_core(echo(button.element(), &log, reaction))
        .unwrap();
    assert_eq!(log.borrow().visible, vec![true]);

    assert_eq!(ctx.run_idle_tick(), 1);
    assert_eq!(ctx.scheduler().cycles(), 1);
    assert_eq!(log.borrow().measured, 1);
    assert_eq!(button.preferred_size(), Size::new(30.0, 10.0));
    // The writes were applied, their invalidations deferred.
    assert!(!button.visible());
    assert_eq!(log.borrow().visible, vec![true, false]);
    assert_eq!(other.margin(), UiMargin::new(2.0, 2.0, 2.0, 2.0));
    assert!(scroll.is_layout_dirty());
    assert!(other.is_sizing_dirty());
    assert_eq!(ctx.scheduler().state(), SchedulerState::Scheduled);

    assert_eq!(ctx.run_idle_tick(), 1);
    assert_eq!(ctx.scheduler().cycles(), 2);
    assert!(ctx.is_idle());
    assert_eq!(ctx.scheduler().state(), SchedulerState::Idle);
    for element in [scroll.element(), button.element(), other.element()] {
        assert!(!element.is_sizing_dirty());
        assert!(!element.is_layout_dirty());
    }
    ctx.shutdown();
}

#[test]
fn text_bridge_can_read_and_write_its_element() {
    let ctx = UiContext::headless();
    let button = Button::new(&ctx);
    let log = SharedLog::default();
    button
        .attach_core(echo(button.element(), &log, Reaction::HideOnText))
        .unwrap();

    button.set_label("hide");

    let log = log.borrow();
    assert_eq!(log.texts, vec![String::new(), String::from("hide")]);
    assert_eq!(log.labels_seen, log.texts);
    assert_eq!(log.saw_core, vec![true, true]);
    // The write made inside `set_text` reached the core afterwards.
    assert_eq!(log.visible, vec![true, false]);
    assert!(!button.visible());
    assert!(button.has_core());
    ctx.shutdown();
}

#[test]
fn core_attached_from_its_own_callback_wins() {
    let ctx = UiContext::headless();
    let button = Button::new(&ctx);
    let first = SharedLog::default();
    let second = SharedLog::default();
    button
        .attach_core(echo(
            button.element(),
            &first,
            Reaction::SwapOnText(second.clone()),
        ))
        .unwrap();

    button.set_label("swap");
    assert!(button.has_core());
    assert!(first.borrow().dropped);
    assert!(!second.borrow().dropped);
    assert_eq!(second.borrow().texts, vec![String::from("swap")]);

    button.set_label("after");
    assert_eq!(first.borrow().texts, vec![String::new(), String::from("swap")]);
    assert_eq!(
        second.borrow().texts,
        vec![String::from("swap"), String::from("after")]
    );
    ctx.shutdown();
}

#[test]
fn core_detached_from_its_own_callback_is_dropped() {
    let ctx = UiContext::headless();
    let button = Button::new(&ctx);
    let log = SharedLog::default();
    button
        .attach_core(echo(button.element(), &log, Reaction::DetachOnText))
        .unwrap();

    button.set_label("drop");
    assert_eq!(log.borrow().handed_back, Some(false));
    assert!(log.borrow().dropped);
    assert!(!button.has_core());

    button.set_label("later");
    assert_eq!(button.label(), "later");
    assert_eq!(log.borrow().texts.len(), 2);
    ctx.shutdown();
}
