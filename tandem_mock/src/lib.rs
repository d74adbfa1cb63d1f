// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tandem Mock: a deterministic backend for testing element trees.
//!
//! [`MockProvider`] creates cores that implement every capability without
//! rendering anything. Each core writes what it was told into a shared
//! [`CoreState`] record which tests read back through
//! [`MockProvider::state`]. The backend uses fixed metrics ([`MOCK_METRICS`]:
//! three physical pixels per DIP, a sem of 20 DIPs) and measures button
//! labels with a fixed per-character advance, so sizes are reproducible on
//! every machine.
//!
//! The provider can also be told to misbehave:
//!
//! - [`MockProvider::without_kind`] makes it refuse an element kind;
//! - [`MockProvider::omit_capabilities`] hides capabilities from new cores;
//! - [`MockProvider::fail_arrange`] makes the next `Arrange` calls fail.
//!
//! ```rust
//! use std::rc::Rc;
//! use tandem::{Button, UiContext};
//! use tandem_mock::MockProvider;
//!
//! let mock = Rc::new(MockProvider::new());
//! let ctx = UiContext::new(mock.clone());
//! let button = Button::new(&ctx);
//! button.set_label("Ok");
//! button.realize().unwrap();
//!
//! let state = mock.state(button.id()).unwrap();
//! assert_eq!(state.text.as_deref(), Some("Ok"));
//! ```

#![deny(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hashbrown::HashMap;
use kurbo::{Insets, Rect, Size};
use tandem::{
    Arrange, Capabilities, Core, CoreError, Element, ElementId, ElementKind, Error, Hierarchy,
    Measure, Padding, Scrolling, Text, UiMetrics, UiProvider, Visibility,
};

/// Metrics of the mock backend.
pub const MOCK_METRICS: UiMetrics = UiMetrics::new(3.0, 20.0);

/// Horizontal advance of one label character, in DIPs.
pub const CHAR_WIDTH: f64 = 9.75;

/// Height of a line of label text, in DIPs.
pub const LINE_HEIGHT: f64 = 19.6;

/// Space the button frame adds around its label, in DIPs.
pub const BUTTON_BORDER: Size = Size::new(10.0, 8.0);

/// How often each capability was invoked on a core.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// [`Visibility::set_visible`] calls.
    pub visibility: usize,
    /// [`Padding::set_padding`] calls.
    pub padding: usize,
    /// [`Text::set_text`] calls.
    pub text: usize,
    /// [`Scrolling`] calls, both axes.
    pub scrolling: usize,
    /// [`Hierarchy`] calls, insertions and removals.
    pub hierarchy: usize,
    /// [`Measure::preferred_size`] calls.
    pub measure: usize,
    /// [`Arrange::set_bounds`] calls, including failed ones.
    pub arrange: usize,
}

/// Everything a mock core has been told.
///
/// Fields stay `None` until the element pushes a value.
#[derive(Clone, Debug, PartialEq)]
pub struct CoreState {
    /// Kind the core was built for.
    pub kind: ElementKind,
    /// Last visibility.
    pub visible: Option<bool>,
    /// Last padding, resolved to DIPs.
    pub padding: Option<Insets>,
    /// Last label or title.
    pub text: Option<String>,
    /// Last horizontal scrolling switch.
    pub horizontal_scrolling: Option<bool>,
    /// Last vertical scrolling switch.
    pub vertical_scrolling: Option<bool>,
    /// Native children, in order.
    pub children: Vec<ElementId>,
    /// Last bounds accepted by `Arrange`.
    pub bounds: Option<Rect>,
    /// Capability call counters.
    pub calls: CallCounts,
    /// Set once the core has been dropped.
    pub destroyed: bool,
}

impl CoreState {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            visible: None,
            padding: None,
            text: None,
            horizontal_scrolling: None,
            vertical_scrolling: None,
            children: Vec::new(),
            bounds: None,
            calls: CallCounts::default(),
            destroyed: false,
        }
    }
}

type SharedState = Rc<RefCell<CoreState>>;

/// A deterministic [`UiProvider`].
#[derive(Debug, Default)]
pub struct MockProvider {
    cores: RefCell<HashMap<ElementId, SharedState>>,
    missing_kinds: RefCell<Vec<ElementKind>>,
    omitted: Cell<Capabilities>,
    arrange_failures: Rc<Cell<u32>>,
    created: Cell<usize>,
}

impl MockProvider {
    /// Creates a provider that serves every kind with every capability.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses to create cores for `kind` from now on.
    #[must_use]
    pub fn without_kind(self, kind: ElementKind) -> Self {
        self.missing_kinds.borrow_mut().push(kind);
        self
    }

    /// Hides `capabilities` from cores created from now on.
    pub fn omit_capabilities(&self, capabilities: Capabilities) {
        self.omitted.set(self.omitted.get() | capabilities);
    }

    /// Makes the next `count` `Arrange` calls fail, across all cores.
    pub fn fail_arrange(&self, count: u32) {
        self.arrange_failures.set(count);
    }

    /// Number of cores created so far.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created.get()
    }

    /// Snapshot of the most recent core created for `id`.
    #[must_use]
    pub fn state(&self, id: ElementId) -> Option<CoreState> {
        self.cores.borrow().get(&id).map(|s| s.borrow().clone())
    }
}

impl UiProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn metrics(&self) -> UiMetrics {
        MOCK_METRICS
    }

    fn create_core(&self, element: &Element) -> Result<Box<dyn Core>, Error> {
        let kind = element.kind();
        if self.missing_kinds.borrow().contains(&kind) {
            return Err(Error::no_backend(kind, self.name()));
        }
        let state = Rc::new(RefCell::new(CoreState::new(kind)));
        self.cores.borrow_mut().insert(element.id(), state.clone());
        self.created.set(self.created.get() + 1);
        tracing::trace!(element = ?element.id(), ?kind, "mock core created");
        Ok(Box::new(MockCore {
            kind,
            state,
            omitted: self.omitted.get(),
            arrange_failures: self.arrange_failures.clone(),
        }))
    }
}

/// The core handed out by [`MockProvider`].
#[derive(Debug)]
pub struct MockCore {
    kind: ElementKind,
    state: SharedState,
    omitted: Capabilities,
    arrange_failures: Rc<Cell<u32>>,
}

impl MockCore {
    fn offers(&self, capability: Capabilities) -> bool {
        !self.omitted.contains(capability)
    }

    fn label_size(&self) -> Size {
        let state = self.state.borrow();
        let chars = state.text.as_deref().map_or(0, |t| t.chars().count());
        let text = MOCK_METRICS.snap_size_up(Size::new(chars as f64 * CHAR_WIDTH, LINE_HEIGHT));
        let padding = state.padding.unwrap_or(Insets::ZERO).size();
        MOCK_METRICS.snap_size_up(text + BUTTON_BORDER + padding)
    }
}

impl Drop for MockCore {
    fn drop(&mut self) {
        self.state.borrow_mut().destroyed = true;
    }
}

impl Core for MockCore {
    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn visibility(&mut self) -> Option<&mut dyn Visibility> {
        if self.offers(Capabilities::VISIBILITY) {
            Some(self)
        } else {
            None
        }
    }

    fn padding(&mut self) -> Option<&mut dyn Padding> {
        if self.offers(Capabilities::PADDING) {
            Some(self)
        } else {
            None
        }
    }

    fn text(&mut self) -> Option<&mut dyn Text> {
        let has_text = matches!(self.kind, ElementKind::Button | ElementKind::Window);
        if has_text && self.offers(Capabilities::TEXT) {
            Some(self)
        } else {
            None
        }
    }

    fn scrolling(&mut self) -> Option<&mut dyn Scrolling> {
        if self.kind == ElementKind::ScrollContainer && self.offers(Capabilities::SCROLLING) {
            Some(self)
        } else {
            None
        }
    }

    fn hierarchy(&mut self) -> Option<&mut dyn Hierarchy> {
        if self.kind.holds_content() && self.offers(Capabilities::HIERARCHY) {
            Some(self)
        } else {
            None
        }
    }

    fn measure(&self) -> Option<&dyn Measure> {
        if self.kind == ElementKind::Button && self.offers(Capabilities::MEASURE) {
            Some(self)
        } else {
            None
        }
    }

    fn arrange(&mut self) -> Option<&mut dyn Arrange> {
        if self.offers(Capabilities::ARRANGE) {
            Some(self)
        } else {
            None
        }
    }
}

impl Visibility for MockCore {
    fn set_visible(&mut self, visible: bool) {
        let mut state = self.state.borrow_mut();
        state.visible = Some(visible);
        state.calls.visibility += 1;
    }
}

impl Padding for MockCore {
    fn set_padding(&mut self, padding: Insets) {
        let mut state = self.state.borrow_mut();
        state.padding = Some(padding);
        state.calls.padding += 1;
    }
}

impl Text for MockCore {
    fn set_text(&mut self, text: &str) {
        let mut state = self.state.borrow_mut();
        state.text = Some(text.to_owned());
        state.calls.text += 1;
    }
}

impl Scrolling for MockCore {
    fn set_horizontal_scrolling(&mut self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.horizontal_scrolling = Some(enabled);
        state.calls.scrolling += 1;
    }

    fn set_vertical_scrolling(&mut self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.vertical_scrolling = Some(enabled);
        state.calls.scrolling += 1;
    }
}

impl Hierarchy for MockCore {
    fn child_inserted(&mut self, index: usize, child: ElementId) {
        let mut state = self.state.borrow_mut();
        let index = index.min(state.children.len());
        state.children.insert(index, child);
        state.calls.hierarchy += 1;
    }

    fn child_removed(&mut self, child: ElementId) {
        let mut state = self.state.borrow_mut();
        state.children.retain(|c| *c != child);
        state.calls.hierarchy += 1;
    }
}

impl Measure for MockCore {
    fn preferred_size(&self) -> Size {
        let size = self.label_size();
        self.state.borrow_mut().calls.measure += 1;
        size
    }
}

impl Arrange for MockCore {
    fn set_bounds(&mut self, bounds: Rect) -> Result<Rect, CoreError> {
        self.state.borrow_mut().calls.arrange += 1;
        let failures = self.arrange_failures.get();
        if failures > 0 {
            self.arrange_failures.set(failures - 1);
            return Err(CoreError::new("set_bounds", "injected failure"));
        }
        let bounds = MOCK_METRICS.snap_rect(bounds);
        self.state.borrow_mut().bounds = Some(bounds);
        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem::{Button, ScrollContainer, UiContext};

    fn setup() -> (Rc<MockProvider>, UiContext) {
        let mock = Rc::new(MockProvider::new());
        let ctx = UiContext::new(mock.clone());
        (mock, ctx)
    }

    #[test]
    fn labels_measure_on_the_pixel_grid() {
        let (mock, ctx) = setup();
        let button = Button::new(&ctx);
        button.set_label("abcd");
        button.realize().unwrap();
        let size = button.calc_preferred_size();
        // 4 * 9.75 = 39 wide, 19.6 rounds up to 59 / 3 px.
        assert_eq!(size.width, 49.0);
        assert!((size.height - (59.0 / 3.0 + 8.0)).abs() < 1e-9);
        assert_eq!(mock.state(button.id()).unwrap().calls.measure, 1);
        ctx.shutdown();
    }

    #[test]
    fn omitted_capabilities_are_not_offered() {
        let (mock, ctx) = setup();
        mock.omit_capabilities(Capabilities::PADDING | Capabilities::MEASURE);
        let button = Button::new(&ctx);
        button.realize().unwrap();
        let state = mock.state(button.id()).unwrap();
        assert_eq!(state.padding, None);
        assert_eq!(state.visible, Some(true));
        assert_eq!(button.calc_preferred_size(), Size::ZERO);
        ctx.shutdown();
    }

    #[test]
    fn missing_kinds_are_refused() {
        let mock = Rc::new(MockProvider::new().without_kind(ElementKind::ScrollContainer));
        let ctx = UiContext::new(mock.clone());
        let scroll = ScrollContainer::new(&ctx);
        assert!(matches!(
            scroll.realize(),
            Err(Error::NoBackendForType {
                kind: ElementKind::ScrollContainer,
                ..
            })
        ));
        assert_eq!(mock.created(), 0);
    }

    #[test]
    fn injected_arrange_failures_run_out() {
        let (mock, ctx) = setup();
        let button = Button::new(&ctx);
        button.realize().unwrap();
        mock.fail_arrange(1);
        assert!(button.set_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)).is_err());
        let applied = button.set_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(applied, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(mock.state(button.id()).unwrap().calls.arrange, 2);
        ctx.shutdown();
    }
}
