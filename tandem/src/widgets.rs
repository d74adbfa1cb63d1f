// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed handles for the built-in element kinds.
//!
//! Each handle wraps an `Rc<Element>` of the matching kind and dereferences
//! to [`Element`], so the generic tree, property and geometry API is
//! available on all of them.

use core::ops::Deref;
use std::rc::Rc;

use kurbo::Rect;

use crate::container;
use crate::context::UiContext;
use crate::element::{Element, ElementKind};
use crate::error::Error;
use crate::props;

macro_rules! element_handle {
    ($name:ident, $kind:expr) => {
        impl $name {
            /// Creates a new element of this kind.
            pub fn new(context: &UiContext) -> Self {
                Self(Element::new(context, $kind))
            }

            /// Wraps `element` if it has the matching kind.
            #[must_use]
            pub fn from_element(element: Rc<Element>) -> Option<Self> {
                (element.kind() == $kind).then_some(Self(element))
            }

            /// Returns the underlying element.
            #[must_use]
            pub fn element(&self) -> &Rc<Element> {
                &self.0
            }

            /// Unwraps the underlying element.
            #[must_use]
            pub fn into_element(self) -> Rc<Element> {
                self.0
            }
        }

        impl Deref for $name {
            type Target = Element;

            fn deref(&self) -> &Element {
                &self.0
            }
        }

        impl From<$name> for Rc<Element> {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }
    };
}

/// A push button.
#[derive(Clone, Debug)]
pub struct Button(Rc<Element>);

element_handle!(Button, ElementKind::Button);

impl Button {
    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> String {
        self.0.read(props::LABEL)
    }

    /// Sets the label.
    pub fn set_label(&self, label: impl Into<String>) {
        self.0.write(props::LABEL, label.into());
    }
}

/// A scrollable viewport over one content view.
#[derive(Clone, Debug)]
pub struct ScrollContainer(Rc<Element>);

element_handle!(ScrollContainer, ElementKind::ScrollContainer);

impl ScrollContainer {
    /// Returns the content view.
    #[must_use]
    pub fn content_view(&self) -> Option<Rc<Element>> {
        self.0.content_view()
    }

    /// Replaces the content view; `None` removes it.
    ///
    /// Setting the current content again is a no-op.
    ///
    /// # Errors
    ///
    /// Fails with a [`MisuseError`](crate::MisuseError) if the new content
    /// cannot be adopted; the old content stays in place.
    pub fn set_content_view(&self, content: Option<&Rc<Element>>) -> Result<(), Error> {
        container::replace_content(&self.0, content)
    }

    /// Returns whether the container scrolls horizontally.
    #[must_use]
    pub fn horizontal_scrolling(&self) -> bool {
        self.0.read(props::HORIZONTAL_SCROLLING)
    }

    /// Enables or disables horizontal scrolling.
    pub fn set_horizontal_scrolling(&self, enabled: bool) {
        self.0.write(props::HORIZONTAL_SCROLLING, enabled);
    }

    /// Returns whether the container scrolls vertically.
    #[must_use]
    pub fn vertical_scrolling(&self) -> bool {
        self.0.read(props::VERTICAL_SCROLLING)
    }

    /// Enables or disables vertical scrolling.
    pub fn set_vertical_scrolling(&self, enabled: bool) {
        self.0.write(props::VERTICAL_SCROLLING, enabled);
    }
}

/// A top-level window.
#[derive(Clone, Debug)]
pub struct Window(Rc<Element>);

element_handle!(Window, ElementKind::Window);

impl Window {
    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> String {
        self.0.read(props::TITLE)
    }

    /// Sets the title.
    pub fn set_title(&self, title: impl Into<String>) {
        self.0.write(props::TITLE, title.into());
    }

    /// Returns the content view.
    #[must_use]
    pub fn content_view(&self) -> Option<Rc<Element>> {
        self.0.content_view()
    }

    /// Replaces the content view; `None` removes it.
    ///
    /// # Errors
    ///
    /// Fails with a [`MisuseError`](crate::MisuseError) if the new content
    /// cannot be adopted; the old content stays in place.
    pub fn set_content_view(&self, content: Option<&Rc<Element>>) -> Result<(), Error> {
        container::replace_content(&self.0, content)
    }

    /// Resizes the window to its preferred size on the next idle tick.
    ///
    /// The position is kept. If a layout drain is already queued it runs
    /// first, so the size reflects every change made before this call.
    pub fn request_auto_size(&self) {
        let element = Rc::downgrade(&self.0);
        self.0.context().post_idle(move || {
            let Some(element) = element.upgrade() else {
                return;
            };
            let bounds = Rect::from_origin_size(element.position(), element.preferred_size());
            if let Err(err) = element.set_bounds(bounds) {
                tracing::warn!(element = ?element.id(), %err, "auto-size failed");
            }
        });
    }
}
