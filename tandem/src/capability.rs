// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between portable elements and native cores.
//!
//! A backend implements [`Core`] once per native widget. Everything beyond
//! the element kind is optional: a core exposes each capability it supports
//! through the matching accessor and leaves the others at their `None`
//! default. When an element changes a property whose capability is missing,
//! the portable value simply stays authoritative.
//!
//! Capabilities are small and independent of each other; a backend can grow
//! support one trait at a time:
//!
//! | capability     | drives                                          |
//! |----------------|-------------------------------------------------|
//! | [`Visibility`] | `VISIBLE`                                       |
//! | [`Padding`]    | `PADDING`                                       |
//! | [`Text`]       | `LABEL` on buttons, `TITLE` on windows          |
//! | [`Scrolling`]  | `HORIZONTAL_SCROLLING`, `VERTICAL_SCROLLING`    |
//! | [`Hierarchy`]  | child insertion and removal                     |
//! | [`Measure`]    | preferred size of leaf elements                 |
//! | [`Arrange`]    | final position and size                         |

use core::fmt;

use kurbo::{Insets, Rect, Size};

use crate::element::{ElementId, ElementKind};
use crate::error::CoreError;

bitflags::bitflags! {
    /// The set of capabilities a core implements.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// See [`Visibility`].
        const VISIBILITY = 1 << 0;
        /// See [`Padding`].
        const PADDING = 1 << 1;
        /// See [`Text`].
        const TEXT = 1 << 2;
        /// See [`Scrolling`].
        const SCROLLING = 1 << 3;
        /// See [`Hierarchy`].
        const HIERARCHY = 1 << 4;
        /// See [`Measure`].
        const MEASURE = 1 << 5;
        /// See [`Arrange`].
        const ARRANGE = 1 << 6;
    }
}

/// Shows or hides the native widget.
pub trait Visibility {
    /// Applies the portable visibility.
    fn set_visible(&mut self, visible: bool);
}

/// Applies inner spacing natively.
pub trait Padding {
    /// Applies the resolved padding, in DIPs.
    fn set_padding(&mut self, padding: Insets);
}

/// Displays a text: a button label or a window title.
pub trait Text {
    /// Applies the portable text.
    fn set_text(&mut self, text: &str);
}

/// Enables scrolling along each axis.
pub trait Scrolling {
    /// Enables or disables horizontal scrolling.
    fn set_horizontal_scrolling(&mut self, enabled: bool);
    /// Enables or disables vertical scrolling.
    fn set_vertical_scrolling(&mut self, enabled: bool);
}

/// Mirrors structural changes into the native widget hierarchy.
pub trait Hierarchy {
    /// A child was inserted at `index` in the element's child list.
    fn child_inserted(&mut self, index: usize, child: ElementId);
    /// A child was removed from the element's child list.
    fn child_removed(&mut self, child: ElementId);
}

/// Reports how big the native widget wants to be.
pub trait Measure {
    /// Returns the preferred size in DIPs, including any native chrome.
    ///
    /// Property writes made from here are picked up by the next layout
    /// cycle.
    fn preferred_size(&self) -> Size;
}

/// Positions the native widget.
pub trait Arrange {
    /// Moves and resizes the widget, in DIPs relative to the parent.
    ///
    /// The core may adjust the rectangle (for example to its own pixel grid)
    /// and returns the bounds it actually applied.
    fn set_bounds(&mut self, bounds: Rect) -> Result<Rect, CoreError>;
}

/// A native counterpart of one element.
///
/// See the [module documentation](self) for the capability model.
pub trait Core: fmt::Debug {
    /// The element kind this core was built for.
    fn kind(&self) -> ElementKind;

    /// Returns the [`Visibility`] capability, if implemented.
    fn visibility(&mut self) -> Option<&mut dyn Visibility> {
        None
    }

    /// Returns the [`Padding`] capability, if implemented.
    fn padding(&mut self) -> Option<&mut dyn Padding> {
        None
    }

    /// Returns the [`Text`] capability, if implemented.
    fn text(&mut self) -> Option<&mut dyn Text> {
        None
    }

    /// Returns the [`Scrolling`] capability, if implemented.
    fn scrolling(&mut self) -> Option<&mut dyn Scrolling> {
        None
    }

    /// Returns the [`Hierarchy`] capability, if implemented.
    fn hierarchy(&mut self) -> Option<&mut dyn Hierarchy> {
        None
    }

    /// Returns the [`Measure`] capability, if implemented.
    fn measure(&self) -> Option<&dyn Measure> {
        None
    }

    /// Returns the [`Arrange`] capability, if implemented.
    fn arrange(&mut self) -> Option<&mut dyn Arrange> {
        None
    }

    /// Probes every accessor and returns the implemented capabilities.
    fn capabilities(&mut self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::VISIBILITY, self.visibility().is_some());
        caps.set(Capabilities::PADDING, self.padding().is_some());
        caps.set(Capabilities::TEXT, self.text().is_some());
        caps.set(Capabilities::SCROLLING, self.scrolling().is_some());
        caps.set(Capabilities::HIERARCHY, self.hierarchy().is_some());
        caps.set(Capabilities::MEASURE, self.measure().is_some());
        caps.set(Capabilities::ARRANGE, self.arrange().is_some());
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Bare;

    impl Core for Bare {
        fn kind(&self) -> ElementKind {
            ElementKind::Button
        }
    }

    #[derive(Debug, Default)]
    struct Visible(Option<bool>);

    impl Visibility for Visible {
        fn set_visible(&mut self, visible: bool) {
            self.0 = Some(visible);
        }
    }

    impl Core for Visible {
        fn kind(&self) -> ElementKind {
            ElementKind::Window
        }

        fn visibility(&mut self) -> Option<&mut dyn Visibility> {
            Some(self)
        }
    }

    #[test]
    fn bare_core_has_no_capabilities() {
        assert!(Bare.capabilities().is_empty());
    }

    #[test]
    fn probing_finds_implemented_capabilities() {
        let mut core = Visible::default();
        assert_eq!(core.capabilities(), Capabilities::VISIBILITY);
        if let Some(v) = core.visibility() {
            v.set_visible(false);
        }
        assert_eq!(core.0, Some(false));
    }
}
