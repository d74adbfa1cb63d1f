// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built-in properties.
//!
//! `VISIBLE`, `MARGIN` and `PADDING` are declared by every element kind; the
//! rest belong to one kind each (see [`ElementKind::declares`]).

use crate::element::ElementKind;
use crate::invalidation::Invalidation;
use crate::property::{Property, PropertyId};
use crate::units::UiMargin;

const VISIBLE_ID: u16 = 0;
const MARGIN_ID: u16 = 1;
const PADDING_ID: u16 = 2;
const LABEL_ID: u16 = 3;
const TITLE_ID: u16 = 4;
const HORIZONTAL_SCROLLING_ID: u16 = 5;
const VERTICAL_SCROLLING_ID: u16 = 6;

fn yes() -> bool {
    true
}

fn no() -> bool {
    false
}

fn no_margin() -> UiMargin {
    UiMargin::ZERO
}

/// Whether the element is shown. Hiding an element re-arranges its parent.
pub const VISIBLE: Property<bool> = Property::new(
    PropertyId::new(VISIBLE_ID),
    "visible",
    Invalidation::PARENT_LAYOUT,
    yes,
);

/// Space the parent keeps free around the element.
pub const MARGIN: Property<UiMargin> = Property::new(
    PropertyId::new(MARGIN_ID),
    "margin",
    Invalidation::SIZING,
    no_margin,
);

/// Space the element keeps free around its own content.
pub const PADDING: Property<UiMargin> = Property::new(
    PropertyId::new(PADDING_ID),
    "padding",
    Invalidation::SIZING.union(Invalidation::LAYOUT),
    no_margin,
);

/// Text shown on a button.
pub const LABEL: Property<String> = Property::new(
    PropertyId::new(LABEL_ID),
    "label",
    Invalidation::SIZING,
    String::new,
);

/// Title of a window.
pub const TITLE: Property<String> = Property::new(
    PropertyId::new(TITLE_ID),
    "title",
    Invalidation::SIZING,
    String::new,
);

/// Whether a scroll container scrolls horizontally.
pub const HORIZONTAL_SCROLLING: Property<bool> = Property::new(
    PropertyId::new(HORIZONTAL_SCROLLING_ID),
    "horizontal_scrolling",
    Invalidation::SIZING.union(Invalidation::LAYOUT),
    no,
);

/// Whether a scroll container scrolls vertically.
pub const VERTICAL_SCROLLING: Property<bool> = Property::new(
    PropertyId::new(VERTICAL_SCROLLING_ID),
    "vertical_scrolling",
    Invalidation::SIZING.union(Invalidation::LAYOUT),
    yes,
);

/// Built-in property ids, for exhaustive dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Known {
    Visible,
    Margin,
    Padding,
    Label,
    Title,
    HorizontalScrolling,
    VerticalScrolling,
}

impl Known {
    pub(crate) fn of(id: PropertyId) -> Option<Self> {
        Some(match id.index() {
            VISIBLE_ID => Self::Visible,
            MARGIN_ID => Self::Margin,
            PADDING_ID => Self::Padding,
            LABEL_ID => Self::Label,
            TITLE_ID => Self::Title,
            HORIZONTAL_SCROLLING_ID => Self::HorizontalScrolling,
            VERTICAL_SCROLLING_ID => Self::VerticalScrolling,
            _ => return None,
        })
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Visible => VISIBLE.name(),
            Self::Margin => MARGIN.name(),
            Self::Padding => PADDING.name(),
            Self::Label => LABEL.name(),
            Self::Title => TITLE.name(),
            Self::HorizontalScrolling => HORIZONTAL_SCROLLING.name(),
            Self::VerticalScrolling => VERTICAL_SCROLLING.name(),
        }
    }
}

const COMMON: [PropertyId; 3] = [VISIBLE.id(), MARGIN.id(), PADDING.id()];
const WINDOW_OWN: [PropertyId; 1] = [TITLE.id()];
const BUTTON_OWN: [PropertyId; 1] = [LABEL.id()];
const SCROLL_OWN: [PropertyId; 2] = [HORIZONTAL_SCROLLING.id(), VERTICAL_SCROLLING.id()];

/// Every property id declared by `kind`, in id order.
pub(crate) fn declared(kind: ElementKind) -> impl Iterator<Item = PropertyId> {
    let own: &'static [PropertyId] = match kind {
        ElementKind::Window => &WINDOW_OWN,
        ElementKind::Button => &BUTTON_OWN,
        ElementKind::ScrollContainer => &SCROLL_OWN,
    };
    COMMON.into_iter().chain(own.iter().copied())
}
