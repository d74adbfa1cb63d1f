// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizing and arrangement for elements that hold one content view.
//!
//! A holder's preferred size is its content's preferred size grown by the
//! content's margin and the holder's own padding, rounded up to whole
//! pixels. An empty holder prefers zero size. On layout the content is
//! placed inside the padding and margin; along a scrolling axis it keeps at
//! least its preferred extent so the holder can scroll over it.

use std::rc::Rc;

use kurbo::{Point, Rect, Size};

use crate::element::{Element, ElementKind};
use crate::error::Error;
use crate::invalidation::Invalidation;
use crate::props;

pub(crate) fn content_preferred_size(holder: &Element) -> Size {
    let Some(content) = holder.content_view() else {
        return Size::ZERO;
    };
    let metrics = holder.context().metrics();
    let margin = content.margin().resolve(&metrics).size();
    let padding = holder.padding().resolve(&metrics).size();
    let size = content.preferred_size() + margin + padding;
    metrics.snap_size_up(Size::new(size.width.max(0.0), size.height.max(0.0)))
}

pub(crate) fn arrange_content(holder: &Element) -> Result<(), Error> {
    let Some(content) = holder.content_view() else {
        return Ok(());
    };
    let metrics = holder.context().metrics();
    let padding = holder.padding().resolve(&metrics);
    let margin = content.margin().resolve(&metrics);

    let outer = holder.size();
    let inset = padding.size() + margin.size();
    let available = Size::new(
        (outer.width - inset.width).max(0.0),
        (outer.height - inset.height).max(0.0),
    );
    let (horizontal, vertical) = scroll_axes(holder);
    let preferred = if horizontal || vertical {
        content.preferred_size()
    } else {
        Size::ZERO
    };
    let size = Size::new(
        if horizontal {
            available.width.max(preferred.width)
        } else {
            available.width
        },
        if vertical {
            available.height.max(preferred.height)
        } else {
            available.height
        },
    );
    let origin = Point::new(padding.x0 + margin.x0, padding.y0 + margin.y0);
    let applied = content.set_bounds(Rect::from_origin_size(origin, size))?;
    tracing::trace!(holder = ?holder.id(), content = ?content.id(), ?applied, "content arranged");
    Ok(())
}

fn scroll_axes(holder: &Element) -> (bool, bool) {
    match holder.kind() {
        ElementKind::ScrollContainer => (
            holder.read(props::HORIZONTAL_SCROLLING),
            holder.read(props::VERTICAL_SCROLLING),
        ),
        ElementKind::Window | ElementKind::Button => (false, false),
    }
}

/// Swaps the content view of `holder`.
///
/// Setting the current content again (or `None` on an empty holder) does
/// nothing. The new content is validated before the old one is unlinked.
pub(crate) fn replace_content(holder: &Element, content: Option<&Rc<Element>>) -> Result<(), Error> {
    let old = holder.content_view();
    match (&old, content) {
        (None, None) => return Ok(()),
        (Some(old), Some(new)) if Rc::ptr_eq(old, new) => return Ok(()),
        _ => {}
    }
    if let Some(new) = content {
        holder.check_insert(new)?;
    }
    let removed = old.as_deref().and_then(|old| holder.unlink_child(old));
    if let Some(new) = content {
        holder.link_child(new);
    }
    holder.invalidate(Invalidation::SIZING | Invalidation::LAYOUT);
    drop(removed);
    Ok(())
}
