// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tandem: a portable UI element tree bound to swappable native cores.
//!
//! Application code builds a tree of [`Element`]s (windows, buttons, scroll
//! containers) and talks only to that tree. Each element may carry a native
//! [`Core`] created by the active [`UiProvider`]; the core mirrors the
//! portable state on a concrete backend. Swapping the provider retargets the
//! whole tree, which is how tests run it against a non-rendering backend.
//!
//! ## Core Concepts
//!
//! - **Elements** ([`Element`], [`Window`], [`Button`], [`ScrollContainer`]):
//!   parents own their children, children point back weakly. Structural
//!   misuse (second parent, cycles, full containers) fails with a
//!   [`MisuseError`] and changes nothing.
//! - **Properties** ([`Property`], [`props`]): typed, per-kind declared
//!   values. Writing a changed value pushes it to the core, notifies
//!   observers and invalidates sizing and/or layout as declared.
//! - **Capabilities** ([`Capabilities`]): optional core traits. A core
//!   without, say, [`Padding`] support still works; the portable value stays
//!   authoritative.
//! - **Scheduling** ([`LayoutScheduler`], [`IdleQueue`]): invalidations are
//!   coalesced and drained on the next idle tick, preferred sizes bottom-up,
//!   then arrangement top-down.
//! - **Units** ([`UiLength`], [`UiMargin`], [`UiMetrics`]): lengths in
//!   device-independent pixels or sems, resolved against the backend's
//!   metrics and snapped to whole physical pixels.
//!
//! ## Quick Start
//!
//! ```rust
//! use tandem::{Button, ScrollContainer, UiContext, UiMargin};
//!
//! let ctx = UiContext::headless();
//! let scroll = ScrollContainer::new(&ctx);
//! let button = Button::new(&ctx);
//! button.set_label("Hello");
//! button.set_margin(UiMargin::new(1.0, 2.0, 3.0, 4.0));
//!
//! scroll.set_content_view(Some(button.element())).unwrap();
//! assert!(scroll.is_sizing_dirty());
//!
//! // The host calls this whenever its event loop goes idle.
//! ctx.pump_until_idle();
//! assert!(!scroll.is_sizing_dirty());
//!
//! // Headless buttons have no core to measure them: only the margin counts.
//! assert_eq!(scroll.preferred_size(), tandem::Size::new(6.0, 4.0));
//! ```
//!
//! ## Errors and Logging
//!
//! Fallible operations return [`Error`]. Diagnostics go through `tracing`:
//! drains open a `layout_drain` span, missing capabilities are logged at
//! `debug`, retried layouts at `warn`, abandoned ones at `error`.
//!
//! ## Callbacks
//!
//! Cores may call back into their own element from any capability method,
//! for example to write a property while measuring. The core is lent out
//! for the call, and work for it raised meanwhile is applied once it
//! returns. Invalidations raised during a drain land in the next one.
//!
//! ## `std`
//!
//! The crate is not `no_std`. It logs through `tracing` and targets hosted
//! UI backends with a native event loop, so it uses `std` throughout.

#![deny(unsafe_code)]

mod capability;
mod container;
mod context;
mod element;
mod error;
mod idle;
mod invalidation;
mod property;
pub mod props;
mod provider;
mod scheduler;
mod units;
mod widgets;

pub use capability::{
    Arrange, Capabilities, Core, Hierarchy, Measure, Padding, Scrolling, Text, Visibility,
};
pub use context::{ContextOptions, UiContext};
pub use element::{Element, ElementId, ElementKind};
pub use error::{CoreError, Error, MisuseError};
pub use idle::IdleQueue;
pub use invalidation::{Channel, Invalidation};
pub use property::{Property, PropertyId, PropertyStore, PropertyValue};
pub use provider::{HeadlessProvider, UiProvider};
pub use scheduler::{LayoutScheduler, SchedulerState};
pub use units::{UiLength, UiMargin, UiMetrics};
pub use widgets::{Button, ScrollContainer, Window};

pub use kurbo::{Insets, Point, Rect, Size};
