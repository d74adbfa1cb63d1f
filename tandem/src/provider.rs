// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core factories.

use core::fmt;

use crate::capability::Core;
use crate::element::Element;
use crate::error::Error;
use crate::units::UiMetrics;

/// Creates native cores for one backend.
///
/// A [`UiContext`](crate::UiContext) holds exactly one provider at a time.
/// Swapping it (see [`UiContext::set_provider`](crate::UiContext::set_provider))
/// and calling [`Element::rebuild_cores`] retargets a whole tree to another
/// backend without touching portable code; this is how tests run the tree
/// against a non-rendering backend.
pub trait UiProvider: fmt::Debug {
    /// A short name for diagnostics, e.g. `"win32"` or `"mock"`.
    fn name(&self) -> &str;

    /// Pixel ratio and sem size of this backend.
    fn metrics(&self) -> UiMetrics {
        UiMetrics::default()
    }

    /// Creates the core for `element`.
    ///
    /// The element's properties are pushed to the new core right after it is
    /// attached, so implementations do not need to read them here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoBackendForType`] if this backend has no core for
    /// the element's kind.
    fn create_core(&self, element: &Element) -> Result<Box<dyn Core>, Error>;
}

/// A provider without any cores.
///
/// Every request fails with [`Error::NoBackendForType`]. Contexts start with
/// this provider when built with [`UiContext::headless`](crate::UiContext::headless),
/// which is enough for trees that only need portable state.
#[derive(Copy, Clone, Debug, Default)]
pub struct HeadlessProvider;

impl UiProvider for HeadlessProvider {
    fn name(&self) -> &str {
        "headless"
    }

    fn create_core(&self, element: &Element) -> Result<Box<dyn Core>, Error> {
        Err(Error::no_backend(element.kind(), self.name()))
    }
}
