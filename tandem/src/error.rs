// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Three kinds of trouble can happen while driving an element tree:
//!
//! - [`MisuseError`]: the caller asked for something the tree cannot do
//!   (an incompatible core, an undeclared property, a structural change that
//!   would break the parent/child invariant). Only the offending call fails.
//! - [`Error::NoBackendForType`]: the active [`UiProvider`](crate::UiProvider)
//!   has no core for an element kind. The element stays core-less.
//! - [`CoreError`]: a native call inside a core failed. The scheduler retries
//!   the affected recomputation on the next idle tick.
//!
//! A core that lacks a capability is *not* an error; see
//! [`Capabilities`](crate::Capabilities).

use thiserror::Error;

use crate::element::{ElementId, ElementKind};

/// The error type returned by fallible tree operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller misused the element API.
    #[error(transparent)]
    Misuse(#[from] MisuseError),

    /// The active provider cannot create a core for this element kind.
    #[error("backend `{backend}` has no core for {kind:?} elements")]
    NoBackendForType {
        /// The element kind that was requested.
        kind: ElementKind,
        /// Name of the provider that was asked.
        backend: String,
    },

    /// A native call inside a core failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl Error {
    /// Convenience constructor for [`Error::NoBackendForType`].
    pub fn no_backend(kind: ElementKind, backend: impl Into<String>) -> Self {
        Self::NoBackendForType {
            kind,
            backend: backend.into(),
        }
    }

    /// Returns `true` if this is a [`MisuseError`].
    #[must_use]
    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::Misuse(_))
    }
}

/// Ways of misusing the element API.
///
/// Each of these is reported synchronously to the caller and leaves the tree
/// exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MisuseError {
    /// A core built for one element kind was attached to another.
    #[error("cannot attach a {found:?} core to a {expected:?} element")]
    IncompatibleCore {
        /// Kind of the element.
        expected: ElementKind,
        /// Kind the core was built for.
        found: ElementKind,
    },

    /// The property is not declared for this element kind.
    #[error("{kind:?} elements do not declare the `{property}` property")]
    UndeclaredProperty {
        /// Kind of the element.
        kind: ElementKind,
        /// Name of the property.
        property: &'static str,
    },

    /// The child is already attached to a parent.
    #[error("element {child:?} already has a parent")]
    AlreadyHasParent {
        /// The child that was being added.
        child: ElementId,
    },

    /// The element is not a child of the parent it was removed from.
    #[error("element {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The parent.
        parent: ElementId,
        /// The supposed child.
        child: ElementId,
    },

    /// Adding the child would make an element its own ancestor.
    #[error("adding {child:?} to {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// The parent.
        parent: ElementId,
        /// The child.
        child: ElementId,
    },

    /// The element kind does not accept any more children.
    #[error("{kind:?} elements accept at most {limit} children")]
    ChildLimit {
        /// Kind of the parent element.
        kind: ElementKind,
        /// Maximum number of children.
        limit: usize,
    },

    /// The two elements belong to different [`UiContext`](crate::UiContext)s.
    #[error("element {child:?} belongs to a different UI context")]
    ForeignContext {
        /// The element from the other context.
        child: ElementId,
    },
}

/// A native backend call failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("native call `{operation}` failed: {message}")]
pub struct CoreError {
    /// The operation that failed, e.g. `set_bounds`.
    pub operation: &'static str,
    /// Backend-specific description.
    pub message: String,
}

impl CoreError {
    /// Creates a new core error.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}
