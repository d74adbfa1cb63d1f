// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred sizing and layout.
//!
//! Invalidations only flip flags. The first invalidation of a cycle posts a
//! single drain task to the context's [`IdleQueue`](crate::IdleQueue); later
//! invalidations are coalesced into the same drain. When the drain runs it
//! takes a snapshot of the dirty flags and:
//!
//! 1. recomputes preferred sizes, deepest elements first, so a parent always
//!    sees its children's fresh sizes;
//! 2. re-arranges children, shallowest elements first, so an element is laid
//!    out only after its parent has assigned its bounds.
//!
//! Anything invalidated while the drain runs lands in the next cycle. Each
//! marked element is held by a strong reference until the drain that clears
//! its flags has finished, so dropping the last application handle to an
//! element with pending work defers its destruction to that drain.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::context::UiContext;
use crate::element::{Element, ElementId};
use crate::invalidation::{Attempts, Channel, DirtySet, Invalidation};

/// Where the scheduler is in its cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Nothing is dirty.
    #[default]
    Idle,
    /// A drain task has been posted and not started yet.
    Scheduled,
    /// A drain is running.
    Draining,
}

/// Tracks sizing/layout flags and drains them on idle.
#[derive(Default)]
pub struct LayoutScheduler {
    state: Cell<SchedulerState>,
    /// Flags for the next drain.
    pending: RefCell<DirtySet>,
    /// Flags of the drain that is running, cleared one by one.
    in_flight: RefCell<DirtySet>,
    keep_alive: RefCell<HashMap<ElementId, Rc<Element>>>,
    attempts: RefCell<Attempts>,
    cycles: Cell<u64>,
}

impl fmt::Debug for LayoutScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutScheduler")
            .field("state", &self.state.get())
            .field("kept_alive", &self.keep_alive.borrow().len())
            .field("cycles", &self.cycles.get())
            .finish_non_exhaustive()
    }
}

impl LayoutScheduler {
    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state.get()
    }

    /// Returns the number of drains that have completed.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles.get()
    }

    /// Returns a counter that changes whenever an invalidation is recorded
    /// or a drain takes its snapshot.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.pending.borrow().generation()
    }

    /// Returns `true` if the element's flag for `channel` is set.
    #[must_use]
    pub fn is_dirty(&self, id: ElementId, channel: Channel) -> bool {
        self.pending.borrow().is_dirty(id, channel) || self.in_flight.borrow().is_dirty(id, channel)
    }

    /// Applies an [`Invalidation`] mask to an element.
    pub fn invalidate(&self, element: &Rc<Element>, what: Invalidation) {
        if what.contains(Invalidation::SIZING) {
            self.invalidate_sizing(element);
        }
        if what.contains(Invalidation::LAYOUT) {
            self.invalidate_layout(element);
        }
        if what.contains(Invalidation::PARENT_LAYOUT)
            && let Some(parent) = element.parent()
        {
            self.invalidate_layout(&parent);
        }
    }

    /// Marks the element's preferred size as stale.
    ///
    /// Every ancestor has to re-arrange. Ancestors recompute their own size
    /// only while the chain passes through sizing inputs (see
    /// [`Element::is_sizing_input`]).
    pub fn invalidate_sizing(&self, element: &Rc<Element>) {
        let mut current = element.clone();
        self.mark(&current, Channel::Sizing);
        while let Some(parent) = current.parent() {
            self.invalidate_layout(&parent);
            if !parent.is_sizing_input(&current) {
                break;
            }
            self.mark(&parent, Channel::Sizing);
            current = parent;
        }
    }

    /// Marks the element (and its ancestors) as needing layout.
    pub fn invalidate_layout(&self, element: &Rc<Element>) {
        let mut current = Some(element.clone());
        while let Some(e) = current {
            self.mark(&e, Channel::Layout);
            current = e.parent();
        }
    }

    /// Marks only this element as needing layout.
    ///
    /// Used when the parent itself assigned new bounds.
    pub(crate) fn invalidate_own_layout(&self, element: &Rc<Element>) {
        self.mark(element, Channel::Layout);
    }

    fn mark(&self, element: &Rc<Element>, channel: Channel) {
        let id = element.id();
        self.pending.borrow_mut().mark(id, channel);
        let replaced = self.keep_alive.borrow_mut().insert(id, element.clone());
        drop(replaced);
        if self.state.get() == SchedulerState::Idle {
            self.schedule(element.context());
        }
    }

    fn schedule(&self, ctx: &UiContext) {
        self.state.set(SchedulerState::Scheduled);
        let task_ctx = ctx.clone();
        ctx.post_idle(move || task_ctx.scheduler().drain(&task_ctx));
    }

    /// Forgets everything about an element that is being destroyed.
    pub(crate) fn forget(&self, id: ElementId) {
        self.pending.borrow_mut().remove_key(id);
        self.in_flight.borrow_mut().remove_key(id);
        self.attempts.borrow_mut().succeed(id);
    }

    /// Drops all flags and the elements they kept alive.
    pub(crate) fn reset(&self) {
        self.pending.borrow_mut().take();
        self.in_flight.borrow_mut().take();
        let released = core::mem::take(&mut *self.keep_alive.borrow_mut());
        *self.attempts.borrow_mut() = Attempts::default();
        self.state.set(SchedulerState::Idle);
        drop(released);
    }

    fn drain(&self, ctx: &UiContext) {
        self.state.set(SchedulerState::Draining);
        let snapshot = self.pending.borrow_mut().take();
        let held = core::mem::take(&mut *self.keep_alive.borrow_mut());
        *self.in_flight.borrow_mut() = snapshot.clone();

        let cycle = self.cycles.get() + 1;
        let _span = tracing::trace_span!("layout_drain", cycle).entered();

        let by_depth = |channel: Channel| {
            let mut batch: Vec<(usize, ElementId, &Rc<Element>)> = snapshot
                .iter(channel)
                .filter_map(|id| held.get(&id).map(|e| (e.depth(), id, e)))
                .collect();
            batch.sort_by_key(|(depth, id, _)| (*depth, *id));
            batch
        };

        let mut sizing = by_depth(Channel::Sizing);
        sizing.reverse();
        tracing::trace!(count = sizing.len(), "sizing pass");
        for (_, id, element) in sizing {
            element.update_sizing();
            self.in_flight.borrow_mut().clear(id, Channel::Sizing);
        }

        let layout = by_depth(Channel::Layout);
        tracing::trace!(count = layout.len(), "layout pass");
        let max_attempts = ctx.options().max_layout_attempts;
        for (_, id, element) in layout {
            match element.update_layout() {
                Ok(()) => self.attempts.borrow_mut().succeed(id),
                Err(err) => {
                    let failures = self.attempts.borrow_mut().fail(id);
                    if failures < max_attempts {
                        tracing::warn!(element = ?id, failures, %err, "layout failed; retrying next idle tick");
                        self.mark(element, Channel::Layout);
                    } else {
                        tracing::error!(element = ?id, failures, %err, "layout keeps failing; giving up");
                        self.attempts.borrow_mut().succeed(id);
                    }
                }
            }
            self.in_flight.borrow_mut().clear(id, Channel::Layout);
        }

        self.in_flight.borrow_mut().take();
        self.cycles.set(cycle);
        self.state.set(SchedulerState::Idle);
        if !self.pending.borrow().is_empty() {
            self.schedule(ctx);
        }
        // Releasing the snapshot may destroy elements; no borrow is held here.
        drop(held);
    }
}
