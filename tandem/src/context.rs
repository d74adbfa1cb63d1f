// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-session UI context.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use crate::element::ElementId;
use crate::idle::IdleQueue;
use crate::provider::{HeadlessProvider, UiProvider};
use crate::scheduler::LayoutScheduler;
use crate::units::UiMetrics;

/// Tunables for a [`UiContext`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContextOptions {
    /// How many consecutive idle ticks a failing layout step is retried
    /// before its flag is cleared anyway.
    pub max_layout_attempts: u32,
    /// Upper bound on the ticks run by [`UiContext::pump_until_idle`].
    pub max_idle_ticks: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            max_layout_attempts: 3,
            max_idle_ticks: 1024,
        }
    }
}

impl ContextOptions {
    /// Sets [`max_layout_attempts`](Self::max_layout_attempts).
    #[must_use]
    pub fn with_max_layout_attempts(mut self, attempts: u32) -> Self {
        self.max_layout_attempts = attempts.max(1);
        self
    }

    /// Sets [`max_idle_ticks`](Self::max_idle_ticks).
    #[must_use]
    pub fn with_max_idle_ticks(mut self, ticks: usize) -> Self {
        self.max_idle_ticks = ticks;
        self
    }
}

struct Shared {
    provider: RefCell<Rc<dyn UiProvider>>,
    idle: IdleQueue,
    scheduler: LayoutScheduler,
    next_id: Cell<u64>,
    options: ContextOptions,
}

/// Everything an element tree shares: the active backend, the idle queue
/// and the layout scheduler.
///
/// Construct one context per UI session and pass it to every element. The
/// handle is a cheap reference-counted clone. Call [`shutdown`](Self::shutdown)
/// when the session ends so that pending work (which keeps elements alive)
/// is released.
#[derive(Clone)]
pub struct UiContext {
    shared: Rc<Shared>,
}

impl fmt::Debug for UiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiContext")
            .field("provider", &self.provider().name())
            .field("idle", &self.shared.idle)
            .field("scheduler", &self.shared.scheduler)
            .field("options", &self.shared.options)
            .finish_non_exhaustive()
    }
}

impl UiContext {
    /// Creates a context for the given backend with default options.
    pub fn new(provider: Rc<dyn UiProvider>) -> Self {
        Self::with_options(provider, ContextOptions::default())
    }

    /// Creates a context for the given backend.
    pub fn with_options(provider: Rc<dyn UiProvider>, options: ContextOptions) -> Self {
        tracing::debug!(backend = provider.name(), ?options, "creating UI context");
        Self {
            shared: Rc::new(Shared {
                provider: RefCell::new(provider),
                idle: IdleQueue::new(),
                scheduler: LayoutScheduler::default(),
                next_id: Cell::new(1),
                options,
            }),
        }
    }

    /// Creates a context backed by [`HeadlessProvider`].
    #[must_use]
    pub fn headless() -> Self {
        Self::new(Rc::new(HeadlessProvider))
    }

    /// Returns the active provider.
    #[must_use]
    pub fn provider(&self) -> Rc<dyn UiProvider> {
        self.shared.provider.borrow().clone()
    }

    /// Replaces the active provider.
    ///
    /// Existing cores are kept; call [`Element::rebuild_cores`](crate::Element::rebuild_cores)
    /// on the roots to move them to the new backend.
    pub fn set_provider(&self, provider: Rc<dyn UiProvider>) {
        tracing::debug!(backend = provider.name(), "switching UI provider");
        let old = self.shared.provider.replace(provider);
        drop(old);
    }

    /// Metrics of the active provider.
    #[must_use]
    pub fn metrics(&self) -> UiMetrics {
        self.shared.provider.borrow().metrics()
    }

    /// Returns the options this context was built with.
    #[must_use]
    pub fn options(&self) -> ContextOptions {
        self.shared.options
    }

    /// Returns the idle queue.
    #[must_use]
    pub fn idle_queue(&self) -> &IdleQueue {
        &self.shared.idle
    }

    /// Returns the layout scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &LayoutScheduler {
        &self.shared.scheduler
    }

    /// Posts a task to the idle queue.
    pub fn post_idle(&self, task: impl FnOnce() + 'static) {
        self.shared.idle.post(task);
    }

    /// Installs the host callback fired when idle work becomes available.
    pub fn set_idle_waker(&self, waker: impl Fn() + 'static) {
        self.shared.idle.set_waker(waker);
    }

    /// Runs one idle tick. Returns the number of tasks that ran.
    pub fn run_idle_tick(&self) -> usize {
        self.shared.idle.run_tick()
    }

    /// Runs idle ticks until the queue is empty.
    ///
    /// Returns the number of ticks. Stops after
    /// [`ContextOptions::max_idle_ticks`] and logs a warning if work keeps
    /// arriving.
    pub fn pump_until_idle(&self) -> usize {
        let mut ticks = 0;
        while !self.shared.idle.is_empty() {
            if ticks == self.shared.options.max_idle_ticks {
                tracing::warn!(ticks, "idle queue did not settle; giving up");
                break;
            }
            self.shared.idle.run_tick();
            ticks += 1;
        }
        ticks
    }

    /// Returns `true` if no idle work is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.shared.idle.is_empty()
    }

    /// Drops all pending idle work and the references it held.
    ///
    /// Elements that were only kept alive by pending work are destroyed.
    pub fn shutdown(&self) {
        tracing::debug!("shutting down UI context");
        self.shared.idle.clear();
        self.shared.idle.clear_waker();
        self.shared.scheduler.reset();
    }

    /// Returns `true` if both handles refer to the same context.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    pub(crate) fn next_element_id(&self) -> ElementId {
        let raw = self.shared.next_id.get();
        self.shared.next_id.set(raw + 1);
        ElementId::from_raw(raw)
    }
}
