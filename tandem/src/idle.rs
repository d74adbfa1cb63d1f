// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The "run when idle" work queue.
//!
//! Tasks are boxed closures that own whatever they need; a task keeps its
//! captures alive until it runs, and it runs exactly once. The host event
//! loop is expected to call [`IdleQueue::run_tick`] whenever it goes idle.
//! Hosts that sleep between events install a waker with
//! [`IdleQueue::set_waker`] to learn when new work arrives.

use core::cell::RefCell;
use core::fmt;
use std::collections::VecDeque;

type Task = Box<dyn FnOnce()>;
type Waker = Box<dyn Fn()>;

/// FIFO queue of deferred tasks.
#[derive(Default)]
pub struct IdleQueue {
    tasks: RefCell<VecDeque<Task>>,
    waker: RefCell<Option<Waker>>,
}

impl fmt::Debug for IdleQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleQueue")
            .field("pending", &self.len())
            .field("has_waker", &self.waker.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl IdleQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Returns `true` if no task is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Installs the callback fired when the queue goes from empty to
    /// non-empty.
    pub fn set_waker(&self, waker: impl Fn() + 'static) {
        *self.waker.borrow_mut() = Some(Box::new(waker));
    }

    /// Removes the waker.
    pub fn clear_waker(&self) {
        self.waker.borrow_mut().take();
    }

    /// Appends a task.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        let was_empty = {
            let mut tasks = self.tasks.borrow_mut();
            let was_empty = tasks.is_empty();
            tasks.push_back(Box::new(task));
            was_empty
        };
        if was_empty && let Some(waker) = &*self.waker.borrow() {
            waker();
        }
    }

    /// Runs the tasks that were pending when the tick started.
    ///
    /// Tasks posted while the tick runs wait for the next tick. Returns the
    /// number of tasks that ran.
    pub fn run_tick(&self) -> usize {
        let count = self.len();
        for _ in 0..count {
            // The borrow must end before the task runs: tasks post more work.
            let task = self.tasks.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => return count,
            }
        }
        count
    }

    /// Drops every pending task without running it.
    pub fn clear(&self) {
        let dropped = core::mem::take(&mut *self.tasks.borrow_mut());
        drop(dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn tasks_run_in_fifo_order() {
        let queue = IdleQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            queue.post(move || log.borrow_mut().push(i));
        }
        assert_eq!(queue.run_tick(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn tasks_posted_during_a_tick_wait_for_the_next() {
        let queue = Rc::new(IdleQueue::new());
        let ran = Rc::new(Cell::new(0));
        {
            let queue2 = queue.clone();
            let ran = ran.clone();
            queue.post(move || {
                ran.set(ran.get() + 1);
                let ran = ran.clone();
                queue2.post(move || ran.set(ran.get() + 10));
            });
        }
        assert_eq!(queue.run_tick(), 1);
        assert_eq!(ran.get(), 1);
        assert_eq!(queue.len(), 1);
        queue.run_tick();
        assert_eq!(ran.get(), 11);
    }

    #[test]
    fn waker_fires_on_empty_to_non_empty() {
        let queue = IdleQueue::new();
        let wakes = Rc::new(Cell::new(0));
        let w = wakes.clone();
        queue.set_waker(move || w.set(w.get() + 1));
        queue.post(|| {});
        queue.post(|| {});
        assert_eq!(wakes.get(), 1);
        queue.run_tick();
        queue.post(|| {});
        assert_eq!(wakes.get(), 2);
    }

    #[test]
    fn clear_drops_captures_without_running() {
        let queue = IdleQueue::new();
        let token = Rc::new(());
        let held = token.clone();
        queue.post(move || drop(held));
        assert_eq!(Rc::strong_count(&token), 2);
        queue.clear();
        assert_eq!(Rc::strong_count(&token), 1);
        assert_eq!(queue.run_tick(), 0);
    }
}
