// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invalidation flags and the per-cycle dirty set.

use hashbrown::{HashMap, HashSet};

use crate::element::ElementId;

bitflags::bitflags! {
    /// What has to be recomputed after a change.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Invalidation: u8 {
        /// The element's preferred size may have changed.
        const SIZING = 0b0000_0001;
        /// The element must re-arrange its children.
        const LAYOUT = 0b0000_0010;
        /// The element's parent must re-arrange its children.
        const PARENT_LAYOUT = 0b0000_0100;
    }
}

/// The two per-element dirty bits tracked by the scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Preferred size must be recomputed.
    Sizing,
    /// Children must be re-arranged.
    Layout,
}

/// Dirty element ids per channel, with a generation counter.
///
/// The generation increments on every mutation, which lets tests and
/// debugging tools check whether anything was invalidated between two
/// observations.
#[derive(Clone, Debug, Default)]
pub(crate) struct DirtySet {
    sizing: HashSet<ElementId>,
    layout: HashSet<ElementId>,
    generation: u64,
}

impl DirtySet {
    fn channel(&self, channel: Channel) -> &HashSet<ElementId> {
        match channel {
            Channel::Sizing => &self.sizing,
            Channel::Layout => &self.layout,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut HashSet<ElementId> {
        match channel {
            Channel::Sizing => &mut self.sizing,
            Channel::Layout => &mut self.layout,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks a key dirty. Returns `true` if it was newly inserted.
    pub(crate) fn mark(&mut self, key: ElementId, channel: Channel) -> bool {
        self.generation = self.generation.wrapping_add(1);
        self.channel_mut(channel).insert(key)
    }

    pub(crate) fn is_dirty(&self, key: ElementId, channel: Channel) -> bool {
        self.channel(channel).contains(&key)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sizing.is_empty() && self.layout.is_empty()
    }

    pub(crate) fn clear(&mut self, key: ElementId, channel: Channel) -> bool {
        let removed = self.channel_mut(channel).remove(&key);
        if removed {
            self.generation = self.generation.wrapping_add(1);
        }
        removed
    }

    pub(crate) fn remove_key(&mut self, key: ElementId) {
        let removed = self.sizing.remove(&key) | self.layout.remove(&key);
        if removed {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Moves all dirty keys out, leaving this set empty.
    pub(crate) fn take(&mut self) -> Self {
        let generation = self.generation.wrapping_add(1);
        self.generation = generation;
        Self {
            sizing: core::mem::take(&mut self.sizing),
            layout: core::mem::take(&mut self.layout),
            generation,
        }
    }

    pub(crate) fn iter(&self, channel: Channel) -> impl Iterator<Item = ElementId> + '_ {
        self.channel(channel).iter().copied()
    }
}

/// Counts consecutive failed recomputations per element.
#[derive(Debug, Default)]
pub(crate) struct Attempts {
    failures: HashMap<ElementId, u32>,
}

impl Attempts {
    /// Records a failure and returns the number of consecutive failures.
    pub(crate) fn fail(&mut self, key: ElementId) -> u32 {
        let count = self.failures.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    pub(crate) fn succeed(&mut self, key: ElementId) {
        self.failures.remove(&key);
    }
}
