// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed property keys and per-element sparse storage.
//!
//! A [`Property<T>`] is a small `Copy` key that carries everything the tree
//! needs to know about a property: its id, a name for diagnostics, how to
//! build the default value, and which invalidation flags a change sets.
//! Values themselves live type-erased in a [`PropertyStore`] owned by each
//! element; only values that differ from the default are stored.

use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use smallvec::SmallVec;

use crate::invalidation::Invalidation;

/// Most elements set only a handful of properties.
const INLINE_CAPACITY: usize = 8;

/// A runtime property identifier.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u16);

impl PropertyId {
    /// Creates a property id from its index.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the index of this id.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyId").field(&self.0).finish()
    }
}

/// A typed property key.
///
/// The phantom type ties the key to its value type, so reading or writing a
/// property with the wrong type does not compile.
pub struct Property<T> {
    id: PropertyId,
    name: &'static str,
    invalidates: Invalidation,
    default: fn() -> T,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    /// Creates a new property key.
    ///
    /// `invalidates` lists the flags set on the owning element whenever the
    /// value changes.
    #[must_use]
    pub const fn new(
        id: PropertyId,
        name: &'static str,
        invalidates: Invalidation,
        default: fn() -> T,
    ) -> Self {
        Self {
            id,
            name,
            invalidates,
            default,
            _marker: PhantomData,
        }
    }

    /// Returns the id of this property.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyId {
        self.id
    }

    /// Returns the name of this property.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns the flags a change to this property sets.
    #[must_use]
    #[inline]
    pub const fn invalidates(self) -> Invalidation {
        self.invalidates
    }

    /// Builds the default value.
    #[must_use]
    pub fn default_value(self) -> T {
        (self.default)()
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Property<T> {}

impl<T> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Property<T> {}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("invalidates", &self.invalidates)
            .finish_non_exhaustive()
    }
}

/// Bounds required of property values.
pub trait PropertyValue: Clone + PartialEq + fmt::Debug + 'static {}

impl<T: Clone + PartialEq + fmt::Debug + 'static> PropertyValue for T {}

/// A type-erased property value that can still be compared and cloned.
pub(crate) struct ErasedValue {
    inner: Box<dyn ErasedValueTrait>,
}

impl ErasedValue {
    pub(crate) fn new<T: PropertyValue>(value: T) -> Self {
        Self {
            inner: Box::new(value),
        }
    }

    pub(crate) fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref()
    }

    fn value_type_id(&self) -> TypeId {
        Any::type_id(self.inner.as_any())
    }
}

impl Clone for ErasedValue {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_boxed(),
        }
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.debug(f)
    }
}

trait ErasedValueTrait: Any {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn ErasedValueTrait>;
    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: PropertyValue> ErasedValueTrait for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn ErasedValueTrait> {
        Box::new(self.clone())
    }

    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-element sparse property storage.
///
/// Entries are kept sorted by [`PropertyId`] and looked up by binary search.
/// A property that was never written (or was written back to its default)
/// has no entry; reads fall back to [`Property::default_value`].
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    entries: SmallVec<[(PropertyId, ErasedValue); INLINE_CAPACITY]>,
}

impl PropertyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if every property has its default value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn find(&self, id: PropertyId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |(pid, _)| *pid)
    }

    /// Returns the stored value, or `None` if the property has its default.
    #[must_use]
    pub fn get<T: 'static>(&self, property: Property<T>) -> Option<&T> {
        self.find(property.id())
            .ok()
            .and_then(|idx| self.entries[idx].1.downcast_ref())
    }

    /// Returns the effective value: the stored one, or the default.
    #[must_use]
    pub fn value<T: PropertyValue>(&self, property: Property<T>) -> T {
        self.get(property)
            .cloned()
            .unwrap_or_else(|| property.default_value())
    }

    /// Writes a value.
    ///
    /// Returns `true` if the effective value changed. Writing the current
    /// value again is a no-op.
    pub fn set<T: PropertyValue>(&mut self, property: Property<T>, value: T) -> bool {
        let default = property.default_value();
        match self.find(property.id()) {
            Ok(idx) => {
                let slot = &mut self.entries[idx].1;
                if slot.downcast_ref::<T>() == Some(&value) {
                    return false;
                }
                debug_assert!(
                    slot.value_type_id() == TypeId::of::<T>(),
                    "property {} written with a different type",
                    property.name()
                );
                if value == default {
                    self.entries.remove(idx);
                } else {
                    *slot = ErasedValue::new(value);
                }
                true
            }
            Err(idx) => {
                if value == default {
                    return false;
                }
                self.entries
                    .insert(idx, (property.id(), ErasedValue::new(value)));
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero() -> i32 {
        0
    }

    fn empty() -> String {
        String::new()
    }

    const COUNT: Property<i32> = Property::new(PropertyId::new(3), "count", Invalidation::SIZING, zero);
    const NAME: Property<String> = Property::new(PropertyId::new(1), "name", Invalidation::empty(), empty);

    #[test]
    fn reads_fall_back_to_default() {
        let store = PropertyStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(COUNT), None);
        assert_eq!(store.value(COUNT), 0);
    }

    #[test]
    fn set_reports_changes_only() {
        let mut store = PropertyStore::new();
        assert!(store.set(COUNT, 5));
        assert!(!store.set(COUNT, 5));
        assert_eq!(store.get(COUNT), Some(&5));
        assert!(store.set(COUNT, 6));
        assert_eq!(store.value(COUNT), 6);
    }

    #[test]
    fn writing_the_default_is_a_no_op_when_unset() {
        let mut store = PropertyStore::new();
        assert!(!store.set(COUNT, 0));
        assert!(store.is_empty());
    }

    #[test]
    fn writing_the_default_back_drops_the_entry() {
        let mut store = PropertyStore::new();
        store.set(COUNT, 7);
        assert!(store.set(COUNT, 0));
        assert!(store.is_empty());
    }

    #[test]
    fn entries_stay_sorted_by_id() {
        let mut store = PropertyStore::new();
        store.set(COUNT, 1);
        store.set(NAME, String::from("a"));
        let ids: Vec<_> = store.entries.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![NAME.id(), COUNT.id()]);
    }
}
