// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The portable element tree.
//!
//! An [`Element`] is always handled through an `Rc`. Parents own their
//! children; the child's link back to its parent is weak, so dropping the
//! last handle to a root tears the whole subtree down. Each element can
//! carry one native [`Core`], which mirrors the portable state on a real
//! backend.

use core::any::Any;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::ptr;
use std::rc::{Rc, Weak};

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::capability::Core;
use crate::container;
use crate::context::UiContext;
use crate::error::{Error, MisuseError};
use crate::invalidation::{Channel, Invalidation};
use crate::property::{Property, PropertyId, PropertyStore, PropertyValue};
use crate::props::{self, Known};
use crate::units::UiMargin;

/// Identifies an element within its [`UiContext`].
///
/// Ids are handed out in creation order and never reused by a context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

/// The element kinds known to the portable layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A top-level window holding a single content view.
    Window,
    /// A push button with a text label.
    Button,
    /// A scrollable viewport holding a single content view.
    ScrollContainer,
}

impl ElementKind {
    /// Maximum number of children an element of this kind accepts.
    #[must_use]
    pub const fn child_limit(self) -> usize {
        match self {
            Self::Button => 0,
            Self::Window | Self::ScrollContainer => 1,
        }
    }

    /// Returns `true` if elements of this kind declare the property.
    #[must_use]
    pub fn declares(self, id: PropertyId) -> bool {
        match Known::of(id) {
            Some(Known::Visible | Known::Margin | Known::Padding) => true,
            Some(Known::Label) => self == Self::Button,
            Some(Known::Title) => self == Self::Window,
            Some(Known::HorizontalScrolling | Known::VerticalScrolling) => {
                self == Self::ScrollContainer
            }
            None => false,
        }
    }

    /// Returns `true` for kinds whose single child is their content view.
    #[must_use]
    pub const fn holds_content(self) -> bool {
        matches!(self, Self::Window | Self::ScrollContainer)
    }
}

type DestructHook = Box<dyn FnOnce(&Element)>;
type ObserverFn = Rc<dyn Fn(&dyn Any)>;

struct Observer {
    property: PropertyId,
    callback: ObserverFn,
}

/// Work for the core that arrived while the core was busy with a call.
#[derive(Copy, Clone, Debug)]
enum CoreOp {
    Push(PropertyId),
    ChildInserted(usize, ElementId),
    ChildRemoved(ElementId),
    Bounds(Rect),
}

/// A node of the portable UI tree.
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    context: UiContext,
    this: Weak<Element>,
    parent: RefCell<Weak<Element>>,
    children: RefCell<SmallVec<[Rc<Element>; 2]>>,
    properties: RefCell<PropertyStore>,
    observers: RefCell<Vec<Observer>>,
    core: RefCell<Option<Box<dyn Core>>>,
    /// Set while the core is out of its slot for a call.
    core_lent: Cell<bool>,
    /// Bumped on every attach and detach.
    core_generation: Cell<u64>,
    deferred_core_ops: RefCell<Vec<CoreOp>>,
    bounds: Cell<Rect>,
    preferred_size: Cell<Option<Size>>,
    destruct_hook: RefCell<Option<DestructHook>>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("children", &self.child_count())
            .field("bounds", &self.bounds.get())
            .field("has_core", &self.has_core())
            .finish_non_exhaustive()
    }
}

impl Element {
    /// Creates a detached element without a core.
    pub fn new(context: &UiContext, kind: ElementKind) -> Rc<Self> {
        let id = context.next_element_id();
        tracing::trace!(element = ?id, ?kind, "element created");
        Rc::new_cyclic(|this| Self {
            id,
            kind,
            context: context.clone(),
            this: this.clone(),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(SmallVec::new()),
            properties: RefCell::new(PropertyStore::new()),
            observers: RefCell::new(Vec::new()),
            core: RefCell::new(None),
            core_lent: Cell::new(false),
            core_generation: Cell::new(0),
            deferred_core_ops: RefCell::new(Vec::new()),
            bounds: Cell::new(Rect::ZERO),
            preferred_size: Cell::new(None),
            destruct_hook: RefCell::new(None),
        })
    }

    /// Returns the element's id.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Returns the element's kind.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Returns the context the element was created in.
    #[must_use]
    pub fn context(&self) -> &UiContext {
        &self.context
    }

    // --- Tree ---

    /// Returns the parent, if the element is attached.
    #[must_use]
    pub fn parent(&self) -> Option<Rc<Self>> {
        self.parent.borrow().upgrade()
    }

    /// Returns the children in order.
    #[must_use]
    pub fn children(&self) -> Vec<Rc<Self>> {
        self.children.borrow().to_vec()
    }

    /// Returns the number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Returns the child at `index`.
    #[must_use]
    pub fn child_at(&self, index: usize) -> Option<Rc<Self>> {
        self.children.borrow().get(index).cloned()
    }

    /// Returns `true` if `child` is a direct child of this element.
    #[must_use]
    pub fn has_child(&self, child: &Self) -> bool {
        self.children
            .borrow()
            .iter()
            .any(|c| ptr::eq(c.as_ref(), child))
    }

    /// Returns the content view of a window or scroll container.
    ///
    /// Always `None` for kinds that do not hold content.
    #[must_use]
    pub fn content_view(&self) -> Option<Rc<Self>> {
        if self.kind.holds_content() {
            self.child_at(0)
        } else {
            None
        }
    }

    /// Number of ancestors between this element and its root.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent();
        }
        depth
    }

    fn is_ancestor_or_self(&self, other: &Self) -> bool {
        if ptr::eq(self, other) {
            return true;
        }
        let mut current = self.parent();
        while let Some(parent) = current {
            if ptr::eq(parent.as_ref(), other) {
                return true;
            }
            current = parent.parent();
        }
        false
    }

    /// Appends `child`.
    ///
    /// # Errors
    ///
    /// Fails with a [`MisuseError`] and leaves both elements untouched if the
    /// child already has a parent, belongs to another context, is this
    /// element or one of its ancestors, or if this element is full.
    pub fn add_child(&self, child: &Rc<Self>) -> Result<(), Error> {
        self.check_insert(child)?;
        let limit = self.kind.child_limit();
        if self.child_count() >= limit {
            return Err(MisuseError::ChildLimit {
                kind: self.kind,
                limit,
            }
            .into());
        }
        self.link_child(child);
        self.invalidate(Invalidation::SIZING | Invalidation::LAYOUT);
        Ok(())
    }

    /// Detaches `child`.
    ///
    /// The child is destroyed if this was the last strong reference to it.
    ///
    /// # Errors
    ///
    /// Fails with [`MisuseError::NotAChild`] if `child` is not a direct child.
    pub fn remove_child(&self, child: &Self) -> Result<(), Error> {
        let Some(removed) = self.unlink_child(child) else {
            return Err(MisuseError::NotAChild {
                parent: self.id,
                child: child.id,
            }
            .into());
        };
        self.invalidate(Invalidation::SIZING | Invalidation::LAYOUT);
        drop(removed);
        Ok(())
    }

    /// Detaches every child.
    pub fn detach_all_children(&self) {
        let removed = self.sever_children();
        if !removed.is_empty() {
            self.invalidate(Invalidation::SIZING | Invalidation::LAYOUT);
        }
        drop(removed);
    }

    pub(crate) fn check_insert(&self, child: &Self) -> Result<(), MisuseError> {
        if !self.context.ptr_eq(&child.context) {
            return Err(MisuseError::ForeignContext { child: child.id });
        }
        if child.parent().is_some() {
            return Err(MisuseError::AlreadyHasParent { child: child.id });
        }
        if self.is_ancestor_or_self(child) {
            return Err(MisuseError::WouldCreateCycle {
                parent: self.id,
                child: child.id,
            });
        }
        Ok(())
    }

    /// Links `child` at the end without any checks or invalidation.
    pub(crate) fn link_child(&self, child: &Rc<Self>) {
        let index = {
            let mut children = self.children.borrow_mut();
            children.push(child.clone());
            *child.parent.borrow_mut() = self.this.clone();
            children.len() - 1
        };
        self.run_core_op(CoreOp::ChildInserted(index, child.id));
    }

    /// Unlinks `child` without invalidation, handing back the strong
    /// reference the parent held.
    pub(crate) fn unlink_child(&self, child: &Self) -> Option<Rc<Self>> {
        let removed = {
            let mut children = self.children.borrow_mut();
            let index = children
                .iter()
                .position(|c| ptr::eq(c.as_ref(), child))?;
            let removed = children.remove(index);
            *removed.parent.borrow_mut() = Weak::new();
            removed
        };
        self.run_core_op(CoreOp::ChildRemoved(removed.id));
        Some(removed)
    }

    fn sever_children(&self) -> SmallVec<[Rc<Self>; 2]> {
        let removed = core::mem::take(&mut *self.children.borrow_mut());
        for child in &removed {
            *child.parent.borrow_mut() = Weak::new();
        }
        for child in removed.iter().rev() {
            self.run_core_op(CoreOp::ChildRemoved(child.id));
        }
        removed
    }

    // --- Properties ---

    fn check_declared<T>(&self, property: Property<T>) -> Result<(), MisuseError> {
        if self.kind.declares(property.id()) {
            Ok(())
        } else {
            Err(MisuseError::UndeclaredProperty {
                kind: self.kind,
                property: property.name(),
            })
        }
    }

    /// Reads a property.
    ///
    /// # Errors
    ///
    /// Fails with [`MisuseError::UndeclaredProperty`] if this kind does not
    /// declare `property`.
    pub fn property<T: PropertyValue>(&self, property: Property<T>) -> Result<T, Error> {
        self.check_declared(property)?;
        Ok(self.read(property))
    }

    /// Writes a property. Returns `true` if the value changed.
    ///
    /// A change is pushed to the core (when it has the matching capability),
    /// then recorded with the scheduler, then reported to observers.
    ///
    /// # Errors
    ///
    /// Fails with [`MisuseError::UndeclaredProperty`] if this kind does not
    /// declare `property`.
    pub fn set_property<T: PropertyValue>(
        &self,
        property: Property<T>,
        value: T,
    ) -> Result<bool, Error> {
        self.check_declared(property)?;
        Ok(self.write(property, value))
    }

    /// Calls `callback` with the new value whenever `property` changes.
    ///
    /// # Errors
    ///
    /// Fails with [`MisuseError::UndeclaredProperty`] if this kind does not
    /// declare `property`.
    pub fn observe<T: PropertyValue>(
        &self,
        property: Property<T>,
        callback: impl Fn(&T) + 'static,
    ) -> Result<(), Error> {
        self.check_declared(property)?;
        let callback: ObserverFn = Rc::new(move |value: &dyn Any| {
            if let Some(value) = value.downcast_ref::<T>() {
                callback(value);
            }
        });
        self.observers.borrow_mut().push(Observer {
            property: property.id(),
            callback,
        });
        Ok(())
    }

    pub(crate) fn read<T: PropertyValue>(&self, property: Property<T>) -> T {
        self.properties.borrow().value(property)
    }

    pub(crate) fn write<T: PropertyValue>(&self, property: Property<T>, value: T) -> bool {
        debug_assert!(
            self.kind.declares(property.id()),
            "{:?} does not declare {}",
            self.kind,
            property.name()
        );
        let changed = self.properties.borrow_mut().set(property, value.clone());
        if !changed {
            return false;
        }
        self.run_core_op(CoreOp::Push(property.id()));
        self.invalidate(property.invalidates());
        self.notify(property, &value);
        true
    }

    fn notify<T: PropertyValue>(&self, property: Property<T>, value: &T) {
        let callbacks: SmallVec<[ObserverFn; 2]> = self
            .observers
            .borrow()
            .iter()
            .filter(|o| o.property == property.id())
            .map(|o| o.callback.clone())
            .collect();
        // Observers may touch this element again; no borrow is held here.
        for callback in callbacks {
            callback(value);
        }
    }

    /// Forwards the current value of one property to `core`.
    ///
    /// Values are read out of the store before the core sees them, so the
    /// core may read or write this element's properties.
    fn push_property(&self, core: &mut dyn Core, id: PropertyId) {
        let Some(known) = Known::of(id) else {
            return;
        };
        let applied = match known {
            // Margins are consumed by the parent's layout only.
            Known::Margin => true,
            Known::Visible => {
                let visible = self.read(props::VISIBLE);
                core.visibility().map(|c| c.set_visible(visible)).is_some()
            }
            Known::Padding => {
                let insets = self.read(props::PADDING).resolve(&self.context.metrics());
                core.padding().map(|c| c.set_padding(insets)).is_some()
            }
            Known::Label | Known::Title => {
                let text = if known == Known::Label {
                    self.read(props::LABEL)
                } else {
                    self.read(props::TITLE)
                };
                core.text().map(|c| c.set_text(&text)).is_some()
            }
            Known::HorizontalScrolling => {
                let enabled = self.read(props::HORIZONTAL_SCROLLING);
                core.scrolling()
                    .map(|c| c.set_horizontal_scrolling(enabled))
                    .is_some()
            }
            Known::VerticalScrolling => {
                let enabled = self.read(props::VERTICAL_SCROLLING);
                core.scrolling()
                    .map(|c| c.set_vertical_scrolling(enabled))
                    .is_some()
            }
        };
        if !applied {
            tracing::debug!(
                element = ?self.id,
                kind = ?self.kind,
                property = known.name(),
                "core lacks the capability; keeping the portable value only"
            );
        }
    }

    /// Returns whether the element is shown.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.read(props::VISIBLE)
    }

    /// Shows or hides the element.
    pub fn set_visible(&self, visible: bool) {
        self.write(props::VISIBLE, visible);
    }

    /// Returns the margin.
    #[must_use]
    pub fn margin(&self) -> UiMargin {
        self.read(props::MARGIN)
    }

    /// Sets the margin.
    pub fn set_margin(&self, margin: UiMargin) {
        self.write(props::MARGIN, margin);
    }

    /// Returns the padding.
    #[must_use]
    pub fn padding(&self) -> UiMargin {
        self.read(props::PADDING)
    }

    /// Sets the padding.
    pub fn set_padding(&self, padding: UiMargin) {
        self.write(props::PADDING, padding);
    }

    // --- Cores ---

    /// Lends the core to `f`.
    ///
    /// The core leaves its slot for the duration of the call, so `f` may
    /// call back into this element. Core work raised meanwhile is queued and
    /// applied once the core is back. A core attached or detached during the
    /// call replaces the lent one, which is then dropped.
    fn with_core<R>(&self, f: impl FnOnce(&mut dyn Core) -> R) -> Option<R> {
        let mut core = self.core.borrow_mut().take()?;
        let generation = self.core_generation.get();
        self.core_lent.set(true);
        let result = f(core.as_mut());
        if self.core_generation.get() == generation {
            self.core_lent.set(false);
            *self.core.borrow_mut() = Some(core);
            self.flush_core_ops();
        } else {
            drop(core);
        }
        Some(result)
    }

    fn run_core_op(&self, op: CoreOp) {
        if self.core_lent.get() {
            self.deferred_core_ops.borrow_mut().push(op);
            return;
        }
        match op {
            CoreOp::Push(id) => {
                self.with_core(|core| self.push_property(core, id));
            }
            CoreOp::ChildInserted(index, child) => {
                self.with_core(|core| {
                    if let Some(hierarchy) = core.hierarchy() {
                        hierarchy.child_inserted(index, child);
                    }
                });
            }
            CoreOp::ChildRemoved(child) => {
                self.with_core(|core| {
                    if let Some(hierarchy) = core.hierarchy() {
                        hierarchy.child_removed(child);
                    }
                });
            }
            CoreOp::Bounds(bounds) => {
                match self
                    .with_core(|core| core.arrange().map(|a| a.set_bounds(bounds)))
                    .flatten()
                {
                    Some(Ok(applied)) => self.store_bounds(applied),
                    Some(Err(err)) => {
                        tracing::warn!(element = ?self.id, %err, "core rejected deferred bounds");
                    }
                    None => {}
                }
            }
        }
    }

    fn flush_core_ops(&self) {
        let ops = core::mem::take(&mut *self.deferred_core_ops.borrow_mut());
        for op in ops {
            self.run_core_op(op);
        }
    }

    fn start_core_generation(&self) {
        self.core_generation.set(self.core_generation.get() + 1);
        self.core_lent.set(false);
        self.deferred_core_ops.borrow_mut().clear();
    }

    /// Returns `true` if a core is attached.
    #[must_use]
    pub fn has_core(&self) -> bool {
        self.core_lent.get() || self.core.borrow().is_some()
    }

    /// Attaches `core`, replacing (and dropping) any previous one.
    ///
    /// Every declared property and the current children are pushed to the
    /// new core before this returns.
    ///
    /// # Errors
    ///
    /// Fails with [`MisuseError::IncompatibleCore`] if the core was built for
    /// another element kind; the current core stays in place.
    pub fn attach_core(&self, mut core: Box<dyn Core>) -> Result<(), Error> {
        if core.kind() != self.kind {
            return Err(MisuseError::IncompatibleCore {
                expected: self.kind,
                found: core.kind(),
            }
            .into());
        }
        let capabilities = core.capabilities();
        tracing::debug!(element = ?self.id, kind = ?self.kind, ?capabilities, "attaching core");
        self.start_core_generation();
        let old = self.core.replace(Some(core));
        drop(old);
        for id in props::declared(self.kind) {
            self.run_core_op(CoreOp::Push(id));
        }
        let children: SmallVec<[ElementId; 2]> =
            self.children.borrow().iter().map(|c| c.id).collect();
        for (index, child) in children.into_iter().enumerate() {
            self.run_core_op(CoreOp::ChildInserted(index, child));
        }
        self.invalidate(Invalidation::SIZING | Invalidation::LAYOUT);
        Ok(())
    }

    /// Detaches and returns the core.
    ///
    /// Called from inside one of the core's own callbacks this returns
    /// `None`; the core is dropped when the callback returns.
    pub fn detach_core(&self) -> Option<Box<dyn Core>> {
        let was_lent = self.core_lent.get();
        self.start_core_generation();
        let core = self.core.borrow_mut().take();
        if core.is_some() || was_lent {
            self.invalidate(Invalidation::SIZING | Invalidation::LAYOUT);
        }
        core
    }

    /// Creates cores from the context's provider for this element and its
    /// descendants that do not have one yet.
    ///
    /// # Errors
    ///
    /// Stops at the first element the provider cannot serve; elements
    /// realized before that keep their new cores.
    pub fn realize(&self) -> Result<(), Error> {
        if !self.has_core() {
            let core = self.context.provider().create_core(self)?;
            self.attach_core(core)?;
        }
        for child in self.children() {
            child.realize()?;
        }
        Ok(())
    }

    /// Replaces the cores of this element and all its descendants with new
    /// ones from the context's current provider.
    ///
    /// # Errors
    ///
    /// Stops at the first element the provider cannot serve.
    pub fn rebuild_cores(&self) -> Result<(), Error> {
        let core = self.context.provider().create_core(self)?;
        self.attach_core(core)?;
        for child in self.children() {
            child.rebuild_cores()?;
        }
        Ok(())
    }

    // --- Sizing and layout ---

    /// Returns `true` if `child`'s preferred size feeds into this element's
    /// preferred size.
    #[must_use]
    pub fn is_sizing_input(&self, child: &Self) -> bool {
        match self.kind {
            ElementKind::Window | ElementKind::ScrollContainer => self
                .content_view()
                .is_some_and(|content| ptr::eq(content.as_ref(), child)),
            ElementKind::Button => false,
        }
    }

    /// Computes the preferred size from scratch.
    #[must_use]
    pub fn calc_preferred_size(&self) -> Size {
        match self.kind {
            // Asked from inside a call into this element's own core.
            ElementKind::Button if self.core_lent.get() => {
                self.preferred_size.get().unwrap_or(Size::ZERO)
            }
            ElementKind::Button => self
                .with_core(|core| core.measure().map(|m| m.preferred_size()))
                .flatten()
                .unwrap_or(Size::ZERO),
            ElementKind::Window | ElementKind::ScrollContainer => {
                container::content_preferred_size(self)
            }
        }
    }

    /// Returns the preferred size, using the cached value while it is fresh.
    #[must_use]
    pub fn preferred_size(&self) -> Size {
        match self.preferred_size.get() {
            Some(size) if !self.is_sizing_dirty() => size,
            _ => self.calc_preferred_size(),
        }
    }

    pub(crate) fn update_sizing(&self) {
        let size = self.calc_preferred_size();
        tracing::trace!(element = ?self.id, ?size, "preferred size updated");
        self.preferred_size.set(Some(size));
    }

    pub(crate) fn update_layout(&self) -> Result<(), Error> {
        match self.kind {
            ElementKind::Button => Ok(()),
            ElementKind::Window | ElementKind::ScrollContainer => container::arrange_content(self),
        }
    }

    /// Returns the bounds in the parent's coordinate space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    /// Returns the top-left corner in the parent's coordinate space.
    #[must_use]
    pub fn position(&self) -> Point {
        self.bounds.get().origin()
    }

    /// Returns the current size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.bounds.get().size()
    }

    /// Moves and resizes the element.
    ///
    /// The bounds are snapped to the backend's pixel grid and handed to the
    /// core, which may adjust them further. Returns the bounds that were
    /// applied. A size change schedules a layout of this element's children.
    ///
    /// Called from inside one of the core's own callbacks, the snapped bounds
    /// are stored right away and reach the core once the callback returns.
    ///
    /// # Errors
    ///
    /// Returns the core's error; the stored bounds are left unchanged.
    pub fn set_bounds(&self, bounds: Rect) -> Result<Rect, Error> {
        let snapped = self.context.metrics().snap_rect(bounds);
        if self.core_lent.get() {
            self.deferred_core_ops
                .borrow_mut()
                .push(CoreOp::Bounds(snapped));
            self.store_bounds(snapped);
            return Ok(snapped);
        }
        let applied = match self
            .with_core(|core| core.arrange().map(|a| a.set_bounds(snapped)))
            .flatten()
        {
            Some(result) => result?,
            None => snapped,
        };
        self.store_bounds(applied);
        Ok(applied)
    }

    fn store_bounds(&self, applied: Rect) {
        let old = self.bounds.replace(applied);
        if old.size() != applied.size()
            && self.child_count() > 0
            && let Some(this) = self.this.upgrade()
        {
            self.context.scheduler().invalidate_own_layout(&this);
        }
    }

    /// Marks the preferred size as stale.
    pub fn invalidate_sizing_info(&self) {
        self.invalidate(Invalidation::SIZING);
    }

    /// Marks the layout as stale.
    pub fn invalidate_layout(&self) {
        self.invalidate(Invalidation::LAYOUT);
    }

    pub(crate) fn invalidate(&self, what: Invalidation) {
        // `this` is gone only while the element is being dropped.
        if let Some(this) = self.this.upgrade() {
            self.context.scheduler().invalidate(&this, what);
        }
    }

    /// Returns `true` while a sizing update is pending.
    #[must_use]
    pub fn is_sizing_dirty(&self) -> bool {
        self.context.scheduler().is_dirty(self.id, Channel::Sizing)
    }

    /// Returns `true` while a layout update is pending.
    #[must_use]
    pub fn is_layout_dirty(&self) -> bool {
        self.context.scheduler().is_dirty(self.id, Channel::Layout)
    }

    // --- Lifetime ---

    /// Installs a callback run while the element is destroyed.
    ///
    /// By the time it runs the children have already been detached. A
    /// second call replaces the first hook.
    pub fn set_destruct_hook(&self, hook: impl FnOnce(&Self) + 'static) {
        *self.destruct_hook.borrow_mut() = Some(Box::new(hook));
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        let children = self.sever_children();
        if let Some(hook) = self.destruct_hook.get_mut().take() {
            hook(self);
        }
        self.context.scheduler().forget(self.id);
        tracing::trace!(element = ?self.id, kind = ?self.kind, "element destroyed");
        drop(children);
    }
}
