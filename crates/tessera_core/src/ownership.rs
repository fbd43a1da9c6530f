//! # Shared Ownership With Broadcast Disposal
//!
//! A cell owns one heap object and is shared by any number of [`Handle`]s.
//! The object is destroyed exactly once, either when the last handle
//! detaches or when any handle calls [`Handle::dispose`]. From that moment
//! every live and future handle observes `None`.
//!
//! ## Disposal order
//!
//! ```text
//! dispose() ──► cell marked dead (every Handle/Observer now sees None)
//!           ──► object taken out of the cell
//!           ──► object dropped (its Drop may freely touch other handles)
//! ```
//!
//! [`Observer`] is the non-subscribing view: it sees the object while the
//! cell lives but never keeps it alive. The scene arena stores observers so
//! that strong ownership stays with the registry or a parent panel.
//!
//! ## Thread Safety
//!
//! Cells are `!Send`. The engine runs on one thread; mutation that happens
//! during a traversal is posted to the deferred queue instead.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

struct Shared<T> {
    value: RefCell<Option<T>>,
    subscribers: Cell<usize>,
    live: Cell<bool>,
}

impl<T> Shared<T> {
    fn new(value: T) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(Some(value)),
            subscribers: Cell::new(1),
            live: Cell::new(true),
        })
    }

    #[inline]
    fn is_live(&self) -> bool {
        self.live.get()
    }

    fn dispose(&self) {
        if !self.live.replace(false) {
            return;
        }
        self.subscribers.set(0);

        // An outstanding borrow means the object is still being read by a
        // traversal; it then drops together with the last reference to the cell.
        let taken = self.value.try_borrow_mut().ok().and_then(|mut slot| slot.take());
        drop(taken);
    }
}

/// A subscribing reference to a shared cell.
///
/// Comparison is by cell identity: two handles are equal when they share a
/// cell, or when both observe nothing.
pub struct Handle<T> {
    shared: Option<Rc<Shared<T>>>,
}

impl<T> Handle<T> {
    /// Creates a new cell owning `value`, subscribed by the returned handle.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            shared: Some(Shared::new(value)),
        }
    }

    /// Creates a handle that observes nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self { shared: None }
    }

    fn live_shared(&self) -> Option<&Rc<Shared<T>>> {
        self.shared.as_ref().filter(|shared| shared.is_live())
    }

    /// Borrows the object, or `None` once the cell was disposed.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently mutably borrowed.
    #[must_use]
    pub fn get(&self) -> Option<Ref<'_, T>> {
        let shared = self.live_shared()?;
        Ref::filter_map(shared.value.borrow(), Option::as_ref).ok()
    }

    /// Mutably borrows the object, or `None` once the cell was disposed.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently borrowed.
    #[must_use]
    pub fn get_mut(&self) -> Option<RefMut<'_, T>> {
        let shared = self.live_shared()?;
        RefMut::filter_map(shared.value.borrow_mut(), Option::as_mut).ok()
    }

    /// Checked view onto part of the object.
    ///
    /// Returns `None` when the cell is dead or when `view` rejects the
    /// object, e.g. asking a button panel for its menu state.
    #[must_use]
    pub fn project<U: ?Sized>(&self, view: impl FnOnce(&T) -> Option<&U>) -> Option<Ref<'_, U>> {
        Ref::filter_map(self.get()?, view).ok()
    }

    /// Returns true while the object is alive.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live_shared().is_some()
    }

    /// Returns true if this handle observes nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_live()
    }

    /// Number of handles subscribed to the cell (0 when empty).
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.live_shared().map_or(0, |shared| shared.subscribers.get())
    }

    /// Returns true if both handles observe the same live cell, or both observe nothing.
    #[must_use]
    pub fn same_cell(&self, other: &Self) -> bool {
        match (self.live_shared(), other.live_shared()) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Re-points this handle at `other`'s cell.
    ///
    /// The old cell is disposed if this was its last subscriber. Assigning
    /// from a handle of the same cell is a no-op; assigning from an empty
    /// handle leaves this one empty.
    pub fn assign(&mut self, other: &Self) {
        if self.same_cell(other) {
            return;
        }
        *self = other.clone();
    }

    /// Detaches from the current cell and takes ownership of a fresh one.
    pub fn reset(&mut self, value: T) {
        *self = Self::new(value);
    }

    /// Swaps the object inside the cell; every subscribed handle sees the new one.
    ///
    /// Returns the previous object. An empty handle starts a fresh cell.
    pub fn replace(&mut self, value: T) -> Option<T> {
        match self.live_shared() {
            Some(shared) => shared.value.borrow_mut().replace(value),
            None => {
                self.reset(value);
                None
            }
        }
    }

    /// Destroys the object for every handle.
    ///
    /// All handles and observers see `None` before the object's destructor
    /// runs. Disposing an empty handle does nothing.
    pub fn dispose(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.dispose();
        }
    }

    /// Creates a non-subscribing view of the same cell.
    #[must_use]
    pub fn observe(&self) -> Observer<T> {
        Observer {
            shared: self.live_shared().cloned(),
        }
    }

    fn detach(&mut self) {
        let Some(shared) = self.shared.take() else {
            return;
        };
        if !shared.is_live() {
            return;
        }

        let remaining = shared.subscribers.get().saturating_sub(1);
        shared.subscribers.set(remaining);
        if remaining == 0 {
            shared.dispose();
        }
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        match self.live_shared() {
            Some(shared) => {
                shared.subscribers.set(shared.subscribers.get() + 1);
                Self {
                    shared: Some(Rc::clone(shared)),
                }
            }
            None => Self::empty(),
        }
    }
}

impl<T> Drop for Handle<T> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_cell(other)
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("live", &self.is_live())
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// A non-subscribing view of a cell.
///
/// Never keeps the object alive and never triggers disposal.
pub struct Observer<T> {
    shared: Option<Rc<Shared<T>>>,
}

impl<T> Observer<T> {
    /// Creates an observer that sees nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self { shared: None }
    }

    fn live_shared(&self) -> Option<&Rc<Shared<T>>> {
        self.shared.as_ref().filter(|shared| shared.is_live())
    }

    /// Borrows the object, or `None` once the cell was disposed.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently mutably borrowed.
    #[must_use]
    pub fn get(&self) -> Option<Ref<'_, T>> {
        let shared = self.live_shared()?;
        Ref::filter_map(shared.value.borrow(), Option::as_ref).ok()
    }

    /// Mutably borrows the object, or `None` once the cell was disposed.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently borrowed.
    #[must_use]
    pub fn get_mut(&self) -> Option<RefMut<'_, T>> {
        let shared = self.live_shared()?;
        RefMut::filter_map(shared.value.borrow_mut(), Option::as_mut).ok()
    }

    /// Returns true while the observed object is alive.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live_shared().is_some()
    }

    /// Subscribes a new handle to the cell, or returns an empty handle if it died.
    #[must_use]
    pub fn upgrade(&self) -> Handle<T> {
        match self.live_shared() {
            Some(shared) => {
                shared.subscribers.set(shared.subscribers.get() + 1);
                Handle {
                    shared: Some(Rc::clone(shared)),
                }
            }
            None => Handle::empty(),
        }
    }

    /// Returns true if `handle` subscribes to the cell this observer sees.
    #[must_use]
    pub fn observes(&self, handle: &Handle<T>) -> bool {
        match (self.live_shared(), handle.live_shared()) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Default for Observer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer").field("live", &self.is_live()).finish()
    }
}
