//! Ordered observer lists used for synchronous change notification.

use std::{fmt, rc::Rc};

use tracing::warn;

/// Token returned by [`Observers::subscribe`] and consumed by
/// [`Observers::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Retrieves the numeric representation of the token.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

type Callback<T> = Rc<dyn Fn(&T)>;

/// Ordered collection of callbacks notified with a payload of type `T`.
///
/// Callbacks run synchronously in registration order. Dispatch iterates a
/// snapshot of the list, so the set of callbacks invoked by one `notify` is
/// fixed when the call begins.
pub struct Observers<T: ?Sized> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T: ?Sized> Observers<T> {
    /// Creates an empty observer list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Appends a callback and returns the token that removes it again.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let callback: Callback<T> = Rc::new(callback);
        self.entries.push((id, callback));
        id
    }

    /// Removes the callback registered under `id`.
    ///
    /// Returns `false` and logs a warning when no such callback exists.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(position) = self.entries.iter().position(|(entry, _)| *entry == id) else {
            warn!(subscription = id.get(), "unsubscribe called for an unknown subscription");
            return false;
        };
        let _ = self.entries.remove(position);
        true
    }

    /// Invokes every registered callback with the payload.
    pub fn notify(&self, payload: &T) {
        let snapshot: Vec<Callback<T>> = self
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(payload);
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.entries.len())
            .finish()
    }
}
