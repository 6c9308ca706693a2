//! # Change Feeds
//!
//! A [`Subscription`] is the client half of a live query. The actor first pushes an
//! [`Change::Added`] for every entity currently matching the query, then one event per
//! mutation that affects the result set:
//!
//! | before matched | after matched | event |
//! |---|---|---|
//! | no | yes | `Added` |
//! | yes | yes (and changed) | `Modified` |
//! | yes | no / deleted | `Removed` |
//!
//! Nothing is sent when a mutation leaves a matching entity equal to its previous state.
//!
//! [`LiveView`] folds those events into a local ordered map, so a view is patched in place
//! instead of being rebuilt from a full snapshot.

use crate::entity::ActorEntity;
use std::collections::BTreeMap;
use std::fmt;
use tokio::sync::mpsc;

/// A single incremental change to a query result set.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T: ActorEntity> {
    Added(T),
    Modified(T),
    Removed(T::Id),
}

impl<T: ActorEntity> Change<T> {
    /// Derives the event for one subscriber from the entity state around a mutation.
    ///
    /// `before`/`after` are `None` when the entity did not exist (create/delete).
    pub(crate) fn between(
        id: &T::Id,
        before: Option<&T>,
        after: Option<&T>,
        query: &T::Query,
    ) -> Option<Self> {
        let was = before.filter(|item| item.matches(query));
        let now = after.filter(|item| item.matches(query));
        match (was, now) {
            (None, Some(item)) => Some(Change::Added(item.clone())),
            (Some(old), Some(item)) if old != item => Some(Change::Modified(item.clone())),
            (Some(_), None) => Some(Change::Removed(id.clone())),
            _ => None,
        }
    }
}

/// Receiving end of a live query.
///
/// Dropping the subscription unregisters it; the actor prunes it on the next send.
///
/// # Backlog
/// The queue is unbounded so a slow reader never stalls the actor or loses an event.
/// The flip side is that a subscription which is held but never read (no `next`,
/// `try_next`, or [`LiveView::sync`]) keeps every change since it was opened in memory.
/// Long-lived holders should drain it regularly or drop it.
pub struct Subscription<T: ActorEntity> {
    receiver: mpsc::UnboundedReceiver<Change<T>>,
}

impl<T: ActorEntity> Subscription<T> {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<Change<T>>) -> Self {
        Self { receiver }
    }

    /// Waits for the next change. Returns `None` once the actor has shut down.
    pub async fn next(&mut self) -> Option<Change<T>> {
        self.receiver.recv().await
    }

    /// Returns a change that is already queued, without waiting.
    pub fn try_next(&mut self) -> Option<Change<T>> {
        self.receiver.try_recv().ok()
    }
}

impl<T: ActorEntity> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("queued", &self.receiver.len())
            .finish()
    }
}

/// Actor-side registration of a live query.
pub(crate) struct Subscriber<T: ActorEntity> {
    pub(crate) query: T::Query,
    pub(crate) sender: mpsc::UnboundedSender<Change<T>>,
}

/// A locally materialized query result kept current by a [`Subscription`].
#[derive(Debug)]
pub struct LiveView<T: ActorEntity> {
    subscription: Subscription<T>,
    items: BTreeMap<T::Id, T>,
}

impl<T: ActorEntity> LiveView<T> {
    pub fn new(subscription: Subscription<T>) -> Self {
        Self {
            subscription,
            items: BTreeMap::new(),
        }
    }

    /// Applies one change. Returns `false` if the change was a no-op for this view.
    pub fn apply(&mut self, change: Change<T>) -> bool {
        match change {
            Change::Added(item) | Change::Modified(item) => {
                let id = item.id().clone();
                let unchanged = self.items.get(&id) == Some(&item);
                self.items.insert(id, item);
                !unchanged
            }
            Change::Removed(id) => self.items.remove(&id).is_some(),
        }
    }

    /// Applies every change already queued. Returns how many changed the view.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Some(change) = self.subscription.try_next() {
            if self.apply(change) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next change and applies it.
    /// Returns `false` once the actor has shut down.
    pub async fn changed(&mut self) -> bool {
        match self.subscription.next().await {
            Some(change) => {
                self.apply(change);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.get(id)
    }

    /// Current items in id order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
