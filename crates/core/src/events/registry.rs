// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription registry
//!
//! Subscriptions live in an arena of slots threaded into a doubly linked
//! list in registration order. A handle is the slot index plus the slot's
//! generation, so a stale handle never reaches a reused slot.
//!
//! While a delivery pass is running, unsubscribing only tombstones the entry:
//! its sink is dropped and it is skipped, but it stays linked until the pass
//! ends so the dispatcher's cursor can always step past it.

use super::error::EventError;
use super::mask::EventMask;
use super::sink::{Entities, EventSink};
use std::fmt;
use tracing::{debug, trace, warn};

/// Handle identifying one subscription, used to unsubscribe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    index: usize,
    generation: u32,
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}.{}", self.index, self.generation)
    }
}

pub(super) type BoxedSink<E> = Box<dyn EventSink<E>>;

struct Entry<E: Entities> {
    mask: EventMask,
    /// Taken out while the sink is being invoked
    sink: Option<BoxedSink<E>>,
    /// Unsubscribed during a pass; unlinked when the pass ends
    retired: bool,
    prev: Option<usize>,
    next: Option<usize>,
}

struct Slot<E: Entities> {
    generation: u32,
    entry: Option<Entry<E>>,
}

/// Ordered set of active subscriptions.
///
/// Handlers receive `&mut Subscriptions` during delivery, so they can add
/// and remove subscriptions without access to the raise entry points.
pub struct Subscriptions<E: Entities> {
    slots: Vec<Slot<E>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    active: usize,
    delivering: bool,
    retired: Vec<usize>,
}

impl<E: Entities> Subscriptions<E> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            active: 0,
            delivering: false,
            retired: Vec::new(),
        }
    }

    /// Register `sink` for the events in `mask`.
    ///
    /// The new subscription goes to the back of the delivery order. Fails if
    /// the mask reaches into a category the sink has no handler for.
    pub fn subscribe<S>(
        &mut self,
        mask: impl Into<EventMask>,
        sink: S,
    ) -> Result<SubscriptionId, EventError>
    where
        S: EventSink<E> + 'static,
    {
        self.subscribe_boxed(mask.into(), Box::new(sink))
    }

    pub fn subscribe_boxed(
        &mut self,
        mask: EventMask,
        sink: Box<dyn EventSink<E>>,
    ) -> Result<SubscriptionId, EventError> {
        let handled = sink.handles();
        if let Some(category) = mask.categories().find(|c| !handled.intersects(*c)) {
            warn!(?mask, ?handled, %category, "subscription rejected: missing handler");
            return Err(EventError::MissingHandler { category, mask });
        }

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: None,
                });
                self.slots.len() - 1
            }
        };

        let prev = self.tail;
        let slot = &mut self.slots[index];
        slot.entry = Some(Entry {
            mask,
            sink: Some(sink),
            retired: false,
            prev,
            next: None,
        });
        let generation = slot.generation;

        match prev.and_then(|p| self.entry_mut(p)) {
            Some(last) => last.next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.active += 1;

        let id = SubscriptionId { index, generation };
        debug!(subscription = %id, ?mask, "subscribed");
        Ok(id)
    }

    /// Remove a subscription.
    ///
    /// Takes effect immediately, including for subscriptions not yet visited
    /// by an in-progress delivery pass.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), EventError> {
        if !self.is_subscribed(id) {
            warn!(subscription = %id, "unsubscribe of unknown subscription");
            return Err(EventError::UnknownSubscription(id));
        }
        self.remove(id.index);
        debug!(subscription = %id, "unsubscribed");
        Ok(())
    }

    /// Remove every subscription
    pub fn clear(&mut self) {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            cursor = self.next_after(index);
            if self.is_live(index) {
                self.remove(index);
            }
        }
        debug!("all subscriptions removed");
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        match self.slots.get(id.index) {
            Some(slot) => slot.generation == id.generation && self.is_live(id.index),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// True while an event is being delivered
    pub fn is_delivering(&self) -> bool {
        self.delivering
    }

    /// Active subscriptions in delivery order
    pub fn ids(&self) -> Vec<SubscriptionId> {
        let mut ids = Vec::with_capacity(self.active);
        let mut cursor = self.head;
        while let Some(index) = cursor {
            cursor = self.next_after(index);
            if let Some(slot) = self.slots.get(index).filter(|_| self.is_live(index)) {
                ids.push(SubscriptionId {
                    index,
                    generation: slot.generation,
                });
            }
        }
        ids
    }

    /// Mask a subscription was registered with
    pub fn mask(&self, id: SubscriptionId) -> Option<EventMask> {
        if !self.is_subscribed(id) {
            return None;
        }
        self.entry(id.index).map(|entry| entry.mask)
    }

    // -- delivery pass primitives, driven by the bus ------------------------

    /// Start a pass. Returns the first and last index to visit; anything
    /// subscribed from here on lands after `last`.
    pub(super) fn begin_pass(&mut self) -> Option<(usize, usize)> {
        let bounds = self.head.zip(self.tail)?;
        self.delivering = true;
        Some(bounds)
    }

    pub(super) fn next_after(&self, index: usize) -> Option<usize> {
        self.entry(index)?.next
    }

    /// Take the sink at `index` out for invocation if it wants `bits`
    pub(super) fn checkout(&mut self, index: usize, bits: u32) -> Option<(SubscriptionId, BoxedSink<E>)> {
        let slot = self.slots.get_mut(index)?;
        let entry = slot.entry.as_mut()?;
        if entry.retired || entry.mask.bits() & bits == 0 {
            return None;
        }
        let sink = entry.sink.take()?;
        let id = SubscriptionId {
            index,
            generation: slot.generation,
        };
        Some((id, sink))
    }

    /// Put an invoked sink back; drops it if it unsubscribed in the meantime
    pub(super) fn checkin(&mut self, id: SubscriptionId, sink: BoxedSink<E>) {
        if self.is_subscribed(id) {
            if let Some(entry) = self.entry_mut(id.index) {
                entry.sink = Some(sink);
            }
        } else {
            trace!(subscription = %id, "releasing sink of self-removed subscription");
        }
    }

    /// Finish a pass, unlinking everything tombstoned during it
    pub(super) fn end_pass(&mut self) {
        self.delivering = false;
        for index in std::mem::take(&mut self.retired) {
            self.release(index);
        }
    }

    // -- internals ----------------------------------------------------------

    fn entry(&self, index: usize) -> Option<&Entry<E>> {
        self.slots.get(index)?.entry.as_ref()
    }

    fn entry_mut(&mut self, index: usize) -> Option<&mut Entry<E>> {
        self.slots.get_mut(index)?.entry.as_mut()
    }

    fn is_live(&self, index: usize) -> bool {
        self.entry(index).is_some_and(|entry| !entry.retired)
    }

    /// Retire a live entry: bump the generation so its handle goes stale,
    /// then unlink now or tombstone until the running pass ends.
    fn remove(&mut self, index: usize) {
        let delivering = self.delivering;
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.active -= 1;

        if delivering {
            if let Some(entry) = slot.entry.as_mut() {
                entry.retired = true;
                entry.sink = None;
            }
            self.retired.push(index);
        } else {
            self.release(index);
        }
    }

    fn release(&mut self, index: usize) {
        let Some(entry) = self.slots.get_mut(index).and_then(|slot| slot.entry.take()) else {
            return;
        };

        match entry.prev {
            Some(prev) => {
                if let Some(p) = self.entry_mut(prev) {
                    p.next = entry.next;
                }
            }
            None => self.head = entry.next,
        }
        match entry.next {
            Some(next) => {
                if let Some(n) = self.entry_mut(next) {
                    n.prev = entry.prev;
                }
            }
            None => self.tail = entry.prev,
        }
        self.free.push(index);
    }
}

impl<E: Entities> Default for Subscriptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entities> fmt::Debug for Subscriptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("active", &self.active)
            .field("slots", &self.slots.len())
            .field("delivering", &self.delivering)
            .finish()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
