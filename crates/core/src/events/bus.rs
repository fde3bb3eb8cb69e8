// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for routing router-core events to subscribers
//!
//! Each raise walks the registry head to tail and calls the matching
//! subscriptions' handlers inline. The cursor's next stop is read before a
//! handler runs, so handlers may unsubscribe themselves or anyone else.
//! Subscriptions added by a handler are not visited until the next raise.
//!
//! The bus holds boxed sinks that are not `Send`, so it stays on the thread
//! that owns it.

use super::code::{AddressEvent, ConnectionEvent, EventCode, LinkEvent};
use super::error::EventError;
use super::mask::EventMask;
use super::registry::{SubscriptionId, Subscriptions};
use super::sink::{Entities, EventSink};
use crate::config::BusConfig;
use tracing::trace;

/// The event bus routes raised events to matching subscribers
pub struct EventBus<E: Entities> {
    subs: Subscriptions<E>,
    config: BusConfig,
}

impl<E: Entities> EventBus<E> {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            subs: Subscriptions::with_capacity(config.initial_capacity),
            config,
        }
    }

    /// Subscribe `sink` to the events in `mask`
    pub fn subscribe<S>(
        &mut self,
        mask: impl Into<EventMask>,
        sink: S,
    ) -> Result<SubscriptionId, EventError>
    where
        S: EventSink<E> + 'static,
    {
        self.subs.subscribe(mask, sink)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), EventError> {
        self.subs.unsubscribe(id)
    }

    pub fn subscriptions(&self) -> &Subscriptions<E> {
        &self.subs
    }

    pub fn subscriptions_mut(&mut self) -> &mut Subscriptions<E> {
        &mut self.subs
    }

    /// Get count of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subs.len()
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Release every subscription, as on core shutdown
    pub fn clear(&mut self) {
        self.subs.clear();
    }

    /// Deliver a connection event. Returns how many handlers ran.
    pub fn raise_connection(&mut self, event: ConnectionEvent, conn: &E::Connection) -> usize {
        self.deliver(event.into(), |sink, subs| sink.on_connection(subs, event, conn))
    }

    /// Deliver a link event. Returns how many handlers ran.
    pub fn raise_link(&mut self, event: LinkEvent, link: &E::Link) -> usize {
        self.deliver(event.into(), |sink, subs| sink.on_link(subs, event, link))
    }

    /// Deliver an address event. Returns how many handlers ran.
    pub fn raise_address(&mut self, event: AddressEvent, addr: &E::Address) -> usize {
        self.deliver(event.into(), |sink, subs| sink.on_address(subs, event, addr))
    }

    fn deliver<F>(&mut self, event: EventCode, mut invoke: F) -> usize
    where
        F: FnMut(&mut (dyn EventSink<E> + 'static), &mut Subscriptions<E>),
    {
        let Some((mut cursor, last)) = self.subs.begin_pass() else {
            return 0;
        };

        let mut delivered = 0;
        loop {
            // Capture before invoking: the handler may retire this entry.
            let next = if cursor == last {
                None
            } else {
                self.subs.next_after(cursor)
            };

            if let Some((id, mut sink)) = self.subs.checkout(cursor, event.bits()) {
                invoke(&mut *sink, &mut self.subs);
                self.subs.checkin(id, sink);
                delivered += 1;
            }

            match next {
                Some(index) => cursor = index,
                None => break,
            }
        }
        self.subs.end_pass();

        if self.config.trace_deliveries {
            trace!(%event, delivered, "event raised");
        }
        delivered
    }
}

impl<E: Entities> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
