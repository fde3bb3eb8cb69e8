// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber-side interface
//!
//! A subscriber hands the bus an [`EventSink`]. The sink is the subscriber's
//! context: whatever state it carries is passed back, untouched by the bus,
//! on every callback.

use super::code::{AddressEvent, Category, ConnectionEvent, LinkEvent};
use super::mask::EventMask;
use super::registry::Subscriptions;

/// The entity types a router core raises events about.
///
/// The bus never looks inside these; it only forwards references.
pub trait Entities {
    type Connection: ?Sized;
    type Link: ?Sized;
    type Address: ?Sized;
}

/// Receives events for one subscription.
///
/// Each handler gets the registry so it can subscribe or unsubscribe while
/// the event is being delivered. It does not get the bus: a handler cannot
/// raise another event from inside a delivery pass.
pub trait EventSink<E: Entities> {
    /// Categories this sink supplies handlers for.
    ///
    /// A subscription whose mask reaches into a category missing here is
    /// rejected at subscribe time.
    fn handles(&self) -> EventMask;

    fn on_connection(
        &mut self,
        _subs: &mut Subscriptions<E>,
        _event: ConnectionEvent,
        _conn: &E::Connection,
    ) {
    }

    fn on_link(&mut self, _subs: &mut Subscriptions<E>, _event: LinkEvent, _link: &E::Link) {}

    fn on_address(
        &mut self,
        _subs: &mut Subscriptions<E>,
        _event: AddressEvent,
        _addr: &E::Address,
    ) {
    }
}

type ConnectionFn<E> =
    Box<dyn FnMut(&mut Subscriptions<E>, ConnectionEvent, &<E as Entities>::Connection)>;
type LinkFn<E> = Box<dyn FnMut(&mut Subscriptions<E>, LinkEvent, &<E as Entities>::Link)>;
type AddressFn<E> = Box<dyn FnMut(&mut Subscriptions<E>, AddressEvent, &<E as Entities>::Address)>;

/// Closure-backed sink with up to one handler per category
///
/// ```ignore
/// let sink = Callbacks::new().on_address(|_subs, event, addr| {
///     tracing::info!(%event, ?addr, "address changed");
/// });
/// bus.subscribe(AddressEvent::Added | AddressEvent::Removed, sink)?;
/// ```
pub struct Callbacks<E: Entities> {
    connection: Option<ConnectionFn<E>>,
    link: Option<LinkFn<E>>,
    address: Option<AddressFn<E>>,
}

impl<E: Entities> Callbacks<E> {
    pub fn new() -> Self {
        Self {
            connection: None,
            link: None,
            address: None,
        }
    }

    pub fn on_connection<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Subscriptions<E>, ConnectionEvent, &E::Connection) + 'static,
    {
        self.connection = Some(Box::new(f));
        self
    }

    pub fn on_link<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Subscriptions<E>, LinkEvent, &E::Link) + 'static,
    {
        self.link = Some(Box::new(f));
        self
    }

    pub fn on_address<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Subscriptions<E>, AddressEvent, &E::Address) + 'static,
    {
        self.address = Some(Box::new(f));
        self
    }
}

impl<E: Entities> Default for Callbacks<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entities> EventSink<E> for Callbacks<E> {
    fn handles(&self) -> EventMask {
        let mut mask = EventMask::NONE;
        if self.connection.is_some() {
            mask |= Category::Connection;
        }
        if self.link.is_some() {
            mask |= Category::Link;
        }
        if self.address.is_some() {
            mask |= Category::Address;
        }
        mask
    }

    fn on_connection(
        &mut self,
        subs: &mut Subscriptions<E>,
        event: ConnectionEvent,
        conn: &E::Connection,
    ) {
        if let Some(f) = self.connection.as_mut() {
            f(subs, event, conn);
        }
    }

    fn on_link(&mut self, subs: &mut Subscriptions<E>, event: LinkEvent, link: &E::Link) {
        if let Some(f) = self.link.as_mut() {
            f(subs, event, link);
        }
    }

    fn on_address(&mut self, subs: &mut Subscriptions<E>, event: AddressEvent, addr: &E::Address) {
        if let Some(f) = self.address.as_mut() {
            f(subs, event, addr);
        }
    }
}
