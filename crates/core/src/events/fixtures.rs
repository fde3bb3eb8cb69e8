// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake router entities and recording sinks for bus tests

use super::{Callbacks, Entities, EventMask, EventSink, Subscriptions};
use super::{AddressEvent, ConnectionEvent, LinkEvent};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conn(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addr(pub &'static str);

pub struct FakeCore;

impl Entities for FakeCore {
    type Connection = Conn;
    type Link = Link;
    type Address = Addr;
}

/// One delivered callback: (subscriber label, event name, entity debug)
pub type Delivery = (&'static str, &'static str, String);

/// Shared delivery log, in call order
#[derive(Clone, Default)]
pub struct DeliveryLog(Rc<RefCell<Vec<Delivery>>>);

impl DeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, label: &'static str, event: &'static str, entity: String) {
        self.0.borrow_mut().push((label, event, entity));
    }

    pub fn entries(&self) -> Vec<Delivery> {
        self.0.borrow().clone()
    }

    /// Subscriber labels, in delivery order
    pub fn labels(&self) -> Vec<&'static str> {
        self.0.borrow().iter().map(|(label, _, _)| *label).collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Sink with handlers for all three categories that records every call
pub struct Recorder {
    pub label: &'static str,
    pub log: DeliveryLog,
}

impl Recorder {
    pub fn new(label: &'static str, log: &DeliveryLog) -> Self {
        Self {
            label,
            log: log.clone(),
        }
    }
}

impl EventSink<FakeCore> for Recorder {
    fn handles(&self) -> EventMask {
        EventMask::ALL
    }

    fn on_connection(&mut self, _subs: &mut Subscriptions<FakeCore>, event: ConnectionEvent, conn: &Conn) {
        self.log.push(self.label, event.name(), format!("{conn:?}"));
    }

    fn on_link(&mut self, _subs: &mut Subscriptions<FakeCore>, event: LinkEvent, link: &Link) {
        self.log.push(self.label, event.name(), format!("{link:?}"));
    }

    fn on_address(&mut self, _subs: &mut Subscriptions<FakeCore>, event: AddressEvent, addr: &Addr) {
        self.log.push(self.label, event.name(), format!("{addr:?}"));
    }
}

/// Closure sink that records address events only
pub fn address_recorder(label: &'static str, log: &DeliveryLog) -> Callbacks<FakeCore> {
    let log = log.clone();
    Callbacks::<FakeCore>::new().on_address(move |_subs, event, addr| {
        log.push(label, event.name(), format!("{addr:?}"));
    })
}
