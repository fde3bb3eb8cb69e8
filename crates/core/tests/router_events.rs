// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Integration tests for the router-core event bus
//!
//! A miniature core owns the bus and raises events at its own state
//! transitions; collaborators subscribe through the public API only.

use router_core::{
    AddressEvent, BusConfig, Callbacks, ConnectionEvent, Entities, EventBus, EventMask, EventSink,
    LinkEvent, SubscriptionId, Subscriptions,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("router_core=trace"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Miniature router core
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Normal,
    Edge,
    InterRouter,
}

#[derive(Debug)]
struct Connection {
    id: u64,
    role: Role,
}

#[derive(Debug)]
struct Link {
    id: u64,
    incoming: bool,
}

#[derive(Debug)]
struct Address {
    key: String,
    local: usize,
    remote: usize,
}

struct Core;

impl Entities for Core {
    type Connection = Connection;
    type Link = Link;
    type Address = Address;
}

/// Owns the bus; raises events at its own transitions
struct RouterCore {
    bus: EventBus<Core>,
}

impl RouterCore {
    fn new() -> Self {
        let config = BusConfig::from_toml_str("[events]\ninitial_capacity = 4\n").unwrap();
        Self {
            bus: EventBus::with_config(config),
        }
    }

    fn open(&mut self, conn: &Connection) {
        self.bus.raise_connection(ConnectionEvent::Opened, conn);
        match conn.role {
            Role::Edge => {
                self.bus.raise_connection(ConnectionEvent::EdgeEstablished, conn);
            }
            Role::InterRouter => {
                self.bus
                    .raise_connection(ConnectionEvent::InterRouterEstablished, conn);
            }
            Role::Normal => {}
        }
    }

    fn close(&mut self, conn: &Connection) {
        match conn.role {
            Role::Edge => {
                self.bus.raise_connection(ConnectionEvent::EdgeLost, conn);
            }
            Role::InterRouter => {
                self.bus.raise_connection(ConnectionEvent::InterRouterLost, conn);
            }
            Role::Normal => {}
        }
        self.bus.raise_connection(ConnectionEvent::Closed, conn);
    }

    fn attach(&mut self, link: &Link) {
        let event = if link.incoming {
            LinkEvent::InAttached
        } else {
            LinkEvent::OutAttached
        };
        self.bus.raise_link(event, link);
    }

    /// Add one local destination, raising the classification changes
    fn add_local_dest(&mut self, addr: &mut Address) {
        addr.local += 1;
        let total = addr.local + addr.remote;
        if addr.local == 1 {
            self.bus.raise_address(AddressEvent::BecameLocalDest, addr);
        }
        if total == 1 {
            self.bus.raise_address(AddressEvent::BecameDest, addr);
        } else if total == 2 && addr.local >= 1 {
            self.bus.raise_address(AddressEvent::TwoDest, addr);
        }
    }

    fn remove_local_dest(&mut self, addr: &mut Address) {
        addr.local -= 1;
        let total = addr.local + addr.remote;
        if addr.local == 0 {
            self.bus.raise_address(AddressEvent::NoLongerLocalDest, addr);
        }
        if total == 0 {
            self.bus.raise_address(AddressEvent::NoLongerDest, addr);
        } else if total == 1 && addr.local == 1 {
            self.bus.raise_address(AddressEvent::OneLocalDest, addr);
        }
    }
}

type Journal = Rc<RefCell<Vec<String>>>;

/// Collaborator that logs everything it is told, with its own context
struct Auditor {
    name: &'static str,
    journal: Journal,
}

impl EventSink<Core> for Auditor {
    fn handles(&self) -> EventMask {
        EventMask::ALL
    }

    fn on_connection(&mut self, _: &mut Subscriptions<Core>, event: ConnectionEvent, conn: &Connection) {
        self.journal
            .borrow_mut()
            .push(format!("{} {} conn={}", self.name, event, conn.id));
    }

    fn on_link(&mut self, _: &mut Subscriptions<Core>, event: LinkEvent, link: &Link) {
        self.journal
            .borrow_mut()
            .push(format!("{} {} link={}", self.name, event, link.id));
    }

    fn on_address(&mut self, _: &mut Subscriptions<Core>, event: AddressEvent, addr: &Address) {
        self.journal
            .borrow_mut()
            .push(format!("{} {} addr={}", self.name, event, addr.key));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn connection_lifecycle_reaches_subscribers_in_order() {
    init_tracing();
    let journal = Journal::default();
    let mut core = RouterCore::new();

    core.bus
        .subscribe(
            EventMask::CONNECTION,
            Auditor {
                name: "policy",
                journal: journal.clone(),
            },
        )
        .unwrap();
    core.bus
        .subscribe(
            ConnectionEvent::EdgeEstablished | ConnectionEvent::EdgeLost,
            Auditor {
                name: "edge",
                journal: journal.clone(),
            },
        )
        .unwrap();

    let conn = Connection {
        id: 7,
        role: Role::Edge,
    };
    core.open(&conn);
    core.close(&conn);

    assert_eq!(
        *journal.borrow(),
        vec![
            "policy connection:opened conn=7",
            "policy connection:edge-established conn=7",
            "edge connection:edge-established conn=7",
            "policy connection:edge-lost conn=7",
            "edge connection:edge-lost conn=7",
            "policy connection:closed conn=7",
        ]
    );
}

#[test]
fn address_transitions_are_classified() {
    init_tracing();
    let journal = Journal::default();
    let mut core = RouterCore::new();
    core.bus
        .subscribe(
            EventMask::ADDRESS,
            Auditor {
                name: "table",
                journal: journal.clone(),
            },
        )
        .unwrap();

    let mut addr = Address {
        key: "M0orders".to_string(),
        local: 0,
        remote: 0,
    };
    core.add_local_dest(&mut addr);
    core.add_local_dest(&mut addr);
    core.remove_local_dest(&mut addr);
    core.remove_local_dest(&mut addr);

    assert_eq!(
        *journal.borrow(),
        vec![
            "table address:became-local-dest addr=M0orders",
            "table address:became-dest addr=M0orders",
            "table address:two-dest addr=M0orders",
            "table address:one-local-dest addr=M0orders",
            "table address:no-longer-local-dest addr=M0orders",
            "table address:no-longer-dest addr=M0orders",
        ]
    );
}

#[test]
fn one_shot_subscription_fires_once() {
    init_tracing();
    let mut core = RouterCore::new();
    let handle: Rc<RefCell<Option<SubscriptionId>>> = Rc::default();
    let fired = Rc::new(RefCell::new(Vec::new()));

    let sink = {
        let (handle, fired) = (handle.clone(), fired.clone());
        Callbacks::<Core>::new().on_link(move |subs, _, link| {
            fired.borrow_mut().push(link.id);
            if let Some(id) = handle.borrow_mut().take() {
                subs.unsubscribe(id).unwrap();
            }
        })
    };
    let id = core.bus.subscribe(LinkEvent::InAttached, sink).unwrap();
    *handle.borrow_mut() = Some(id);

    core.attach(&Link {
        id: 1,
        incoming: true,
    });
    core.attach(&Link {
        id: 2,
        incoming: true,
    });

    assert_eq!(*fired.borrow(), vec![1]);
    assert_eq!(core.bus.subscriber_count(), 0);
    assert!(core.bus.unsubscribe(id).is_err());
}

#[test]
fn inter_router_watch_chains_subscriptions() {
    init_tracing();
    let journal = Journal::default();
    let mut core = RouterCore::new();

    // On the first inter-router connection, start auditing outbound links.
    let sink = {
        let journal = journal.clone();
        let mut armed = false;
        Callbacks::<Core>::new().on_connection(move |subs, _, _| {
            if !armed {
                armed = true;
                let auditor = Auditor {
                    name: "links",
                    journal: journal.clone(),
                };
                subs.subscribe(LinkEvent::OutAttached, auditor).unwrap();
            }
        })
    };
    core.bus
        .subscribe(ConnectionEvent::InterRouterEstablished, sink)
        .unwrap();

    core.attach(&Link {
        id: 1,
        incoming: false,
    });
    core.open(&Connection {
        id: 3,
        role: Role::InterRouter,
    });
    core.open(&Connection {
        id: 4,
        role: Role::Normal,
    });
    core.attach(&Link {
        id: 2,
        incoming: false,
    });
    core.attach(&Link {
        id: 3,
        incoming: true,
    });

    assert_eq!(*journal.borrow(), vec!["links link:out-attached link=2"]);
    assert_eq!(core.bus.subscriber_count(), 2);
}

#[test]
fn shutdown_releases_all_subscriptions() {
    init_tracing();
    let journal = Journal::default();
    let mut core = RouterCore::new();
    for name in ["a", "b", "c"] {
        core.bus
            .subscribe(
                EventMask::ALL,
                Auditor {
                    name,
                    journal: journal.clone(),
                },
            )
            .unwrap();
    }
    assert_eq!(Rc::strong_count(&journal), 4);

    core.bus.clear();
    assert_eq!(core.bus.subscriber_count(), 0);
    assert_eq!(Rc::strong_count(&journal), 1);

    drop(core);
    assert!(journal.borrow().is_empty());
}
