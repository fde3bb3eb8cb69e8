// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event codes raised by the router core
//!
//! Every code is a single bit. The bits are split into three disjoint
//! ranges, one per category:
//!
//! ```text
//!   0x0000_003F  connection events
//!   0x0000_1F00  link events
//!   0x00FF_0000  address events
//! ```
//!
//! New events take an unused bit inside their category's range. A retired
//! bit is never handed out again.

use super::error::EventError;
use std::fmt;
use std::str::FromStr;

/// Which of the three event ranges a code belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Connection,
    Link,
    Address,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Connection, Category::Link, Category::Address];

    /// OR of every code in this category
    pub const fn range_bits(self) -> u32 {
        match self {
            Category::Connection => 0x0000_003F,
            Category::Link => 0x0000_1F00,
            Category::Address => 0x00FF_0000,
        }
    }

    /// Name prefix used by every event in this category
    pub fn name(self) -> &'static str {
        match self {
            Category::Connection => "connection",
            Category::Link => "link",
            Category::Address => "address",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declares one category's events: the enum, its bit values and names.
macro_rules! event_codes {
    (
        $(#[$meta:meta])*
        $name:ident => $code:ident, $category:expr, {
            $( $(#[$vmeta:meta])* $variant:ident = $bits:literal => $action:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $bits, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            pub const CATEGORY: Category = $category;

            /// The single bit this event occupies
            pub const fn bits(self) -> u32 {
                self as u32
            }

            /// Stable `category:action` name
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $action, )+
                }
            }

            /// The `action` half of the name
            fn action(self) -> &'static str {
                let name = self.name();
                name.split_once(':').map_or(name, |(_, action)| action)
            }

            fn from_action(action: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|e| e.action() == action)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl From<$name> for EventCode {
            fn from(event: $name) -> Self {
                EventCode::$code(event)
            }
        }
    };
}

event_codes! {
    /// State changes of a transport-level connection
    ConnectionEvent => Connection, Category::Connection, {
        /// A connection has opened
        Opened = 0x0000_0001 => "connection:opened",
        /// A connection has closed
        Closed = 0x0000_0002 => "connection:closed",
        /// An edge connection has been established
        EdgeEstablished = 0x0000_0004 => "connection:edge-established",
        /// An edge connection has been lost
        EdgeLost = 0x0000_0008 => "connection:edge-lost",
        /// An inter-router connection has been established
        InterRouterEstablished = 0x0000_0010 => "connection:ir-established",
        /// An inter-router connection has been lost
        InterRouterLost = 0x0000_0020 => "connection:ir-lost",
    }
}

event_codes! {
    /// State changes of a message-carrying link
    LinkEvent => Link, Category::Link, {
        /// An inbound link has been attached
        InAttached = 0x0000_0100 => "link:in-attached",
        /// An inbound link has been detached
        InDetached = 0x0000_0200 => "link:in-detached",
        /// An outbound link has been attached
        OutAttached = 0x0000_0400 => "link:out-attached",
        /// An outbound link has been detached
        OutDetached = 0x0000_0800 => "link:out-detached",
        /// On an edge router, the outgoing message link(s) are attached
        EdgeOutlink = 0x0000_1000 => "link:edge-outlink",
    }
}

event_codes! {
    /// Changes in an address's destination-count classification
    AddressEvent => Address, Category::Address, {
        /// An address has been added
        Added = 0x0001_0000 => "address:added",
        /// An address has been removed
        Removed = 0x0002_0000 => "address:removed",
        /// Zero to one local destination
        BecameLocalDest = 0x0004_0000 => "address:became-local-dest",
        /// One to zero local destinations
        NoLongerLocalDest = 0x0008_0000 => "address:no-longer-local-dest",
        /// Zero to one destination
        BecameDest = 0x0010_0000 => "address:became-dest",
        /// One to zero destinations
        NoLongerDest = 0x0020_0000 => "address:no-longer-dest",
        /// N destinations to one local destination
        OneLocalDest = 0x0040_0000 => "address:one-local-dest",
        /// One local destination to two destinations of any kind
        TwoDest = 0x0080_0000 => "address:two-dest",
    }
}

/// Any event code, tagged with its category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventCode {
    Connection(ConnectionEvent),
    Link(LinkEvent),
    Address(AddressEvent),
}

impl EventCode {
    /// Every defined code, in bit order
    pub fn all() -> impl Iterator<Item = EventCode> {
        let conns = ConnectionEvent::ALL.iter().copied().map(EventCode::from);
        let links = LinkEvent::ALL.iter().copied().map(EventCode::from);
        let addrs = AddressEvent::ALL.iter().copied().map(EventCode::from);
        conns.chain(links).chain(addrs)
    }

    /// Look up the code occupying exactly `bits`
    pub fn from_bits(bits: u32) -> Option<EventCode> {
        Self::all().find(|code| code.bits() == bits)
    }

    pub fn bits(self) -> u32 {
        match self {
            EventCode::Connection(e) => e.bits(),
            EventCode::Link(e) => e.bits(),
            EventCode::Address(e) => e.bits(),
        }
    }

    pub fn category(self) -> Category {
        match self {
            EventCode::Connection(_) => Category::Connection,
            EventCode::Link(_) => Category::Link,
            EventCode::Address(_) => Category::Address,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventCode::Connection(e) => e.name(),
            EventCode::Link(e) => e.name(),
            EventCode::Address(e) => e.name(),
        }
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventCode {
    type Err = EventError;

    /// Parse a `category:action` name, e.g. `"address:became-dest"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || EventError::UnknownEvent(s.to_string());
        let (category, action) = s.split_once(':').ok_or_else(unknown)?;
        let code = match Category::from_name(category).ok_or_else(unknown)? {
            Category::Connection => ConnectionEvent::from_action(action).map(EventCode::from),
            Category::Link => LinkEvent::from_action(action).map(EventCode::from),
            Category::Address => AddressEvent::from_action(action).map(EventCode::from),
        };
        code.ok_or_else(unknown)
    }
}

#[cfg(test)]
#[path = "code_tests.rs"]
mod tests;
