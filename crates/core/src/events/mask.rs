// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event masks for subscriptions
//!
//! A mask is the OR of the event codes a subscriber wants. Masks may span
//! several categories; `categories()` tells which callback slots a
//! subscription needs.

use super::code::{AddressEvent, Category, ConnectionEvent, EventCode, LinkEvent};
use super::error::EventError;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Set of event codes, one bit per code
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EventMask(u32);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    pub const CONNECTION: EventMask = EventMask(Category::Connection.range_bits());
    pub const LINK: EventMask = EventMask(Category::Link.range_bits());
    pub const ADDRESS: EventMask = EventMask(Category::Address.range_bits());
    pub const ALL: EventMask = EventMask(
        Category::Connection.range_bits()
            | Category::Link.range_bits()
            | Category::Address.range_bits(),
    );

    /// Build a mask from raw bits, rejecting bits no event occupies
    pub fn from_bits(bits: u32) -> Result<Self, EventError> {
        let undefined = bits & !Self::ALL.0;
        if undefined != 0 {
            return Err(EventError::UndefinedBits(undefined));
        }
        Ok(Self(bits))
    }

    /// Build a mask from event names and wildcards.
    ///
    /// Supports:
    ///   - Exact: "address:added"
    ///   - Category: "link:*" (or "link:**") selects the whole link range
    ///   - Everything: "*" or "**"
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, EventError> {
        let mut mask = Self::NONE;
        for pattern in patterns {
            mask |= Self::from_pattern(pattern.as_ref())?;
        }
        Ok(mask)
    }

    fn from_pattern(pattern: &str) -> Result<Self, EventError> {
        if pattern == "*" || pattern == "**" {
            return Ok(Self::ALL);
        }
        if let Some((category, "*" | "**")) = pattern.split_once(':') {
            return Category::from_name(category)
                .map(Self::from)
                .ok_or_else(|| EventError::UnknownEvent(pattern.to_string()));
        }
        pattern.parse::<EventCode>().map(Self::from)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if the given event is in this mask
    pub fn contains(self, event: impl Into<EventCode>) -> bool {
        self.0 & event.into().bits() != 0
    }

    pub fn intersects(self, other: impl Into<EventMask>) -> bool {
        self.0 & other.into().0 != 0
    }

    /// Categories this mask selects at least one event from
    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::ALL
            .into_iter()
            .filter(move |c| self.0 & c.range_bits() != 0)
    }

    /// The individual event codes in this mask
    pub fn events(self) -> impl Iterator<Item = EventCode> {
        EventCode::all().filter(move |code| self.0 & code.bits() != 0)
    }
}

impl fmt::Debug for EventMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("EventMask(none)");
        }
        let names: Vec<&str> = self.events().map(EventCode::name).collect();
        write!(f, "EventMask({})", names.join(" | "))
    }
}

impl From<EventCode> for EventMask {
    fn from(code: EventCode) -> Self {
        Self(code.bits())
    }
}

impl From<Category> for EventMask {
    fn from(category: Category) -> Self {
        Self(category.range_bits())
    }
}

impl<T: Into<EventMask>> BitOr<T> for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: T) -> EventMask {
        EventMask(self.0 | rhs.into().0)
    }
}

impl<T: Into<EventMask>> BitOrAssign<T> for EventMask {
    fn bitor_assign(&mut self, rhs: T) {
        self.0 |= rhs.into().0;
    }
}

impl<T: Into<EventMask>> BitAnd<T> for EventMask {
    type Output = EventMask;

    fn bitand(self, rhs: T) -> EventMask {
        EventMask(self.0 & rhs.into().0)
    }
}

/// Lets single codes be OR'd straight into a mask:
/// `AddressEvent::Added | AddressEvent::Removed`
macro_rules! mask_ops {
    ($($event:ty),+) => {$(
        impl From<$event> for EventMask {
            fn from(event: $event) -> Self {
                Self(event.bits())
            }
        }

        impl<T: Into<EventMask>> BitOr<T> for $event {
            type Output = EventMask;

            fn bitor(self, rhs: T) -> EventMask {
                EventMask::from(self) | rhs
            }
        }
    )+};
}

mask_ops!(ConnectionEvent, LinkEvent, AddressEvent);

#[cfg(test)]
#[path = "mask_tests.rs"]
mod tests;
