// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Router-core event notifications
//!
//! This module provides:
//! - `ConnectionEvent`, `LinkEvent`, `AddressEvent` - the event taxonomy
//! - `EventMask` - sets of events a subscriber asks for
//! - `EventSink` / `Callbacks` - what a subscriber hands the bus
//! - `Subscriptions` - the ordered subscription registry
//! - `EventBus` - raises events to matching subscribers, in order

mod bus;
mod code;
mod error;
mod mask;
mod registry;
mod sink;

pub use bus::EventBus;
pub use code::{AddressEvent, Category, ConnectionEvent, EventCode, LinkEvent};
pub use error::EventError;
pub use mask::EventMask;
pub use registry::{SubscriptionId, Subscriptions};
pub use sink::{Callbacks, Entities, EventSink};

#[cfg(test)]
mod fixtures;
