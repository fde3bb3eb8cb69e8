// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! router-core: event notifications for the router core
//!
//! This crate provides:
//! - The connection, link, and address event taxonomy
//! - A subscription registry that tolerates changes during delivery
//! - An event bus that raises events to subscribers in registration order
//! - TOML configuration for the bus

pub mod config;
pub mod events;

// Re-exports
pub use config::{BusConfig, ConfigError};
pub use events::{
    AddressEvent, Callbacks, Category, ConnectionEvent, Entities, EventBus, EventCode,
    EventError, EventMask, EventSink, LinkEvent, SubscriptionId, Subscriptions,
};
