// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors reported by the event bus

use super::code::Category;
use super::mask::EventMask;
use super::registry::SubscriptionId;
use thiserror::Error;

/// Contract violations caught by the bus.
///
/// None of these are environmental: every variant is a caller bug, and the
/// registry is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The mask asks for events in a category the sink has no handler for
    #[error("subscription requests {category} events ({mask:?}) but supplies no {category} handler")]
    MissingHandler { category: Category, mask: EventMask },

    /// Unknown, stale, or already removed subscription handle
    #[error("unknown subscription: {0}")]
    UnknownSubscription(SubscriptionId),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Raw mask bits outside every event range
    #[error("undefined event bits: {0:#010x}")]
    UndefinedBits(u32),
}
