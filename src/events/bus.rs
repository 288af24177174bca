// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! In-process publish/subscribe dispatcher.
//!
//! Handlers are invoked synchronously, in the order they subscribed, for every
//! event of the kind they asked for. A handler never calls back into the bus:
//! it is handed an [`Outbox`] and anything it publishes there is delivered
//! once the current event has reached every subscriber.

use std::{collections::VecDeque, fmt::Debug};

use log::{trace, warn};

/// Upper bound on events delivered by a single [`EventBus::dispatch`] call,
/// including the cascade of follow-ups.
pub const MAX_CASCADE: usize = 64;

pub trait BusEvent: Debug {
    type Kind: Copy + Eq + Debug;

    fn kind(&self) -> Self::Kind;
}

/// Collects events published by a handler during dispatch.
pub struct Outbox<E> {
    events: VecDeque<E>,
}

impl<E> Outbox<E> {
    fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    pub fn publish(&mut self, event: E) {
        self.events.push_back(event);
    }

    pub fn publish_all(&mut self, events: impl IntoIterator<Item = E>) {
        self.events.extend(events);
    }
}

pub type Handler<E> = Box<dyn FnMut(&E, &mut Outbox<E>) -> anyhow::Result<()>>;

struct Subscription<E: BusEvent> {
    kind: Option<E::Kind>,
    handler: Handler<E>,
}

pub struct EventBus<E: BusEvent> {
    subscriptions: Vec<Subscription<E>>,
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Registers a handler for one kind of event.
    pub fn subscribe<F>(&mut self, kind: E::Kind, handler: F)
    where
        F: FnMut(&E, &mut Outbox<E>) -> anyhow::Result<()> + 'static,
    {
        self.subscriptions.push(Subscription {
            kind: Some(kind),
            handler: Box::new(handler),
        });
    }

    /// Registers a handler that sees every event.
    pub fn subscribe_all<F>(&mut self, handler: F)
    where
        F: FnMut(&E, &mut Outbox<E>) -> anyhow::Result<()> + 'static,
    {
        self.subscriptions.push(Subscription {
            kind: None,
            handler: Box::new(handler),
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Delivers an event and everything its handlers publish in response.
    ///
    /// A handler error is logged and does not stop delivery to the remaining
    /// handlers. Returns the number of events delivered.
    pub fn dispatch(&mut self, event: E) -> usize {
        let mut pending = VecDeque::from([event]);
        let mut delivered = 0;

        while let Some(event) = pending.pop_front() {
            if delivered == MAX_CASCADE {
                warn!(
                    "Event cascade limit reached, dropping {:?} and {} more",
                    event,
                    pending.len()
                );
                break;
            }
            delivered += 1;

            trace!("Dispatching {:?}", event);

            let kind = event.kind();
            for subscription in &mut self.subscriptions {
                if subscription.kind.is_some_and(|k| k != kind) {
                    continue;
                }
                let mut outbox = Outbox::new();
                if let Err(e) = (subscription.handler)(&event, &mut outbox) {
                    warn!("Handler for {:?} failed: {:#}", kind, e);
                }
                pending.extend(outbox.events);
            }
        }

        delivered
    }
}
