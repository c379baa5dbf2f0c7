//! Simple stateless pub-sub events for the storefront.
//!
//! Side effects that must never fail a request (emails, realtime broadcast) hang off these
//! events. Handlers receive only the event payload; they have no access to engine internals.

mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{OrderCreatedEvent, OrderStatusChangedEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
