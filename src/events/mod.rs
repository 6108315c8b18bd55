//! Game event notifications
//!
//! A standalone publish/subscribe registry. The progression engine and the
//! HTTP handlers publish into it; subscribers (logging by default) observe.

mod event;
mod logging;
mod notifier;

pub use event::{GameEvent, Topic};
pub use logging::{describe, register_logging_subscribers};
pub use notifier::{Delivery, EventNotifier, SubscriptionId};
