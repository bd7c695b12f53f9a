//! Ordered event handling

mod dispatcher;

pub use dispatcher::{channel, handle_event, EventDispatcher, EventSender};
