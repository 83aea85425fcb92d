// Score update transport
//
// Producers publish ScoreUpdateEvents on the EventBus; the EventDispatcher
// fans each event out to the registered handlers with timeout and bounded
// retry.

pub use bus::EventBus;
pub use dispatcher::EventDispatcher;
pub use events::ScoreUpdateEvent;
pub use handler::{EventError, EventHandler};

mod bus;
mod dispatcher;
mod events;
mod handler;
