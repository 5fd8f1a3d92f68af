//! Topic-based event bus for runtime events.
//!
//! Engine signals are translated into [`Event`]s and published to a topic;
//! consumers subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::Event;
