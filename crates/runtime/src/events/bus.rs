//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::Event;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Turn ownership changes
    Turn,
    /// Movement, attacks, defeats and respawns
    Actors,
    /// Every record appended to the turn history
    History,
    /// Map exit triggers
    Map,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Turn, Topic::Actors, Topic::History, Topic::Map];
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events sent while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    turn: broadcast::Sender<Event>,
    actors: broadcast::Sender<Event>,
    history: broadcast::Sender<Event>,
    map: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turn: broadcast::channel(capacity).0,
            actors: broadcast::channel(capacity).0,
            history: broadcast::channel(capacity).0,
            map: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Turn => &self.turn,
            Topic::Actors => &self.actors,
            Topic::History => &self.history,
            Topic::Map => &self.map,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{EntityId, Position, Side};

    #[test]
    fn events_only_reach_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut turn_rx = bus.subscribe(Topic::Turn);
        let mut actors_rx = bus.subscribe(Topic::Actors);

        bus.publish(Event::TurnStarted {
            side: Side::Enemies,
            round: 0,
        });
        bus.publish(Event::ActorMoved {
            actor: EntityId(1),
            from: Position::new(0, 0),
            to: Position::new(1, 0),
        });

        assert!(matches!(turn_rx.try_recv(), Ok(Event::TurnStarted { .. })));
        assert!(turn_rx.try_recv().is_err());
        assert!(matches!(actors_rx.try_recv(), Ok(Event::ActorMoved { .. })));
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::MapExit {
            position: Position::ORIGIN,
            target: "cave".to_owned(),
        });
        assert_eq!(bus.subscribe_multiple(&Topic::ALL).len(), 4);
    }
}
