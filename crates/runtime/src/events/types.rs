//! Event payloads published by the simulation worker.

use serde::{Deserialize, Serialize};

use tactics_core::{AttackOutcome, Defeat, Encounter, EntityId, Position, Side, Signal, TurnRecord};

use super::Topic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    TurnStarted {
        side: Side,
        round: u64,
    },
    ActorMoved {
        actor: EntityId,
        from: Position,
        to: Position,
    },
    AttackStarted {
        attacker: EntityId,
        defender: EntityId,
    },
    AttackResolved {
        attacker: EntityId,
        defender: EntityId,
        outcome: AttackOutcome,
    },
    /// The actor was deactivated and leaves the encounter.
    ActorDefeated {
        actor: EntityId,
    },
    /// The actor was defeated and returned to its spawn tile.
    ActorRespawned {
        actor: EntityId,
        position: Position,
    },
    HistoryAppended(TurnRecord),
    /// Hand-off point for the map loader.
    MapExit {
        position: Position,
        target: String,
    },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::TurnStarted { .. } => Topic::Turn,
            Event::ActorMoved { .. }
            | Event::AttackStarted { .. }
            | Event::AttackResolved { .. }
            | Event::ActorDefeated { .. }
            | Event::ActorRespawned { .. } => Topic::Actors,
            Event::HistoryAppended(_) => Topic::History,
            Event::MapExit { .. } => Topic::Map,
        }
    }

    /// Translates an engine signal, reading the settled encounter for
    /// details the signal does not carry.
    pub(crate) fn from_signal(signal: Signal, encounter: &Encounter) -> Self {
        match signal {
            Signal::TurnStarted { side, round } => Event::TurnStarted { side, round },
            Signal::ActorMoved { actor, from, to } => Event::ActorMoved { actor, from, to },
            Signal::AttackStarted { attacker, defender } => {
                Event::AttackStarted { attacker, defender }
            }
            Signal::AttackResolved {
                attacker,
                defender,
                outcome,
            } => Event::AttackResolved {
                attacker,
                defender,
                outcome,
            },
            Signal::ActorDefeated {
                actor,
                defeat: Defeat::Deactivated,
            } => Event::ActorDefeated { actor },
            Signal::ActorDefeated {
                actor,
                defeat: Defeat::Respawned,
            } => Event::ActorRespawned {
                actor,
                position: encounter
                    .actor(actor)
                    .map_or(Position::ORIGIN, |a| a.position),
            },
            Signal::Recorded(record) => Event::HistoryAppended(record),
            Signal::MapExit { position, target } => Event::MapExit { position, target },
        }
    }
}
