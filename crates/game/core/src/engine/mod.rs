//! Turn state machine.
//!
//! [`TurnEngine`] is the only writer of an [`Encounter`]. A player command is
//! validated up front and expanded into a queue of discrete steps; the engine
//! then executes steps until it reaches a pacing point and reports which
//! [`Pause`] the caller should wait out before calling
//! [`TurnEngine::advance`] again. The async runtime sleeps for the configured
//! duration; tests simply keep advancing.
//!
//! Ordering guarantees fall out of the queue: a traversal's waypoints are all
//! visited before the attack tied to it, an attack (including the defender's
//! death) fully resolves before its history entry, and the turn is handed off
//! only after both.

mod commands;
mod errors;
mod steps;
mod sweep;

pub use errors::Rejection;
pub(crate) use steps::Step;

use crate::actor::{AttackOutcome, Defeat};
use crate::encounter::Encounter;
use crate::state::{EntityId, Path, Position, Side, TurnRecord};

/// One action chosen by the input layer for the player's turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlayerCommand {
    /// End the turn without acting.
    Skip,
    /// Walk to a destination; the engine searches and validates the path.
    MoveTo(Position),
    /// Walk an already computed path starting at the player's tile.
    FollowPath(Path),
    /// Attack an enemy, approaching it first if it is not adjacent.
    Attack(EntityId),
}

/// Pacing point reached by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pause {
    /// After each waypoint of a traversal.
    Step,
    /// Attack and hit animations.
    Attack,
    /// Death animation before the defeat policy applies.
    Death,
    /// Between the player's turn and the enemy sweep.
    Handoff,
}

/// Observable effects produced while advancing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Signal {
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
    ActorDefeated {
        actor: EntityId,
        defeat: Defeat,
    },
    /// A record was appended to the turn history.
    Recorded(TurnRecord),
    /// The player settled on an exit; the map loader takes it from here.
    MapExit {
        position: Position,
        target: String,
    },
}

/// Result of one [`TurnEngine::advance`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Advance {
    pub signals: Vec<Signal>,
    /// `None` once the queue is drained and the engine waits for input.
    pub pause: Option<Pause>,
}

/// Everything produced by [`TurnEngine::run_to_idle`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Playback {
    pub signals: Vec<Signal>,
    pub pauses: Vec<Pause>,
}

/// Drives an [`Encounter`] through turns.
pub struct TurnEngine<'a> {
    encounter: &'a mut Encounter,
}

impl<'a> TurnEngine<'a> {
    pub fn new(encounter: &'a mut Encounter) -> Self {
        Self { encounter }
    }

    /// Validates `command` and queues its steps.
    ///
    /// On rejection nothing changes: no state mutation, no history entry.
    pub fn submit(&mut self, command: PlayerCommand) -> Result<(), Rejection> {
        let steps = commands::plan(self.encounter, command)?;
        self.encounter.pending.extend(steps);
        Ok(())
    }

    /// Executes queued steps up to the next pacing point.
    pub fn advance(&mut self) -> Advance {
        let mut signals = Vec::new();
        while let Some(step) = self.encounter.pending.pop_front() {
            let outcome = step.execute(self.encounter, &mut signals);
            for follow_up in outcome.follow_ups.into_iter().rev() {
                self.encounter.pending.push_front(follow_up);
            }
            if let Some(pause) = outcome.pause {
                return Advance {
                    signals,
                    pause: Some(pause),
                };
            }
        }
        Advance {
            signals,
            pause: None,
        }
    }

    /// Advances until idle without waiting out any pause.
    pub fn run_to_idle(&mut self) -> Playback {
        let mut playback = Playback::default();
        loop {
            let advance = self.advance();
            playback.signals.extend(advance.signals);
            match advance.pause {
                Some(pause) => playback.pauses.push(pause),
                None => return playback,
            }
        }
    }

    pub fn encounter(&self) -> &Encounter {
        self.encounter
    }
}

#[cfg(test)]
mod tests;
