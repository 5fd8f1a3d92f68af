//! Discrete units of work queued by the engine.
//!
//! A step mutates the encounter, may push follow-up steps to the front of the
//! queue, and may ask the driver to pause before the next one runs.

use super::{Pause, Signal, sweep};
use crate::actor::{Defeat, Pose, attack};
use crate::encounter::Encounter;
use crate::grid::path_cost;
use crate::state::{EntityId, Path, Side, TurnAction};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Step {
    Skip {
        actor: EntityId,
    },
    /// Moves `actor` onto `path[next]`.
    Walk {
        actor: EntityId,
        path: Path,
        next: usize,
    },
    /// Closes a traversal: charges move points and records it.
    Settle {
        actor: EntityId,
        path: Path,
    },
    /// Opens an attack window if the two actors are live and adjacent.
    Strike {
        attacker: EntityId,
        defender: EntityId,
    },
    Impact {
        attacker: EntityId,
        defender: EntityId,
    },
    Fall {
        attacker: EntityId,
        defender: EntityId,
        damage: u32,
    },
    RecordAttack {
        attacker: EntityId,
        defender: EntityId,
        damage: u32,
        defeated: bool,
    },
    EndPlayerTurn,
    /// Plans the first active enemy at or after actor index `cursor`.
    EnemyTurn {
        cursor: usize,
    },
    EndSweep,
}

#[derive(Debug, Default)]
pub(crate) struct StepOutcome {
    pub follow_ups: Vec<Step>,
    pub pause: Option<Pause>,
}

impl StepOutcome {
    fn then(follow_ups: Vec<Step>) -> Self {
        Self {
            follow_ups,
            pause: None,
        }
    }

    fn pause(mut self, pause: Pause) -> Self {
        self.pause = Some(pause);
        self
    }
}

impl Step {
    pub(crate) fn execute(self, enc: &mut Encounter, signals: &mut Vec<Signal>) -> StepOutcome {
        match self {
            Step::Skip { actor } => {
                record(enc, signals, actor, TurnAction::SkipTurn);
                StepOutcome::default()
            }
            Step::Walk { actor, path, next } => walk(enc, signals, actor, path, next),
            Step::Settle { actor, path } => settle(enc, signals, actor, path),
            Step::Strike { attacker, defender } => strike(enc, signals, attacker, defender),
            Step::Impact { attacker, defender } => impact(enc, signals, attacker, defender),
            Step::Fall {
                attacker,
                defender,
                damage,
            } => {
                let policy = enc.config().death_policy;
                let respawn_at = enc.respawn_tile(defender);
                if let Some(actor) = enc.actor_mut(defender) {
                    let defeat = actor.apply_defeat(policy);
                    if let (Defeat::Respawned, Some(tile)) = (defeat, respawn_at) {
                        actor.position = tile;
                    }
                    signals.push(Signal::ActorDefeated {
                        actor: defender,
                        defeat,
                    });
                }
                StepOutcome::then(vec![Step::RecordAttack {
                    attacker,
                    defender,
                    damage,
                    defeated: true,
                }])
            }
            Step::RecordAttack {
                attacker,
                defender,
                damage,
                defeated,
            } => {
                enc.turn.is_moving = false;
                record(
                    enc,
                    signals,
                    attacker,
                    TurnAction::Attack {
                        target: defender,
                        damage,
                        defeated,
                    },
                );
                StepOutcome::default()
            }
            Step::EndPlayerTurn => {
                record(enc, signals, EntityId::PLAYER, TurnAction::EndTurn);
                enc.turn.current_turn = Side::Enemies;
                signals.push(Signal::TurnStarted {
                    side: Side::Enemies,
                    round: enc.turn.round,
                });
                StepOutcome::then(vec![Step::EnemyTurn { cursor: 1 }]).pause(Pause::Handoff)
            }
            Step::EnemyTurn { cursor } => {
                let next = enc.player().is_active.then(|| {
                    (cursor..enc.actors().len())
                        .find(|&i| enc.actor_at_index(i).is_some_and(|a| a.is_active))
                });
                match next.flatten() {
                    Some(index) => {
                        let mut steps = sweep::plan_enemy(enc, index);
                        steps.push(Step::EnemyTurn { cursor: index + 1 });
                        StepOutcome::then(steps)
                    }
                    None => StepOutcome::then(vec![Step::EndSweep]),
                }
            }
            Step::EndSweep => {
                enc.turn.current_turn = Side::Player;
                enc.turn.round += 1;
                if let Some(player) = enc.actor_mut(EntityId::PLAYER) {
                    player.reset_move_points();
                }
                signals.push(Signal::TurnStarted {
                    side: Side::Player,
                    round: enc.turn.round,
                });
                StepOutcome::default()
            }
        }
    }
}

fn record(enc: &mut Encounter, signals: &mut Vec<Signal>, character: EntityId, action: TurnAction) {
    let record = enc.history.append(character, action).clone();
    signals.push(Signal::Recorded(record));
}

fn walk(
    enc: &mut Encounter,
    signals: &mut Vec<Signal>,
    id: EntityId,
    path: Path,
    next: usize,
) -> StepOutcome {
    let Some(&to) = path.get(next) else {
        return StepOutcome::then(vec![Step::Settle { actor: id, path }]);
    };
    let Some(actor) = enc.actor_mut(id) else {
        return StepOutcome::default();
    };

    let from = actor.position;
    actor.position = to;
    actor.pose = Pose::Run;
    enc.turn.is_moving = true;
    signals.push(Signal::ActorMoved { actor: id, from, to });

    let follow_up = if next + 1 < path.len() {
        Step::Walk {
            actor: id,
            path,
            next: next + 1,
        }
    } else {
        Step::Settle { actor: id, path }
    };
    StepOutcome::then(vec![follow_up]).pause(Pause::Step)
}

fn settle(enc: &mut Encounter, signals: &mut Vec<Signal>, id: EntityId, path: Path) -> StepOutcome {
    enc.turn.is_moving = false;
    let cost = path_cost(&path).unwrap_or(0.0);
    let Some(actor) = enc.actor_mut(id) else {
        return StepOutcome::default();
    };

    actor.pose = Pose::Idle;
    actor.move_points = (actor.move_points - cost).max(0.0);
    let position = actor.position;
    if let Some(patrol) = actor.patrol_mut()
        && patrol.current() == Some(position)
    {
        patrol.advance();
    }

    record(enc, signals, id, TurnAction::Move { path });

    let exit = if id.is_player() {
        enc.map().exit_at(position).map(str::to_owned)
    } else {
        None
    };
    if let Some(target) = exit {
        record(
            enc,
            signals,
            id,
            TurnAction::Exit {
                position,
                target: target.clone(),
            },
        );
        signals.push(Signal::MapExit { position, target });
    }
    StepOutcome::default()
}

fn strike(
    enc: &mut Encounter,
    signals: &mut Vec<Signal>,
    attacker: EntityId,
    defender: EntityId,
) -> StepOutcome {
    let ready = match (enc.actor(attacker), enc.actor(defender)) {
        (Some(a), Some(d)) => a.is_active && d.is_active && a.is_adjacent(d),
        _ => false,
    };
    if !ready {
        return StepOutcome::default();
    }

    enc.turn.is_moving = true;
    if let Some(actor) = enc.actor_mut(attacker) {
        actor.pose = Pose::Attack;
    }
    if let Some(actor) = enc.actor_mut(defender) {
        actor.pose = Pose::Hit;
    }
    signals.push(Signal::AttackStarted { attacker, defender });
    StepOutcome::then(vec![Step::Impact { attacker, defender }]).pause(Pause::Attack)
}

fn impact(
    enc: &mut Encounter,
    signals: &mut Vec<Signal>,
    attacker: EntityId,
    defender: EntityId,
) -> StepOutcome {
    let damage = enc.actor(attacker).map_or(0, |a| a.damage);
    let Some(target) = enc.actor_mut(defender) else {
        return StepOutcome::default();
    };

    let outcome = attack(attacker, damage, target);
    if !outcome.defeated {
        target.pose = Pose::Idle;
    }
    if let Some(actor) = enc.actor_mut(attacker) {
        actor.pose = Pose::Idle;
    }
    signals.push(Signal::AttackResolved {
        attacker,
        defender,
        outcome,
    });

    if outcome.defeated {
        StepOutcome::then(vec![Step::Fall {
            attacker,
            defender,
            damage,
        }])
        .pause(Pause::Death)
    } else {
        StepOutcome::then(vec![Step::RecordAttack {
            attacker,
            defender,
            damage,
            defeated: false,
        }])
    }
}
