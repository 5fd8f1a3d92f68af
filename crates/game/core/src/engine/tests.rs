use std::sync::Arc;

use super::*;
use crate::actor::{Actor, ActorStats, Defeat};
use crate::config::{DeathPolicy, GameConfig};
use crate::env::{GridMap, MapOracle};
use crate::state::TurnAction;

fn goblin(id: u32, x: i32, y: i32) -> Actor {
    Actor::enemy(EntityId(id), Position::new(x, y), ActorStats::ENEMY, Vec::new())
}

fn build(map: impl MapOracle + 'static, config: GameConfig, enemies: Vec<Actor>) -> Encounter {
    Encounter::new(
        Arc::new(map),
        config,
        Actor::player(Position::ORIGIN, ActorStats::PLAYER),
        enemies,
    )
    .unwrap()
}

fn open(enemies: Vec<Actor>) -> Encounter {
    build(GridMap::open(10, 10), GameConfig::default(), enemies)
}

fn play(enc: &mut Encounter, command: PlayerCommand) -> Playback {
    let mut engine = TurnEngine::new(enc);
    engine.submit(command).unwrap();
    engine.run_to_idle()
}

fn labels(enc: &Encounter) -> Vec<&'static str> {
    enc.history().iter().map(|r| r.action.label()).collect()
}

fn characters(enc: &Encounter) -> Vec<EntityId> {
    enc.history().iter().map(|r| r.character).collect()
}

#[test]
fn skip_ends_turn_and_returns_control() {
    let mut enc = open(Vec::new());
    let playback = play(&mut enc, PlayerCommand::Skip);

    assert_eq!(labels(&enc), ["skip_turn", "end_turn"]);
    assert_eq!(playback.pauses, [Pause::Handoff]);
    assert!(enc.turn().is_player_turn());
    assert_eq!(enc.turn().round, 1);
    assert!(!enc.is_busy());
    assert!(matches!(
        playback.signals.last(),
        Some(Signal::TurnStarted {
            side: Side::Player,
            round: 1
        })
    ));
}

#[test]
fn move_walks_every_waypoint_before_recording() {
    let mut enc = open(Vec::new());
    let mut engine = TurnEngine::new(&mut enc);
    engine.submit(PlayerCommand::MoveTo(Position::new(3, 0))).unwrap();

    let first = engine.advance();
    assert_eq!(first.pause, Some(Pause::Step));
    assert_eq!(
        first.signals,
        [Signal::ActorMoved {
            actor: EntityId::PLAYER,
            from: Position::new(0, 0),
            to: Position::new(1, 0),
        }]
    );
    assert!(engine.encounter().turn().is_moving);
    assert!(engine.encounter().history().is_empty());
    assert_eq!(engine.submit(PlayerCommand::Skip), Err(Rejection::Busy));

    let rest = engine.run_to_idle();
    assert_eq!(rest.pauses, [Pause::Step, Pause::Step, Pause::Handoff]);

    assert_eq!(enc.player().position, Position::new(3, 0));
    assert_eq!(labels(&enc), ["move", "end_turn"]);
    let TurnAction::Move { path } = &enc.history().records()[0].action else {
        panic!("expected a move record");
    };
    assert_eq!(path.len(), 4);
    assert_eq!(enc.player().move_points, ActorStats::PLAYER.move_allowance);
}

#[test]
fn rejected_commands_leave_encounter_untouched() {
    let mut map = GridMap::open(10, 10);
    map.set_terrain(Position::new(5, 5), crate::env::TerrainKind::Wall);
    let mut enc = build(map, GameConfig::default(), vec![goblin(1, 1, 0)]);
    enc.actor_mut(EntityId::PLAYER).unwrap().move_points = 3.0;

    let actors = enc.actors().to_vec();
    let turn = enc.turn().clone();

    let mut engine = TurnEngine::new(&mut enc);
    let cases = [
        (
            PlayerCommand::MoveTo(Position::new(0, 4)),
            Rejection::OutOfRange {
                cost: 4.0,
                budget: 3.0,
            },
        ),
        (
            PlayerCommand::MoveTo(Position::new(5, 5)),
            Rejection::Unreachable(Position::new(5, 5)),
        ),
        (
            PlayerCommand::MoveTo(Position::new(-1, 0)),
            Rejection::Unreachable(Position::new(-1, 0)),
        ),
        (PlayerCommand::FollowPath(Vec::new()), Rejection::EmptyPath),
        (
            PlayerCommand::FollowPath(vec![Position::ORIGIN]),
            Rejection::EmptyPath,
        ),
        (
            PlayerCommand::FollowPath(vec![Position::new(0, 1), Position::new(0, 2)]),
            Rejection::WrongStart {
                expected: Position::ORIGIN,
                found: Position::new(0, 1),
            },
        ),
        (
            PlayerCommand::FollowPath(vec![Position::ORIGIN, Position::new(1, 1)]),
            Rejection::InvalidStep {
                from: Position::ORIGIN,
                to: Position::new(1, 1),
            },
        ),
        (
            PlayerCommand::FollowPath(vec![Position::ORIGIN, Position::new(1, 0)]),
            Rejection::Blocked(Position::new(1, 0)),
        ),
        (
            PlayerCommand::Attack(EntityId(9)),
            Rejection::UnknownTarget(EntityId(9)),
        ),
        (
            PlayerCommand::Attack(EntityId::PLAYER),
            Rejection::InvalidTarget(EntityId::PLAYER),
        ),
    ];
    for (command, expected) in cases {
        assert_eq!(engine.submit(command), Err(expected));
    }

    assert_eq!(enc.actors(), actors.as_slice());
    assert_eq!(enc.turn(), &turn);
    assert!(enc.history().is_empty());
    assert!(!enc.is_busy());
}

#[test]
fn attack_on_inactive_enemy_is_rejected() {
    let mut enc = open(vec![goblin(1, 1, 0)]);
    enc.actor_mut(EntityId(1)).unwrap().is_active = false;

    let mut engine = TurnEngine::new(&mut enc);
    assert_eq!(
        engine.submit(PlayerCommand::Attack(EntityId(1))),
        Err(Rejection::InvalidTarget(EntityId(1)))
    );
}

#[test]
fn approach_then_attack_resolves_before_handoff() {
    let mut enc = open(vec![goblin(1, 3, 0)]);
    let playback = play(&mut enc, PlayerCommand::Attack(EntityId(1)));

    assert_eq!(
        playback.pauses,
        [
            Pause::Step,
            Pause::Step,
            Pause::Attack,
            Pause::Handoff,
            Pause::Attack
        ]
    );
    assert_eq!(labels(&enc), ["move", "attack", "end_turn", "attack"]);
    assert_eq!(
        characters(&enc),
        [EntityId::PLAYER, EntityId::PLAYER, EntityId::PLAYER, EntityId(1)]
    );
    assert_eq!(enc.player().position, Position::new(2, 0));
    assert_eq!(enc.actor(EntityId(1)).unwrap().health, 2);
    assert_eq!(enc.player().health, 8);
}

#[test]
fn lethal_player_attack_deactivates_enemy() {
    let mut enc = open(vec![goblin(1, 1, 0)]);
    enc.actor_mut(EntityId(1)).unwrap().health = 2;

    let playback = play(&mut enc, PlayerCommand::Attack(EntityId(1)));

    assert_eq!(playback.pauses, [Pause::Attack, Pause::Death, Pause::Handoff]);
    assert!(playback.signals.contains(&Signal::ActorDefeated {
        actor: EntityId(1),
        defeat: Defeat::Deactivated,
    }));
    assert_eq!(
        enc.history().records()[0].action,
        TurnAction::Attack {
            target: EntityId(1),
            damage: 3,
            defeated: true,
        }
    );
    assert_eq!(labels(&enc), ["attack", "end_turn"]);
    assert!(!enc.actor(EntityId(1)).unwrap().is_active);
}

#[test]
fn player_respawns_under_default_policy() {
    let mut enc = open(vec![goblin(1, 5, 0)]);
    enc.actor_mut(EntityId::PLAYER).unwrap().health = 2;

    let playback = play(&mut enc, PlayerCommand::MoveTo(Position::new(4, 0)));

    assert_eq!(
        playback.pauses,
        [
            Pause::Step,
            Pause::Step,
            Pause::Step,
            Pause::Step,
            Pause::Handoff,
            Pause::Attack,
            Pause::Death
        ]
    );
    assert_eq!(labels(&enc), ["move", "end_turn", "attack"]);
    let player = enc.player();
    assert!(player.is_active);
    assert_eq!(player.position, Position::ORIGIN);
    assert_eq!(player.health, player.max_health);
    assert!(!enc.is_over());
}

#[test]
fn respawn_avoids_enemy_standing_on_spawn() {
    let mut enc = open(vec![goblin(2, 0, 3), goblin(1, 3, 1)]);
    enc.actor_mut(EntityId::PLAYER).unwrap().health = 2;

    let playback = play(&mut enc, PlayerCommand::MoveTo(Position::new(1, 0)));

    // Goblin 2 takes the vacated spawn tile and lands the killing blow.
    assert_eq!(enc.actor(EntityId(2)).unwrap().position, Position::ORIGIN);
    assert!(playback.signals.iter().any(|signal| matches!(
        signal,
        Signal::ActorDefeated {
            actor: EntityId::PLAYER,
            defeat: Defeat::Respawned
        }
    )));

    let player = enc.player();
    assert!(player.is_active);
    assert_eq!(player.position, Position::new(0, 1));

    let live: Vec<_> = enc.actors().iter().filter(|a| a.is_active).collect();
    for (i, a) in live.iter().enumerate() {
        for b in &live[i + 1..] {
            assert_ne!(a.position, b.position, "{} and {} share a tile", a.id, b.id);
        }
    }

    // Goblin 1 then finds the respawned player and attacks.
    assert_eq!(enc.actor(EntityId(1)).unwrap().position, Position::new(1, 1));
    assert_eq!(player.health, player.max_health - ActorStats::ENEMY.damage);
    assert_eq!(
        characters(&enc),
        [
            EntityId::PLAYER,
            EntityId::PLAYER,
            EntityId(2),
            EntityId(2),
            EntityId(1),
            EntityId(1)
        ]
    );
}

#[test]
fn deactivate_policy_ends_the_encounter() {
    let config = GameConfig::default().with_death_policy(DeathPolicy::Deactivate);
    let mut enc = build(
        GridMap::open(10, 10),
        config,
        vec![goblin(1, 5, 0), goblin(2, 4, 1)],
    );
    enc.actor_mut(EntityId::PLAYER).unwrap().health = 2;

    play(&mut enc, PlayerCommand::MoveTo(Position::new(4, 0)));

    // The second enemy is adjacent too but never acts on a defeated player.
    assert_eq!(labels(&enc), ["move", "end_turn", "attack"]);
    assert!(enc.is_over());
    assert_eq!(
        TurnEngine::new(&mut enc).submit(PlayerCommand::Skip),
        Err(Rejection::PlayerDefeated)
    );
}

#[test]
fn enemies_act_in_declaration_order() {
    let mut enc = open(vec![goblin(5, 0, 1), goblin(2, 1, 0)]);
    play(&mut enc, PlayerCommand::Skip);

    assert_eq!(
        characters(&enc),
        [EntityId::PLAYER, EntityId::PLAYER, EntityId(5), EntityId(2)]
    );
    assert_eq!(enc.player().health, 10 - 2 * 2);
}

#[test]
fn enemy_chase_is_truncated_to_move_points() {
    let mut enc = open(vec![goblin(1, 6, 0)]);
    let playback = play(&mut enc, PlayerCommand::Skip);

    assert_eq!(labels(&enc), ["skip_turn", "end_turn", "move"]);
    let TurnAction::Move { path } = &enc.history().records()[2].action else {
        panic!("expected a move record");
    };
    assert_eq!(path.first(), Some(&Position::new(6, 0)));
    assert_eq!(path.last(), Some(&Position::new(3, 0)));
    assert_eq!(enc.actor(EntityId(1)).unwrap().position, Position::new(3, 0));
    assert_eq!(
        playback.pauses,
        [Pause::Handoff, Pause::Step, Pause::Step, Pause::Step]
    );
}

#[test]
fn enemy_closes_in_and_attacks_same_turn() {
    let mut enc = open(vec![goblin(1, 3, 0)]);
    play(&mut enc, PlayerCommand::Skip);

    assert_eq!(labels(&enc), ["skip_turn", "end_turn", "move", "attack"]);
    assert_eq!(enc.actor(EntityId(1)).unwrap().position, Position::new(1, 0));
    assert_eq!(enc.player().health, 8);
}

#[test]
fn walled_off_enemy_without_patrol_does_nothing() {
    let map = GridMap::from_rows(&["..#..", "..#..", "..#.."]).unwrap();
    let mut enc = build(map, GameConfig::default(), vec![goblin(1, 4, 0)]);

    play(&mut enc, PlayerCommand::Skip);

    assert_eq!(labels(&enc), ["skip_turn", "end_turn"]);
    assert_eq!(enc.actor(EntityId(1)).unwrap().position, Position::new(4, 0));
}

#[test]
fn patrolling_enemy_advances_waypoint_on_arrival() {
    let config = GameConfig::default().with_aggro_radius(2);
    let patrol = vec![Position::new(5, 8), Position::new(5, 5)];
    let enemy = Actor::enemy(EntityId(1), Position::new(5, 5), ActorStats::ENEMY, patrol);
    let mut enc = build(GridMap::open(10, 10), config, vec![enemy]);

    play(&mut enc, PlayerCommand::Skip);

    let enemy = enc.actor(EntityId(1)).unwrap();
    assert_eq!(enemy.position, Position::new(5, 8));
    assert_eq!(enemy.patrol().unwrap().current(), Some(Position::new(5, 5)));
    assert_eq!(labels(&enc), ["skip_turn", "end_turn", "move"]);
}

#[test]
fn settling_on_exit_records_and_signals() {
    let map = GridMap::open(5, 5)
        .with_exit(Position::new(2, 0), "cave-1")
        .unwrap();
    let mut enc = build(map, GameConfig::default(), Vec::new());

    let playback = play(&mut enc, PlayerCommand::MoveTo(Position::new(2, 0)));

    assert_eq!(labels(&enc), ["move", "exit", "end_turn"]);
    assert!(playback.signals.contains(&Signal::MapExit {
        position: Position::new(2, 0),
        target: "cave-1".to_owned(),
    }));
}

#[test]
fn diagonal_mode_charges_diagonal_cost() {
    let config = GameConfig::default().with_movement(crate::grid::MovementMode::Diagonal);
    let mut enc = build(GridMap::open(10, 10), config, Vec::new());

    let mut engine = TurnEngine::new(&mut enc);
    engine.submit(PlayerCommand::MoveTo(Position::new(2, 2))).unwrap();
    let mut steps = 0;
    while engine.advance().pause == Some(Pause::Step) {
        steps += 1;
    }
    assert_eq!(steps, 2);

    let expected = ActorStats::PLAYER.move_allowance - 2.0 * crate::grid::DIAGONAL_STEP_COST;
    assert_eq!(enc.player().move_points, expected);
}
