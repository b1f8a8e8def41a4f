use coin_dodge::compute::{ENEMY_SPAWN_INTERVAL, GAME_OVER_TEXT};
use coin_dodge::controller::{DodgeController, Frame, GameLoop};
use coin_dodge::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn ctx(delta: f32, now: u64) -> FrameContext {
    FrameContext {
        delta,
        now,
        input: InputState::default(),
        playfield: Playfield::new(40.0, 20.0),
    }
}

fn controller() -> DodgeController<StdRng> {
    DodgeController::new(StdRng::seed_from_u64(7))
}

#[test]
fn no_state_before_initialize() {
    let c = controller();
    assert!(c.state().is_none());
    assert!(!c.is_game_over());
}

#[test]
fn advance_without_session_is_empty() {
    let mut c = controller();
    assert_eq!(c.advance(&ctx(0.1, 0)), Frame::default());
}

#[test]
fn initialize_starts_with_one_enemy_and_one_coin() {
    let mut c = controller();
    c.initialize(&ctx(0.0, 500));
    let s = c.state().unwrap();
    assert_eq!(s.health, 3);
    assert_eq!(s.score, 0);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.coins.len(), 1);
    assert_eq!(s.enemies[0].x, 40.0);
    assert_eq!(s.coins[0].x, 40.0);
    assert_eq!(s.last_enemy_spawn, 500);
    assert_eq!(s.last_coin_spawn, 500);
}

#[test]
fn advance_draws_every_entity_and_hud() {
    let mut c = controller();
    c.initialize(&ctx(0.0, 0));
    let frame = c.advance(&ctx(0.0, 1));
    // enemy, coin, knight, score, three hearts
    assert_eq!(frame.draws.len(), 7);
    assert!(frame.cues.is_empty());
}

#[test]
fn entities_scroll_across_frames() {
    let mut c = controller();
    c.initialize(&ctx(0.0, 0));
    let x0 = c.state().unwrap().enemies[0].x;
    c.advance(&ctx(0.5, 1));
    let x1 = c.state().unwrap().enemies[0].x;
    assert!(x1 < x0);
}

#[test]
fn new_wave_spawns_after_interval() {
    let mut c = controller();
    c.initialize(&ctx(0.0, 0));
    c.advance(&ctx(0.0, ENEMY_SPAWN_INTERVAL));
    assert_eq!(c.state().unwrap().enemies.len(), 1);
    c.advance(&ctx(0.0, ENEMY_SPAWN_INTERVAL + 1));
    let s = c.state().unwrap();
    assert_eq!(s.enemies.len(), 2);
    assert_eq!(s.coins.len(), 2);
}

#[test]
fn session_ends_when_enemies_reach_a_stationary_player() {
    // Nobody steers, so enemies on the player's rows eventually hit.  Run
    // long enough for three of them and check the session freezes.
    let mut c = controller();
    c.initialize(&ctx(0.0, 0));

    let mut now = 0;
    let mut hits = 0;
    for _ in 0..200_000 {
        now += 33_000_000;
        let frame = c.advance(&ctx(0.033, now));
        hits += frame.cues.iter().filter(|q| **q == Cue::Hit).count();
        if c.is_game_over() {
            break;
        }
    }
    assert!(c.is_game_over());
    assert_eq!(hits, 3);

    let before = c.state().unwrap().clone();
    let frame = c.advance(&ctx(0.033, now + ENEMY_SPAWN_INTERVAL * 3));
    assert!(frame.cues.is_empty());
    assert_eq!(frame.draws.len(), 1);
    assert!(matches!(&frame.draws[0], DrawCommand::Text { text, .. } if text == GAME_OVER_TEXT));

    let after = c.state().unwrap();
    assert_eq!(after.enemies, before.enemies);
    assert_eq!(after.coins, before.coins);
    assert_eq!(after.player, before.player);
    assert_eq!(after.score, before.score);
    assert_eq!(after.health, 0);
}

#[test]
fn teardown_drops_the_session() {
    let mut c = controller();
    c.initialize(&ctx(0.0, 0));
    c.teardown();
    assert!(c.state().is_none());
}

#[test]
fn sessions_are_independent() {
    let mut a = controller();
    let mut b = controller();
    a.initialize(&ctx(0.0, 0));
    b.initialize(&ctx(0.0, 0));
    a.advance(&ctx(1.0, 1));
    assert_ne!(
        a.state().unwrap().enemies[0].x,
        b.state().unwrap().enemies[0].x
    );
}
