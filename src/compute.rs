/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle or the frame context) and
/// returns a brand-new `GameState`.  Side effects are limited to the injected
/// RNG; sounds come back as `Cue` values for the host to play.

use rand::Rng;

use crate::entities::{
    Cue, DrawCommand, FrameContext, GameState, GameStatus, InputState, Layer, Playfield, Rect,
    SpriteKind, Tint,
};

// ── Tuning ───────────────────────────────────────────────────────────────────

pub const STARTING_HEALTH: u32 = 3;

/// Nanoseconds between enemy spawns.
pub const ENEMY_SPAWN_INTERVAL: u64 = 2_000_000_000;
/// Nanoseconds between coin spawns.
pub const COIN_SPAWN_INTERVAL: u64 = 2_000_000_000;

/// Cells per second.
pub const ENEMY_SPEED: f32 = 10.0;
pub const COIN_SPEED: f32 = 20.0;
pub const PLAYER_SPEED: f32 = 16.0;

pub const PLAYER_START: (f32, f32) = (2.0, 2.0);

/// Horizontal distance between heart icons on the HUD row.
pub const HEART_SPACING: f32 = 2.0;
/// Score text sits this many columns in from the right edge.
pub const SCORE_ANCHOR_FROM_RIGHT: f32 = 6.0;

pub const GAME_OVER_TEXT: &str = "GAME OVER";

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session.  Both spawn timers start at `now`.
pub fn init_state(playfield: Playfield, now: u64) -> GameState {
    let (w, h) = SpriteKind::Knight.size();
    let player = clamp_to_playfield(
        Rect::new(PLAYER_START.0, PLAYER_START.1, w, h),
        &playfield,
    );
    GameState {
        player,
        enemies: Vec::new(),
        coins: Vec::new(),
        health: STARTING_HEALTH,
        score: 0,
        last_enemy_spawn: now,
        last_coin_spawn: now,
        status: GameStatus::Playing,
        playfield,
    }
}

fn clamp_to_playfield(rect: Rect, playfield: &Playfield) -> Rect {
    // A playfield smaller than the sprite pins it to the origin.
    let max_x = (playfield.width - rect.width).max(0.0);
    let max_y = (playfield.height - rect.height).max(0.0);
    Rect {
        x: rect.x.clamp(0.0, max_x),
        y: rect.y.clamp(0.0, max_y),
        ..rect
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

fn shift_player(state: &GameState, dx: f32, dy: f32) -> GameState {
    let moved = Rect {
        x: state.player.x + dx,
        y: state.player.y + dy,
        ..state.player
    };
    GameState {
        player: clamp_to_playfield(moved, &state.playfield),
        ..state.clone()
    }
}

pub fn move_player_left(state: &GameState, delta: f32) -> GameState {
    shift_player(state, -PLAYER_SPEED * delta, 0.0)
}

pub fn move_player_right(state: &GameState, delta: f32) -> GameState {
    shift_player(state, PLAYER_SPEED * delta, 0.0)
}

/// Up is toward row 0.
pub fn move_player_up(state: &GameState, delta: f32) -> GameState {
    shift_player(state, 0.0, -PLAYER_SPEED * delta)
}

pub fn move_player_down(state: &GameState, delta: f32) -> GameState {
    shift_player(state, 0.0, PLAYER_SPEED * delta)
}

/// Apply every held direction.  Opposite keys cancel out; diagonals are
/// just two independent axis moves.
pub fn apply_input(state: &GameState, input: &InputState, delta: f32) -> GameState {
    let mut next = state.clone();
    if input.left {
        next = move_player_left(&next, delta);
    }
    if input.right {
        next = move_player_right(&next, delta);
    }
    if input.down {
        next = move_player_down(&next, delta);
    }
    if input.up {
        next = move_player_up(&next, delta);
    }
    next
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// A rect of `kind`'s size on the right edge, on a random whole row that
/// keeps it inside the playfield.
fn spawn_rect(kind: SpriteKind, playfield: &Playfield, rng: &mut impl Rng) -> Rect {
    let (w, h) = kind.size();
    let max_row = (playfield.height - h).max(0.0) as u32;
    let row = rng.gen_range(0..=max_row);
    Rect::new(playfield.width, row as f32, w, h)
}

pub fn spawn_enemy(state: &GameState, now: u64, rng: &mut impl Rng) -> GameState {
    let enemy = spawn_rect(SpriteKind::Enemy, &state.playfield, rng);
    tracing::debug!(y = enemy.y, count = state.enemies.len() + 1, "enemy spawned");
    let mut enemies = state.enemies.clone();
    enemies.push(enemy);
    GameState {
        enemies,
        last_enemy_spawn: now,
        ..state.clone()
    }
}

pub fn spawn_coin(state: &GameState, now: u64, rng: &mut impl Rng) -> GameState {
    let coin = spawn_rect(SpriteKind::Coin, &state.playfield, rng);
    tracing::debug!(y = coin.y, count = state.coins.len() + 1, "coin spawned");
    let mut coins = state.coins.clone();
    coins.push(coin);
    GameState {
        coins,
        last_coin_spawn: now,
        ..state.clone()
    }
}

// ── Movement, collision and cleanup ──────────────────────────────────────────

/// Scroll every rect left by `speed * delta` and split them three ways:
/// off-screen ones are dropped, ones touching the player are dropped and
/// counted, the rest survive.  Off-screen wins over overlap so a rect is
/// never counted twice.
///
/// Off-screen means `x + height < 0`.  Height, not width: this quirk is kept
/// on purpose and pinned by `off_screen_test_uses_height_not_width`.
fn scroll_and_sweep(rects: &[Rect], speed: f32, delta: f32, player: &Rect) -> (Vec<Rect>, u32) {
    let mut hits = 0;
    let survivors = rects
        .iter()
        .filter_map(|r| {
            let moved = Rect {
                x: r.x - speed * delta,
                ..*r
            };
            if moved.x + moved.height < 0.0 {
                None
            } else if moved.overlaps(player) {
                hits += 1;
                None
            } else {
                Some(moved)
            }
        })
        .collect();
    (survivors, hits)
}

/// Move enemies, drop the ones gone past the left edge, and charge one
/// health point (never below zero) per enemy that touches the player.
pub fn update_enemies(state: &GameState, delta: f32) -> (GameState, Vec<Cue>) {
    let (enemies, hits) = scroll_and_sweep(&state.enemies, ENEMY_SPEED, delta, &state.player);
    let health = state.health.saturating_sub(hits);
    if hits > 0 {
        tracing::debug!(hits, health, "player hit");
    }
    let cues = vec![Cue::Hit; hits as usize];
    (
        GameState {
            enemies,
            health,
            ..state.clone()
        },
        cues,
    )
}

/// Move coins, drop the ones gone past the left edge, and score one point
/// per coin the player touches.
pub fn update_coins(state: &GameState, delta: f32) -> (GameState, Vec<Cue>) {
    let (coins, pickups) = scroll_and_sweep(&state.coins, COIN_SPEED, delta, &state.player);
    let score = state.score.saturating_add(pickups);
    if pickups > 0 {
        tracing::debug!(pickups, score, "coin collected");
    }
    let cues = vec![Cue::CoinPickup; pickups as usize];
    (
        GameState {
            coins,
            score,
            ..state.clone()
        },
        cues,
    )
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A finished session is frozen: it comes back unchanged with no cues.
pub fn tick(state: &GameState, ctx: &FrameContext, rng: &mut impl Rng) -> (GameState, Vec<Cue>) {
    if state.status == GameStatus::GameOver {
        return (state.clone(), Vec::new());
    }

    // ── 1. Track the display surface ────────────────────────────────────────
    let mut next = GameState {
        playfield: ctx.playfield,
        player: clamp_to_playfield(state.player, &ctx.playfield),
        ..state.clone()
    };

    // ── 2. Input ────────────────────────────────────────────────────────────
    next = apply_input(&next, &ctx.input, ctx.delta);

    // ── 3. Spawning ─────────────────────────────────────────────────────────
    if ctx.now.saturating_sub(next.last_enemy_spawn) > ENEMY_SPAWN_INTERVAL {
        next = spawn_enemy(&next, ctx.now, rng);
    }
    if ctx.now.saturating_sub(next.last_coin_spawn) > COIN_SPAWN_INTERVAL {
        next = spawn_coin(&next, ctx.now, rng);
    }

    // ── 4. Enemies, then coins ──────────────────────────────────────────────
    let (next, mut cues) = update_enemies(&next, ctx.delta);
    let (mut next, coin_cues) = update_coins(&next, ctx.delta);
    cues.extend(coin_cues);

    // ── 5. Latch game over ──────────────────────────────────────────────────
    if next.health == 0 {
        tracing::info!(score = next.score, "game over");
        next.status = GameStatus::GameOver;
    }

    tracing::trace!(
        enemies = next.enemies.len(),
        coins = next.coins.len(),
        x = next.player.x,
        y = next.player.y,
        "frame simulated"
    );

    (next, cues)
}

// ── Draw submission ──────────────────────────────────────────────────────────

/// Translate the state into draw commands, back to front.
pub fn render(state: &GameState) -> Vec<DrawCommand> {
    let pf = &state.playfield;

    if state.status == GameStatus::GameOver {
        let text_width = GAME_OVER_TEXT.chars().count() as f32;
        return vec![DrawCommand::Text {
            text: GAME_OVER_TEXT.to_string(),
            x: ((pf.width - text_width) / 2.0).max(0.0).floor(),
            y: (pf.height / 2.0).floor(),
            tint: Tint::Red,
            layer: Layer::Playfield,
        }];
    }

    let sprite = |kind: SpriteKind, r: &Rect| DrawCommand::Sprite {
        kind,
        x: r.x,
        y: r.y,
        layer: Layer::Playfield,
    };

    let mut draws: Vec<DrawCommand> = Vec::with_capacity(
        state.enemies.len() + state.coins.len() + 2 + state.health as usize,
    );
    draws.extend(state.enemies.iter().map(|e| sprite(SpriteKind::Enemy, e)));
    draws.extend(state.coins.iter().map(|c| sprite(SpriteKind::Coin, c)));
    draws.push(sprite(SpriteKind::Knight, &state.player));

    draws.push(DrawCommand::Text {
        text: state.score.to_string(),
        x: (pf.width - SCORE_ANCHOR_FROM_RIGHT).max(0.0),
        y: 0.0,
        tint: Tint::Yellow,
        layer: Layer::Hud,
    });
    draws.extend((0..state.health).map(|i| DrawCommand::Sprite {
        kind: SpriteKind::Heart,
        x: i as f32 * HEART_SPACING,
        y: 0.0,
        layer: Layer::Hud,
    }));

    draws
}
