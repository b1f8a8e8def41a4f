/// Session lifecycle.
///
/// The host drives a `GameLoop` through three calls: `initialize` once,
/// `advance` once per displayed frame, and `teardown` once on the way out.

use rand::Rng;

use crate::compute::{init_state, render, spawn_coin, spawn_enemy, tick};
use crate::entities::{Cue, DrawCommand, FrameContext, GameState, GameStatus};

/// What one frame produced: the draw list and the sounds to play.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub draws: Vec<DrawCommand>,
    pub cues: Vec<Cue>,
}

pub trait GameLoop {
    fn initialize(&mut self, ctx: &FrameContext);
    fn advance(&mut self, ctx: &FrameContext) -> Frame;
    fn teardown(&mut self);
}

/// Owns the coin-dodge session and the RNG feeding its spawners.
pub struct DodgeController<R: Rng> {
    state: Option<GameState>,
    rng: R,
}

impl<R: Rng> DodgeController<R> {
    pub fn new(rng: R) -> Self {
        Self { state: None, rng }
    }

    /// `None` before `initialize` and after `teardown`.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.status == GameStatus::GameOver)
    }
}

impl<R: Rng> GameLoop for DodgeController<R> {
    /// Start a fresh session with one enemy and one coin already in flight.
    fn initialize(&mut self, ctx: &FrameContext) {
        let state = init_state(ctx.playfield, ctx.now);
        let state = spawn_coin(&state, ctx.now, &mut self.rng);
        let state = spawn_enemy(&state, ctx.now, &mut self.rng);
        tracing::info!(
            width = ctx.playfield.width,
            height = ctx.playfield.height,
            health = state.health,
            "session started"
        );
        self.state = Some(state);
    }

    fn advance(&mut self, ctx: &FrameContext) -> Frame {
        let Some(state) = self.state.as_ref() else {
            tracing::warn!("advance called without an active session");
            return Frame::default();
        };
        let (next, cues) = tick(state, ctx, &mut self.rng);
        let draws = render(&next);
        self.state = Some(next);
        Frame { draws, cues }
    }

    fn teardown(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::info!(
                score = state.score,
                health = state.health,
                "session ended"
            );
        }
    }
}
