/// Player-versus-enemy contact: the overlap test and what a contact does to
/// the score, the lives and the player state.

use rand::Rng;
use tracing::{info, trace};

use crate::entities::{
    CollisionAnimation, Enemy, FloatingMessage, GameState, GameStatus, Player, PlayerState, Rect,
};
use crate::player;

/// Points for destroying an enemy while rolling or diving.
pub const KILL_REWARD: i32 = 1;
/// Points lost when an enemy touches a vulnerable player.
pub const HIT_PENALTY: i32 = 5;
/// Where kill messages float to (the score readout).
pub const SCORE_ANCHOR: (f64, f64) = (150.0, 50.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionOutcome {
    Kill,
    Hit,
}

impl Player {
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Enemy {
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Strict AABB overlap: boxes that only share an edge do not collide.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Resolve every enemy touching the player this tick, in collection order.
///
/// Each contact is handled on its own, so two hits in one tick cost two
/// lives.  Enemies are only flagged here; removal happens in the end-of-tick
/// prune.
pub fn check_player_collisions(
    state: &mut GameState,
    rng: &mut impl Rng,
) -> Vec<CollisionOutcome> {
    let player_box = state.player.hitbox();
    let mut outcomes = Vec::new();

    for i in 0..state.enemies.len() {
        let enemy_box = state.enemies[i].hitbox();
        if !overlaps(&enemy_box, &player_box) {
            continue;
        }

        state.enemies[i].marked_for_deletion = true;
        let (cx, cy) = enemy_box.center();
        state.collisions.push(CollisionAnimation::new(cx, cy, rng));

        let outcome = if state.player.state.is_attacking() {
            state.score += KILL_REWARD;
            state.messages.push(FloatingMessage::new(
                format!("+{KILL_REWARD}"),
                enemy_box.x,
                enemy_box.y,
                SCORE_ANCHOR.0,
                SCORE_ANCHOR.1,
            ));
            CollisionOutcome::Kill
        } else {
            player::set_state(state, PlayerState::Hit, 0.0);
            state.score -= HIT_PENALTY;
            state.lives = state.lives.saturating_sub(1);
            if state.lives == 0 && state.status == GameStatus::Playing {
                state.status = GameStatus::GameOver;
                info!(score = state.score, frame = state.frame, "game over: out of lives");
            }
            CollisionOutcome::Hit
        };
        trace!(?outcome, score = state.score, lives = state.lives, "enemy contact");
        outcomes.push(outcome);
    }

    outcomes
}
