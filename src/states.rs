/// Player state machine: per-state animation, entry effects and the
/// input-driven transition table.
///
/// `decide` is pure.  Applying its answer (world speed, particles, the entry
/// effects below) is the job of `player::set_state` and `player::handle_input`.

use crate::entities::{Player, PlayerState};
use crate::error::GameError;
use crate::input::{HeldKeys, InputKey};

/// Upward velocity added by a jump or a rolling boost.
pub const JUMP_IMPULSE: f64 = 27.0;
/// Downward velocity forced on entering a dive.
pub const DIVE_SPEED: f64 = 15.0;
/// Column the hit animation must reach before the player recovers.
pub const HIT_RECOVERY_FRAME: u32 = 10;

impl PlayerState {
    pub const ALL: [PlayerState; 7] = [
        PlayerState::Sitting,
        PlayerState::Running,
        PlayerState::Jumping,
        PlayerState::Falling,
        PlayerState::Rolling,
        PlayerState::Diving,
        PlayerState::Hit,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Sprite row and last frame column for this state.
    pub fn animation(self) -> (u32, u32) {
        match self {
            PlayerState::Sitting => (5, 4),
            PlayerState::Running => (3, 8),
            PlayerState::Jumping => (1, 6),
            PlayerState::Falling => (2, 6),
            PlayerState::Rolling => (6, 6),
            PlayerState::Diving => (6, 6),
            PlayerState::Hit => (4, 10),
        }
    }

    /// Rolling and diving destroy enemies on contact instead of hurting the player.
    pub fn is_attacking(self) -> bool {
        matches!(self, PlayerState::Rolling | PlayerState::Diving)
    }
}

impl TryFrom<u8> for PlayerState {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        PlayerState::ALL
            .get(index as usize)
            .copied()
            .ok_or(GameError::InvalidStateIndex { index })
    }
}

/// What the active state asks for on this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StateAction {
    Stay,
    Enter {
        next: PlayerState,
        speed_factor: f64,
    },
    /// Rolling on the ground with Up held: kick upward, keep rolling.
    RollBoost,
}

impl StateAction {
    fn enter(next: PlayerState, speed_factor: f64) -> Self {
        StateAction::Enter { next, speed_factor }
    }
}

/// The physics facts the transition rules look at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footing {
    pub on_ground: bool,
    pub vy: f64,
    pub weight: f64,
    pub frame_x: u32,
}

/// Transition table.  Branches are checked in order; the first match wins.
pub fn decide(state: PlayerState, keys: &HeldKeys, footing: Footing) -> StateAction {
    let held = |k: InputKey| keys.contains(k);
    let enter = held(InputKey::Enter);
    let on_ground = footing.on_ground;

    match state {
        PlayerState::Sitting => {
            if held(InputKey::ArrowLeft) || held(InputKey::ArrowRight) {
                StateAction::enter(PlayerState::Running, 1.0)
            } else if enter {
                StateAction::enter(PlayerState::Rolling, 2.0)
            } else {
                StateAction::Stay
            }
        }
        PlayerState::Running => {
            if held(InputKey::ArrowDown) {
                StateAction::enter(PlayerState::Sitting, 0.0)
            } else if held(InputKey::ArrowUp) {
                StateAction::enter(PlayerState::Jumping, 1.0)
            } else if enter {
                StateAction::enter(PlayerState::Rolling, 2.0)
            } else {
                StateAction::Stay
            }
        }
        PlayerState::Jumping => {
            if footing.vy > footing.weight {
                StateAction::enter(PlayerState::Falling, 1.0)
            } else if enter {
                StateAction::enter(PlayerState::Rolling, 2.0)
            } else if held(InputKey::ArrowDown) {
                StateAction::enter(PlayerState::Diving, 0.0)
            } else {
                StateAction::Stay
            }
        }
        PlayerState::Falling => {
            if on_ground {
                StateAction::enter(PlayerState::Running, 1.0)
            } else if held(InputKey::ArrowDown) {
                StateAction::enter(PlayerState::Diving, 0.0)
            } else {
                StateAction::Stay
            }
        }
        PlayerState::Rolling => {
            if !enter && on_ground {
                StateAction::enter(PlayerState::Running, 1.0)
            } else if !enter && !on_ground {
                StateAction::enter(PlayerState::Falling, 1.0)
            } else if enter && held(InputKey::ArrowUp) && on_ground {
                StateAction::RollBoost
            } else if held(InputKey::ArrowDown) && !on_ground {
                StateAction::enter(PlayerState::Diving, 0.0)
            } else {
                StateAction::Stay
            }
        }
        PlayerState::Diving => {
            if on_ground {
                StateAction::enter(PlayerState::Running, 1.0)
            } else if !enter && on_ground {
                // Unreachable: the on-ground branch above always matches first.
                StateAction::enter(PlayerState::Rolling, 2.0)
            } else {
                StateAction::Stay
            }
        }
        PlayerState::Hit => {
            if footing.frame_x >= HIT_RECOVERY_FRAME && on_ground {
                StateAction::enter(PlayerState::Running, 1.0)
            } else if footing.frame_x >= HIT_RECOVERY_FRAME && !on_ground {
                StateAction::enter(PlayerState::Falling, 1.0)
            } else {
                StateAction::Stay
            }
        }
    }
}

/// Entry effects: restart the animation on the state's row and apply the
/// one-shot vertical impulse, if the state has one.
pub fn enter(player: &mut Player, state: PlayerState, on_ground: bool) {
    let (row, max_frame) = state.animation();
    player.anim.frame_x = 0;
    player.anim.frame_y = row;
    player.anim.max_frame = max_frame;

    match state {
        PlayerState::Jumping if on_ground => player.vy -= JUMP_IMPULSE,
        PlayerState::Diving => player.vy = DIVE_SPEED,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> Footing {
        Footing {
            on_ground: true,
            vy: 0.0,
            weight: 1.0,
            frame_x: 0,
        }
    }

    fn airborne(vy: f64) -> Footing {
        Footing {
            on_ground: false,
            vy,
            ..grounded()
        }
    }

    #[test]
    fn state_index_round_trips_for_every_state() {
        for state in PlayerState::ALL {
            assert_eq!(PlayerState::try_from(state.index()), Ok(state));
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert_eq!(
            PlayerState::try_from(7),
            Err(GameError::InvalidStateIndex { index: 7 })
        );
    }

    #[test]
    fn diving_on_ground_always_lands_running() {
        // With Enter released the Rolling branch would also match; it never wins.
        let action = decide(PlayerState::Diving, &HeldKeys::none(), grounded());
        assert_eq!(action, StateAction::enter(PlayerState::Running, 1.0));
    }

    #[test]
    fn jumping_turns_to_falling_only_past_weight() {
        let keys = HeldKeys::none();
        assert_eq!(
            decide(PlayerState::Jumping, &keys, airborne(1.0)),
            StateAction::Stay
        );
        assert_eq!(
            decide(PlayerState::Jumping, &keys, airborne(1.5)),
            StateAction::enter(PlayerState::Falling, 1.0)
        );
    }
}
