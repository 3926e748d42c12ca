use rand::Rng;

use crate::{board::GameState, types::Outcome};

/// Plays uniformly random legal moves until the game ends.
///
/// Starting from a terminal position returns its outcome without moving.
pub fn simulate_random<S: GameState, R: Rng + ?Sized>(mut state: S, rng: &mut R) -> Outcome {
    while let Some(move_) = state.random_move(rng) {
        state = state.apply(move_);
    }
    debug_assert!(state.is_terminal(), "no moves left in a running game");
    state.outcome()
}

#[cfg(test)]
mod test {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;
    use crate::{
        board::{grid::GridState, packed::PackedState},
        types::Move,
    };

    #[test]
    fn rollout_always_terminates() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..200 {
            assert!(simulate_random(PackedState::default(), &mut rng).is_terminal());
        }
    }

    #[test]
    fn rollout_is_reproducible_with_seed() {
        let a = simulate_random(PackedState::default(), &mut SmallRng::seed_from_u64(99));
        let b = simulate_random(PackedState::default(), &mut SmallRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn both_encodings_roll_out() {
        let mut rng = SmallRng::seed_from_u64(3);
        let outcome = simulate_random(GridState::default().apply(Move::new(4, 4)), &mut rng);
        assert!(outcome.is_terminal());
    }

    #[test]
    fn terminal_position_keeps_its_outcome() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut state = PackedState::default();
        while let Some(move_) = state.random_move(&mut rng) {
            state = state.apply(move_);
        }
        let final_outcome = state.outcome();
        assert!(final_outcome.is_terminal());
        assert_eq!(simulate_random(state, &mut rng), final_outcome);
    }
}
