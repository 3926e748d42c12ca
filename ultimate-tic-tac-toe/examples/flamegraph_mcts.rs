use std::hint::black_box;

use rand::{SeedableRng, rngs::SmallRng};
use ultimate_tic_tac_toe::{
    board::packed::PackedState,
    consts::EXPLORATION_C,
    search::{self, Budget},
};

fn main() {
    let mut rng = SmallRng::seed_from_u64(1);

    let n = 10;

    for _ in 0..n {
        black_box(search::search(
            PackedState::default(),
            Budget::Iterations(100_000),
            EXPLORATION_C,
            &mut rng,
        ));
    }
}
