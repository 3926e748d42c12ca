use std::time::{SystemTime, UNIX_EPOCH};

use rand::{SeedableRng, rngs::SmallRng};
use tracing::debug;

/// used if the system clock is set before the unix epoch
const FALLBACK_SEED: u64 = 0xfeebdaed_deadbeef;

/// The one random source of the process.
///
/// It is owned by whoever drives the search and handed to every phase that needs entropy,
/// so tests can inject a fixed seed.
pub type EngineRng = SmallRng;

pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(FALLBACK_SEED, |since_epoch| since_epoch.as_nanos() as u64)
}

pub fn seeded(seed: Option<u64>) -> EngineRng {
    let seed = seed.unwrap_or_else(time_seed);
    debug!(seed, "seeding rng");
    SmallRng::seed_from_u64(seed)
}
