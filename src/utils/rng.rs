use rand::prelude::*;

/// Build an RNG from an explicit seed, or from a default one when absent:
/// fixed in debug builds so runs reproduce, drawn from entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(default_seed))
}

#[cfg(debug_assertions)]
fn default_seed() -> u64 {
    const SEED: u64 = 63;
    SEED
}

#[cfg(not(debug_assertions))]
fn default_seed() -> u64 {
    rand::rng().random()
}
