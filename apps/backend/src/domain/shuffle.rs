//! Per-session dealing order.
//!
//! Every session gets its own RNG: seeded from the configured base seed and
//! the user id when one is set, from OS entropy otherwise.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use xxhash_rust::xxh3::xxh3_64;

/// Derive a session seed from a base seed and the user id.
///
/// Same base + same user = same seed; different users get different seeds.
pub fn derive_session_seed(base_seed: u64, user_id: &str) -> u64 {
    base_seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(xxh3_64(user_id.as_bytes()))
}

/// RNG for one session.
pub fn session_rng(base_seed: Option<u64>, user_id: &str) -> StdRng {
    match base_seed {
        Some(seed) => StdRng::seed_from_u64(derive_session_seed(seed, user_id)),
        None => StdRng::from_os_rng(),
    }
}

/// Fisher–Yates permutation of `items` into a new sequence; the input is
/// left untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}
