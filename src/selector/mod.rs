use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::FeedItem;

/// Picks one item uniformly at random. `None` when there is nothing to pick.
pub fn pick<'a, R>(items: &'a [FeedItem], rng: &mut R) -> Option<&'a FeedItem>
where
    R: Rng + ?Sized,
{
    items.choose(rng)
}

/// Seeded generator for a run: the given seed, or the current time.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64);
    StdRng::seed_from_u64(seed)
}
