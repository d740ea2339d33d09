use crate::cache::CacheSet;

use super::{AccessResult, Replace};

/// Fills vacant lines in order, then evicts a uniformly random way.
#[derive(Debug)]
pub struct Random {
    rng: fastrand::Rng,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Random {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Replace for Random {
    fn access(&mut self, set: &mut CacheSet, tag: u32) -> AccessResult {
        if let Some(way) = set.find(tag) {
            set.lines[way].touch();
            return AccessResult::Hit;
        }

        let victim = match set.first_vacant() {
            Some(way) => way,
            None => self.rng.usize(..set.lines.len()),
        };
        set.lines[victim].fill(tag);
        AccessResult::Miss
    }
}
