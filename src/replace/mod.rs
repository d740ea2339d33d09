pub mod age;
pub mod direct;
pub mod random;

use crate::{cache::CacheSet, error::ConfigError};

/// A replacement policy: decides what a lookup does to the lines of a set.
pub trait Replace {
    /// Looks `tag` up in `set`, filling or evicting a line on a miss.
    fn access(&mut self, set: &mut CacheSet, tag: u32) -> AccessResult;

    /// Rejects associativities the policy cannot work with.
    fn check_ways(&self, _n_ways: usize) -> Result<(), ConfigError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessResult {
    Hit,
    Miss,
}
