use std::iter;

use serde::Serialize;

use crate::{
    error::ConfigError,
    replace::{AccessResult, Replace},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr {
    pub set: usize,
    pub tag: u32,
}

/// Summary record for one cache, handed to the reporting side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub name: String,
    pub hits: u64,
    pub misses: u64,
    pub accesses: u64,
    /// Percentage in `0.0..=100.0`; `0.0` when nothing was accessed.
    pub hit_rate: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub tag: Option<u32>,
    /// Accesses to the owning set since this line was last touched.
    pub age: u32,
}

impl Line {
    pub fn is_vacant(&self) -> bool {
        self.tag.is_none()
    }

    pub fn fill(&mut self, tag: u32) {
        self.tag = Some(tag);
        self.age = 0;
    }

    pub fn touch(&mut self) {
        self.age = 0;
    }
}

/// The lines sharing one index. Occupied lines always form a prefix, since
/// fills take the first vacant line and nothing ever invalidates a line.
#[derive(Debug, Clone)]
pub struct CacheSet {
    pub lines: Box<[Line]>,
}

impl CacheSet {
    pub fn new(n_ways: usize) -> Self {
        CacheSet {
            lines: iter::repeat_with(Line::default).take(n_ways).collect(),
        }
    }

    pub fn find(&self, tag: u32) -> Option<usize> {
        self.lines.iter().position(|l| l.tag == Some(tag))
    }

    pub fn first_vacant(&self) -> Option<usize> {
        self.lines.iter().position(Line::is_vacant)
    }
}

#[derive(Debug)]
pub struct Cache<R: Replace> {
    name: String,
    pub sets: Vec<CacheSet>,
    pub n_sets: usize,
    pub repl: R,
    hits: u64,
    accesses: u64,
}

impl<R: Replace> Cache<R> {
    /// Builds an empty cache of `n_blocks` lines grouped into sets of
    /// `n_ways`.
    pub fn new(
        name: impl Into<String>,
        n_blocks: usize,
        n_ways: usize,
        repl: R,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if n_blocks == 0 {
            return Err(ConfigError::new(format!(
                "{name}: cache must hold at least one block"
            )));
        }
        if n_ways == 0 {
            return Err(ConfigError::new(format!(
                "{name}: associativity must be non-zero"
            )));
        }
        if n_blocks % n_ways != 0 {
            return Err(ConfigError::new(format!(
                "{name}: associativity {n_ways} does not divide {n_blocks} blocks"
            )));
        }
        repl.check_ways(n_ways)
            .map_err(|err| ConfigError::new(format!("{name}: {}", err.message())))?;

        let n_sets = n_blocks / n_ways;
        Ok(Cache {
            name,
            sets: iter::repeat_with(|| CacheSet::new(n_ways))
                .take(n_sets)
                .collect(),
            n_sets,
            repl,
            hits: 0,
            accesses: 0,
        })
    }
}

pub trait IsCache {
    fn name(&self) -> &str;
    fn access(&mut self, addr: u32) -> AccessResult;
    fn split_addr(&self, addr: u32) -> Addr;
    fn hits(&self) -> u64;
    fn accesses(&self) -> u64;
    /// Hit rate in percent, `None` before the first access.
    fn hit_rate(&self) -> Option<f64>;
    fn clear_stats(&mut self);
    fn make_stats(&self) -> CacheStats;
}

impl<R: Replace> IsCache for Cache<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn access(&mut self, addr: u32) -> AccessResult {
        let Addr { set, tag } = self.split_addr(addr);
        let result = self.repl.access(&mut self.sets[set], tag);
        self.accesses += 1;
        if result == AccessResult::Hit {
            self.hits += 1;
        }
        result
    }

    fn split_addr(&self, addr: u32) -> Addr {
        Addr {
            set: addr as usize % self.n_sets,
            tag: addr,
        }
    }

    fn hits(&self) -> u64 {
        self.hits
    }

    fn accesses(&self) -> u64 {
        self.accesses
    }

    fn hit_rate(&self) -> Option<f64> {
        if self.accesses == 0 {
            None
        } else {
            Some(self.hits as f64 / self.accesses as f64 * 100.0)
        }
    }

    fn clear_stats(&mut self) {
        self.hits = 0;
        self.accesses = 0;
    }

    fn make_stats(&self) -> CacheStats {
        CacheStats {
            name: self.name.clone(),
            hits: self.hits,
            misses: self.accesses - self.hits,
            accesses: self.accesses,
            hit_rate: self.hit_rate().unwrap_or(0.0),
        }
    }
}
