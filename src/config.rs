use log::debug;
use serde::Deserialize;

use crate::{
    cache::{Cache, IsCache},
    error::ConfigError,
    replace::{age::Age, direct::Direct, random::Random},
};

pub const DEFAULT_BLOCKS: usize = 32;

/// Associativity as written in the config: a way count or `"full"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Ways {
    Count(usize),
    Named(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub name: String,
    pub ways: Ways,
    #[serde(default = "default_repl")]
    pub repl: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_blocks")]
    pub blocks: usize,
    pub caches: Vec<CacheConfig>,
    /// Seed for caches using random replacement.
    #[serde(default)]
    pub seed: u64,
}

fn default_blocks() -> usize {
    DEFAULT_BLOCKS
}

fn default_repl() -> String {
    "lru".to_string()
}

impl Default for Config {
    /// Direct-mapped, 2-way, 4-way and fully associative over 32 blocks.
    fn default() -> Self {
        let cache = |name: &str, ways: Ways, repl: &str| CacheConfig {
            name: name.to_string(),
            ways,
            repl: repl.to_string(),
        };
        Config {
            blocks: DEFAULT_BLOCKS,
            caches: vec![
                cache("direct-mapped", Ways::Count(1), "direct"),
                cache("2-way associative", Ways::Count(2), "lru"),
                cache("4-way associative", Ways::Count(4), "lru"),
                cache("fully associative", Ways::Named("full".to_string()), "lru"),
            ],
            seed: 0,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_caches(self) -> Result<Vec<Box<dyn IsCache>>, ConfigError> {
        let blocks = self.blocks;
        let seed = self.seed;
        self.caches
            .into_iter()
            .map(|cc| {
                let ways = match &cc.ways {
                    Ways::Count(n) => *n,
                    Ways::Named(s) if s == "full" => blocks,
                    Ways::Named(s) => {
                        return Err(ConfigError::new(format!(
                            "{}: unrecognized associativity `{s}`",
                            cc.name
                        )))
                    }
                };
                debug!(
                    "building {} cache: {blocks} blocks, {ways} ways, {} replacement",
                    cc.name, cc.repl
                );
                Ok(match cc.repl.as_str() {
                    "direct" => Box::new(Cache::new(cc.name, blocks, ways, Direct)?)
                        as Box<dyn IsCache>,
                    "lru" => Box::new(Cache::new(cc.name, blocks, ways, Age)?) as Box<dyn IsCache>,
                    "random" => Box::new(Cache::new(cc.name, blocks, ways, Random::new(seed))?)
                        as Box<dyn IsCache>,
                    other => {
                        return Err(ConfigError::new(format!(
                            "{}: unrecognized replacement policy `{other}`",
                            cc.name
                        )))
                    }
                })
            })
            .collect()
    }
}
