use crate::{cache::CacheSet, error::ConfigError};

use super::{AccessResult, Replace};

/// Direct-mapped placement: one line per set, overwritten on every miss.
#[derive(Debug, Default, Clone, Copy)]
pub struct Direct;

impl Replace for Direct {
    fn access(&mut self, set: &mut CacheSet, tag: u32) -> AccessResult {
        let line = &mut set.lines[0];
        if line.tag == Some(tag) {
            AccessResult::Hit
        } else {
            line.fill(tag);
            AccessResult::Miss
        }
    }

    fn check_ways(&self, n_ways: usize) -> Result<(), ConfigError> {
        if n_ways == 1 {
            Ok(())
        } else {
            Err(ConfigError::new(format!(
                "direct-mapped placement needs exactly one way, got {n_ways}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, IsCache};
    use crate::replace::AccessResult::{Hit, Miss};

    #[test]
    fn colliding_tags_always_miss() {
        let mut cache = Cache::new("direct", 32, 1, Direct).unwrap();
        assert_eq!(cache.access(0x1), Miss);
        assert_eq!(cache.access(0x21), Miss);
        assert_eq!(cache.access(0x1), Miss);
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.accesses(), 3);
        assert_eq!(cache.sets[1].lines[0].tag, Some(0x1));
    }

    #[test]
    fn distinct_indices_do_not_interfere() {
        let mut cache = Cache::new("direct", 32, 1, Direct).unwrap();
        assert_eq!(cache.access(0x1), Miss);
        assert_eq!(cache.access(0x2), Miss);
        assert_eq!(cache.access(0x1), Hit);
        assert_eq!(cache.access(0x2), Hit);
    }

    #[test]
    fn zero_is_not_mistaken_for_an_empty_line() {
        let mut cache = Cache::new("direct", 32, 1, Direct).unwrap();
        assert_eq!(cache.access(0), Miss);
        assert_eq!(cache.access(0), Hit);
    }

    #[test]
    fn needs_one_way() {
        assert!(Direct.check_ways(1).is_ok());
        let err = Direct.check_ways(4).unwrap_err();
        assert!(err.message().contains("got 4"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: hits never exceed accesses
            #[test]
            fn prop_hits_within_accesses(
                blocks in prop::sample::select(vec![1usize, 8, 32]),
                addrs in prop::collection::vec(0u32..128, 0..200)
            ) {
                let mut cache = Cache::new("prop", blocks, 1, Direct).unwrap();
                for addr in addrs {
                    cache.access(addr);
                    prop_assert!(cache.hits() <= cache.accesses());
                }
            }

            /// Property: an immediate repeat always hits
            #[test]
            fn prop_repeat_hits(
                addrs in prop::collection::vec(any::<u32>(), 1..100)
            ) {
                let mut cache = Cache::new("prop", 32, 1, Direct).unwrap();
                for addr in addrs {
                    cache.access(addr);
                    prop_assert_eq!(cache.access(addr), Hit);
                }
            }
        }
    }
}
