//! Least-recently-used replacement driven by per-line age counters.
//!
//! One scan of the set does everything: occupied lines that do not match get
//! one year older as they are passed, a match resets its own age and ends the
//! scan, and a vacant line ends it as a miss. When the set is full the oldest
//! line is evicted, the lowest way winning ties.
//!
//! Lines passed before a hit are aged too, so a hit in way `k` also ages ways
//! `0..k`. Every associative organization shares this behaviour.

use crate::cache::CacheSet;

use super::{AccessResult, Replace};

#[derive(Debug, Default, Clone, Copy)]
pub struct Age;

impl Replace for Age {
    fn access(&mut self, set: &mut CacheSet, tag: u32) -> AccessResult {
        let mut vacant = None;
        let mut oldest: Option<(usize, u32)> = None;

        for (way, line) in set.lines.iter_mut().enumerate() {
            match line.tag {
                Some(t) if t == tag => {
                    line.touch();
                    return AccessResult::Hit;
                }
                Some(_) => {
                    line.age = line.age.saturating_add(1);
                    if oldest.map_or(true, |(_, age)| line.age > age) {
                        oldest = Some((way, line.age));
                    }
                }
                None => {
                    // Everything past the first vacant line is vacant too
                    vacant = Some(way);
                    break;
                }
            }
        }

        if let Some(victim) = vacant.or(oldest.map(|(way, _)| way)) {
            set.lines[victim].fill(tag);
        }
        AccessResult::Miss
    }
}
