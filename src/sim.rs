use log::info;

use crate::{
    cache::{CacheStats, IsCache},
    error::TraceError,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Options {
    /// Addresses replayed before the counters are reset.
    pub warmup: u64,
    /// Addresses measured after warm-up before stopping.
    pub limit: Option<u64>,
    /// Log progress every this many addresses; 0 disables it.
    pub heartbeat: u64,
}

/// Replays one address stream against every cache in lock-step.
pub struct Simulator {
    caches: Vec<Box<dyn IsCache>>,
    opts: Options,
    addr_idx: u64,
}

impl Simulator {
    pub fn new(caches: Vec<Box<dyn IsCache>>, opts: Options) -> Self {
        Simulator {
            caches,
            opts,
            addr_idx: 0,
        }
    }

    pub fn step(&mut self, addr: u32) {
        for cache in self.caches.iter_mut() {
            cache.access(addr);
        }
        self.addr_idx += 1;
    }

    /// Drives the caches until the trace ends, the limit is reached or the
    /// trace fails. Returns the number of addresses replayed.
    pub fn run<I>(&mut self, trace: I) -> Result<u64, TraceError>
    where
        I: IntoIterator<Item = Result<u32, TraceError>>,
    {
        let Options {
            warmup,
            limit,
            heartbeat,
        } = self.opts;
        let mut warming = warmup > 0;
        let mut next_heartbeat = heartbeat;
        let stop_at = limit.map(|n| warmup.saturating_add(n));

        for addr in trace {
            if stop_at.is_some_and(|end| self.addr_idx >= end) {
                break;
            }
            self.step(addr?);

            if heartbeat != 0 && self.addr_idx >= next_heartbeat {
                info!("Addresses: {}", self.addr_idx);
                next_heartbeat = next_heartbeat.saturating_add(heartbeat);
            }

            if warming && self.addr_idx >= warmup {
                self.caches.iter_mut().for_each(|c| c.clear_stats());
                warming = false;
                info!("Finished warm-up after {} addresses", self.addr_idx);
            }
        }

        info!("Ran {} addresses", self.addr_idx);
        Ok(self.addr_idx)
    }

    pub fn caches(&self) -> &[Box<dyn IsCache>] {
        &self.caches
    }

    pub fn stats(&self) -> Vec<CacheStats> {
        self.caches.iter().map(|c| c.make_stats()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::Cache,
        config::Config,
        replace::{age::Age, direct::Direct},
    };

    fn ok(addrs: &[u32]) -> Vec<Result<u32, TraceError>> {
        addrs.iter().copied().map(Ok).collect()
    }

    fn default_sim(opts: Options) -> Simulator {
        Simulator::new(Config::default().to_caches().unwrap(), opts)
    }

    #[test]
    fn collisions_in_direct_mapped_never_hit() {
        let caches: Vec<Box<dyn IsCache>> =
            vec![Box::new(Cache::new("direct", 32, 1, Direct).unwrap())];
        let mut sim = Simulator::new(caches, Options::default());
        assert_eq!(sim.run(ok(&[0x1, 0x21, 0x1])).unwrap(), 3);

        let stats = sim.stats();
        assert_eq!(stats[0].hits, 0);
        assert_eq!(stats[0].accesses, 3);
        assert_eq!(stats[0].hit_rate, 0.0);
    }

    #[test]
    fn repeat_hits_in_all_four() {
        let mut sim = default_sim(Options::default());
        sim.run(ok(&[0x5, 0x5])).unwrap();
        for stats in sim.stats() {
            assert_eq!(stats.hits, 1, "{}", stats.name);
            assert_eq!(stats.accesses, 2, "{}", stats.name);
            assert_eq!(stats.hit_rate, 50.0, "{}", stats.name);
        }
    }

    #[test]
    fn organizations_diverge_on_conflicts() {
        // 0x0 and 0x20 share an index everywhere; only one way can't hold both
        let mut sim = default_sim(Options::default());
        sim.run(ok(&[0x0, 0x20, 0x0, 0x20])).unwrap();
        let hits: Vec<u64> = sim.stats().iter().map(|s| s.hits).collect();
        assert_eq!(hits, vec![0, 2, 2, 2]);
    }

    #[test]
    fn empty_trace_leaves_rate_undefined() {
        let mut sim = default_sim(Options::default());
        assert_eq!(sim.run(ok(&[])).unwrap(), 0);
        for cache in sim.caches() {
            assert_eq!(cache.hit_rate(), None);
        }
        assert!(sim.stats().iter().all(|s| s.hit_rate == 0.0));
    }

    #[test]
    fn warmup_resets_counters_but_not_contents() {
        let mut sim = default_sim(Options {
            warmup: 2,
            ..Options::default()
        });
        sim.run(ok(&[0x7, 0x9, 0x7, 0x9])).unwrap();
        for stats in sim.stats() {
            assert_eq!(stats.accesses, 2);
            assert_eq!(stats.hits, 2);
        }
    }

    #[test]
    fn limit_counts_measured_addresses() {
        let mut sim = default_sim(Options {
            warmup: 1,
            limit: Some(2),
            heartbeat: 1,
        });
        assert_eq!(sim.run(ok(&[1, 2, 3, 4, 5, 6])).unwrap(), 3);
        assert!(sim.stats().iter().all(|s| s.accesses == 2));
    }

    #[test]
    fn huge_warmup_with_limit_runs_to_the_end() {
        let mut sim = default_sim(Options {
            warmup: u64::MAX,
            limit: Some(2),
            heartbeat: u64::MAX,
        });
        assert_eq!(sim.run(ok(&[1, 2, 3])).unwrap(), 3);
        // Still warming up, so nothing has been reset
        assert!(sim.stats().iter().all(|s| s.accesses == 3));
    }

    #[test]
    fn trace_error_stops_the_run() {
        let caches: Vec<Box<dyn IsCache>> =
            vec![Box::new(Cache::new("full", 32, 32, Age).unwrap())];
        let mut sim = Simulator::new(caches, Options::default());
        let trace = vec![
            Ok(0x1),
            Err(TraceError::Parse {
                token: "xyz".to_string(),
                line: 1,
            }),
            Ok(0x1),
        ];
        assert!(matches!(sim.run(trace), Err(TraceError::Parse { .. })));
        assert_eq!(sim.caches()[0].accesses(), 1);
    }
}
