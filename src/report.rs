use std::io::{self, Write};

use crate::cache::CacheStats;

/// Prints one line per cache in the classic console layout.
pub fn write_summary<W: Write>(out: &mut W, stats: &[CacheStats]) -> io::Result<()> {
    for s in stats {
        writeln!(
            out,
            "For the {} cache: Hits = {}\t\tAccesses = {}\t\tHit Rate = {:.2}%",
            s.name, s.hits, s.accesses, s.hit_rate
        )?;
    }
    Ok(())
}

pub fn write_json<W: Write>(out: W, stats: &[CacheStats]) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(out, stats)
}
