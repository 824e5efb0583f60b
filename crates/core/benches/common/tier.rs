use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

pub fn bench_tier() -> BenchTier {
    match env::var("LABELSCRAPE_BENCH_TIER").as_deref() {
        Ok("full") => BenchTier::Full,
        _ => BenchTier::Quick,
    }
}

impl BenchTier {
    /// Glyph counts per synthetic page.
    pub fn page_sizes(self) -> &'static [usize] {
        match self {
            BenchTier::Quick => &[200, 2_000],
            BenchTier::Full => &[200, 2_000, 20_000],
        }
    }
}
