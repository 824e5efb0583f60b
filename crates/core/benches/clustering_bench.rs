#[path = "common/tier.rs"]
mod bench_tier;
#[path = "common/rng.rs"]
mod rng;

use std::env;
use std::hint::black_box;
use std::time::Duration;

use criterion::measurement::Measurement;
use criterion::{
    BenchmarkGroup, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

use labelscrape_core::layout::{GlyphFragment, LineAnchor, ScrapeOptions, ToleranceProfile};
use labelscrape_core::{MarkerIndex, cluster_and_guard, cluster_fragments, guard_clusters};

use bench_tier::{BenchTier, bench_tier};
use rng::XorShift64;

/// Page seed, overridable so a regression can be replayed on the same layout.
fn page_seed() -> u64 {
    env::var("LABELSCRAPE_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0x5C4A_9E)
}

#[derive(Debug, Clone, Copy)]
enum GroupKind {
    /// Line grouping plus merging; cost grows with the page.
    Clustering,
    /// R-tree lookups per cluster; fast and low-variance.
    Collision,
}

fn configure_group<M: Measurement>(
    group: &mut BenchmarkGroup<'_, M>,
    kind: GroupKind,
    tier: BenchTier,
) {
    let (sample_size, measurement) = match (kind, tier) {
        (GroupKind::Clustering, BenchTier::Quick) => (15, Duration::from_secs(4)),
        (GroupKind::Clustering, BenchTier::Full) => (25, Duration::from_secs(8)),
        (GroupKind::Collision, BenchTier::Quick) => (40, Duration::from_secs(2)),
        (GroupKind::Collision, BenchTier::Full) => (80, Duration::from_secs(4)),
    };
    group.sample_size(sample_size);
    group.measurement_time(measurement);
}

const WORDS: &[&str] = &["ROOM", "OFFICE", "STAIR", "CORR", "MECH", "ELEC", "STOR", "LAB"];

/// Two-line room labels scattered on a grid, the shape of a typical sheet.
fn synthetic_page(count: usize, seed: u64) -> Vec<GlyphFragment> {
    let mut rng = XorShift64::new(seed);
    let mut fragments = Vec::with_capacity(count);
    let cols = ((count / 2) as f64).sqrt().ceil().max(1.0) as usize;
    let mut label = 0usize;
    while fragments.len() < count {
        let x = (label % cols) as f64 * 120.0 + rng.gen_f64(0.0, 20.0);
        let y = (label / cols) as f64 * 90.0 + rng.gen_f64(0.0, 20.0);
        let word = WORDS[rng.gen_index(WORDS.len())];
        if let Some(f) = GlyphFragment::new(x, y, 40.0, 9.0, word) {
            fragments.push(f);
        }
        let number = format!("{}", 100 + label);
        if let Some(f) = GlyphFragment::new(x, y + 14.0, 24.0, 9.0, &number) {
            fragments.push(f);
        }
        label += 1;
    }
    fragments.truncate(count);
    fragments
}

fn bench_clustering(c: &mut Criterion) {
    let tier = bench_tier();
    let seed = page_seed();
    let profile = ToleranceProfile::default();

    let mut group = c.benchmark_group("cluster_fragments");
    configure_group(&mut group, GroupKind::Clustering, tier);

    for &size in tier.page_sizes() {
        let page = synthetic_page(size, seed);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("first_member", size), &page, |b, page| {
            b.iter(|| {
                let clusters =
                    cluster_fragments(page.clone(), &profile, LineAnchor::FirstMember);
                black_box(clusters.len());
            })
        });
        group.bench_with_input(BenchmarkId::new("running_mean", size), &page, |b, page| {
            b.iter(|| {
                let clusters =
                    cluster_fragments(page.clone(), &profile, LineAnchor::RunningMean);
                black_box(clusters.len());
            })
        });
    }
    group.finish();
}

fn bench_collision(c: &mut Criterion) {
    let tier = bench_tier();
    let seed = page_seed();
    let profile = ToleranceProfile::default();
    let options = ScrapeOptions::default();

    let mut group = c.benchmark_group("collision_guard");
    configure_group(&mut group, GroupKind::Collision, tier);

    for &size in tier.page_sizes() {
        let page = synthetic_page(size, seed);
        let clusters = cluster_fragments(page.clone(), &profile, LineAnchor::FirstMember);
        let existing: Vec<(f64, f64)> = clusters
            .iter()
            .step_by(2)
            .map(|cluster| cluster.center())
            .collect();

        group.throughput(Throughput::Elements(clusters.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("guard_half_placed", size),
            &clusters,
            |b, clusters| {
                b.iter(|| {
                    let mut index = MarkerIndex::with_centroids(existing.iter().copied(), 21.0);
                    black_box(guard_clusters(clusters, &mut index).rejected);
                })
            },
        );
        group.bench_with_input(BenchmarkId::new("cluster_and_guard", size), &page, |b, page| {
            b.iter(|| {
                let batch = cluster_and_guard(page.clone(), &profile, &existing, 21.0, &options);
                black_box(batch.accepted.len());
            })
        });
    }
    group.finish();
}

criterion_group!(clustering_benches, bench_clustering, bench_collision);
criterion_main!(clustering_benches);
