use labelscrape_core::collision::MarkerIndex;
use labelscrape_core::layout::{GlyphFragment, LineAnchor, ScrapeOptions};
use labelscrape_core::progress::{NoProgress, StatusKind};
use labelscrape_core::{
    BBox, CollisionGuard, Marker, MarkerStore, RawGlyph, ScrapeContext, ScrapeOutcome,
    StatusUpdate, ToleranceProfile, cluster_and_guard, scrape_region,
};

fn floor_plan() -> Vec<RawGlyph> {
    vec![
        RawGlyph::new(10.0, 100.0, 30.0, 10.0, "ROOM"),
        RawGlyph::new(41.0, 100.0, 20.0, 10.0, "101"),
        RawGlyph::new(200.0, 100.0, 30.0, 10.0, "ROOM"),
        RawGlyph::new(231.0, 100.0, 20.0, 10.0, "102"),
        RawGlyph::new(400.0, 400.0, 40.0, 10.0, "STAIR"),
    ]
}

fn whole_page() -> BBox {
    BBox::new(0.0, 0.0, 1000.0, 1000.0)
}

#[test]
fn scrape_places_one_marker_per_label() {
    let mut store = MarkerStore::default();
    let mut updates: Vec<StatusUpdate> = Vec::new();
    let mut sink = |u: StatusUpdate| updates.push(u);

    let outcome = scrape_region(
        &ScrapeContext::default(),
        whole_page(),
        &floor_plan(),
        &mut store,
        &mut sink,
    )
    .unwrap();

    assert_eq!(outcome.placed(), 3);
    assert_eq!(store.markers[0], Marker::new(35.5, 105.0, "ROOM 101"));
    assert_eq!(store.markers[1].text, "ROOM 102");
    assert_eq!(store.markers[2].text, "STAIR");

    let last = updates.last().unwrap();
    assert_eq!(last.kind, StatusKind::Success);
    assert_eq!(last.message, "Scraped 3 locations");
    assert_eq!(updates[0].message, "Scraping, please wait...");
}

#[test]
fn single_cluster_reports_its_text() {
    let mut store = MarkerStore::default();
    let mut messages = Vec::new();
    let mut sink = |u: StatusUpdate| messages.push(u.message);
    scrape_region(
        &ScrapeContext::default(),
        BBox::new(0.0, 90.0, 100.0, 120.0),
        &floor_plan(),
        &mut store,
        &mut sink,
    )
    .unwrap();
    assert_eq!(messages.last().map(String::as_str), Some("Scraped: \"ROOM 101\""));
}

#[test]
fn rescraping_the_same_area_collides() {
    let mut store = MarkerStore::default();
    let first = scrape_region(
        &ScrapeContext::default(),
        whole_page(),
        &floor_plan(),
        &mut store,
        &mut NoProgress,
    )
    .unwrap();
    assert_eq!(first.placed(), 3);

    let mut messages = Vec::new();
    let mut sink = |u: StatusUpdate| messages.push(u.message);
    let second = scrape_region(
        &ScrapeContext::default(),
        whole_page(),
        &floor_plan(),
        &mut store,
        &mut sink,
    )
    .unwrap();
    assert_eq!(second, ScrapeOutcome::AllCollided { clusters: 3 });
    assert_eq!(store.markers.len(), 3);
    assert_eq!(
        messages.last().map(String::as_str),
        Some("No valid locations found (all collided)")
    );
}

#[test]
fn partial_collision_places_the_rest() {
    let mut store = MarkerStore::default();
    store.markers.push(Marker::new(40.0, 100.0, "existing"));

    let outcome = scrape_region(
        &ScrapeContext::default(),
        whole_page(),
        &floor_plan(),
        &mut store,
        &mut NoProgress,
    )
    .unwrap();
    let ScrapeOutcome::Placed { markers, rejected } = outcome else {
        panic!("expected placed outcome");
    };
    assert_eq!(rejected, 1);
    let texts: Vec<&str> = markers.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["ROOM 102", "STAIR"]);
    assert_eq!(store.markers.len(), 3);
}

#[test]
fn larger_dots_widen_the_guard() {
    // 24 px away: clear for dot size 1 (21 px), blocked for dot size 2 (41 px).
    let existing = vec![(35.5 + 24.0, 105.0)];
    let fragments: Vec<GlyphFragment> = floor_plan()[..2]
        .iter()
        .filter_map(GlyphFragment::from_raw)
        .collect();
    let profile = ToleranceProfile::default();
    let options = ScrapeOptions::default();

    let small = cluster_and_guard(fragments.clone(), &profile, &existing, 21.0, &options);
    assert_eq!(small.accepted.len(), 1);

    let large = cluster_and_guard(fragments, &profile, &existing, 41.0, &options);
    assert!(large.accepted.is_empty());
    assert_eq!(large.rejected, 1);
}

#[test]
fn tolerance_change_changes_marker_count() {
    let glyphs = floor_plan();
    let tight = ScrapeContext {
        profile: ToleranceProfile::new(0.5, 25.0).unwrap(),
        ..ScrapeContext::default()
    };
    let mut store = MarkerStore::default();
    let outcome =
        scrape_region(&tight, whole_page(), &glyphs, &mut store, &mut NoProgress).unwrap();
    // "ROOM" and "101" now stand alone but their centres are 26 apart.
    assert_eq!(outcome.placed(), 5);
}

#[test]
fn running_mean_anchor_is_selectable() {
    let glyphs = vec![
        RawGlyph::new(0.0, 0.0, 10.0, 10.0, "A"),
        RawGlyph::new(100.0, 4.0, 10.0, 10.0, "B"),
        RawGlyph::new(200.0, 8.0, 10.0, 10.0, "C"),
    ];
    let ctx = ScrapeContext {
        options: ScrapeOptions {
            line_anchor: LineAnchor::RunningMean,
            ..ScrapeOptions::default()
        },
        ..ScrapeContext::default()
    };
    let mut store = MarkerStore::default();
    let outcome = scrape_region(&ctx, whole_page(), &glyphs, &mut store, &mut NoProgress).unwrap();
    assert_eq!(outcome.placed(), 3);
}

#[test]
fn guard_is_usable_directly() {
    let mut index = MarkerIndex::for_dot_size(1.0);
    assert!(!index.is_too_close(0.0, 0.0));
    index.record(0.0, 0.0);
    assert!(index.is_too_close(20.0, 0.0));
    assert!(!index.is_too_close(21.0, 0.0));
}
