//! Spot catalog integration tests.
//!
//! These tests exercise the catalog through its public trait against real
//! SQLite databases: ranking and search properties over varied record sets,
//! the seeded demo scenario, and concurrent recommendations.

use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use spotlist_core::{
    Spot, SpotCatalog, SpotError, SpotFields, SpotPatch, SqliteSpotCatalog, WriteOutcome,
};

/// Test helper owning a file-backed catalog in a temporary directory.
struct TestHarness {
    catalog: Arc<SqliteSpotCatalog>,
    temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = Arc::new(
            SqliteSpotCatalog::new(&temp_dir.path().join("spots.db"))
                .expect("Failed to create catalog"),
        );
        Self { catalog, temp_dir }
    }

    fn seeded() -> Self {
        let harness = Self::new();
        harness.catalog.initialize(true).expect("Failed to seed");
        harness
    }

    /// Open a second catalog on the same database file.
    fn reopen(&self) -> SqliteSpotCatalog {
        SqliteSpotCatalog::new(&self.temp_dir.path().join("spots.db"))
            .expect("Failed to reopen catalog")
    }

    /// Populate with a mix of names, descriptions and recommendation counts.
    fn populate(&self) -> Vec<Spot> {
        let rows = [
            ("Great Wall", "Ancient fortification", 4),
            ("Forbidden City", "Imperial palace in Beijing", 2),
            ("Li River", "Karst scenery near Guilin", 4),
            ("Terracotta Army", "Warriors in Xi'an", 0),
            ("Potala Palace", "Palace in Lhasa", 2),
            ("Jiuzhaigou", "Valley of lakes and waterfalls", 7),
            ("The Bund", "Waterfront in Shanghai", 0),
        ];

        for (name, description, recommendations) in rows {
            let spot = self
                .catalog
                .create(SpotFields::new(name, description))
                .unwrap();
            for _ in 0..recommendations {
                self.catalog.recommend(spot.id).unwrap();
            }
        }

        self.catalog.list().unwrap()
    }
}

fn assert_ranked(spots: &[Spot]) {
    for pair in spots.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.recommend_count > b.recommend_count
                || (a.recommend_count == b.recommend_count && a.id < b.id),
            "out of order: {:?} before {:?}",
            (a.id, a.recommend_count),
            (b.id, b.recommend_count)
        );
    }
}

#[test]
fn test_seed_scenario() {
    let harness = TestHarness::seeded();
    let catalog = &harness.catalog;

    catalog.recommend(1).unwrap();
    catalog.recommend(1).unwrap();
    catalog.recommend(2).unwrap();

    let spots = catalog.list().unwrap();
    let ranking: Vec<(i64, &str, i64)> = spots
        .iter()
        .map(|s| (s.id, s.name.as_str(), s.recommend_count))
        .collect();
    assert_eq!(ranking, vec![(1, "West Lake", 2), (2, "Huangshan", 1)]);
}

#[test]
fn test_seed_scenario_reversed_ranking() {
    let harness = TestHarness::seeded();
    harness.catalog.recommend(2).unwrap();

    let spots = harness.catalog.list().unwrap();
    assert_eq!(spots[0].id, 2);
    assert_eq!(spots[1].id, 1);
}

#[test]
fn test_list_is_ranked() {
    let harness = TestHarness::new();
    let spots = harness.populate();

    assert_eq!(spots.len(), 7);
    assert_ranked(&spots);
    assert_eq!(spots[0].name, "Jiuzhaigou");
    // Equal counts keep insertion (id) order
    assert_eq!(spots[1].name, "Great Wall");
    assert_eq!(spots[2].name, "Li River");
}

#[test]
fn test_search_is_filtered_list() {
    let harness = TestHarness::new();
    let all = harness.populate();

    for query in ["Palace", "in", "a", "Shanghai", "Wall", "nothing-here", "palace"] {
        let expected: Vec<Spot> = all
            .iter()
            .filter(|s| s.name.contains(query) || s.description.contains(query))
            .cloned()
            .collect();
        let found = harness.catalog.search(query).unwrap();

        assert_eq!(found, expected, "query {:?}", query);
        assert_ranked(&found);
    }
}

#[test]
fn test_search_empty_equals_list() {
    let harness = TestHarness::new();
    assert!(harness.catalog.search("").unwrap().is_empty());

    harness.populate();
    assert_eq!(
        harness.catalog.search("").unwrap(),
        harness.catalog.list().unwrap()
    );
}

#[test]
fn test_create_then_list() {
    let harness = TestHarness::seeded();
    let before = harness.catalog.list().unwrap();

    let fields = SpotFields::new("Yellow Crane Tower", "Tower in Wuhan")
        .with_ticket("70 CNY")
        .with_transport("Metro line 5")
        .with_image_url("https://example.com/tower.jpg");
    let created = harness.catalog.create(fields.clone()).unwrap();

    let after = harness.catalog.list().unwrap();
    assert_eq!(after.len(), before.len() + 1);

    let new: Vec<&Spot> = after
        .iter()
        .filter(|s| !before.iter().any(|b| b.id == s.id))
        .collect();
    assert_eq!(new.len(), 1);
    assert_eq!(new[0], &created);
    assert_eq!(new[0].recommend_count, 0);
    assert_eq!(new[0].name, fields.name);
    assert_eq!(new[0].image_url, fields.image_url);
}

#[test]
fn test_form_style_update() {
    let harness = TestHarness::seeded();
    let original = harness.catalog.get(1).unwrap().unwrap();

    let patch = SpotPatch::from(SpotFields {
        name: "X".to_string(),
        description: String::new(),
        ..Default::default()
    });
    harness.catalog.update(1, patch).unwrap();

    let updated = harness.catalog.get(1).unwrap().unwrap();
    assert_eq!(updated.name, "X");
    assert_eq!(updated.description, original.description);
    assert_eq!(updated.ticket, original.ticket);
}

#[test]
fn test_update_unknown_changes_nothing() {
    let harness = TestHarness::seeded();
    let before = harness.catalog.list().unwrap();

    let result = harness.catalog.update(42, SpotPatch::new().with_name("X"));

    assert!(matches!(result, Err(SpotError::NotFound(42))));
    assert_eq!(harness.catalog.list().unwrap(), before);
}

#[test]
fn test_delete_and_batch_delete() {
    let harness = TestHarness::new();
    let spots = harness.populate();
    let victim = spots[3].id;

    assert_eq!(harness.catalog.delete(victim).unwrap(), WriteOutcome::Applied);
    assert_eq!(harness.catalog.delete(victim).unwrap(), WriteOutcome::Missing);

    let (first, second) = (spots[0].id, spots[1].id);
    let removed = harness
        .catalog
        .batch_delete(&[first, second, 10_000])
        .unwrap();
    assert_eq!(removed, 2);

    let remaining: Vec<i64> = harness.catalog.list().unwrap().iter().map(|s| s.id).collect();
    let expected: Vec<i64> = spots
        .iter()
        .map(|s| s.id)
        .filter(|id| ![victim, first, second].contains(id))
        .collect();
    assert_eq!(remaining, expected);
}

#[test]
fn test_concurrent_recommends_no_lost_updates() {
    let harness = TestHarness::seeded();

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let catalog = Arc::clone(&harness.catalog);
            thread::spawn(move || catalog.recommend(1).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), WriteOutcome::Applied);
    }

    assert_eq!(harness.catalog.get(1).unwrap().unwrap().recommend_count, 100);
    assert_eq!(harness.catalog.get(2).unwrap().unwrap().recommend_count, 0);
}

#[test]
fn test_concurrent_recommends_across_connections() {
    let harness = TestHarness::seeded();
    let other = Arc::new(harness.reopen());

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let catalog: Arc<dyn SpotCatalog> = if i % 2 == 0 {
                harness.catalog.clone()
            } else {
                other.clone()
            };
            thread::spawn(move || catalog.recommend(2).unwrap())
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(harness.catalog.get(2).unwrap().unwrap().recommend_count, 100);
    assert_eq!(other.get(2).unwrap().unwrap().recommend_count, 100);
}

#[test]
fn test_seeding_once_across_connections() {
    let harness = TestHarness::new();
    let other = harness.reopen();

    let seeded = harness.catalog.initialize(true).unwrap() + other.initialize(true).unwrap();

    assert_eq!(seeded, 2);
    assert_eq!(other.count().unwrap(), 2);
}
