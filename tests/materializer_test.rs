mod common;

use std::{sync::Arc, time::Duration};

use common::{CatalogCall, FakeCatalog, output, rec, track};
use recomix::{
    error::Error,
    management::{Materializer, Resolution},
};

const DELAY: Duration = Duration::from_millis(100);

fn materializer(catalog: &Arc<FakeCatalog>) -> Materializer {
    Materializer::new(catalog.clone(), DELAY)
}

#[tokio::test(start_paused = true)]
async fn test_found_and_missing_partition_recommendations() {
    let catalog = Arc::new(FakeCatalog::with_tracks(&[
        track("id-a", "Strobe", "deadmau5"),
        track("id-c", "Midnight City", "M83"),
    ]));
    let recs = [
        rec("Strobe", "deadmau5"),
        rec("Not On Spotify", "Nobody"),
        rec("Midnight City", "M83"),
    ];

    let result = materializer(&catalog)
        .materialize(&output("Night Drive", "Synths", &recs), "target")
        .await
        .unwrap();

    assert_eq!(result.title, "Night Drive");
    assert_eq!(result.description, "Synths");
    let found: Vec<&str> = result.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(found, ["id-a", "id-c"]);
    assert_eq!(result.not_found, ["Not On Spotify by Nobody"]);
    assert_eq!(result.tracks.len() + result.not_found.len(), recs.len());
    assert_eq!(catalog.appended(), [vec!["id-a".to_string(), "id-c".to_string()]]);
}

#[tokio::test(start_paused = true)]
async fn test_details_are_updated_first_and_once() {
    let catalog = Arc::new(FakeCatalog::with_tracks(&[track("id-a", "Strobe", "deadmau5")]));

    materializer(&catalog)
        .materialize(&output("Title", "Desc", &[rec("Strobe", "deadmau5")]), "target")
        .await
        .unwrap();

    let calls = catalog.calls();
    assert_eq!(
        calls[0],
        CatalogCall::UpdateDetails {
            id: "target".to_string(),
            name: "Title".to_string(),
            description: "Desc".to_string(),
        }
    );
    let updates = calls
        .iter()
        .filter(|c| matches!(c, CatalogCall::UpdateDetails { .. }))
        .count();
    assert_eq!(updates, 1);
    assert!(matches!(calls.last(), Some(CatalogCall::Append { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_zero_recommendations_still_update_details() {
    let catalog = Arc::new(FakeCatalog::default());

    let result = materializer(&catalog)
        .materialize(&output("Empty", "Nothing here", &[]), "target")
        .await
        .unwrap();

    assert!(result.tracks.is_empty());
    assert!(result.not_found.is_empty());
    assert_eq!(
        catalog.calls(),
        [CatalogCall::UpdateDetails {
            id: "target".to_string(),
            name: "Empty".to_string(),
            description: "Nothing here".to_string(),
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_all_unfound_makes_no_add_call() {
    let catalog = Arc::new(FakeCatalog::default());
    let recs = [rec("One", "A"), rec("Two", "B")];

    let result = materializer(&catalog)
        .materialize(&output("T", "D", &recs), "target")
        .await
        .unwrap();

    assert!(result.tracks.is_empty());
    assert_eq!(result.not_found, ["One by A", "Two by B"]);
    assert!(catalog.appended().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_search_does_not_stop_the_batch() {
    let mut fake = FakeCatalog::with_tracks(&[
        track("id-1", "First", "A"),
        track("id-3", "Third", "C"),
    ]);
    fake.failing.insert("Second".to_string());
    let catalog = Arc::new(fake);
    let recs = [rec("First", "A"), rec("Second", "B"), rec("Third", "C")];

    let result = materializer(&catalog)
        .materialize(&output("T", "D", &recs), "target")
        .await
        .unwrap();

    assert_eq!(catalog.searches(), 3);
    assert_eq!(result.not_found, ["Second by B"]);
    let found: Vec<&str> = result.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(found, ["id-1", "id-3"]);
}

#[tokio::test(start_paused = true)]
async fn test_searches_are_sequential_and_spaced() {
    let catalog = Arc::new(FakeCatalog::default());
    let recs = [rec("One", "A"), rec("Two", "B"), rec("Three", "C")];
    let started = tokio::time::Instant::now();

    materializer(&catalog)
        .materialize(&output("T", "D", &recs), "target")
        .await
        .unwrap();

    let times = catalog.search_times.lock().unwrap().clone();
    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        assert_eq!(pair[1] - pair[0], DELAY);
    }
    // The pause also follows the last search
    assert_eq!(started.elapsed(), DELAY * 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_bulk_add_still_returns_result() {
    let mut fake = FakeCatalog::with_tracks(&[track("id-a", "Strobe", "deadmau5")]);
    fake.fail_append = true;
    let catalog = Arc::new(fake);

    let result = materializer(&catalog)
        .materialize(&output("T", "D", &[rec("Strobe", "deadmau5")]), "target")
        .await
        .unwrap();

    assert_eq!(result.tracks.len(), 1);
    assert_eq!(catalog.appended().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_details_update_is_an_error() {
    let catalog = Arc::new(FakeCatalog {
        fail_update: true,
        ..Default::default()
    });

    let err = materializer(&catalog)
        .materialize(&output("T", "D", &[rec("One", "A")]), "target")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream { status: 500, .. }));
    assert_eq!(catalog.searches(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_large_batches_are_added_in_chunks() {
    let tracks: Vec<_> = (0..150)
        .map(|i| track(&format!("id{i}"), &format!("Song {i}"), "Artist"))
        .collect();
    let catalog = Arc::new(FakeCatalog::with_tracks(&tracks));
    let recs: Vec<_> = (0..150).map(|i| rec(&format!("Song {i}"), "Artist")).collect();

    let result = materializer(&catalog)
        .materialize(&output("T", "D", &recs), "target")
        .await
        .unwrap();

    assert_eq!(result.tracks.len(), 150);
    let chunks = catalog.appended();
    assert_eq!(chunks.iter().map(Vec::len).collect::<Vec<_>>(), [100, 50]);
}

#[tokio::test]
async fn test_resolve_reports_missing_entry() {
    let catalog = Arc::new(FakeCatalog::default());

    let resolution = materializer(&catalog).resolve(&rec("Ghost", "Nobody")).await;

    assert_eq!(resolution, Resolution::Missing("Ghost by Nobody".to_string()));
}
