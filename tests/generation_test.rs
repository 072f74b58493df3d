mod common;

use std::{sync::Arc, time::Duration};

use common::{CatalogCall, FakeCatalog, FakeOracle, OracleCall, output, playlist_json, rec, track};
use recomix::{
    error::Error,
    management::{
        Generator, Materializer, PLACEHOLDER_DESCRIPTION, PLACEHOLDER_TITLE,
        PLAYLIST_NOT_ACCESSIBLE,
    },
    types::TrackDescriptor,
};
use serde_json::json;

fn generator(catalog: &Arc<FakeCatalog>, oracle: &Arc<FakeOracle>) -> Generator {
    Generator::new(
        catalog.clone(),
        oracle.clone(),
        Materializer::new(catalog.clone(), Duration::from_millis(100)),
    )
}

#[tokio::test(start_paused = true)]
async fn test_from_text_creates_placeholder_after_oracle_answers() {
    let catalog = Arc::new(FakeCatalog::with_tracks(&[track("id-1", "Lofi Rain", "Chillhop")]));
    let oracle = Arc::new(FakeOracle::new(output(
        "Chill Lofi",
        "Beats to relax to",
        &[rec("Lofi Rain", "Chillhop"), rec("Missing Tune", "Nobody")],
    )));

    let generated = generator(&catalog, &oracle)
        .from_text("  chill lofi beats ")
        .await
        .unwrap();

    assert_eq!(oracle.calls(), [OracleCall::Text("chill lofi beats".to_string())]);
    assert_eq!(
        catalog.calls()[0],
        CatalogCall::Create {
            name: PLACEHOLDER_TITLE.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
        }
    );
    assert_eq!(
        catalog.calls()[1],
        CatalogCall::UpdateDetails {
            id: "generated1".to_string(),
            name: "Chill Lofi".to_string(),
            description: "Beats to relax to".to_string(),
        }
    );

    assert_eq!(generated.playlist_id, "generated1");
    assert_eq!(
        generated.playlist_url,
        "https://open.spotify.com/playlist/generated1"
    );
    assert_eq!(generated.title, "Chill Lofi");
    assert_eq!(generated.tracks.len(), 1);
    assert_eq!(generated.not_found, ["Missing Tune by Nobody"]);
}

#[tokio::test]
async fn test_from_text_rejects_blank_description() {
    let catalog = Arc::new(FakeCatalog::default());
    let oracle = Arc::new(FakeOracle::new(output("T", "D", &[])));

    let err = generator(&catalog, &oracle)
        .from_text("   ")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(catalog.calls().is_empty());
    assert!(oracle.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_from_playlist_sends_track_descriptors() {
    let mut fake = FakeCatalog::default();
    fake.playlists.insert(
        "source".to_string(),
        playlist_json(
            "source",
            "Road Trip",
            json!([
                { "track": {
                    "id": "t1", "name": "Dreams",
                    "artists": [{ "name": "Fleetwood Mac" }, { "name": "Ignored" }],
                    "album": { "name": "Rumours", "release_date": "1977-02-04", "images": [] }
                } },
                { "track": null },
                { "track": { "id": "t2", "name": "Demo", "artists": [], "album": null } }
            ]),
        ),
    );
    let catalog = Arc::new(fake);
    let oracle = Arc::new(FakeOracle::new(output("Trip", "More", &[])));

    generator(&catalog, &oracle)
        .from_playlist("source")
        .await
        .unwrap();

    assert_eq!(
        oracle.calls(),
        [OracleCall::Playlist(vec![
            TrackDescriptor {
                name: "Dreams".to_string(),
                artist: "Fleetwood Mac".to_string(),
                album: "Rumours".to_string(),
                release_date: "1977-02-04".to_string(),
            },
            TrackDescriptor {
                name: "Demo".to_string(),
                artist: "Unknown".to_string(),
                album: "Unknown".to_string(),
                release_date: String::new(),
            },
        ])]
    );
}

#[tokio::test]
async fn test_from_playlist_reports_inaccessible_source() {
    let catalog = Arc::new(FakeCatalog::default());
    let oracle = Arc::new(FakeOracle::new(output("T", "D", &[])));

    let err = generator(&catalog, &oracle)
        .from_playlist("private")
        .await
        .unwrap_err();

    match err {
        Error::NotFound(message) => assert_eq!(message, PLAYLIST_NOT_ACCESSIBLE),
        other => panic!("unexpected error: {other}"),
    }
    assert!(oracle.calls().is_empty());
    // No placeholder is left behind on the system account
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn test_oracle_failure_is_propagated() {
    let catalog = Arc::new(FakeCatalog::default());
    let oracle = Arc::new(FakeOracle::failing());

    let err = generator(&catalog, &oracle)
        .from_text("anything")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Oracle { status: 500, .. }));
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn test_from_playlist_oracle_failure_creates_nothing() {
    let mut fake = FakeCatalog::default();
    fake.playlists.insert(
        "source".to_string(),
        playlist_json("source", "Road Trip", json!([])),
    );
    let catalog = Arc::new(fake);
    let oracle = Arc::new(FakeOracle::failing());

    let err = generator(&catalog, &oracle)
        .from_playlist("source")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Oracle { .. }));
    assert_eq!(oracle.calls(), [OracleCall::Playlist(vec![])]);
    assert!(
        !catalog
            .calls()
            .iter()
            .any(|c| matches!(c, CatalogCall::Create { .. }))
    );
}
