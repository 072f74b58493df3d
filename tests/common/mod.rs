#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use recomix::{
    error::{Error, Result},
    logic::Oracle,
    spotify::Catalog,
    types::{
        OracleOutput, Playlist, PlaylistSummary, Profile, ResolvedTrack, TrackDescriptor,
        TrackRecommendation,
    },
};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    Create { name: String, description: String },
    UpdateDetails { id: String, name: String, description: String },
    Search { name: String, artist: String },
    Append { id: String, track_ids: Vec<String> },
}

/// In-memory catalog. Searches hit `known` by track name, names listed in
/// `failing` make the search call fail.
#[derive(Default)]
pub struct FakeCatalog {
    pub known: HashMap<String, ResolvedTrack>,
    pub failing: HashSet<String>,
    pub profiles: HashMap<String, Profile>,
    pub public_playlists: HashMap<String, Vec<PlaylistSummary>>,
    pub playlists: HashMap<String, Playlist>,
    pub fail_append: bool,
    pub fail_update: bool,
    pub calls: Mutex<Vec<CatalogCall>>,
    pub search_times: Mutex<Vec<Instant>>,
    pub created: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_tracks(tracks: &[ResolvedTrack]) -> Self {
        Self {
            known: tracks
                .iter()
                .map(|t| (t.name.clone(), t.clone()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn searches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CatalogCall::Search { .. }))
            .count()
    }

    pub fn appended(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                CatalogCall::Append { track_ids, .. } => Some(track_ids),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: CatalogCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn get_profile(&self, user_id: &str) -> Result<Profile> {
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User '{user_id}' not found")))
    }

    async fn list_public_playlists(&self, user_id: &str) -> Result<Vec<PlaylistSummary>> {
        self.public_playlists
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User '{user_id}' not found")))
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        self.playlists
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("playlist".to_string()))
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<String> {
        self.record(CatalogCall::Create {
            name: name.to_string(),
            description: description.to_string(),
        });
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("generated{n}"))
    }

    async fn update_playlist_details(
        &self,
        playlist_id: &str,
        name: &str,
        description: &str,
    ) -> Result<()> {
        self.record(CatalogCall::UpdateDetails {
            id: playlist_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        });
        if self.fail_update {
            return Err(Error::Upstream {
                status: 500,
                body: "details".to_string(),
            });
        }
        Ok(())
    }

    async fn search_track(&self, name: &str, artist: &str) -> Result<Option<ResolvedTrack>> {
        self.record(CatalogCall::Search {
            name: name.to_string(),
            artist: artist.to_string(),
        });
        self.search_times.lock().unwrap().push(Instant::now());

        if self.failing.contains(name) {
            return Err(Error::Upstream {
                status: 503,
                body: "search unavailable".to_string(),
            });
        }
        Ok(self.known.get(name).cloned())
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        self.record(CatalogCall::Append {
            id: playlist_id.to_string(),
            track_ids: track_ids.to_vec(),
        });
        if self.fail_append {
            return Err(Error::Upstream {
                status: 500,
                body: "append".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OracleCall {
    Text(String),
    Playlist(Vec<TrackDescriptor>),
}

pub struct FakeOracle {
    pub output: OracleOutput,
    pub fail: bool,
    pub calls: Mutex<Vec<OracleCall>>,
}

impl FakeOracle {
    pub fn new(output: OracleOutput) -> Self {
        Self {
            output,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(output("", "", &[]))
        }
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: OracleCall) -> Result<OracleOutput> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(Error::Oracle {
                status: 500,
                body: "oracle down".to_string(),
            });
        }
        Ok(self.output.clone())
    }
}

#[async_trait]
impl Oracle for FakeOracle {
    async fn from_text(&self, description: &str) -> Result<OracleOutput> {
        self.answer(OracleCall::Text(description.to_string()))
    }

    async fn from_playlist(&self, tracks: &[TrackDescriptor]) -> Result<OracleOutput> {
        self.answer(OracleCall::Playlist(tracks.to_vec()))
    }
}

pub fn track(id: &str, name: &str, artist: &str) -> ResolvedTrack {
    ResolvedTrack {
        id: id.to_string(),
        name: name.to_string(),
        artist: artist.to_string(),
        album: format!("{name} (Single)"),
        image: None,
    }
}

pub fn rec(name: &str, artist: &str) -> TrackRecommendation {
    TrackRecommendation {
        name: name.to_string(),
        artist: artist.to_string(),
    }
}

pub fn output(title: &str, desc: &str, recommendations: &[TrackRecommendation]) -> OracleOutput {
    OracleOutput {
        playlist_title: title.to_string(),
        playlist_desc: desc.to_string(),
        recommendations: recommendations.to_vec(),
    }
}

/// Playlist detail in the Web API's JSON shape.
pub fn playlist_json(id: &str, name: &str, items: serde_json::Value) -> Playlist {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "description": null,
        "public": true,
        "images": [],
        "tracks": { "items": items, "next": null, "total": 2 }
    }))
    .unwrap()
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(listener: tokio::net::TcpListener, router: axum::Router) -> String {
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn local_listener() -> tokio::net::TcpListener {
    tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap()
}
