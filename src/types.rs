use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

// Spotify Web API payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplePlaylist {
    pub id: String,
    pub name: String,
    pub public: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    pub tracks: TracksRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub public: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    pub tracks: Paging<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// `null` for tracks that were removed or are unavailable.
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<Album>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePlaylistDetailsRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Catalog-facing views returned by the service

/// Public profile of a Spotify user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub images: Vec<Image>,
    pub external_urls: serde_json::Map<String, serde_json::Value>,
}

impl From<UserProfile> for Profile {
    fn from(user: UserProfile) -> Self {
        Self {
            display_name: user
                .display_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| user.id.clone()),
            id: user.id,
            images: user.images,
            external_urls: user.external_urls,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub images: Vec<Image>,
    pub tracks_total: u64,
}

impl From<SimplePlaylist> for PlaylistSummary {
    fn from(p: SimplePlaylist) -> Self {
        Self {
            id: p.id,
            name: p.name,
            images: p.images,
            tracks_total: p.tracks.total,
        }
    }
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: u64,
    pub id: String,
}

// Logic API payloads

/// One track suggested by the Logic API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecommendation {
    pub name: String,
    pub artist: String,
}

/// The `output` object of a Logic API execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleOutput {
    pub playlist_title: String,
    pub playlist_desc: String,
    #[serde(default)]
    pub recommendations: Vec<TrackRecommendation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OracleResponse {
    pub output: OracleOutput,
}

/// Track summary sent to the Logic API when analyzing a playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub release_date: String,
}

// Generation results

/// A recommendation resolved to a catalog track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub image: Option<String>,
}

impl ResolvedTrack {
    /// Builds a resolved track from a catalog track, `None` when the track
    /// carries no id and therefore cannot be added to a playlist.
    pub fn from_track(track: Track) -> Option<Self> {
        let id = track.id?;
        let (album, image) = match track.album {
            Some(album) => {
                let image = album.images.into_iter().next().map(|i| i.url);
                (album.name, image)
            }
            None => ("Unknown".to_string(), None),
        };

        Some(Self {
            id,
            name: track.name,
            artist: track
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            album,
            image,
        })
    }
}

/// Outcome of one generation request. `tracks` and `not_found` together hold
/// every recommendation exactly once, in oracle order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub title: String,
    pub description: String,
    pub tracks: Vec<ResolvedTrack>,
    pub not_found: Vec<String>,
}

/// A generation result bound to the playlist it was written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPlaylist {
    pub playlist_id: String,
    pub playlist_url: String,
    pub title: String,
    pub description: String,
    pub tracks: Vec<ResolvedTrack>,
    pub not_found: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedPlaylist {
    pub fn new(playlist_id: String, result: GenerationResult) -> Self {
        Self {
            playlist_url: format!("https://open.spotify.com/playlist/{playlist_id}"),
            playlist_id,
            title: result.title,
            description: result.description,
            tracks: result.tracks,
            not_found: result.not_found,
            created_at: Utc::now(),
        }
    }
}
