use crate::{
    error::Result,
    types::{ResolvedTrack, SearchResponse},
};

use super::SpotifyClient;

/// Free-text query for one track. Passed to the search endpoint unchanged;
/// matching quality is whatever the catalog's search gives.
pub fn track_query(name: &str, artist: &str) -> String {
    format!("track:{name} artist:{artist}")
}

impl SpotifyClient {
    /// Searches the catalog for `name` by `artist` and returns the top hit.
    pub async fn find_track(&self, name: &str, artist: &str) -> Result<Option<ResolvedTrack>> {
        let query = track_query(name, artist);
        let request = self.client.get(self.url("/search")).query(&[
            ("q", query.as_str()),
            ("type", "track"),
            ("limit", "1"),
        ]);

        let response: SearchResponse = self.send(request, "Search").await?.json().await?;
        Ok(response
            .tracks
            .items
            .into_iter()
            .next()
            .and_then(ResolvedTrack::from_track))
    }
}
