use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use crate::{
    error::Result,
    spotify::Catalog,
    types::{GenerationResult, OracleOutput, ResolvedTrack, TrackRecommendation},
};

/// Outcome of resolving one recommendation against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(ResolvedTrack),
    /// Recommendation rendered as `"<name> by <artist>"`.
    Missing(String),
}

/// Turns oracle output into a populated playlist.
///
/// Recommendations are searched one at a time with a fixed pause after every
/// search, including the last. A failing search counts as a miss and never
/// aborts the batch.
pub struct Materializer {
    catalog: Arc<dyn Catalog>,
    delay: Duration,
}

impl Materializer {
    pub fn new(catalog: Arc<dyn Catalog>, delay: Duration) -> Self {
        Self { catalog, delay }
    }

    pub async fn resolve(&self, recommendation: &TrackRecommendation) -> Resolution {
        let missing = || format!("{} by {}", recommendation.name, recommendation.artist);

        match self
            .catalog
            .search_track(&recommendation.name, &recommendation.artist)
            .await
        {
            Ok(Some(track)) => Resolution::Found(track),
            Ok(None) => Resolution::Missing(missing()),
            Err(e) => {
                warn!(track = %missing(), error = %e, "track search failed");
                Resolution::Missing(missing())
            }
        }
    }

    /// Writes `output` into the playlist `playlist_id`.
    ///
    /// # Errors
    ///
    /// Only when the name and description update fails. Search failures end
    /// up in `not_found` and a failed bulk add is logged.
    pub async fn materialize(
        &self,
        output: &OracleOutput,
        playlist_id: &str,
    ) -> Result<GenerationResult> {
        self.catalog
            .update_playlist_details(playlist_id, &output.playlist_title, &output.playlist_desc)
            .await?;

        let mut tracks = Vec::new();
        let mut not_found = Vec::new();

        for recommendation in &output.recommendations {
            match self.resolve(recommendation).await {
                Resolution::Found(track) => tracks.push(track),
                Resolution::Missing(entry) => not_found.push(entry),
            }
            tokio::time::sleep(self.delay).await;
        }

        if !tracks.is_empty() {
            let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
            if let Err(e) = self.catalog.add_tracks(playlist_id, &ids).await {
                warn!(playlist_id, error = %e, "failed to add tracks to playlist");
            }
        }

        info!(
            playlist_id,
            found = tracks.len(),
            missing = not_found.len(),
            "playlist materialized"
        );

        Ok(GenerationResult {
            title: output.playlist_title.clone(),
            description: output.playlist_desc.clone(),
            tracks,
            not_found,
        })
    }
}
