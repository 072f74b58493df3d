use std::sync::Arc;

use tracing::info;

use crate::{
    error::{Error, Result},
    logic::{Oracle, track_descriptors},
    spotify::Catalog,
    types::GeneratedPlaylist,
};

use super::Materializer;

pub const PLACEHOLDER_TITLE: &str = "GEN: Work in Progress";
pub const PLACEHOLDER_DESCRIPTION: &str = "Being generated by the Logic API";

pub const PLAYLIST_NOT_ACCESSIBLE: &str =
    "Couldn't access this playlist. Make sure the playlist is public and the link is correct.";

/// Runs a full generation: oracle call, placeholder playlist, then
/// materialization into the placeholder.
///
/// Nothing is written to the system account until the oracle has answered.
pub struct Generator {
    catalog: Arc<dyn Catalog>,
    oracle: Arc<dyn Oracle>,
    materializer: Materializer,
}

impl Generator {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        oracle: Arc<dyn Oracle>,
        materializer: Materializer,
    ) -> Self {
        Self {
            catalog,
            oracle,
            materializer,
        }
    }

    /// Generates a playlist from the tracks of the public playlist
    /// `source_id`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] with a visitor-facing message when the source
    /// playlist is missing or private.
    pub async fn from_playlist(&self, source_id: &str) -> Result<GeneratedPlaylist> {
        let source = self.catalog.get_playlist(source_id).await.map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound(PLAYLIST_NOT_ACCESSIBLE.to_string()),
            other => other,
        })?;
        let descriptors = track_descriptors(&source);
        info!(source_id, tracks = descriptors.len(), "analyzing source playlist");

        let output = self.oracle.from_playlist(&descriptors).await?;
        let target = self.placeholder().await?;
        let result = self.materializer.materialize(&output, &target).await?;
        Ok(GeneratedPlaylist::new(target, result))
    }

    /// Generates a playlist from a free-text description.
    pub async fn from_text(&self, description: &str) -> Result<GeneratedPlaylist> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::Validation("Description is required".to_string()));
        }

        let output = self.oracle.from_text(description).await?;
        let target = self.placeholder().await?;
        let result = self.materializer.materialize(&output, &target).await?;
        Ok(GeneratedPlaylist::new(target, result))
    }

    async fn placeholder(&self) -> Result<String> {
        let id = self
            .catalog
            .create_playlist(PLACEHOLDER_TITLE, PLACEHOLDER_DESCRIPTION)
            .await?;
        info!(playlist_id = %id, "placeholder playlist created");
        Ok(id)
    }
}
