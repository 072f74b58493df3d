use tracing::debug;

use crate::{
    error::Result,
    types::{
        AddTrackToPlaylistRequest, ChangePlaylistDetailsRequest, CreatePlaylistRequest,
        CreatedPlaylist, Paging, Playlist, PlaylistItem,
    },
};

use super::SpotifyClient;

const NOT_ACCESSIBLE: &str =
    "Couldn't access this playlist. Make sure the playlist is public and the link is correct.";

impl SpotifyClient {
    /// Retrieves a playlist with all of its tracks.
    ///
    /// The playlist object only embeds the first page of tracks; remaining
    /// pages are fetched through the `next` cursor and appended in order.
    ///
    /// # Errors
    ///
    /// [`crate::error::Error::NotFound`] for missing or private playlists,
    /// with a message that can be shown to the visitor as is.
    pub async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let url = self.url(&format!("/playlists/{playlist_id}"));
        let mut playlist: Playlist = self.get_json(&url, NOT_ACCESSIBLE).await?;

        let mut next = playlist.tracks.next.take();
        while let Some(url) = next {
            let page: Paging<PlaylistItem> = self.get_json(&url, NOT_ACCESSIBLE).await?;
            playlist.tracks.items.extend(page.items);
            next = page.next;
        }

        Ok(playlist)
    }

    /// Creates a public playlist owned by the system account.
    ///
    /// Generated playlists must be public so visitors can open the link they
    /// are given.
    pub async fn create(&self, name: &str, description: &str) -> Result<String> {
        let user_id = self.current_user_id().await?;
        let request = self
            .client
            .post(self.url(&format!("/users/{user_id}/playlists")))
            .json(&CreatePlaylistRequest {
                name: name.to_string(),
                description: description.to_string(),
                public: true,
            });

        let created: CreatedPlaylist = self
            .send(request, "System account not found")
            .await?
            .json()
            .await?;
        debug!(playlist_id = %created.id, "playlist created");
        Ok(created.id)
    }

    pub async fn change_details(
        &self,
        playlist_id: &str,
        name: &str,
        description: &str,
    ) -> Result<()> {
        let request = self
            .client
            .put(self.url(&format!("/playlists/{playlist_id}")))
            .json(&ChangePlaylistDetailsRequest {
                name: name.to_string(),
                description: description.to_string(),
            });
        self.send(request, NOT_ACCESSIBLE).await?;
        Ok(())
    }

    /// Single add-items call; the caller keeps `track_ids` within
    /// [`super::ADD_TRACKS_LIMIT`].
    pub async fn add_items(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let uris = track_ids
            .iter()
            .map(|id| format!("spotify:track:{id}"))
            .collect();
        let request = self
            .client
            .post(self.url(&format!("/playlists/{playlist_id}/tracks")))
            .json(&AddTrackToPlaylistRequest { uris });
        self.send(request, NOT_ACCESSIBLE).await?;
        debug!(playlist_id, count = track_ids.len(), "tracks added");
        Ok(())
    }
}
