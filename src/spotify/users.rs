use crate::{
    error::Result,
    types::{Paging, PlaylistSummary, Profile, SimplePlaylist, UserProfile},
};

use super::SpotifyClient;

/// Playlists requested per page. The Web API maximum for this endpoint.
const PLAYLIST_PAGE_SIZE: u32 = 50;

impl SpotifyClient {
    /// Retrieves the public profile of a user.
    ///
    /// A display name that is missing or empty falls back to the user id.
    ///
    /// # Errors
    ///
    /// [`crate::error::Error::NotFound`] when the user does not exist.
    pub async fn user_profile(&self, user_id: &str) -> Result<Profile> {
        let url = self.url(&format!("/users/{user_id}"));
        let user: UserProfile = self
            .get_json(&url, &format!("User '{user_id}' not found"))
            .await?;
        Ok(user.into())
    }

    /// Retrieves every public playlist of a user.
    ///
    /// Follows the `next` cursor of each page until the listing is
    /// exhausted and keeps only playlists flagged public, preserving the
    /// order the Web API returns them in.
    pub async fn public_playlists(&self, user_id: &str) -> Result<Vec<PlaylistSummary>> {
        let mut next = Some(self.url(&format!(
            "/users/{user_id}/playlists?limit={PLAYLIST_PAGE_SIZE}"
        )));
        let mut playlists = Vec::new();

        while let Some(url) = next {
            let page: Paging<Option<SimplePlaylist>> = self
                .get_json(&url, &format!("User '{user_id}' not found"))
                .await?;
            playlists.extend(public_only(page.items.into_iter().flatten()));
            next = page.next;
        }

        Ok(playlists)
    }

    /// Id of the system account, fetched from `/me` once and memoised.
    pub async fn current_user_id(&self) -> Result<String> {
        let id = self
            .system_user
            .get_or_try_init(|| async {
                let me: UserProfile = self
                    .get_json(&self.url("/me"), "System account not found")
                    .await?;
                Ok::<_, crate::error::Error>(me.id)
            })
            .await?;
        Ok(id.clone())
    }
}

/// Keeps playlists whose `public` flag is set. Collaborative and private
/// playlists report `false`, unknown visibility reports `null`.
pub fn public_only(
    playlists: impl IntoIterator<Item = SimplePlaylist>,
) -> impl Iterator<Item = PlaylistSummary> {
    playlists
        .into_iter()
        .filter(|p| p.public.unwrap_or(false))
        .map(PlaylistSummary::from)
}
