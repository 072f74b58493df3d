use tabled::Table;

use crate::{
    Res, config::Settings, info, state::AppState, types::PlaylistTableRow,
    utils::parse_user_id,
};

/// Prints the public playlists of a user as a table.
pub async fn playlists(settings: Settings, profile: String) -> Res<()> {
    let user_id = parse_user_id(&profile)
        .ok_or_else(|| format!("'{profile}' is not a Spotify username or profile link"))?;

    let state = AppState::from_settings(settings)?;
    let user = state.catalog.get_profile(&user_id).await?;
    let mut playlists = state.catalog.list_public_playlists(&user_id).await?;

    if playlists.is_empty() {
        info!("{} has no public playlists.", user.display_name);
        return Ok(());
    }

    playlists.sort_by_cached_key(|p| p.name.to_lowercase());
    info!(
        "{} public playlists of {}",
        playlists.len(),
        user.display_name
    );

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            tracks: p.tracks_total,
            id: p.id,
        })
        .collect();
    println!("{}", Table::new(rows));

    Ok(())
}
