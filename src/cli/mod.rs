//! # CLI Module
//!
//! Terminal commands of the `recomix` binary. Each command receives the
//! settings loaded at start-up, builds what it needs from them and reports
//! through the coloured status macros.
//!
//! ## Commands
//!
//! - [`serve`] - runs the HTTP service (the default command)
//! - [`setup`] - one-time authorization of the system account; opens the
//!   admin setup page in the browser and prints the refresh token once the
//!   callback has been hit
//! - [`playlists`] - lists the public playlists of a user as a table, read
//!   through the system account
//!
//! ## Usage
//!
//! ```bash
//! recomix setup                                   # authorize the system account
//! recomix serve --addr 0.0.0.0:5001               # run the service
//! recomix playlists https://open.spotify.com/user/alice
//! ```

mod playlists;
mod serve;
mod setup;

pub use playlists::playlists;
pub use serve::serve;
pub use setup::setup;
