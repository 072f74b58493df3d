//! recomix library
//!
//! Generates Spotify playlists on a shared system account, either from the
//! tracks of an existing public playlist or from a free-text description.
//! Recommendations come from the Logic document-execution API; this crate
//! resolves them to catalog tracks and writes the playlist.
//!
//! # Modules
//!
//! - `api` - JSON handlers, session and rate-limit middleware
//! - `cli` - Command-line entry points of the binary
//! - `config` - Environment and `.env` based settings
//! - `error` - Crate error type
//! - `logic` - Logic API client (the recommendation oracle)
//! - `management` - Token cache, generation pipeline, rate governor, sessions
//! - `server` - Router assembly and HTTP server
//! - `spotify` - Spotify accounts and Web API clients
//! - `state` - Shared application state
//! - `types` - Wire and domain types
//! - `utils` - Identifier parsing and PKCE helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logic;
pub mod management;
pub mod server;
pub mod spotify;
pub mod state;
pub mod types;
pub mod utils;

/// Boxed result used by the command-line plumbing.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Console status line with a blue `o` marker. Takes `println!` arguments.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Console status line with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` status line and exits the process with status 1.
///
/// Reserved for fatal start-up failures of the binary.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Console status line with a yellow `!` marker.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
