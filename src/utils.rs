use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use sha2::{Digest, Sha256};

static USER_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^spotify:user:([a-zA-Z0-9_.-]+)").expect("valid regex"));
static USER_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://open\.spotify\.com/user/([a-zA-Z0-9_.-]+)").expect("valid regex")
});
static USER_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("valid regex"));
static PLAYLIST_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^spotify:playlist:([a-zA-Z0-9]+)").expect("valid regex"));
static PLAYLIST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://open\.spotify\.com/playlist/([a-zA-Z0-9]+)").expect("valid regex")
});

/// Extracts a Spotify user id from a profile URL, a `spotify:user:` URI or a
/// plain username.
///
/// Accepted forms:
/// - `https://open.spotify.com/user/abc123`
/// - `https://open.spotify.com/user/abc123?si=xxx`
/// - `spotify:user:abc123`
/// - `abc123` (letters, digits, `_`, `-`, `.`)
///
/// Returns `None` when the input matches none of them, or when the id is
/// made only of dots.
pub fn parse_user_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let id = [&*USER_URI, &*USER_URL]
        .into_iter()
        .find_map(|pattern| pattern.captures(input).map(|caps| caps[1].to_string()))
        .or_else(|| USER_PLAIN.is_match(input).then(|| input.to_string()))?;

    // `.` and `..` would rewrite the request path
    (!id.chars().all(|c| c == '.')).then_some(id)
}

/// Extracts a playlist id from a playlist URL or `spotify:playlist:` URI.
///
/// Unlike user ids, bare tokens are not accepted.
pub fn parse_playlist_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    [&*PLAYLIST_URI, &*PLAYLIST_URL]
        .into_iter()
        .find_map(|pattern| pattern.captures(input).map(|caps| caps[1].to_string()))
}

/// Random alphanumeric string, used for PKCE verifiers, OAuth `state` values
/// and anonymous session ids.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_token(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Compares two secrets without short-circuiting on the first mismatch.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Short non-reversible tag for a caller key, safe to put in logs: the first
/// four bytes of its SHA-256 digest in hex.
pub fn log_tag(key: &str) -> String {
    Sha256::digest(key.as_bytes())
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
