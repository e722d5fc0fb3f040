//! Application constants and configuration defaults

// === App ===
pub const APP_NAME: &str = "Themesify";
pub const APP_DIR_NAME: &str = "themesify";
pub const DATABASE_FILE: &str = "themesify.db";
pub const CONFIG_FILE: &str = "config.toml";

// === Spotify Web API ===
pub const API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const SAVED_TRACKS_PAGE_SIZE: u32 = 50;
pub const AUDIO_FEATURES_BATCH_SIZE: usize = 50;
pub const PLAYLIST_TRACK_CAP: usize = 100;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// === Retry (429 / 5xx) ===
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const RETRY_INITIAL_BACKOFF_MILLIS: u64 = 500;
pub const RETRY_MAX_BACKOFF_SECS: u64 = 30;

// === OAuth (implicit grant) ===
pub const AUTH_BASE_URL: &str = "https://accounts.spotify.com";
pub const OAUTH_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const OAUTH_SCOPES: &[&str] = &[
    "user-library-read",
    "playlist-modify-public",
    "playlist-modify-private",
];
pub const OAUTH_CALLBACK_TIMEOUT_SECS: u64 = 300;

// === Persistence ===
pub const TOKEN_STORAGE_KEY: &str = "access_token";

// === Playlists ===
pub const PLAYLIST_PUBLIC_DEFAULT: bool = true;
