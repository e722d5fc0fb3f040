use crate::api::{MusicApi, SpotifyClient};
use crate::config::AppConfig;
use crate::constants::OAUTH_CALLBACK_TIMEOUT_SECS;
use crate::models::Credential;
use crate::mood::{find_mood, mood_table, MoodBuckets, MoodDefinition};
use crate::services::publisher::{self, PublishOptions};
use crate::services::run_analysis;
use crate::state::AnalysisSession;
use crate::utils::errors::{AppError, Notice, Severity};
use crate::utils::http::RetryPolicy;
use crate::utils::oauth::{parse_redirect_fragment, CallbackListener, OAuthConfig};
use crate::utils::token_store::TokenStore;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Which buckets `publish` should turn into playlists
#[derive(Debug, Clone, PartialEq)]
pub enum PublishTarget {
    All,
    Moods(Vec<String>),
}

/// Ties the token store, the API client and the analysis session together
/// behind the user-facing commands.
pub struct ThemesifyApp {
    config: AppConfig,
    store: TokenStore,
    api: Arc<dyn MusicApi>,
    session: AnalysisSession,
}

impl ThemesifyApp {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let store = TokenStore::open(&config.database_path())?;
        let client = SpotifyClient::new(
            &config.api_base_url,
            config.request_timeout_secs,
            RetryPolicy::new(config.max_retries),
        )
        .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self::with_parts(config, store, Arc::new(client)))
    }

    pub fn with_parts(config: AppConfig, store: TokenStore, api: Arc<dyn MusicApi>) -> Self {
        Self {
            config,
            store,
            api,
            session: AnalysisSession::new(),
        }
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    /// Interactive login: open the authorize page and wait for the loopback redirect
    pub async fn login(&self) -> Result<Notice, AppError> {
        let client_id = self.config.require_client_id()?.to_string();
        let oauth = OAuthConfig::new(client_id, self.config.redirect_uri.clone())
            .with_auth_base_url(&self.config.auth_base_url);
        let url = oauth.authorize_url();

        // Bind before opening the browser so the redirect cannot arrive first
        let listener = CallbackListener::bind(&oauth.redirect_uri)?;

        if let Err(e) = webbrowser::open(&url) {
            warn!("[Login] Could not open a browser: {}", e);
        }
        println!("If your browser did not open, visit:\n\n  {}\n", url);

        let timeout = Duration::from_secs(OAUTH_CALLBACK_TIMEOUT_SECS);
        let credential = tokio::task::spawn_blocking(move || listener.wait_for_token(timeout))
            .await
            .map_err(|e| AppError::Authorization(format!("login task failed: {}", e)))??;

        self.store_credential(&credential)
    }

    /// Login from a redirect fragment pasted by the user
    pub fn login_with_fragment(&self, fragment: &str) -> Result<Notice, AppError> {
        let credential = parse_redirect_fragment(fragment)?;
        self.store_credential(&credential)
    }

    fn store_credential(&self, credential: &Credential) -> Result<Notice, AppError> {
        self.store.set(credential)?;
        self.session.reset();
        info!("[Login] Access token stored");
        Ok(Notice::success("Logged in."))
    }

    pub fn logout(&self) -> Result<Notice, AppError> {
        self.store.clear()?;
        self.session.reset();
        Ok(Notice::success("Logged out."))
    }

    pub async fn status(&self) -> Result<Notice, AppError> {
        let Some(credential) = self.store.get()? else {
            return Ok(Notice::success("Not logged in."));
        };

        let user = self
            .api
            .current_user(&credential)
            .await
            .map_err(|e| AppError::from_api(e, AppError::Fetch));
        let user = self.clear_on_unauthorized(user)?;

        let name = user.display_name.as_deref().unwrap_or(&user.id);
        Ok(Notice::success(format!("Logged in as {} ({}).", name, user.id)))
    }

    /// One line per mood: key, accent colour and rule
    pub fn moods(&self) -> Notice {
        let lines: Vec<String> = mood_table()
            .iter()
            .map(|mood| format!("{:<12} {:<8} {}", mood.key(), mood.accent(), mood.describe()))
            .collect();
        Notice::success(lines.join("\n"))
    }

    /// Fetch, analyze and classify the whole library. Ctrl-C cancels the run.
    pub async fn analyze(&self) -> Result<MoodBuckets, AppError> {
        let credential = self.require_credential()?;
        let api = self.api.as_ref();

        let result = tokio::select! {
            result = run_analysis(
                &self.session,
                api,
                &credential,
                mood_table(),
                self.config.missing_dimension(),
            ) => result,
            _ = tokio::signal::ctrl_c() => {
                self.session.cancel();
                Err(AppError::Cancelled)
            }
        };

        self.clear_on_unauthorized(result)
    }

    /// Analyze, then create one playlist per requested mood.
    ///
    /// Each mood is reported on its own line; a failure on one mood does not
    /// stop the others unless it is an authorization failure. Any failed mood
    /// makes the returned notice an error.
    pub async fn publish(&self, target: &PublishTarget) -> Result<Notice, AppError> {
        let moods = resolve_targets(target)?;
        let buckets = self.analyze().await?;
        let credential = self.require_credential()?;
        let options = PublishOptions {
            public: self.config.playlist_public,
        };

        let mut lines = Vec::new();
        let mut failed = false;

        for mood in moods {
            let tracks = buckets.get(mood.key()).unwrap_or_default();
            if tracks.is_empty() && *target == PublishTarget::All {
                info!("[Publish] Skipping empty {} bucket", mood.name());
                continue;
            }

            let result =
                publisher::publish(self.api.as_ref(), &credential, mood, tracks, &options).await;
            match self.clear_on_unauthorized(result) {
                Ok(playlist) => lines.push(format!(
                    "Created \"{}\" with {} tracks.",
                    playlist.name, playlist.tracks_added
                )),
                Err(e) if e.is_authorization() => return Err(e),
                Err(e) => {
                    failed = true;
                    lines.push(e.to_string());
                }
            }
        }

        if lines.is_empty() {
            lines.push("Nothing to publish: every mood bucket is empty.".to_string());
        }
        let message = lines.join("\n");
        if failed {
            Ok(Notice {
                severity: Severity::Error,
                message,
            })
        } else {
            Ok(Notice::success(message))
        }
    }

    fn require_credential(&self) -> Result<Credential, AppError> {
        self.store.get()?.ok_or_else(|| {
            AppError::Authorization("not logged in, run `themesify login` first".to_string())
        })
    }

    /// Drop the stored token when the service rejected it
    fn clear_on_unauthorized<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(e) = &result {
            if e.is_authorization() {
                warn!("[Auth] Token rejected, clearing it");
                if let Err(clear_err) = self.store.clear() {
                    warn!("[Auth] Failed to clear token: {}", clear_err);
                }
                self.session.reset();
            }
        }
        result
    }
}

/// Track count per mood; with `with_tracks`, every track and its artists under its mood
pub fn format_buckets(buckets: &MoodBuckets, with_tracks: bool) -> String {
    let mut lines = Vec::new();
    for bucket in buckets.iter() {
        lines.push(format!(
            "{:<12} {:<12} {:>5}",
            bucket.key,
            bucket.name,
            bucket.tracks.len()
        ));
        if with_tracks {
            for track in &bucket.tracks {
                let artists = track.artist_names();
                if artists.is_empty() {
                    lines.push(format!("    {}", track.name));
                } else {
                    lines.push(format!("    {} - {}", track.name, artists));
                }
            }
        }
    }
    lines.join("\n")
}

fn resolve_targets(target: &PublishTarget) -> Result<Vec<&'static MoodDefinition>, AppError> {
    match target {
        PublishTarget::All => Ok(mood_table().iter().collect()),
        PublishTarget::Moods(names) if names.is_empty() => Err(AppError::Publish(
            "name at least one mood, or pass --all".to_string(),
        )),
        PublishTarget::Moods(names) => names
            .iter()
            .map(|name| {
                find_mood(name).ok_or_else(|| AppError::Publish(format!("unknown mood '{}'", name)))
            })
            .collect(),
    }
}
