//! Test doubles: an in-memory `MusicApi` that records every call, and a
//! loopback HTTP server that plays back canned replies.

use crate::api::{ApiError, MusicApi};
use crate::models::{
    AudioFeatures, Credential, NewPlaylist, Playlist, SavedTrackItem, SavedTracksPage, Track, User,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tiny_http::{Header, Response, Server};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SavedTracks { limit: u32, offset: u32 },
    AudioFeatures(Vec<String>),
    CurrentUser,
    CreatePlaylist { user_id: String, playlist: NewPlaylist },
    AddTracks { playlist_id: String, uris: Vec<String> },
}

type Hook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct FakeMusicApi {
    pub library: Vec<Track>,
    pub features: HashMap<String, AudioFeatures>,
    pub user_id: String,
    pub fail_page_at_offset: Option<u32>,
    pub fail_features: bool,
    pub fail_create: bool,
    pub fail_add: bool,
    pub unauthorized: bool,
    /// Runs at the start of every saved-tracks request
    pub on_page: Option<Hook>,
    calls: Mutex<Vec<Call>>,
}

impl FakeMusicApi {
    pub fn with_library(library: Vec<Track>) -> Self {
        Self {
            library,
            user_id: "listener".to_string(),
            ..Default::default()
        }
    }

    pub fn with_features(mut self, features: Vec<(&str, AudioFeatures)>) -> Self {
        self.features = features
            .into_iter()
            .map(|(id, f)| (id.to_string(), f))
            .collect();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.unauthorized {
            return Err(ApiError::Unauthorized { status: 401 });
        }
        Ok(())
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "internal error".to_string(),
    }
}

pub fn track(id: &str) -> Track {
    Track {
        id: Some(id.to_string()),
        uri: Some(format!("spotify:track:{}", id)),
        name: format!("Track {}", id),
        artists: vec![],
        duration_ms: 180_000,
    }
}

pub fn tracks(count: usize) -> Vec<Track> {
    (0..count).map(|i| track(&format!("t{}", i))).collect()
}

pub fn features(energy: f64, valence: f64) -> AudioFeatures {
    AudioFeatures {
        energy: Some(energy),
        valence: Some(valence),
        ..Default::default()
    }
}

#[async_trait]
impl MusicApi for FakeMusicApi {
    async fn saved_tracks_page(
        &self,
        _credential: &Credential,
        limit: u32,
        offset: u32,
    ) -> Result<SavedTracksPage, ApiError> {
        if let Some(hook) = &self.on_page {
            hook();
        }
        self.record(Call::SavedTracks { limit, offset })?;
        if self.fail_page_at_offset == Some(offset) {
            return Err(server_error());
        }

        let items = self
            .library
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|t| SavedTrackItem {
                added_at: None,
                track: Some(t.clone()),
            })
            .collect();

        Ok(SavedTracksPage {
            items,
            total: self.library.len() as u32,
            offset,
            limit,
        })
    }

    async fn audio_features(
        &self,
        _credential: &Credential,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, ApiError> {
        self.record(Call::AudioFeatures(ids.to_vec()))?;
        if self.fail_features {
            return Err(server_error());
        }
        Ok(ids.iter().map(|id| self.features.get(id).cloned()).collect())
    }

    async fn current_user(&self, _credential: &Credential) -> Result<User, ApiError> {
        self.record(Call::CurrentUser)?;
        Ok(User {
            id: self.user_id.clone(),
            display_name: None,
        })
    }

    async fn create_playlist(
        &self,
        _credential: &Credential,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<Playlist, ApiError> {
        self.record(Call::CreatePlaylist {
            user_id: user_id.to_string(),
            playlist: playlist.clone(),
        })?;
        if self.fail_create {
            return Err(server_error());
        }
        Ok(Playlist {
            id: "pl-1".to_string(),
            name: playlist.name.clone(),
            uri: Some("spotify:playlist:pl-1".to_string()),
        })
    }

    async fn add_tracks_to_playlist(
        &self,
        _credential: &Credential,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        self.record(Call::AddTracks {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        })?;
        if self.fail_add {
            return Err(server_error());
        }
        Ok(())
    }
}

/// One canned reply of a [`ScriptedServer`]
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self::json(status, "{}")
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Hold the reply back for `delay` after the request arrives
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request as the server saw it
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Loopback server answering requests with `replies`, in order, then shutting down.
///
/// Requests are recorded on arrival, before the (possibly delayed) reply.
pub struct ScriptedServer {
    base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl ScriptedServer {
    pub fn start(replies: Vec<Reply>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();

        std::thread::spawn(move || {
            for reply in replies {
                let mut request = match server.recv_timeout(Duration::from_secs(10)) {
                    Ok(Some(request)) => request,
                    _ => return,
                };

                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let authorization = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Authorization"))
                    .map(|h| h.value.as_str().to_string());
                log.lock().unwrap().push(Received {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    authorization,
                    body,
                });

                std::thread::sleep(reply.delay);
                let mut response = Response::from_string(reply.body).with_status_code(reply.status);
                for (name, value) in &reply.headers {
                    response = response
                        .with_header(Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap());
                }
                let _ = request.respond(response);
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            received,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}
