//! Implicit-grant login: authorize URL, redirect fragment parsing, and a
//! loopback listener that receives the token from the browser.
//!
//! The token arrives in the URL fragment, which browsers never send to a
//! server. The callback page wipes it from the address bar and POSTs it to
//! `<callback path>/token`.

use crate::constants::{AUTH_BASE_URL, OAUTH_SCOPES};
use crate::models::Credential;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::time::{Duration, Instant};
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("authorization denied: {0}")]
    Denied(String),

    #[error("no access token in redirect")]
    MissingToken,

    #[error("unexpected token type '{0}', expected Bearer")]
    InvalidTokenType(String),

    #[error("invalid redirect URI '{0}'")]
    InvalidRedirectUri(String),

    #[error("callback listener error: {0}")]
    Listener(String),

    #[error("timed out waiting for the browser redirect")]
    Timeout,
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_base_url: String,
}

impl OAuthConfig {
    pub fn new(client_id: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            redirect_uri,
            scopes: OAUTH_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_base_url: AUTH_BASE_URL.to_string(),
        }
    }

    pub fn with_auth_base_url(mut self, auth_base_url: &str) -> Self {
        self.auth_base_url = auth_base_url.trim_end_matches('/').to_string();
        self
    }

    /// Authorization endpoint URL requesting a token directly (`response_type=token`)
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/authorize?client_id={}&redirect_uri={}&scope={}&response_type=token&show_dialog=true",
            self.auth_base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scopes.join(" ")),
        )
    }
}

fn parse_params(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned();
            let value = urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

/// Extract the bearer credential from a redirect fragment
/// (`access_token=...&token_type=Bearer&expires_in=3600`, leading `#` optional).
pub fn parse_redirect_fragment(fragment: &str) -> Result<Credential, AuthError> {
    let fragment = fragment.trim();
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let params = parse_params(fragment);

    if let Some(error) = params.get("error") {
        return Err(AuthError::Denied(error.clone()));
    }

    let token = params
        .get("access_token")
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    match params.get("token_type") {
        Some(kind) if kind.eq_ignore_ascii_case("bearer") => Ok(Credential::new(token.clone())),
        Some(kind) => Err(AuthError::InvalidTokenType(kind.clone())),
        None => Err(AuthError::InvalidTokenType(String::new())),
    }
}

/// Split `http://host:port/path` into (`host:port`, `/path`)
pub fn split_redirect_uri(redirect_uri: &str) -> Result<(String, String), AuthError> {
    let invalid = || AuthError::InvalidRedirectUri(redirect_uri.to_string());
    let rest = redirect_uri.strip_prefix("http://").ok_or_else(invalid)?;
    let (authority, path) = match rest.find('/') {
        Some(index) => (&rest[..index], &rest[index..]),
        None => (rest, "/"),
    };
    if authority.is_empty() {
        return Err(invalid());
    }

    let address = if authority.contains(':') {
        authority.to_string()
    } else {
        format!("{}:80", authority)
    };
    Ok((address, path.to_string()))
}

/// Endpoint receiving the forwarded fragment, nested under the callback path
pub fn token_path_for(callback_path: &str) -> String {
    format!("{}/token", callback_path.trim_end_matches('/'))
}

// The fragment goes out as a POST body: it never becomes part of a URL and
// the page never navigates, so the address bar keeps the cleaned path.
const FORWARD_PAGE: &str = r#"<!doctype html>
<html><head><title>Themesify</title></head>
<body>
<p id="status">Completing sign-in...</p>
<script>
  var fragment = window.location.hash.substring(1);
  history.replaceState(null, "", window.location.pathname);
  var label = document.getElementById("status");
  fetch(TOKEN_PATH, { method: "POST", body: fragment })
    .then(function (response) { return response.text(); })
    .then(function (text) { label.textContent = text; })
    .catch(function () { label.textContent = "Sign-in failed, return to the terminal."; });
</script>
</body></html>"#;

const SIGNED_IN: &str = "Signed in to Themesify. You can close this window.";

fn text_response(body: &str, status: u16, content_type: &str) -> Response<Cursor<Vec<u8>>> {
    let response = Response::from_string(body).with_status_code(status);
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(_) => response,
    }
}

fn respond(request: Request, response: Response<Cursor<Vec<u8>>>) {
    if let Err(e) = request.respond(response) {
        log::warn!("[OAuth] Failed to answer browser: {}", e);
    }
}

/// Loopback HTTP listener receiving the implicit-grant redirect
pub struct CallbackListener {
    server: Server,
    callback_path: String,
    token_path: String,
    forward_page: String,
}

impl CallbackListener {
    /// Bind to the host and port of `redirect_uri` (must be a plain `http://` loopback URI)
    pub fn bind(redirect_uri: &str) -> Result<Self, AuthError> {
        let (address, callback_path) = split_redirect_uri(redirect_uri)?;
        let token_path = token_path_for(&callback_path);
        let token_literal =
            serde_json::to_string(&token_path).map_err(|e| AuthError::Listener(e.to_string()))?;
        let forward_page = FORWARD_PAGE.replace("TOKEN_PATH", &token_literal);

        let server = Server::http(address.as_str()).map_err(|e| AuthError::Listener(e.to_string()))?;
        log::info!("[OAuth] Listening for redirect on {}{}", address, callback_path);
        Ok(Self {
            server,
            callback_path,
            token_path,
            forward_page,
        })
    }

    /// Port actually bound (useful when binding port 0)
    pub fn port(&self) -> Option<u16> {
        self.server.server_addr().to_ip().map(|addr| addr.port())
    }

    /// Block until the browser delivers the token, then stop listening.
    ///
    /// The first POST to the token path is parsed and answered; the listener
    /// is consumed so a fragment is never processed twice.
    pub fn wait_for_token(self, timeout: Duration) -> Result<Credential, AuthError> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(AuthError::Timeout);
            }

            let mut request = match self.server.recv_timeout(remaining) {
                Ok(Some(request)) => request,
                Ok(None) => return Err(AuthError::Timeout),
                Err(e) => return Err(AuthError::Listener(e.to_string())),
            };

            let url = request.url().to_string();
            let path = url.split_once('?').map_or(url.as_str(), |(path, _)| path);
            log::debug!("[OAuth] Browser requested {} {}", request.method(), path);

            if path == self.token_path {
                if *request.method() != Method::Post {
                    respond(request, text_response("POST the fragment", 405, "text/plain"));
                    continue;
                }

                let mut fragment = String::new();
                if let Err(e) = request.as_reader().read_to_string(&mut fragment) {
                    respond(request, text_response("Unreadable request", 400, "text/plain"));
                    return Err(AuthError::Listener(e.to_string()));
                }

                let result = parse_redirect_fragment(&fragment);
                match &result {
                    Ok(_) => respond(request, text_response(SIGNED_IN, 200, "text/plain")),
                    Err(e) => {
                        let body = format!("Sign-in failed: {}", e);
                        respond(request, text_response(&body, 400, "text/plain"))
                    }
                }
                return result;
            } else if path == self.callback_path {
                respond(
                    request,
                    text_response(&self.forward_page, 200, "text/html; charset=utf-8"),
                );
            } else {
                respond(request, text_response("Not found", 404, "text/plain"));
            }
        }
    }
}
