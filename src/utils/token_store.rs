//! Persistent holder for the access credential.
//!
//! The token lives in a small SQLite database under a well-known key,
//! encrypted with AES-256-GCM. The key is derived from the app name, the
//! home directory and the login name: this keeps the token out of plain
//! sight on disk, but anyone running as the same user can recover it.

use crate::constants::TOKEN_STORAGE_KEY;
use crate::models::Credential;
use crate::utils::errors::AppError;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;

const NONCE_LEN: usize = 12;

pub struct TokenStore {
    conn: Connection,
    cipher: Aes256Gcm,
}

impl TokenStore {
    /// Open (or create) the store at `path`, creating parent directories as needed
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Storage(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let conn = Connection::open(path)?;
        log::debug!("[TokenStore] Opened {}", path.display());
        Self::with_connection(conn)
    }

    /// Store that lives only as long as the process
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, AppError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS credentials (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        let key_bytes = derive_key();
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
        Ok(Self { conn, cipher })
    }

    /// Replace the stored credential
    pub fn set(&self, credential: &Credential) -> Result<(), AppError> {
        let sealed = self.seal(credential.as_str())?;
        self.conn.execute(
            "INSERT INTO credentials (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![TOKEN_STORAGE_KEY, sealed],
        )?;
        log::info!("[TokenStore] Credential saved");
        Ok(())
    }

    /// Current credential, `None` if nothing is stored.
    ///
    /// A value that no longer decrypts (different machine or user) is dropped.
    pub fn get(&self) -> Result<Option<Credential>, AppError> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM credentials WHERE key = ?1",
                params![TOKEN_STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(sealed) = stored else {
            return Ok(None);
        };

        match self.open_sealed(&sealed) {
            Some(token) => Ok(Some(Credential::new(token))),
            None => {
                log::warn!("[TokenStore] Stored credential is unreadable, discarding it");
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn clear(&self) -> Result<(), AppError> {
        self.conn.execute(
            "DELETE FROM credentials WHERE key = ?1",
            params![TOKEN_STORAGE_KEY],
        )?;
        log::info!("[TokenStore] Credential cleared");
        Ok(())
    }

    fn seal(&self, plaintext: &str) -> Result<String, AppError> {
        let nonce_bytes: [u8; NONCE_LEN] = rand::random();
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| AppError::Storage(format!("encryption failed: {}", e)))?;

        let mut blob = nonce_bytes.to_vec();
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(blob))
    }

    fn open_sealed(&self, sealed: &str) -> Option<String> {
        let blob = BASE64.decode(sealed).ok()?;
        if blob.len() <= NONCE_LEN {
            return None;
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .ok()?;
        String::from_utf8(plaintext).ok()
    }
}

fn derive_key() -> [u8; 32] {
    let home = dirs::home_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(b"themesify-token-store-v1");
    hasher.update(home.as_bytes());
    hasher.update(user.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_clear() {
        let store = TokenStore::in_memory().unwrap();
        assert_eq!(store.get().unwrap(), None);

        store.set(&Credential::new("first")).unwrap();
        store.set(&Credential::new("second")).unwrap();
        assert_eq!(store.get().unwrap(), Some(Credential::new("second")));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("themesify.db");

        TokenStore::open(&path)
            .unwrap()
            .set(&Credential::new("persisted-token"))
            .unwrap();

        let reopened = TokenStore::open(&path).unwrap();
        assert_eq!(
            reopened.get().unwrap(),
            Some(Credential::new("persisted-token"))
        );
    }

    #[test]
    fn test_token_not_stored_in_plaintext() {
        let store = TokenStore::in_memory().unwrap();
        store.set(&Credential::new("very-secret-token")).unwrap();

        let raw: String = store
            .conn
            .query_row("SELECT value FROM credentials", [], |row| row.get(0))
            .unwrap();
        assert!(!raw.contains("very-secret-token"));
    }

    #[test]
    fn test_unreadable_value_is_discarded() {
        let store = TokenStore::in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO credentials (key, value) VALUES (?1, 'not-base64!')",
                params![TOKEN_STORAGE_KEY],
            )
            .unwrap();

        assert_eq!(store.get().unwrap(), None);
        let remaining: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM credentials", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
