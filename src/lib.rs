//! Themesify: sort your Spotify liked songs into mood playlists.
//!
//! Saved tracks are fetched page by page, their audio features looked up in
//! batches, and every track is checked against a fixed table of mood rules.
//! Any mood bucket can then be published as a new playlist.

pub mod api;
pub mod app;
pub mod config;
pub mod constants;
pub mod models;
pub mod mood;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
mod testing;
