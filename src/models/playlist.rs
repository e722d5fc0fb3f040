use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Body of the create-playlist request
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub public: bool,
}

/// Outcome of a successful publish
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedPlaylist {
    pub id: String,
    pub name: String,
    pub tracks_added: usize,
}
