//! Library service: pulls the user's saved tracks and their audio features.
//!
//! Pages and feature batches are requested strictly one after another, in
//! order, so the assembled library keeps the order the service returned.

use crate::api::MusicApi;
use crate::constants::{AUDIO_FEATURES_BATCH_SIZE, SAVED_TRACKS_PAGE_SIZE};
use crate::models::{AnalyzedTrack, AudioFeatures, Credential, Track};
use crate::utils::errors::AppError;
use std::collections::HashMap;

/// Fetch every saved track, 50 per page, stopping at the total reported by the first page.
///
/// Any failed page aborts the whole fetch; no partial list is returned.
pub async fn fetch_all_saved_tracks(
    api: &dyn MusicApi,
    credential: &Credential,
) -> Result<Vec<Track>, AppError> {
    let mut tracks = Vec::new();
    let mut offset: u32 = 0;
    let mut total: Option<u32> = None;

    while total.map_or(true, |total| offset < total) {
        let page = api
            .saved_tracks_page(credential, SAVED_TRACKS_PAGE_SIZE, offset)
            .await
            .map_err(|e| {
                log::error!("[Library] Page at offset {} failed: {}", offset, e);
                AppError::from_api(e, AppError::Fetch)
            })?;

        let expected = *total.get_or_insert(page.total);
        let before = tracks.len();
        // Null tracks are catalog entries that no longer exist
        tracks.extend(page.items.into_iter().filter_map(|item| item.track));

        log::debug!(
            "[Library] Page offset {}: {} tracks (total so far: {}/{})",
            offset,
            tracks.len() - before,
            tracks.len(),
            expected
        );
        offset += SAVED_TRACKS_PAGE_SIZE;
    }

    log::info!("[Library] Fetched {} saved tracks", tracks.len());
    Ok(tracks)
}

/// Pair every track with its audio features, looked up in batches of 50 ids.
///
/// Tracks without an id (local files) get no features without a lookup.
pub async fn attach_audio_features(
    api: &dyn MusicApi,
    credential: &Credential,
    tracks: Vec<Track>,
) -> Result<Vec<AnalyzedTrack>, AppError> {
    let ids: Vec<String> = tracks.iter().filter_map(|t| t.id.clone()).collect();
    let mut by_id: HashMap<String, AudioFeatures> = HashMap::with_capacity(ids.len());

    for (index, batch) in ids.chunks(AUDIO_FEATURES_BATCH_SIZE).enumerate() {
        let response = api.audio_features(credential, batch).await.map_err(|e| {
            log::error!("[Library] Feature batch {} failed: {}", index, e);
            AppError::from_api(e, AppError::FeatureLookup)
        })?;

        if response.len() != batch.len() {
            return Err(AppError::FeatureLookup(format!(
                "expected {} entries in batch {}, got {}",
                batch.len(),
                index,
                response.len()
            )));
        }

        for (id, features) in batch.iter().zip(response) {
            if let Some(features) = features {
                by_id.insert(id.clone(), features);
            }
        }
    }

    let analyzed: Vec<AnalyzedTrack> = tracks
        .into_iter()
        .map(|track| {
            let features = track.id.as_ref().and_then(|id| by_id.get(id).cloned());
            AnalyzedTrack::new(track, features)
        })
        .collect();

    log::info!(
        "[Library] Audio features found for {}/{} tracks",
        analyzed.iter().filter(|a| a.features.is_some()).count(),
        analyzed.len()
    );
    Ok(analyzed)
}

/// Saved tracks paired with their features, in library order.
pub async fn fetch_library(
    api: &dyn MusicApi,
    credential: &Credential,
) -> Result<Vec<AnalyzedTrack>, AppError> {
    let tracks = fetch_all_saved_tracks(api, credential).await?;
    attach_audio_features(api, credential, tracks).await
}
