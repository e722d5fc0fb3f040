//! Analysis pipeline: saved tracks → audio features → mood buckets, driven
//! through [`AnalysisSession`] transitions.

use crate::api::MusicApi;
use crate::models::Credential;
use crate::mood::{classify_with, MissingDimension, MoodBuckets, MoodDefinition};
use crate::services::library::{attach_audio_features, fetch_all_saved_tracks};
use crate::state::{AnalysisSession, AnalysisState};
use crate::utils::errors::AppError;

/// Run one full analysis pass.
///
/// Fetching covers the saved-track pages; Classifying covers the feature
/// lookup and rule evaluation. If the session is cancelled while a network
/// call is pending, the result is discarded and `AppError::Cancelled` is returned.
pub async fn run_analysis(
    session: &AnalysisSession,
    api: &dyn MusicApi,
    credential: &Credential,
    table: &[MoodDefinition],
    policy: MissingDimension,
) -> Result<MoodBuckets, AppError> {
    let generation = session.begin()?;

    let outcome: Result<MoodBuckets, AppError> = async {
        let tracks = fetch_all_saved_tracks(api, credential).await?;
        if !session.advance(generation, AnalysisState::Classifying) {
            return Err(AppError::Cancelled);
        }

        let analyzed = attach_audio_features(api, credential, tracks).await?;
        Ok::<_, AppError>(classify_with(&analyzed, table, policy))
    }
    .await;

    match outcome {
        Ok(buckets) => {
            for (key, _, count) in buckets.summary() {
                log::info!("[Analysis] {}: {} tracks", key, count);
            }
            if session.advance(generation, AnalysisState::Ready(buckets.clone())) {
                Ok(buckets)
            } else {
                Err(AppError::Cancelled)
            }
        }
        Err(AppError::Cancelled) => Err(AppError::Cancelled),
        Err(e) => {
            // A cancelled run's failure is not reported as the session state
            session.advance(generation, AnalysisState::Failed(e.to_string()));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::mood_table;
    use crate::testing::{features, tracks, FakeMusicApi};

    fn credential() -> Credential {
        Credential::new("test-token")
    }

    #[tokio::test]
    async fn test_run_reaches_ready() {
        let api = FakeMusicApi::with_library(tracks(3))
            .with_features(vec![("t0", features(0.8, 0.9)), ("t2", features(0.2, 0.1))]);
        let session = AnalysisSession::new();

        let buckets = run_analysis(
            &session,
            &api,
            &credential(),
            mood_table(),
            MissingDimension::Rejected,
        )
        .await
        .unwrap();

        let happy: Vec<_> = buckets.get("happy").unwrap().iter().map(|t| t.id.clone()).collect();
        assert_eq!(happy, vec![Some("t0".to_string())]);
        assert_eq!(session.state(), AnalysisState::Ready(buckets));
    }

    #[tokio::test]
    async fn test_failure_reaches_failed() {
        let mut api = FakeMusicApi::with_library(tracks(3));
        api.fail_features = true;
        let session = AnalysisSession::new();

        let err = run_analysis(&session, &api, &credential(), mood_table(), MissingDimension::Satisfied)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::FeatureLookup(_)));
        assert!(matches!(session.state(), AnalysisState::Failed(_)));
    }

    #[tokio::test]
    async fn test_cancel_mid_fetch_discards_result() {
        let session = AnalysisSession::new();
        let mut api = FakeMusicApi::with_library(tracks(3));
        let handle = session.clone();
        api.on_page = Some(Box::new(move || handle.cancel()));

        let err = run_analysis(&session, &api, &credential(), mood_table(), MissingDimension::Satisfied)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(session.state(), AnalysisState::Idle);
    }

    #[tokio::test]
    async fn test_busy_session_rejects_run() {
        let session = AnalysisSession::new();
        session.begin().unwrap();
        let api = FakeMusicApi::with_library(tracks(1));

        let err = run_analysis(&session, &api, &credential(), mood_table(), MissingDimension::Satisfied)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Busy));
        assert!(api.calls().is_empty());
    }
}
