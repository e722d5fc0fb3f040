/// Services module - business logic layer
///
/// Each service takes the API seam and the credential explicitly, so the
/// CLI layer stays thin and the services run against a fake in tests.
pub mod library;
pub mod pipeline;
pub mod publisher;

// Re-export commonly used types
pub use library::{attach_audio_features, fetch_all_saved_tracks, fetch_library};
pub use pipeline::run_analysis;
pub use publisher::{publish, PublishOptions};
