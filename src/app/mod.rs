pub mod themesify_app;

pub use themesify_app::{format_buckets, PublishTarget, ThemesifyApp};
