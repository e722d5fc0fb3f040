pub mod error_handling;
pub mod errors;
pub mod http;
pub mod oauth;
pub mod token_store;

// Re-export commonly used types
pub use errors::{AppError, Notice, Severity};
pub use token_store::TokenStore;
