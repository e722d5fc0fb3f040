use std::sync::{Mutex, MutexGuard};
use tokio::runtime::Runtime;

/// Creates a lightweight single-threaded Tokio runtime
///
/// All network calls run sequentially on one control thread, so the
/// current_thread scheduler is all the app needs.
///
/// Returns `Ok(Runtime)` if successful, or `Err(String)` with error message
pub fn create_runtime() -> Result<Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to create runtime: {}", e))
}

/// Locks a mutex, recovering the inner value if a previous holder panicked
///
/// Session state is replaced wholesale on every transition, so a poisoned
/// guard never exposes a half-written value.
pub fn safe_lock<'a, T>(mutex: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("[{}] Mutex poisoned, recovering from panic", context);
            poisoned.into_inner()
        }
    }
}
