//! Tokio Runtime Bridge
//!
//! GPUI drives its own executor, but the WebSocket transport requires tokio.
//! This module owns one lazily-created multi-threaded runtime that services
//! spawn their background tasks onto.
//!
//! ## Pattern
//!
//! ```text
//! GPUI / std thread
//!       │
//!       ▼
//! spawn_named_in_tokio("nt4-client", async { ... })
//!       │
//!       ▼
//! tokio::Runtime::spawn()
//! ```

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("xdash-tokio")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Spawn a detached task with a name (for debugging)
///
/// Used for long-running background tasks like the connection loop.
/// The task runs independently and its result is not awaited.
pub fn spawn_named_in_tokio<F>(name: &'static str, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!("Spawning tokio task: {}", name);
    get_runtime().spawn(async move {
        future.await;
        tracing::debug!("Tokio task completed: {}", name);
    });
}
