//! Bounded-time calls into untrusted code.
//!
//! This is the only concurrency primitive the referee needs: run a closure
//! on a worker thread and wait at most `timeout` for its value. The caller
//! observes exactly one of value or no-value; once the deadline passes the
//! channel receiver is gone, so a late value is discarded permanently and
//! can never affect referee state. The worker itself is abandoned, not
//! joined, which keeps a hanging agent from blocking the referee past the
//! deadline.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::warn;

/// Run `f` on a worker thread, waiting at most `timeout` for its result.
///
/// Returns `None` on timeout, on a panic inside `f`, or if the worker could
/// not be spawned. A panic is contained in the worker and never unwinds
/// into the caller.
pub fn call_with_timeout<T, F>(timeout: Duration, f: F) -> Option<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("bounded-call".to_owned())
        .spawn(move || match catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => {
                // Fails only if the caller already gave up; nothing to do.
                let _ = tx.send(value);
            }
            Err(_) => warn!("bounded call panicked; treating as no value"),
        });
    if let Err(err) = spawned {
        warn!(%err, "could not spawn worker for bounded call");
        return None;
    }
    rx.recv_timeout(timeout).ok()
}
