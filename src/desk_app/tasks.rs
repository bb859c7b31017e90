//! Background requests.
//!
//! egui redraws on the UI thread, so every network call runs on its own
//! short-lived thread with a single-threaded tokio runtime. The result comes
//! back over an mpsc channel that `AppState::poll` drains each frame.

use std::future::Future;
use std::sync::mpsc::{channel, Receiver, TryRecvError};

use thiserror::Error;

use crate::desk_app::api::ApiError;

/// Receiving half of a background task
pub type Pending<T> = Receiver<T>;

/// The worker went away without sending a result
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("background task ended without a result")]
pub struct TaskLost;

impl From<TaskLost> for ApiError {
    fn from(e: TaskLost) -> Self {
        ApiError::Network(e.to_string())
    }
}

/// Run `make()` to completion on a worker thread
pub fn spawn<T, F, Fut>(make: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = T>,
{
    let (tx, rx) = channel();
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!(error = %e, "failed to create runtime");
                return;
            }
        };
        let result = rt.block_on(make());
        // receiver dropped means nobody is waiting any more
        let _ = tx.send(result);
    });
    rx
}

/// Take the result out of `slot` if it has arrived.
///
/// Clears the slot once a result (or the loss of one) is observed.
pub fn take_ready<T>(slot: &mut Option<Pending<T>>) -> Option<Result<T, TaskLost>> {
    let outcome = match slot.as_ref()?.try_recv() {
        Ok(value) => Ok(value),
        Err(TryRecvError::Empty) => return None,
        Err(TryRecvError::Disconnected) => Err(TaskLost),
    };
    *slot = None;
    Some(outcome)
}

/// `take_ready` for API calls, with a lost worker reported as a network error
pub fn take_api_result<T>(slot: &mut Option<Pending<Result<T, ApiError>>>) -> Option<Result<T, ApiError>> {
    take_ready(slot).map(|outcome| outcome.unwrap_or_else(|lost| Err(lost.into())))
}
