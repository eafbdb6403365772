use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// How an issued request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Completed,
    /// Superseded or torn down before it finished. Not an error.
    Cancelled,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request task panicked: {0}")]
    Panicked(String),

    #[error("no async runtime available to issue the request")]
    NoRuntime,
}

/// Handle to one in-flight asynchronous request.
///
/// Dropping the handle detaches the task; call `cancel` to abandon it.
#[derive(Debug)]
pub struct RequestHandle {
    task: JoinHandle<()>,
}

impl RequestHandle {
    /// Spawn `fut` on `runtime`. Works from any thread, inside a runtime or not.
    pub fn spawn_on<F>(runtime: &Handle, fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: runtime.spawn(fut),
        }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the request to settle. A cancelled request settles as
    /// `Settled::Cancelled` rather than an error.
    pub async fn join(self) -> Result<Settled, RequestError> {
        match self.task.await {
            Ok(()) => Ok(Settled::Completed),
            Err(e) if e.is_cancelled() => Ok(Settled::Cancelled),
            Err(e) => Err(RequestError::Panicked(e.to_string())),
        }
    }
}

/// The runtime a controller issues requests on: the one captured when it was
/// built, else whichever the calling thread is running in.
pub(crate) fn pick_runtime(captured: &Option<Handle>) -> Option<Handle> {
    captured.clone().or_else(|| Handle::try_current().ok())
}

/// Lock a controller's shared state. State is only ever replaced wholesale,
/// so a poisoned lock still holds a consistent value.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_join_completed() {
        let handle = RequestHandle::spawn_on(&Handle::current(), async {});
        assert_eq!(handle.join().await.unwrap(), Settled::Completed);
    }

    #[tokio::test]
    async fn test_cancelled_request_settles_as_cancelled() {
        let gate = Arc::new(Notify::new());
        let ran = Arc::new(Mutex::new(false));

        let handle = {
            let gate = Arc::clone(&gate);
            let ran = Arc::clone(&ran);
            RequestHandle::spawn_on(&Handle::current(), async move {
                gate.notified().await;
                *lock(&ran) = true;
            })
        };

        handle.cancel();
        gate.notify_one();

        assert_eq!(handle.join().await.unwrap(), Settled::Cancelled);
        assert!(!*lock(&ran));
    }

    #[tokio::test]
    async fn test_spawn_on_from_thread_outside_runtime() {
        let runtime = Handle::current();
        let handle = std::thread::spawn(move || RequestHandle::spawn_on(&runtime, async {}))
            .join()
            .unwrap();

        assert_eq!(handle.join().await.unwrap(), Settled::Completed);
    }

    #[tokio::test]
    async fn test_panicking_request_is_an_error() {
        let handle = RequestHandle::spawn_on(&Handle::current(), async { panic!("boom") });
        assert!(matches!(handle.join().await, Err(RequestError::Panicked(_))));
    }
}
