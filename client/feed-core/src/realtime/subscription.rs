//! Scoped ownership of realtime consumer tasks.

use provider_api::ChangeEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// RAII handle over a spawned consumer task.
///
/// Dropping the handle aborts the task, which in turn drops its channel
/// receiver and releases the provider-side subscription. A view that owns
/// its handles therefore cannot leak a live subscription past teardown.
#[derive(Debug)]
pub struct SubscriptionHandle {
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Explicit teardown; equivalent to dropping the handle
    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Forwards events from one channel receiver into a shared sink, preserving
/// arrival order. Exits when either side closes.
pub fn spawn_forwarder(
    mut rx: mpsc::Receiver<ChangeEvent>,
    sink: mpsc::Sender<ChangeEvent>,
) -> SubscriptionHandle {
    let task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if sink.send(event).await.is_err() {
                break;
            }
        }
        debug!("realtime forwarder exiting");
    });
    SubscriptionHandle::new(task)
}
