//! Process shutdown coordination.
//!
//! The server runs until Ctrl+C or SIGTERM arrives. The [`Shutdown`] handle
//! fans that event out to interested tasks and then holds the process open
//! for a drain window so in-flight requests can finish.

use std::time::Duration;

use tokio::signal;
use tokio::sync::broadcast;
use tracing::info;

/// Ties the shutdown trigger to a connection drain window.
#[derive(Clone)]
pub struct Shutdown {
    notify: broadcast::Sender<()>,
    drain: Duration,
}

impl Shutdown {
    /// Create a handle whose [`drained`](Self::drained) future lingers for
    /// `drain` after the trigger fires.
    pub fn with_drain(drain: Duration) -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify, drain }
    }

    /// Arm the OS signal handlers. Any Ctrl+C or SIGTERM received after this
    /// point trips the shutdown notification.
    pub fn listen_for_signals(&self) {
        let notify = self.notify.clone();
        tokio::spawn(async move {
            os_signal().await;
            let _ = notify.send(());
        });
    }

    /// Trip the shutdown notification directly.
    pub fn trigger(&self) {
        let _ = self.notify.send(());
    }

    /// Receiver for the shutdown notification.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Resolves once shutdown has been triggered and the drain window has
    /// elapsed.
    pub async fn drained(&self) {
        let mut rx = self.notify.subscribe();
        let _ = rx.recv().await;

        info!("Draining connections for {:?} before exit", self.drain);
        tokio::time::sleep(self.drain).await;
        info!("Drain window elapsed");
    }
}

/// Completes on the first Ctrl+C or, on unix, SIGTERM.
async fn os_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Ctrl+C handler install failed");
    };

    #[cfg(unix)]
    let sigterm = async {
        let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler install failed");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, shutting down"),
        _ = sigterm => info!("SIGTERM received, shutting down"),
    }
}
