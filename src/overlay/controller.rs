use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::Navigator;

/// Default exit-animation delay before navigating back.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Open,
    Closing,
    Closed,
}

/// Open/close lifecycle of one mounted overlay.
///
/// Owns the delayed navigation task; dropping the controller aborts it.
pub struct OverlayController {
    phase: Arc<watch::Sender<OverlayPhase>>,
    navigator: Arc<dyn Navigator>,
    close_delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl OverlayController {
    /// Mounts an open overlay.
    pub fn open(navigator: Arc<dyn Navigator>, close_delay: Duration) -> Self {
        let (phase, _) = watch::channel(OverlayPhase::Open);
        Self {
            phase: Arc::new(phase),
            navigator,
            close_delay,
            pending: None,
        }
    }

    pub fn phase(&self) -> OverlayPhase {
        *self.phase.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.phase() == OverlayPhase::Open
    }

    /// Dialog-style callback: only a change to closed does anything.
    pub fn on_open_change(&mut self, open: bool) -> bool {
        if open {
            return false;
        }
        self.request_close()
    }

    /// `Open -> Closing` now, `Closing -> Closed` after the close delay.
    ///
    /// Returns `false` if the overlay was not open.
    pub fn request_close(&mut self) -> bool {
        if !self.phase.send_if_modified(|phase| {
            if *phase != OverlayPhase::Open {
                return false;
            }
            *phase = OverlayPhase::Closing;
            true
        }) {
            return false;
        }
        debug!(delay_ms = self.close_delay.as_millis() as u64, "Closing overlay");

        let phase = Arc::clone(&self.phase);
        let navigator = Arc::clone(&self.navigator);
        let delay = self.close_delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.back();
            phase.send_replace(OverlayPhase::Closed);
            info!("Overlay closed");
        }));
        true
    }

    /// Resolves once the backward navigation has happened.
    ///
    /// Never resolves for an overlay that is not closing.
    pub async fn closed(&self) {
        let mut phase = self.phase.subscribe();
        let _ = phase.wait_for(|p| *p == OverlayPhase::Closed).await;
    }
}

impl Drop for OverlayController {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.is_finished() {
                debug!("Cancelling pending overlay navigation");
            }
            pending.abort();
        }
    }
}
