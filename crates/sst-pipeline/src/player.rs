//! Playback: stepping the current day forward on a timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::coordinator::UpdateCoordinator;

/// Capability: the external view's "finished settling" await point.
///
/// The playback loop waits for this between steps so a slow layer refresh
/// is never outpaced by the timer.
#[async_trait]
pub trait ViewSettling: Send + Sync {
    async fn settled(&self);
}

/// A view that settles immediately; useful without a map attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlesImmediately;

#[async_trait]
impl ViewSettling for SettlesImmediately {
    async fn settled(&self) {}
}

/// Periodic driver that advances the current day while playing.
///
/// Each iteration steps one day forward (wrapping at the archive's edges),
/// waits for the view to settle, then pauses for the configured step
/// interval. Stopping takes effect between steps; a step already dispatched
/// runs to completion.
pub struct Player {
    coordinator: UpdateCoordinator,
    settling: Arc<dyn ViewSettling>,
    playing: Arc<AtomicBool>,
}

impl Player {
    pub fn new(coordinator: UpdateCoordinator, settling: Arc<dyn ViewSettling>) -> Self {
        Self {
            coordinator,
            settling,
            playing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Start stepping. No-op when already playing.
    pub fn play(&self) {
        if self.playing.swap(true, Ordering::SeqCst) {
            return;
        }

        let coordinator = self.coordinator.clone();
        let settling = Arc::clone(&self.settling);
        let playing = Arc::clone(&self.playing);
        let interval = coordinator.step_interval();

        tokio::spawn(async move {
            tracing::debug!("playback started");
            while playing.load(Ordering::SeqCst) {
                coordinator.next_day().await;
                settling.settled().await;
                tokio::time::sleep(interval).await;
            }
            tracing::debug!("playback stopped");
        });
    }

    /// Stop before the next step.
    pub fn stop(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }
}
