// ============================================================================
// RefreshScheduler : rafraîchissement périodique annulable
// ============================================================================
// - Un refresh immédiat au démarrage, puis un toutes les `period`
// - refresh_now() : déclenchement manuel hors cadence
// - stop() (ou Drop) : arrêt du timer, aucune tâche de timer ne survit
//
// Chaque déclenchement lance le refresh dans SA PROPRE tâche : un refresh
// manuel pendant un refresh automatique en vol s'exécute en parallèle.
// Les refreshs déjà lancés ne sont pas annulés par stop().
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Origine d'un déclenchement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshCause {
    /// Tick du timer (y compris le tick immédiat du démarrage)
    Timer,
    /// Demande explicite de l'utilisateur
    Manual,
}

/// Handle du scheduler : start / refresh_now / stop
pub struct RefreshScheduler {
    trigger_tx: mpsc::UnboundedSender<RefreshCause>,
    task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Démarre le scheduler sur le runtime tokio courant
    ///
    /// CONCEPT RUST : Fn() -> Future
    /// - `refresh` est appelée à chaque déclenchement pour produire une
    ///   nouvelle future, qui est ensuite spawnée
    /// - Doit être appelé depuis un contexte tokio (tokio::spawn)
    pub fn start<F, Fut>(period: Duration, refresh: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (trigger_tx, mut trigger_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            // Le premier tick d'un Interval est immédiat
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                let cause = tokio::select! {
                    _ = ticker.tick() => RefreshCause::Timer,
                    Some(cause) = trigger_rx.recv() => cause,
                };

                debug!(?cause, "Refresh triggered");
                tokio::spawn(refresh());
            }
        });

        info!(period_secs = period.as_secs(), "Refresh scheduler started");

        Self {
            trigger_tx,
            task: Some(task),
        }
    }

    /// Déclenche un refresh immédiat, sans toucher à la cadence du timer
    pub fn refresh_now(&self) {
        if self.trigger_tx.send(RefreshCause::Manual).is_err() {
            debug!("Manual refresh requested on stopped scheduler");
        }
    }

    /// Arrête le timer. Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Refresh scheduler stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// Tests
// ============================================================================
// CONCEPT : horloge virtuelle tokio (start_paused)
// - Le temps n'avance que lorsque toutes les tâches sont en attente
// - sleep(60s) s'exécute instantanément, de façon déterministe
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const PERIOD: Duration = Duration::from_secs(60);

    fn counting_scheduler(period: Duration) -> (RefreshScheduler, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let scheduler = RefreshScheduler::start(period, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (scheduler, count)
    }

    async fn settle() {
        time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_immediately_then_every_period() {
        let (_scheduler, count) = counting_scheduler(PERIOD);

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        time::sleep(PERIOD * 3).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_trigger_runs_outside_cadence() {
        let (scheduler, count) = counting_scheduler(PERIOD);
        settle().await;

        scheduler.refresh_now();
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        // La cadence du timer n'est pas décalée
        time::sleep(PERIOD - Duration::from_millis(20)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer() {
        let (mut scheduler, count) = counting_scheduler(PERIOD);
        settle().await;
        assert!(scheduler.is_active());

        scheduler.stop();
        time::sleep(PERIOD * 3).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_active());

        // Un refresh manuel après l'arrêt ne fait rien
        scheduler.refresh_now();
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // stop() est idempotent
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let (scheduler, count) = counting_scheduler(PERIOD);
        settle().await;
        drop(scheduler);

        time::sleep(PERIOD * 2).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_refreshes_are_allowed() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));

        let (current, max) = (in_flight.clone(), max_in_flight.clone());
        let scheduler = RefreshScheduler::start(PERIOD, move || {
            let (current, max) = (current.clone(), max.clone());
            async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                time::sleep(Duration::from_secs(5)).await;
                current.fetch_sub(1, Ordering::SeqCst);
            }
        });

        settle().await;
        scheduler.refresh_now();
        settle().await;

        assert_eq!(max_in_flight.load(Ordering::SeqCst), 2);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }
}
