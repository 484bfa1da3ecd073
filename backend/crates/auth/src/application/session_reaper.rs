//! Background removal of expired sessions

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::repository::AuthSessionRepository;

/// Spawn a task that calls `cleanup_expired` every `interval`
///
/// Failures are logged and the loop keeps running; abort the handle to stop it.
pub fn spawn_session_reaper<S>(session_repo: Arc<S>, interval: Duration) -> JoinHandle<()>
where
    S: AuthSessionRepository + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match session_repo.cleanup_expired().await {
                Ok(0) => tracing::trace!("No expired sessions"),
                Ok(removed) => tracing::info!(removed, "Expired sessions reaped"),
                Err(e) => tracing::warn!(error = %e, "Session cleanup failed"),
            }
        }
    })
}
