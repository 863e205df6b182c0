use std::time::{Duration, SystemTime};

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::state::SharedState;

/// Time between expired-session sweeps.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// Periodically delete sessions whose expiry has passed.
///
/// Failures are logged and swallowed; the next tick simply retries. The task
/// holds no lock shared with request handling, so a slow sweep never stalls
/// submissions.
pub async fn run(state: SharedState) {
    let mut ticker = interval(SWEEP_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match state
            .store()
            .delete_expired_sessions(SystemTime::now())
            .await
        {
            Ok(removed) if removed > 0 => info!(removed, "swept expired game sessions"),
            Ok(_) => debug!("session sweep found nothing to remove"),
            Err(err) => warn!(error = %err, "session sweep failed"),
        }
    }
}
