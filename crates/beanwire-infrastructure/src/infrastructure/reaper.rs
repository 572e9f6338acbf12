//! Background conversation reaper
//!
//! Long-running conversations are evicted lazily whenever a unit of work
//! associates with their session. Sessions that see no traffic would keep
//! idle conversations forever, so the reaper sweeps every session on a
//! fixed period until its token is cancelled.

use beanwire_application::ConversationManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Spawn the reaper on the current tokio runtime
///
/// The task ends when `token` is cancelled.
pub fn spawn_conversation_reaper(
    conversations: Arc<ConversationManager>,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = interval.as_millis(), "Conversation reaper started");
        loop {
            tokio::select! {
                () = token.cancelled() => break,
                _ = ticker.tick() => {
                    let evicted = conversations.evict_all_expired();
                    if evicted > 0 {
                        info!(evicted, "Evicted idle conversations");
                    } else {
                        debug!("No idle conversations to evict");
                    }
                }
            }
        }
        info!("Conversation reaper stopped");
    })
}
