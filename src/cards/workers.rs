use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use futures::future::join_all;
use rand::rngs::StdRng;
use tokio::{
    runtime::Handle,
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::{debug, warn};

use crate::{
    cards::{
        refresh::{RefreshPolicy, draw_replacement_count},
        view::{CardsUpdate, CardsView},
    },
    client::{FetchError, ProfileSource, UNKNOWN_ERROR_MESSAGE},
    models::user::UserRecord,
};

/// Sends `update` to the view worker unless the component has been unmounted.
/// Returns whether the update was handed over.
fn send_if_mounted(
    sender: &UnboundedSender<CardsUpdate>,
    mounted: &AtomicBool,
    update: CardsUpdate,
) -> bool {
    if !mounted.load(Ordering::Acquire) {
        debug!("Dropping {update:?}: the cards are unmounted");
        return false;
    }
    sender.send(update).is_ok()
}

/// The single owner of the [`CardsView`]: applies updates in the order they arrive.
pub(crate) async fn cards_worker(
    mut view: CardsView,
    mut receiver: UnboundedReceiver<CardsUpdate>,
    mounted: Arc<AtomicBool>,
) {
    debug!("Started cards worker task.");
    view.update_frontend_state();
    while let Some(update) = receiver.recv().await {
        if !mounted.load(Ordering::Acquire) {
            debug!("Cards unmounted, stopping the cards worker.");
            break;
        }
        view.apply(update);
    }
}

/// Fetches the first batch. Runs once, at mount.
pub(crate) async fn load_initial(
    source: Arc<dyn ProfileSource>,
    batch_size: usize,
    sender: UnboundedSender<CardsUpdate>,
    mounted: Arc<AtomicBool>,
) {
    let fetch = Handle::current().spawn(async move { source.fetch_users(batch_size).await });
    let result = match fetch.await {
        Ok(Ok(users)) => Ok(users),
        Ok(Err(e)) => {
            warn!("Initial load failed: {e}");
            Err(e.display_message())
        }
        Err(e) => {
            warn!("BUG: initial load task died: {e:?}");
            Err(UNKNOWN_ERROR_MESSAGE.to_owned())
        }
    };
    send_if_mounted(&sender, &mounted, CardsUpdate::InitialLoad(result));
}

/// Everything the refresh timer needs to start cycles.
pub(crate) struct Refresher {
    pub(crate) source: Arc<dyn ProfileSource>,
    pub(crate) sender: UnboundedSender<CardsUpdate>,
    pub(crate) mounted: Arc<AtomicBool>,
    pub(crate) policy: RefreshPolicy,
    pub(crate) period: Duration,
    pub(crate) batch_size: usize,
    pub(crate) max_replacements: usize,
    pub(crate) rng: StdRng,
}

impl Refresher {
    /// Starts one refresh cycle per period, the first one a full period after mount.
    ///
    /// Cycles are never awaited: a slow cycle may still be landing when the next
    /// one starts.
    pub(crate) async fn run(mut self) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycle: u64 = 0;
        loop {
            ticker.tick().await;
            if !self.mounted.load(Ordering::Acquire) {
                break;
            }
            cycle += 1;
            match self.policy {
                RefreshPolicy::Partial => self.start_partial_cycle(cycle),
                RefreshPolicy::Full => self.start_full_cycle(cycle),
            }
        }
    }

    fn start_partial_cycle(&mut self, cycle: u64) {
        let count = draw_replacement_count(&mut self.rng, self.max_replacements);
        debug!("Refresh cycle {cycle}: fetching {count} replacement(s)");

        let fetches: Vec<_> = (0..count)
            .map(|_| {
                let source = self.source.clone();
                let sender = self.sender.clone();
                let mounted = self.mounted.clone();
                Handle::current().spawn(async move {
                    match fetch_single(source.as_ref()).await {
                        Ok(record) => {
                            send_if_mounted(&sender, &mounted, CardsUpdate::Replace(record))
                        }
                        Err(e) => {
                            warn!("Dropping failed replacement fetch: {e}");
                            false
                        }
                    }
                })
            })
            .collect();

        // Joined for bookkeeping only, the timer does not wait on it.
        Handle::current().spawn(async move {
            let delivered = join_all(fetches)
                .await
                .into_iter()
                .filter(|result| matches!(result, Ok(true)))
                .count();
            debug!("Refresh cycle {cycle}: {delivered}/{count} replacement(s) delivered");
        });
    }

    fn start_full_cycle(&self, cycle: u64) {
        debug!("Refresh cycle {cycle}: re-fetching {} user(s)", self.batch_size);
        let source = self.source.clone();
        let sender = self.sender.clone();
        let mounted = self.mounted.clone();
        let batch_size = self.batch_size;
        Handle::current().spawn(async move {
            let result = source.fetch_users(batch_size).await.map_err(|e| {
                warn!("Refresh cycle {cycle} failed: {e}");
                e.display_message()
            });
            send_if_mounted(&sender, &mounted, CardsUpdate::FullRefresh(result));
        });
    }
}

async fn fetch_single(source: &dyn ProfileSource) -> Result<UserRecord, FetchError> {
    source
        .fetch_users(1)
        .await?
        .into_iter()
        .next()
        .ok_or(FetchError::EmptyResults)
}
