use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::task::JoinHandle;
use tracing::info;

/// Keeps the cards mounted for as long as it is alive.
///
/// Dropping it (or calling [`CardsHandle::unmount`]) stops the refresh timer,
/// the initial load and the view worker. Fetches already in flight finish on
/// their own but their results are discarded.
#[derive(Debug)]
pub struct CardsHandle {
    mounted: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
}

impl CardsHandle {
    pub(crate) fn new(mounted: Arc<AtomicBool>, tasks: Vec<JoinHandle<()>>) -> Self {
        Self { mounted, tasks }
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for CardsHandle {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::Release);
        for task in self.tasks.drain(..) {
            task.abort();
        }
        info!("Cards unmounted");
    }
}
